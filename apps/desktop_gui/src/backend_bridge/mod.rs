//! Backend side of the GUI: command queue, worker runtime and save dialog.

pub mod commands;
pub mod runtime;
pub mod save_dialog;
