//! Form controller glue: backend events, view reducer and command dispatch.

pub mod events;
pub mod orchestration;
pub mod reducer;
