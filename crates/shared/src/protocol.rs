//! HTTP contract with the prediction service.

pub const PREDICT_PATH: &str = "/api/predict";

/// Multipart part name carrying the spreadsheet.
pub const FILE_FIELD: &str = "file";

/// Name the returned archive is saved under, whatever the server suggests.
pub const RESULT_ARCHIVE_NAME: &str = "resultado.zip";

pub fn predict_url(base_url: &str) -> String {
    format!("{}{PREDICT_PATH}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::predict_url;

    #[test]
    fn joins_base_url_and_predict_path() {
        assert_eq!(
            predict_url("http://localhost:8000"),
            "http://localhost:8000/api/predict"
        );
        assert_eq!(
            predict_url("https://predict.example.com/"),
            "https://predict.example.com/api/predict"
        );
    }
}
