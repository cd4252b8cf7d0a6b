use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Unable to render chart: {0}")]
    Render(#[from] anyhow::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Export was not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}
