/// Errors that can occur delivering a line to the metrics database.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The HTTP request could not be completed.
    #[error("delivery transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("write rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, DeliveryError>;
