use async_trait::async_trait;

use super::domain::{BookingReference, BookingRequest};

/// Downstream reservation desk that accepts finalized bookings.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, request: BookingRequest) -> Result<BookingReference, SubmissionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("booking rejected: {0}")]
    Rejected(String),
    #[error("booking gateway unavailable: {0}")]
    Unavailable(String),
    #[error("booking gateway did not respond within {after_ms}ms")]
    Timeout { after_ms: u64 },
}
