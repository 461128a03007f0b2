use djournal_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("text contains no sentences to score")]
    EmptyText,

    #[error(transparent)]
    Store(#[from] StoreError),
}
