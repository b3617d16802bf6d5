//! Error types for promo-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromoError {
    #[error("Invalid date: {0}")]
    UnparsableDate(String),

    #[error("Invalid post feed: {0}")]
    InvalidFeed(String),
}

pub type Result<T> = std::result::Result<T, PromoError>;
