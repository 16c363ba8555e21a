//! Crate-wide error type.

use thiserror::Error;

use crate::action::ActionError;
use crate::climb::SearchError;
use crate::config::ConfigError;
use crate::seating::SeatingError;
use crate::sheet::SheetError;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Seating error: {0}")]
    Seating(#[from] SeatingError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Invalid swap: {0}")]
    Action(#[from] ActionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
