// ABOUTME: Error types for the carousel-block crate
// ABOUTME: Provides structured error handling for parsing, decoration and page generation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarouselError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    #[error("Markup error: {0}")]
    MarkupError(String),

    #[error("Carousel block contains no list element")]
    MissingList,

    #[error("Carousel list contains no items")]
    EmptyList,

    #[error("Invalid simulation step: {0}")]
    InvalidStep(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our CarouselError
impl From<anyhow::Error> for CarouselError {
    fn from(err: anyhow::Error) -> Self {
        CarouselError::UnknownError(err.to_string())
    }
}

impl From<quick_xml::Error> for CarouselError {
    fn from(err: quick_xml::Error) -> Self {
        CarouselError::MarkupError(format!("XML parse failed: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for CarouselError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        CarouselError::MarkupError(format!("Malformed attribute: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, CarouselError>;
