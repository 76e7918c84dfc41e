// src/error.rs
//! Error types for the GUI engine

use thiserror_no_std::Error;

/// Errors raised while building, drawing or navigating screens
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NbglError {
    #[error("Object pool exhausted on layer {layer} (max: {max})")]
    ObjectPoolExhausted { layer: u8, max: usize },

    #[error("Callback object pool exhausted (max: {max})")]
    CallbackPoolExhausted { max: usize },

    #[error("Container children exceeded (max: {max})")]
    ContainerFull { max: usize },

    #[error("Screen stack full (max: {max})")]
    LayerStackFull { max: usize },

    #[error("Page info table full (max: {max} pages)")]
    PageTableFull { max: usize },

    #[error("Stale or unknown object handle")]
    InvalidHandle,

    #[error("Object is not a {expected}")]
    WrongObjectType { expected: &'static str },

    #[error("Invalid navigation from page {from} to page {to}")]
    InvalidNavigation { from: u8, to: u8 },

    #[error("Element index {index} out of range (count: {count})")]
    ElementOutOfRange { index: i32, count: u8 },

    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(&'static str),

    #[error("Invalid profile blob")]
    InvalidProfile,
}

/// Result type for GUI operations
pub type NbglResult<T> = Result<T, NbglError>;
