//! # Error Types
//!
//! This module defines error types used throughout the etiqueta library.

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum EtiquetaError {
    /// Required label fields missing or empty
    #[error("Validation error: {0}")]
    Validation(String),

    /// QR encoding capability unavailable for the given input
    #[error("QR render dependency error: {0}")]
    RenderDependency(String),

    /// Export requested on a surface with no composed label
    #[error("Export precondition error: {0}")]
    ExportPrecondition(String),

    /// Rasterization of a composed label failed
    #[error("Rasterization error: {0}")]
    Rasterization(String),

    /// PNG/JPEG/PDF encoding failed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Network, status, or parse failure talking to the registry
    #[error("Registry error: {0}")]
    Registry(String),

    /// Invalid configuration (e.g. malformed registry URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Image loading or processing error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
