//! Engine-level errors
//!
//! Pausing, completing and navigating are ordinary transitions, not errors.
//! These cover the few things that stop the visualizer from running at all.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Bad technique name, cycle count or configuration file
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The renderer cannot draw (terminal too small, capability missing)
    #[error("render backend error: {0}")]
    RenderBackend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<CatalogError> for EngineError {
    fn from(e: CatalogError) -> Self {
        Self::Configuration(e.into())
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Configuration(e.into())
    }
}

impl EngineError {
    /// Whether this is a startup configuration problem
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_is_configuration() {
        let err: EngineError = crate::catalog::lookup("nope").unwrap_err().into();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_render_error_is_not_configuration() {
        let err = EngineError::RenderBackend("terminal too small".to_string());
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "render backend error: terminal too small");
    }
}
