use thiserror::Error;

/// Errors raised while building handlers and route tables.
///
/// All of them happen before the server accepts its first request and are
/// meant to abort startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
	#[error("route '{0}' is already registered")]
	DuplicateRoute(String),

	#[error("invalid route pattern '{pattern}': {reason}")]
	InvalidRoute { pattern: String, reason: &'static str },

	#[error("invalid mount prefix '{prefix}': {reason}")]
	InvalidPrefix { prefix: String, reason: &'static str },

	#[error("asset bundle '{bundle}' does not contain '{path}'")]
	MissingAsset { bundle: String, path: String },

	#[error("asset bundle '{bundle}' is broken: {reason}")]
	InvalidBundle { bundle: String, reason: String },
}
