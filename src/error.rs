//! Crate-level error types shared across the registry, stores, and flows.

// self
use crate::{_prelude::*, platform::Platform};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// Only local validation and infrastructure failures are raised through this type.
/// Expected callback failures (state mismatch, missing code, provider denial) are returned
/// as data via [`crate::flow::CallbackOutcome`].
#[derive(Debug, ThisError)]
pub enum Error {
	/// Session storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::session::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Account-linking collaborator failure.
	#[error(transparent)]
	Link(#[from] crate::link::LinkError),

	/// Platform identifier is not part of the supported set.
	#[error("Platform `{platform}` is not supported.")]
	UnknownPlatform {
		/// Identifier supplied by the caller.
		platform: String,
	},
	/// No client identifier is configured for the platform.
	#[error("No client identifier is configured for {platform}.")]
	MissingClientConfig {
		/// Platform lacking a client identifier.
		platform: Platform,
	},
	/// Post-authorization redirect target is not a safe in-app path.
	#[error(transparent)]
	InvalidRedirectPath(#[from] crate::session::RedirectPathError),
}

/// Configuration and validation failures raised before any navigation happens.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Registry entry contains an invalid authorization endpoint.
	#[error("Authorization endpoint for {platform} is invalid.")]
	InvalidEndpoint {
		/// Platform whose endpoint failed to parse.
		platform: Platform,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect URI is not an absolute HTTP(S) URL.
	#[error("Redirect URI `{uri}` must be an absolute http(s) URL.")]
	InvalidRedirect {
		/// Offending redirect URI.
		uri: String,
	},
	/// Application origin cannot be used to build the callback URI.
	#[error("Application origin is invalid.")]
	InvalidOrigin {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Application origin is not an absolute HTTP(S) URL.
	#[error("Application origin `{origin}` must be an absolute http(s) URL.")]
	UnsupportedOrigin {
		/// Offending origin.
		origin: String,
	},
	/// Application origin is missing from the environment.
	#[error("Environment variable `{key}` is required.")]
	MissingEnv {
		/// Environment key that was not set.
		key: &'static str,
	},
	/// Environment value could not be interpreted.
	#[error("Environment variable `{key}` has an invalid value: {value}.")]
	InvalidEnv {
		/// Environment key holding the invalid value.
		key: &'static str,
		/// Raw value read from the environment.
		value: String,
	},
	/// Authorization request carries no scopes.
	#[error("Authorization request must include at least one scope.")]
	EmptyScope,
	/// Request scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::scope::ScopeValidationError),
}
