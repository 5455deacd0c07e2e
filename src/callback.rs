//! Callback query parsing and provider error translation.
//!
//! Providers redirect to `{origin}/auth/callback` with either `code` + `state` or
//! `error` + `error_description` + `state`. [`CallbackParams`] captures the query,
//! [`parse_provider_error`] extracts the error half, and [`describe`] maps it to the
//! sentence shown to the user.

// self
use crate::_prelude::*;

/// Fallback sentence used when the provider supplied neither a known code nor a description.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred while connecting your account.";

/// Parameters delivered on the callback URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// Authorization code.
	pub code: Option<String>,
	/// CSRF state echoed by the provider.
	pub state: Option<String>,
	/// Provider-reported error code.
	pub error: Option<String>,
	/// Provider-reported error description.
	pub error_description: Option<String>,
}
impl CallbackParams {
	/// Parses a raw query string (with or without a leading `?`).
	pub fn from_query(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);

		Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
	}

	/// Parses the query component of a callback URL.
	pub fn from_url(url: &Url) -> Self {
		Self::from_pairs(url.query_pairs())
	}

	fn from_pairs<'a>(pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>) -> Self {
		let mut params = Self::default();

		for (key, value) in pairs {
			let slot = match key.as_ref() {
				"code" => &mut params.code,
				"state" => &mut params.state,
				"error" => &mut params.error,
				"error_description" => &mut params.error_description,
				_ => continue,
			};

			// The first occurrence wins so a duplicated parameter cannot override it.
			if slot.is_none() {
				*slot = Some(value.into_owned());
			}
		}

		params
	}
}

/// Provider error codes defined by RFC 6749 §4.1.2.1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
	/// The user or the authorization server denied the request.
	AccessDenied,
	/// The request is missing a parameter or is otherwise malformed.
	InvalidRequest,
	/// The client is not authorized to use this method.
	UnauthorizedClient,
	/// The server does not support the `code` response type.
	UnsupportedResponseType,
	/// The requested scope is invalid, unknown, or malformed.
	InvalidScope,
	/// The server hit an unexpected condition.
	ServerError,
	/// The server is temporarily overloaded or under maintenance.
	TemporarilyUnavailable,
	/// Any code outside the standard set, kept verbatim.
	Other(String),
}
impl ProviderErrorCode {
	/// Returns the wire representation of the code.
	pub fn as_str(&self) -> &str {
		match self {
			ProviderErrorCode::AccessDenied => "access_denied",
			ProviderErrorCode::InvalidRequest => "invalid_request",
			ProviderErrorCode::UnauthorizedClient => "unauthorized_client",
			ProviderErrorCode::UnsupportedResponseType => "unsupported_response_type",
			ProviderErrorCode::InvalidScope => "invalid_scope",
			ProviderErrorCode::ServerError => "server_error",
			ProviderErrorCode::TemporarilyUnavailable => "temporarily_unavailable",
			ProviderErrorCode::Other(code) => code,
		}
	}

	/// Fixed user-facing sentence for standard codes.
	pub fn message(&self) -> Option<&'static str> {
		let message = match self {
			ProviderErrorCode::AccessDenied =>
				"You denied access to your account. Please try again if you want to connect this platform.",
			ProviderErrorCode::InvalidRequest =>
				"The authorization request was invalid. Please try connecting again.",
			ProviderErrorCode::UnauthorizedClient =>
				"This application is not authorized to connect to this platform.",
			ProviderErrorCode::UnsupportedResponseType =>
				"This platform does not support the requested authorization method.",
			ProviderErrorCode::InvalidScope =>
				"The requested permissions are invalid or not supported by this platform.",
			ProviderErrorCode::ServerError =>
				"The platform encountered an error. Please try again later.",
			ProviderErrorCode::TemporarilyUnavailable =>
				"The platform is temporarily unavailable. Please try again later.",
			ProviderErrorCode::Other(_) => return None,
		};

		Some(message)
	}
}
impl From<&str> for ProviderErrorCode {
	fn from(value: &str) -> Self {
		match value {
			"access_denied" => ProviderErrorCode::AccessDenied,
			"invalid_request" => ProviderErrorCode::InvalidRequest,
			"unauthorized_client" => ProviderErrorCode::UnauthorizedClient,
			"unsupported_response_type" => ProviderErrorCode::UnsupportedResponseType,
			"invalid_scope" => ProviderErrorCode::InvalidScope,
			"server_error" => ProviderErrorCode::ServerError,
			"temporarily_unavailable" => ProviderErrorCode::TemporarilyUnavailable,
			other => ProviderErrorCode::Other(other.to_owned()),
		}
	}
}
impl Display for ProviderErrorCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error reported by the provider on the callback URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthError {
	/// Reported error code.
	pub code: ProviderErrorCode,
	/// Optional human-readable description.
	pub description: Option<String>,
	/// State echoed alongside the error.
	pub state: Option<String>,
}
impl OAuthError {
	/// Creates an error for `code` with no description or state.
	pub fn new(code: impl Into<ProviderErrorCode>) -> Self {
		Self { code: code.into(), description: None, state: None }
	}

	/// User-facing sentence for this error (see [`describe`]).
	pub fn message(&self) -> Cow<'_, str> {
		describe(self)
	}
}
impl From<&str> for OAuthError {
	fn from(code: &str) -> Self {
		Self::new(code)
	}
}
impl Display for OAuthError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.description {
			Some(description) => write!(f, "{}: {description}", self.code),
			None => Display::fmt(&self.code, f),
		}
	}
}

/// Extracts the provider-reported error, if the callback carries one.
pub fn parse_provider_error(params: &CallbackParams) -> Option<OAuthError> {
	let code = params.error.as_deref().filter(|code| !code.is_empty())?;

	Some(OAuthError {
		code: ProviderErrorCode::from(code),
		description: params.error_description.clone().filter(|d| !d.trim().is_empty()),
		state: params.state.clone(),
	})
}

/// Maps `error` to the sentence shown to the user.
///
/// Standard codes have fixed text; anything else falls back to the provider description, then
/// to [`UNKNOWN_ERROR_MESSAGE`].
pub fn describe(error: &OAuthError) -> Cow<'_, str> {
	match (error.code.message(), error.description.as_deref()) {
		(Some(message), _) => Cow::Borrowed(message),
		(None, Some(description)) => Cow::Borrowed(description),
		(None, None) => Cow::Borrowed(UNKNOWN_ERROR_MESSAGE),
	}
}
