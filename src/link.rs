//! Hand-off to the external account-linking service.
//!
//! The connector never redeems authorization codes itself. Once a callback validates, the code
//! is forwarded through [`AccountLinker`] to a trusted backend that performs the token exchange
//! and stores the resulting credentials.

#[cfg(feature = "reqwest")] pub mod http;

#[cfg(feature = "reqwest")] pub use http::ReqwestAccountLinker;

// self
use crate::{_prelude::*, platform::Platform};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`AccountLinker`] implementations.
pub type LinkFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, LinkError>> + 'a + Send>>;

/// External collaborator that redeems a validated authorization code.
pub trait AccountLinker
where
	Self: Send + Sync,
{
	/// Links the account described by `request`.
	fn link(&self, request: LinkRequest) -> LinkFuture<'_, LinkedAccount>;
}

/// Payload sent to the account-linking service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRequest {
	/// Platform the code was issued by.
	pub platform: Platform,
	/// Authorization code received on the callback.
	pub authorization_code: String,
	/// Redirect URI used during authorization; providers require it to match on exchange.
	pub redirect_uri: String,
	/// PKCE verifier for platforms that require one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code_verifier: Option<String>,
}
impl Debug for LinkRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LinkRequest")
			.field("platform", &self.platform)
			.field("authorization_code", &"<redacted>")
			.field("redirect_uri", &self.redirect_uri)
			.field("code_verifier_set", &self.code_verifier.is_some())
			.finish()
	}
}

/// Account details reported back by the linking service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedAccount {
	/// Platform the account belongs to.
	pub platform: Option<Platform>,
	/// Provider-side account identifier.
	pub account_id: Option<String>,
	/// Provider-side handle or display name.
	pub username: Option<String>,
}

/// Failures surfaced by [`AccountLinker`] implementations.
#[derive(Debug, ThisError)]
pub enum LinkError {
	/// The service refused to link the account.
	#[error("Account linking was rejected: {message}")]
	Rejected {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Service-supplied message.
		message: String,
	},
	/// The request could not be encoded.
	#[error("Account-linking request could not be encoded.")]
	Encode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// The service could not be reached.
	#[error("Network error occurred while calling the account-linking service.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The service answered with a body that could not be parsed.
	#[error("Account-linking service returned malformed JSON.")]
	Response {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl LinkError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Sentence suitable for showing to the user.
	pub fn user_message(&self) -> Cow<'_, str> {
		match self {
			LinkError::Rejected { message, .. } => Cow::Borrowed(message.as_str()),
			LinkError::Encode { .. } | LinkError::Response { .. } =>
				Cow::Borrowed("The account-linking service returned an unexpected response."),
			LinkError::Transport { .. } =>
				Cow::Borrowed("Could not reach the account-linking service. Please try again."),
		}
	}
}
