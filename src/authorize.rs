//! Authorization URL builder shared by every platform.

pub mod pkce;

pub use pkce::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	platform::{Platform, RuleContext},
	scope::ScopeList,
	session,
};

/// Generic authorization request, prior to platform augmentation.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
	/// OAuth 2.0 client identifier registered with the platform.
	pub client_id: String,
	/// Absolute callback URI registered with the platform.
	pub redirect_uri: Url,
	/// Requested scopes, in the order they should appear.
	pub scope: ScopeList,
	/// CSRF state; generated when absent.
	pub state: Option<String>,
}
impl AuthorizationRequest {
	/// Creates a request without a caller-supplied state.
	pub fn new(client_id: impl Into<String>, redirect_uri: Url, scope: ScopeList) -> Self {
		Self { client_id: client_id.into(), redirect_uri, scope, state: None }
	}

	/// Pins the CSRF state carried by the URL.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}
}

/// Fully-formed authorize URL plus the secrets generated while building it.
#[derive(Clone, Debug)]
pub struct AuthorizeUrl {
	/// Platform the URL targets.
	pub platform: Platform,
	/// URL the end-user must be sent to.
	pub url: Url,
	/// CSRF state carried in the `state` parameter.
	pub state: String,
	pkce: Option<PkcePair>,
}
impl AuthorizeUrl {
	/// PKCE challenge placed on the URL, if the platform requires one.
	pub fn code_challenge(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pair| pair.challenge.as_str())
	}

	/// PKCE verifier that must accompany the code exchange, if any.
	pub fn code_verifier(&self) -> Option<&PkceVerifier> {
		self.pkce.as_ref().map(|pair| &pair.verifier)
	}

	/// Splits the value into the URL, the state, and the optional verifier.
	pub fn into_parts(self) -> (Url, String, Option<PkceVerifier>) {
		(self.url, self.state, self.pkce.map(|pair| pair.verifier))
	}
}

/// Builds the platform-specific authorize URL for `request`.
///
/// The standard parameters are emitted first (`client_id`, `redirect_uri`, `scope`,
/// `response_type=code`, `state`), followed by the platform's [`crate::platform::ParamRule`]s
/// in declaration order.
pub fn build_auth_url(platform: Platform, request: &AuthorizationRequest) -> Result<AuthorizeUrl> {
	let config = platform.config();
	let client_id = request.client_id.trim();

	if client_id.is_empty() {
		return Err(Error::MissingClientConfig { platform });
	}
	if request.scope.is_empty() {
		return Err(ConfigError::EmptyScope.into());
	}

	validate_redirect(&request.redirect_uri)?;

	let state = request
		.state
		.as_deref()
		.filter(|state| !state.is_empty())
		.map(str::to_owned)
		.unwrap_or_else(session::generate_state);
	let pkce = config.requires_pkce().then(PkcePair::generate);
	let mut url = config.authorization_endpoint()?;
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("client_id", client_id);
	pairs.append_pair("redirect_uri", request.redirect_uri.as_str());
	pairs.append_pair("scope", &request.scope.joined());
	pairs.append_pair("response_type", "code");
	pairs.append_pair("state", &state);

	let ctx = RuleContext {
		client_id,
		code_challenge: pkce.as_ref().map(|pair| pair.challenge.as_str()),
	};

	for rule in config.params {
		for (key, value) in rule.query_pairs(&ctx) {
			pairs.append_pair(key, &value);
		}
	}

	drop(pairs);

	Ok(AuthorizeUrl { platform, url, state, pkce })
}

fn validate_redirect(uri: &Url) -> Result<(), ConfigError> {
	if matches!(uri.scheme(), "http" | "https") && uri.has_host() {
		Ok(())
	} else {
		Err(ConfigError::InvalidRedirect { uri: uri.to_string() })
	}
}
