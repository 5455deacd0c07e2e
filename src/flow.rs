//! Connection flow orchestration.
//!
//! [`Connector`] ties the registry, URL builder, session store, and error translator together:
//!
//! 1. [`Connector::initiate`] validates the request, builds the authorize URL, and saves the
//!    pending [`AuthSession`]. The caller sends the user to the returned URL.
//! 2. [`Connector::handle_redirect`] (or [`Connector::handle_callback`] when the query has
//!    already been split) consumes the session and decides whether the callback is trustworthy.
//! 3. [`Connector::complete`] additionally hands a validated code to an [`AccountLinker`] and
//!    reports where the user should land.
//!
//! Expected failures (forged or stale state, a missing code, a provider denial) are returned as
//! [`CallbackFailure`] values; only configuration and storage problems surface as [`Error`].

// self
use crate::{
	_prelude::*,
	authorize::{AuthorizationRequest, PkceVerifier, build_auth_url},
	callback::{self, CallbackParams, OAuthError},
	config::{self, ClientIds, ConnectorConfig},
	error::ConfigError,
	link::{AccountLinker, LinkRequest, LinkedAccount},
	obs::{self, FlowOutcome, FlowSpan, FlowStage},
	platform::Platform,
	session::{
		self, AuthSession, DEFAULT_SESSION_TTL, RedirectPath, SessionRepository, StateValidation,
	},
};

/// Path, relative to the application origin, that providers redirect back to.
pub const CALLBACK_PATH: &str = "/auth/callback";
/// In-app path used when the session carried no redirect target.
pub const CONNECTIONS_PATH: &str = "/connections";
/// Sentence shown when the callback `state` cannot be trusted.
pub const STATE_MISMATCH_MESSAGE: &str = "Invalid OAuth state. This may be a security issue.";
/// Sentence shown when the provider redirected back without a code.
pub const MISSING_CODE_MESSAGE: &str = "Authorization code not received from OAuth provider.";

/// Navigation target produced by [`Connector::initiate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRedirect {
	/// Platform being connected.
	pub platform: Platform,
	/// Provider authorize URL the user must be sent to.
	pub url: Url,
	/// CSRF state saved alongside the session.
	pub state: String,
}

/// Callback that passed state validation and carries a code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizedCallback {
	/// Platform recorded when the flow started.
	pub platform: Platform,
	/// In-app path recorded when the flow started.
	pub redirect_to: Option<RedirectPath>,
	/// Authorization code issued by the provider.
	pub code: String,
	/// Callback URI used when building the authorize URL.
	pub redirect_uri: Url,
	/// PKCE verifier, for platforms that require one.
	pub code_verifier: Option<PkceVerifier>,
}
impl AuthorizedCallback {
	/// Payload forwarded to the account-linking service.
	pub fn link_request(&self) -> LinkRequest {
		LinkRequest {
			platform: self.platform,
			authorization_code: self.code.clone(),
			redirect_uri: self.redirect_uri.to_string(),
			code_verifier: self.code_verifier.as_ref().map(|verifier| verifier.expose().to_owned()),
		}
	}

	/// In-app path to land on once linking succeeds.
	pub fn navigate_to(&self) -> &str {
		self.redirect_to.as_deref().unwrap_or(CONNECTIONS_PATH)
	}
}

/// Why a callback was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackFailure {
	/// No pending session, a forged state, or an expired session.
	StateMismatch,
	/// State was valid but no code was delivered.
	MissingAuthorizationCode,
	/// The provider redirected back with an error.
	Provider(OAuthError),
}
impl CallbackFailure {
	/// Sentence shown to the user.
	pub fn message(&self) -> Cow<'_, str> {
		match self {
			CallbackFailure::StateMismatch => Cow::Borrowed(STATE_MISMATCH_MESSAGE),
			CallbackFailure::MissingAuthorizationCode => Cow::Borrowed(MISSING_CODE_MESSAGE),
			CallbackFailure::Provider(error) => callback::describe(error),
		}
	}
}
impl Display for CallbackFailure {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.message())
	}
}

/// Result of processing a provider redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
	/// The callback is trustworthy and its code may be redeemed.
	Authorized(AuthorizedCallback),
	/// The callback was refused; nothing should be linked.
	Failed(CallbackFailure),
}
impl CallbackOutcome {
	/// Returns true when the callback may be redeemed.
	pub fn is_authorized(&self) -> bool {
		matches!(self, CallbackOutcome::Authorized(_))
	}

	/// Failure reason, if any.
	pub fn failure(&self) -> Option<&CallbackFailure> {
		match self {
			CallbackOutcome::Authorized(_) => None,
			CallbackOutcome::Failed(failure) => Some(failure),
		}
	}
}

/// Final state reported by [`Connector::complete`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
	/// The account was linked.
	Connected {
		/// Platform that was connected.
		platform: Platform,
		/// In-app path to navigate to.
		navigate_to: String,
		/// Details reported by the linking service.
		account: LinkedAccount,
	},
	/// The flow ended without linking an account.
	Failed {
		/// Sentence shown to the user.
		message: String,
	},
}

/// Orchestrates connection flows against a shared session store.
#[derive(Clone)]
pub struct Connector {
	store: Arc<dyn SessionRepository>,
	clients: ClientIds,
	origin: Url,
	session_ttl: Duration,
}
impl Connector {
	/// Creates a connector for `origin` using the default validity window.
	pub fn new(store: Arc<dyn SessionRepository>, clients: ClientIds, origin: Url) -> Result<Self> {
		config::validate_origin(&origin)?;

		Ok(Self { store, clients, origin, session_ttl: DEFAULT_SESSION_TTL })
	}

	/// Creates a connector from a loaded [`ConnectorConfig`].
	pub fn from_config(store: Arc<dyn SessionRepository>, config: ConnectorConfig) -> Result<Self> {
		let session_ttl = config.session_ttl();

		Ok(Self::new(store, config.clients, config.origin)?.with_session_ttl(session_ttl))
	}

	/// Overrides the session validity window.
	pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
		self.session_ttl = ttl;

		self
	}

	/// Session store shared by every flow.
	pub fn store(&self) -> &Arc<dyn SessionRepository> {
		&self.store
	}

	/// Platforms that have a client identifier configured.
	pub fn available_platforms(&self) -> Vec<Platform> {
		self.clients.configured().collect()
	}

	/// Absolute callback URI registered with every provider.
	pub fn callback_uri(&self) -> Result<Url> {
		self.origin.join(CALLBACK_PATH).map_err(|source| ConfigError::InvalidOrigin { source }.into())
	}

	/// Starts a flow for `platform_id`, returning the URL the user must be sent to.
	///
	/// Every validation runs before the session is written, so a failed call leaves any pending
	/// session untouched. A successful call supersedes it.
	pub async fn initiate(
		&self,
		platform_id: &str,
		redirect_to: Option<&str>,
	) -> Result<AuthorizationRedirect> {
		const STAGE: FlowStage = FlowStage::Initiate;

		let span = FlowSpan::new(STAGE, "initiate");

		obs::record_flow_outcome(STAGE, FlowOutcome::Attempt);

		let result: Result<AuthorizationRedirect> = span
			.instrument(async move {
				let platform = platform_id.parse::<Platform>()?;
				let client_id = self.clients.require(platform)?;
				let redirect_to = redirect_to
					.filter(|path| !path.is_empty())
					.map(RedirectPath::new)
					.transpose()?;
				let state = session::generate_state();
				let request = AuthorizationRequest::new(
					client_id,
					self.callback_uri()?,
					platform.config().default_scope()?,
				)
				.with_state(state);
				let (url, state, code_verifier) = build_auth_url(platform, &request)?.into_parts();

				self.store
					.save(
						AuthSession::new(platform, state.clone(), redirect_to)
							.with_code_verifier(code_verifier),
					)
					.await?;

				Ok(AuthorizationRedirect { platform, url, state })
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(STAGE, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(STAGE, FlowOutcome::Failure),
		}

		result
	}

	/// Validates a callback from its `code` and `state` parameters.
	///
	/// The pending session is consumed whatever the outcome.
	pub async fn handle_callback(
		&self,
		code: Option<&str>,
		state: Option<&str>,
	) -> Result<CallbackOutcome> {
		const STAGE: FlowStage = FlowStage::Callback;

		let span = FlowSpan::new(STAGE, "handle_callback");

		obs::record_flow_outcome(STAGE, FlowOutcome::Attempt);

		let result = span.instrument(self.validate_callback(code, state)).await;

		record_callback_outcome(&result);

		result
	}

	/// Validates a callback from its parsed query, translating provider errors first.
	pub async fn handle_redirect(&self, params: &CallbackParams) -> Result<CallbackOutcome> {
		const STAGE: FlowStage = FlowStage::Callback;

		let span = FlowSpan::new(STAGE, "handle_redirect");

		obs::record_flow_outcome(STAGE, FlowOutcome::Attempt);

		let result: Result<CallbackOutcome> = span
			.instrument(async move {
				if let Some(error) = callback::parse_provider_error(params) {
					self.store.clear().await?;

					return Ok(CallbackOutcome::Failed(CallbackFailure::Provider(error)));
				}

				self.validate_callback(params.code.as_deref(), params.state.as_deref()).await
			})
			.await;

		record_callback_outcome(&result);

		result
	}

	/// Validates a callback and links the account through `linker`.
	///
	/// Linking failures are reported as [`Completion::Failed`] with the service's message.
	pub async fn complete(
		&self,
		params: &CallbackParams,
		linker: &dyn AccountLinker,
	) -> Result<Completion> {
		const STAGE: FlowStage = FlowStage::Link;

		let authorized = match self.handle_redirect(params).await? {
			CallbackOutcome::Authorized(authorized) => authorized,
			CallbackOutcome::Failed(failure) =>
				return Ok(Completion::Failed { message: failure.message().into_owned() }),
		};
		let span = FlowSpan::new(STAGE, "complete");

		obs::record_flow_outcome(STAGE, FlowOutcome::Attempt);

		match span.instrument(linker.link(authorized.link_request())).await {
			Ok(account) => {
				obs::record_flow_outcome(STAGE, FlowOutcome::Success);

				Ok(Completion::Connected {
					platform: authorized.platform,
					navigate_to: authorized.navigate_to().to_owned(),
					account,
				})
			},
			Err(e) => {
				obs::record_flow_outcome(STAGE, FlowOutcome::Failure);

				Ok(Completion::Failed { message: e.user_message().into_owned() })
			},
		}
	}

	/// Discards any pending session.
	pub async fn abandon(&self) -> Result<()> {
		self.store.clear().await?;

		Ok(())
	}

	async fn validate_callback(
		&self,
		code: Option<&str>,
		state: Option<&str>,
	) -> Result<CallbackOutcome> {
		let received = state.unwrap_or_default();
		let session = match self.store.validate_within(received, self.session_ttl).await? {
			StateValidation::Valid(session) => session,
			StateValidation::Rejected(reason) => {
				obs::log_state_rejection(reason);
				obs::record_state_rejection(reason);

				return Ok(CallbackOutcome::Failed(CallbackFailure::StateMismatch));
			},
		};
		let Some(code) = code.filter(|code| !code.trim().is_empty()) else {
			return Ok(CallbackOutcome::Failed(CallbackFailure::MissingAuthorizationCode));
		};

		Ok(CallbackOutcome::Authorized(AuthorizedCallback {
			platform: session.platform,
			redirect_to: session.redirect_to,
			code: code.to_owned(),
			redirect_uri: self.callback_uri()?,
			code_verifier: session.code_verifier,
		}))
	}
}
impl Debug for Connector {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Connector")
			.field("origin", &self.origin.as_str())
			.field("clients", &self.clients)
			.field("session_ttl", &self.session_ttl)
			.finish_non_exhaustive()
	}
}

fn record_callback_outcome(result: &Result<CallbackOutcome>) {
	let outcome = match result {
		Ok(CallbackOutcome::Authorized(_)) => FlowOutcome::Success,
		_ => FlowOutcome::Failure,
	};

	obs::record_flow_outcome(FlowStage::Callback, outcome);
}
