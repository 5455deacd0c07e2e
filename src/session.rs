//! Single-slot storage for the in-flight authorization attempt.
//!
//! An [`AuthSession`] is created when a flow is initiated and consumed exactly once when the
//! provider redirects back. [`SessionRepository`] abstracts the backing store so the slot can
//! live in process memory ([`MemorySessionStore`]) or in a file that survives the browser
//! round-trip and process restarts ([`FileSessionStore`]).

pub mod file;
pub mod memory;
pub mod redirect;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use redirect::*;

// self
use crate::{
	_prelude::*,
	authorize::{PkceVerifier, pkce},
	platform::Platform,
};

/// Length of generated CSRF state tokens (alphanumeric, ≈256 bits of entropy).
pub const STATE_LEN: usize = 43;
/// Validity window applied by [`SessionRepository::validate`].
pub const DEFAULT_SESSION_TTL: Duration = Duration::minutes(10);

/// Boxed future returned by [`SessionRepository`] implementations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Error type produced by [`SessionRepository`] implementations.
///
/// Only infrastructure problems surface here; validating without an active session is not an
/// error (see [`StateRejection::NoActiveSession`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure (storage disabled, I/O error).
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// In-flight authorization attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
	/// Platform the user is connecting.
	pub platform: Platform,
	/// CSRF state sent to the provider.
	pub state: String,
	/// In-app path restored once the account is linked.
	pub redirect_to: Option<RedirectPath>,
	/// PKCE verifier, for platforms that require one.
	pub code_verifier: Option<PkceVerifier>,
	/// Instant the attempt was started.
	pub created_at: OffsetDateTime,
}
impl AuthSession {
	/// Creates a session stamped with the current UTC instant.
	pub fn new(platform: Platform, state: impl Into<String>, redirect_to: Option<RedirectPath>) -> Self {
		Self {
			platform,
			state: state.into(),
			redirect_to,
			code_verifier: None,
			created_at: OffsetDateTime::now_utc(),
		}
	}

	/// Attaches the PKCE verifier generated alongside the authorize URL.
	pub fn with_code_verifier(mut self, verifier: Option<PkceVerifier>) -> Self {
		self.code_verifier = verifier;

		self
	}

	/// Overrides the creation instant.
	pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
		self.created_at = created_at;

		self
	}

	/// Returns true once `ttl` has elapsed since creation.
	pub fn is_expired_at(&self, now: OffsetDateTime, ttl: Duration) -> bool {
		now - self.created_at >= ttl
	}
}

/// Why a callback `state` was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateRejection {
	/// No attempt was pending.
	NoActiveSession,
	/// The received value differs from the stored token.
	Mismatch,
	/// The stored attempt outlived its validity window.
	Expired,
}
impl StateRejection {
	/// Returns a stable label suitable for log or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StateRejection::NoActiveSession => "no_active_session",
			StateRejection::Mismatch => "mismatch",
			StateRejection::Expired => "expired",
		}
	}
}

/// Result of validating a callback `state` against the stored session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateValidation {
	/// The state matched; the consumed session is returned.
	Valid(AuthSession),
	/// The state was rejected. The stored platform is deliberately not disclosed.
	Rejected(StateRejection),
}
impl StateValidation {
	/// Compares `received` with the taken session and applies the validity window.
	pub fn evaluate(
		current: Option<AuthSession>,
		received: &str,
		now: OffsetDateTime,
		ttl: Duration,
	) -> Self {
		match current {
			None => StateValidation::Rejected(StateRejection::NoActiveSession),
			Some(session) if !states_match(&session.state, received) =>
				StateValidation::Rejected(StateRejection::Mismatch),
			Some(session) if session.is_expired_at(now, ttl) =>
				StateValidation::Rejected(StateRejection::Expired),
			Some(session) => StateValidation::Valid(session),
		}
	}

	/// Returns true when the state matched an active session.
	pub fn is_valid(&self) -> bool {
		matches!(self, StateValidation::Valid(_))
	}

	/// Platform of the validated session.
	pub fn platform(&self) -> Option<Platform> {
		match self {
			StateValidation::Valid(session) => Some(session.platform),
			StateValidation::Rejected(_) => None,
		}
	}

	/// Redirect path of the validated session.
	pub fn redirect_to(&self) -> Option<&RedirectPath> {
		match self {
			StateValidation::Valid(session) => session.redirect_to.as_ref(),
			StateValidation::Rejected(_) => None,
		}
	}
}

/// Storage contract for the authorization session slot.
///
/// Backends implement `save`, `take`, and `clear`; validation is provided on top of `take`
/// so every attempt, successful or not, consumes the pending session.
pub trait SessionRepository
where
	Self: Send + Sync,
{
	/// Stores `session`, superseding any unconsumed one.
	fn save(&self, session: AuthSession) -> StoreFuture<'_, ()>;

	/// Removes and returns the session a callback carrying `received_state` refers to.
	///
	/// Single-slot stores ignore `received_state` and always empty the slot; keyed stores may
	/// use it as the lookup key.
	fn take<'a>(&'a self, received_state: &'a str) -> StoreFuture<'a, Option<AuthSession>>;

	/// Discards any pending session. Idempotent.
	fn clear(&self) -> StoreFuture<'_, ()>;

	/// Validates `received_state` within [`DEFAULT_SESSION_TTL`].
	fn validate<'a>(&'a self, received_state: &'a str) -> StoreFuture<'a, StateValidation> {
		self.validate_within(received_state, DEFAULT_SESSION_TTL)
	}

	/// Validates `received_state` within a custom window.
	fn validate_within<'a>(
		&'a self,
		received_state: &'a str,
		ttl: Duration,
	) -> StoreFuture<'a, StateValidation> {
		Box::pin(async move {
			let current = self.take(received_state).await?;

			Ok(StateValidation::evaluate(current, received_state, OffsetDateTime::now_utc(), ttl))
		})
	}
}

/// Generates a URL-safe CSRF state token.
pub fn generate_state() -> String {
	pkce::random_token(STATE_LEN)
}

fn states_match(expected: &str, received: &str) -> bool {
	let (expected, received) = (expected.as_bytes(), received.as_bytes());

	expected.len() == received.len()
		&& expected.iter().zip(received).fold(0_u8, |acc, (lhs, rhs)| acc | (lhs ^ rhs)) == 0
}
