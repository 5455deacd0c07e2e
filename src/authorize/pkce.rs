//! PKCE verifier/challenge generation (RFC 7636, S256 only).

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

const PKCE_VERIFIER_LEN: usize = 64;

/// Supported PKCE challenge methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Redacted PKCE code verifier; the linking service needs it to redeem the code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PkceVerifier(String);
impl PkceVerifier {
	/// Wraps an existing verifier string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner verifier. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Derives the S256 code challenge for this verifier.
	pub fn challenge(&self) -> String {
		compute_pkce_challenge(&self.0)
	}
}
impl Debug for PkceVerifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("PkceVerifier").field(&"<redacted>").finish()
	}
}

/// Verifier plus its derived challenge.
#[derive(Clone, Debug)]
pub struct PkcePair {
	/// Secret verifier kept in the session.
	pub verifier: PkceVerifier,
	/// Challenge placed on the authorize URL.
	pub challenge: String,
	/// Challenge method (currently always `S256`).
	pub method: PkceCodeChallengeMethod,
}
impl PkcePair {
	/// Generates a fresh verifier and its S256 challenge.
	pub fn generate() -> Self {
		let verifier = PkceVerifier(random_token(PKCE_VERIFIER_LEN));
		let challenge = verifier.challenge();

		Self { verifier, challenge, method: PkceCodeChallengeMethod::S256 }
	}
}

pub(crate) fn random_token(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn compute_pkce_challenge(verifier: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(verifier.as_bytes());

	let digest = hasher.finalize();

	URL_SAFE_NO_PAD.encode(digest)
}
