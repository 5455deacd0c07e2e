//! Provider-specific authorize URL augmentation rules.

// self
use crate::authorize::PkceCodeChallengeMethod;

/// Extra query parameters a platform requires on its authorize URL.
///
/// Each rule maps to a pure function of the [`RuleContext`], applied by the URL builder in
/// declaration order after the standard OAuth parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamRule {
	/// Proof Key for Code Exchange with the S256 method.
	Pkce,
	/// `display` hint for the consent screen (e.g., `popup`).
	Display(&'static str),
	/// `access_type=offline` so the provider issues a refresh token.
	OfflineAccess,
	/// `prompt=consent` so the consent screen is shown even for returning users.
	ForceConsent,
	/// Repeats the client identifier as `client_key`.
	ClientKey,
}
impl ParamRule {
	/// Query pairs contributed by this rule.
	pub fn query_pairs(self, ctx: &RuleContext) -> Vec<(&'static str, String)> {
		match self {
			ParamRule::Pkce => pkce_pairs(ctx),
			ParamRule::Display(hint) => vec![("display", hint.to_owned())],
			ParamRule::OfflineAccess => vec![("access_type", "offline".to_owned())],
			ParamRule::ForceConsent => vec![("prompt", "consent".to_owned())],
			ParamRule::ClientKey => vec![("client_key", ctx.client_id.to_owned())],
		}
	}
}

/// Inputs available to [`ParamRule::query_pairs`].
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
	/// Client identifier placed in the request.
	pub client_id: &'a str,
	/// PKCE challenge derived for this request, when the platform requires one.
	pub code_challenge: Option<&'a str>,
}

fn pkce_pairs(ctx: &RuleContext) -> Vec<(&'static str, String)> {
	match ctx.code_challenge {
		Some(challenge) => vec![
			("code_challenge", challenge.to_owned()),
			("code_challenge_method", PkceCodeChallengeMethod::S256.as_str().to_owned()),
		],
		None => Vec::new(),
	}
}
