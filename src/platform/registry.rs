//! Static registry of per-platform authorization metadata.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	platform::{ParamRule, Platform},
	scope::ScopeList,
};

/// Immutable authorization metadata for one platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformConfig {
	/// Platform described by this entry.
	pub platform: Platform,
	/// HTTPS authorization endpoint.
	pub authorization_endpoint: &'static str,
	/// Scopes requested by default, in provider-significant order.
	pub default_scopes: &'static [&'static str],
	/// Provider-specific authorize URL augmentation.
	pub params: &'static [ParamRule],
}
impl PlatformConfig {
	/// Parses the authorization endpoint.
	pub fn authorization_endpoint(&self) -> Result<Url> {
		Url::parse(self.authorization_endpoint).map_err(|source| {
			ConfigError::InvalidEndpoint { platform: self.platform, source }.into()
		})
	}

	/// Default scopes as a validated [`ScopeList`].
	pub fn default_scope(&self) -> Result<ScopeList> {
		ScopeList::new(self.default_scopes.iter().copied())
			.map_err(|e| ConfigError::from(e).into())
	}

	/// Returns true when the authorize URL must carry a PKCE challenge.
	pub fn requires_pkce(&self) -> bool {
		self.params.contains(&ParamRule::Pkce)
	}
}

static META: PlatformConfig = PlatformConfig {
	platform: Platform::Meta,
	authorization_endpoint: "https://www.facebook.com/v18.0/dialog/oauth",
	default_scopes: &[
		"public_profile",
		"pages_show_list",
		"pages_read_engagement",
		"pages_manage_posts",
	],
	params: &[ParamRule::Display("popup")],
};
static INSTAGRAM: PlatformConfig = PlatformConfig {
	platform: Platform::Instagram,
	authorization_endpoint: "https://api.instagram.com/oauth/authorize",
	default_scopes: &["user_profile", "user_media"],
	params: &[],
};
static TWITTER: PlatformConfig = PlatformConfig {
	platform: Platform::Twitter,
	authorization_endpoint: "https://twitter.com/i/oauth2/authorize",
	default_scopes: &["tweet.read", "tweet.write", "users.read", "offline.access"],
	params: &[ParamRule::Pkce],
};
static LINKEDIN: PlatformConfig = PlatformConfig {
	platform: Platform::LinkedIn,
	authorization_endpoint: "https://www.linkedin.com/oauth/v2/authorization",
	default_scopes: &["openid", "profile", "email", "w_member_social"],
	params: &[],
};
static TIKTOK: PlatformConfig = PlatformConfig {
	platform: Platform::TikTok,
	authorization_endpoint: "https://www.tiktok.com/v2/auth/authorize/",
	default_scopes: &["user.info.basic", "video.list", "video.upload"],
	params: &[ParamRule::ClientKey],
};
static YOUTUBE: PlatformConfig = PlatformConfig {
	platform: Platform::YouTube,
	authorization_endpoint: "https://accounts.google.com/o/oauth2/v2/auth",
	default_scopes: &[
		"https://www.googleapis.com/auth/youtube.readonly",
		"https://www.googleapis.com/auth/youtube.upload",
	],
	params: &[ParamRule::OfflineAccess, ParamRule::ForceConsent],
};

impl Platform {
	/// Registry entry for the platform; total over the closed set.
	pub fn config(self) -> &'static PlatformConfig {
		match self {
			Platform::Meta => &META,
			Platform::Instagram => &INSTAGRAM,
			Platform::Twitter => &TWITTER,
			Platform::LinkedIn => &LINKEDIN,
			Platform::TikTok => &TIKTOK,
			Platform::YouTube => &YOUTUBE,
		}
	}
}

/// Resolves a platform identifier to its registry entry.
pub fn lookup(platform: &str) -> Result<&'static PlatformConfig> {
	Ok(platform.parse::<Platform>()?.config())
}
