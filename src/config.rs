//! Typed configuration for client identifiers and the application origin.
//!
//! Client identifiers are looked up through a field per [`Platform`] rather than a
//! string-keyed map, so adding a platform forces every lookup site to handle it.

// std
use std::num::NonZeroU32;
// self
use crate::{_prelude::*, error::ConfigError, platform::Platform};

/// Environment key holding the application origin (e.g., `https://app.example.com`).
pub const ORIGIN_ENV: &str = "SOCIAL_CONNECT_ORIGIN";
/// Environment key overriding the session validity window, in seconds.
pub const SESSION_TTL_ENV: &str = "SOCIAL_CONNECT_SESSION_TTL_SECS";

const DEFAULT_SESSION_TTL_SECS: NonZeroU32 = match NonZeroU32::new(600) {
	Some(secs) => secs,
	None => NonZeroU32::MIN,
};

/// OAuth client identifiers, one per platform.
///
/// Blank values are treated the same as missing ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientIds {
	/// Meta (Facebook) app ID.
	pub meta: Option<String>,
	/// Instagram app ID.
	pub instagram: Option<String>,
	/// X/Twitter OAuth 2.0 client ID.
	pub twitter: Option<String>,
	/// LinkedIn client ID.
	pub linkedin: Option<String>,
	/// TikTok client key.
	pub tiktok: Option<String>,
	/// Google OAuth client ID used for YouTube.
	pub youtube: Option<String>,
}
impl ClientIds {
	/// Environment key read for `platform`.
	pub const fn env_key(platform: Platform) -> &'static str {
		match platform {
			Platform::Meta => "SOCIAL_CONNECT_META_CLIENT_ID",
			Platform::Instagram => "SOCIAL_CONNECT_INSTAGRAM_CLIENT_ID",
			Platform::Twitter => "SOCIAL_CONNECT_TWITTER_CLIENT_ID",
			Platform::LinkedIn => "SOCIAL_CONNECT_LINKEDIN_CLIENT_ID",
			Platform::TikTok => "SOCIAL_CONNECT_TIKTOK_CLIENT_ID",
			Platform::YouTube => "SOCIAL_CONNECT_YOUTUBE_CLIENT_ID",
		}
	}

	/// Reads every platform's identifier through `lookup`.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut ids = Self::default();

		for platform in Platform::ALL {
			*ids.slot_mut(platform) = lookup(Self::env_key(platform));
		}

		ids
	}

	/// Reads every platform's identifier from the process environment.
	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Sets the identifier for `platform`.
	pub fn with(mut self, platform: Platform, client_id: impl Into<String>) -> Self {
		*self.slot_mut(platform) = Some(client_id.into());

		self
	}

	/// Identifier for `platform`, if configured and not blank.
	pub fn client_id(&self, platform: Platform) -> Option<&str> {
		let slot = match platform {
			Platform::Meta => &self.meta,
			Platform::Instagram => &self.instagram,
			Platform::Twitter => &self.twitter,
			Platform::LinkedIn => &self.linkedin,
			Platform::TikTok => &self.tiktok,
			Platform::YouTube => &self.youtube,
		};

		slot.as_deref().map(str::trim).filter(|id| !id.is_empty())
	}

	/// Identifier for `platform`, or [`Error::MissingClientConfig`].
	pub fn require(&self, platform: Platform) -> Result<&str> {
		self.client_id(platform).ok_or(Error::MissingClientConfig { platform })
	}

	/// Platforms with a usable identifier.
	pub fn configured(&self) -> impl Iterator<Item = Platform> + '_ {
		Platform::ALL.into_iter().filter(|platform| self.client_id(*platform).is_some())
	}

	fn slot_mut(&mut self, platform: Platform) -> &mut Option<String> {
		match platform {
			Platform::Meta => &mut self.meta,
			Platform::Instagram => &mut self.instagram,
			Platform::Twitter => &mut self.twitter,
			Platform::LinkedIn => &mut self.linkedin,
			Platform::TikTok => &mut self.tiktok,
			Platform::YouTube => &mut self.youtube,
		}
	}
}

/// Settings consumed by [`crate::flow::Connector::from_config`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
	/// Application origin; the callback URI is `{origin}/auth/callback`.
	pub origin: Url,
	/// Client identifiers per platform.
	#[serde(default)]
	pub clients: ClientIds,
	/// Session validity window in seconds; zero is rejected.
	#[serde(default = "default_session_ttl_secs")]
	pub session_ttl_secs: NonZeroU32,
}
impl ConnectorConfig {
	/// Creates a configuration for `origin` with no client identifiers.
	pub fn new(origin: Url) -> Result<Self> {
		validate_origin(&origin)?;

		Ok(Self { origin, clients: ClientIds::default(), session_ttl_secs: default_session_ttl_secs() })
	}

	/// Replaces the client identifiers.
	pub fn with_clients(mut self, clients: ClientIds) -> Self {
		self.clients = clients;

		self
	}

	/// Reads the origin, validity window, and client identifiers through `lookup`.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let raw_origin = lookup(ORIGIN_ENV)
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingEnv { key: ORIGIN_ENV })?;
		let origin = Url::parse(raw_origin.trim())
			.map_err(|source| ConfigError::InvalidOrigin { source })?;
		let mut config = Self::new(origin)?.with_clients(ClientIds::from_lookup(&lookup));

		if let Some(raw_ttl) = lookup(SESSION_TTL_ENV) {
			config.session_ttl_secs = raw_ttl
				.trim()
				.parse::<NonZeroU32>()
				.ok()
				.ok_or(ConfigError::InvalidEnv { key: SESSION_TTL_ENV, value: raw_ttl })?;
		}

		Ok(config)
	}

	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Session validity window.
	pub fn session_ttl(&self) -> Duration {
		Duration::seconds(i64::from(self.session_ttl_secs.get()))
	}
}

fn default_session_ttl_secs() -> NonZeroU32 {
	DEFAULT_SESSION_TTL_SECS
}

pub(crate) fn validate_origin(origin: &Url) -> Result<(), ConfigError> {
	if matches!(origin.scheme(), "http" | "https") && origin.has_host() {
		Ok(())
	} else {
		Err(ConfigError::UnsupportedOrigin { origin: origin.to_string() })
	}
}
