//! Supported platforms (closed set) and their static authorization metadata.
//!
//! `registry` exposes one immutable [`PlatformConfig`] per [`Platform`]; `params` defines the
//! [`ParamRule`] tagged union that expresses provider-specific authorize URL augmentation
//! (PKCE, display hints, offline access) as small pure functions instead of branching in the
//! URL builder.

pub mod params;
pub mod registry;

pub use params::*;
pub use registry::*;

// self
use crate::_prelude::*;

/// Identity providers a workspace can connect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
	/// Meta (Facebook pages).
	#[serde(alias = "facebook")]
	Meta,
	/// Instagram.
	Instagram,
	/// X, formerly Twitter.
	#[serde(alias = "x")]
	Twitter,
	/// LinkedIn.
	#[serde(rename = "linkedin")]
	LinkedIn,
	/// TikTok.
	#[serde(rename = "tiktok")]
	TikTok,
	/// YouTube (Google accounts).
	#[serde(rename = "youtube")]
	YouTube,
}
impl Platform {
	/// Every supported platform in registry order.
	pub const ALL: [Platform; 6] = [
		Platform::Meta,
		Platform::Instagram,
		Platform::Twitter,
		Platform::LinkedIn,
		Platform::TikTok,
		Platform::YouTube,
	];

	/// Returns the canonical identifier used in URLs, storage, and linking requests.
	pub const fn as_str(self) -> &'static str {
		match self {
			Platform::Meta => "meta",
			Platform::Instagram => "instagram",
			Platform::Twitter => "twitter",
			Platform::LinkedIn => "linkedin",
			Platform::TikTok => "tiktok",
			Platform::YouTube => "youtube",
		}
	}
}
impl Display for Platform {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Platform {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"meta" | "facebook" => Ok(Platform::Meta),
			"instagram" => Ok(Platform::Instagram),
			"twitter" | "x" => Ok(Platform::Twitter),
			"linkedin" => Ok(Platform::LinkedIn),
			"tiktok" => Ok(Platform::TikTok),
			"youtube" => Ok(Platform::YouTube),
			other => Err(Error::UnknownPlatform { platform: other.to_owned() }),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_round_trip_and_accept_aliases() {
		for platform in Platform::ALL {
			assert_eq!(
				platform.as_str().parse::<Platform>().expect("Canonical identifier should parse."),
				platform
			);
		}

		assert_eq!(Platform::from_str("facebook").ok(), Some(Platform::Meta));
		assert_eq!(Platform::from_str("x").ok(), Some(Platform::Twitter));
	}

	#[test]
	fn unknown_identifiers_are_rejected() {
		let err = Platform::from_str("not-a-real-platform")
			.expect_err("Unknown platform identifiers must be rejected.");

		assert!(
			matches!(err, Error::UnknownPlatform { ref platform } if platform == "not-a-real-platform")
		);
		assert!(Platform::from_str("Twitter").is_err(), "Identifiers are case-sensitive.");
	}

	#[test]
	fn serde_uses_canonical_identifiers() {
		assert_eq!(
			serde_json::to_string(&Platform::LinkedIn).expect("Platform should serialize."),
			"\"linkedin\""
		);

		let meta: Platform =
			serde_json::from_str("\"facebook\"").expect("Alias should deserialize.");

		assert_eq!(meta, Platform::Meta);
	}
}
