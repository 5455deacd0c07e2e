//! Authorization-code round-trips for social platforms: CSRF-safe session slots,
//! provider-aware authorize URLs, and a pluggable account-linking hand-off.
//!
//! The crate covers the part of a social-media dashboard that has to talk OAuth 2.0 to
//! Meta, Instagram, X, LinkedIn, TikTok, and YouTube:
//!
//! - [`platform`] holds the closed set of supported platforms and their static
//!   authorization metadata.
//! - [`session`] stores the single in-flight authorization attempt and validates the `state`
//!   echoed back by the provider.
//! - [`authorize`] composes provider-specific authorize URLs (PKCE, display, offline hints).
//! - [`flow`] drives `initiate → redirect → callback → validate` through [`flow::Connector`].
//! - [`callback`] parses callback query strings and translates provider errors into
//!   user-facing text.
//! - [`link`] defines the hand-off to the external account-linking service.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod authorize;
pub mod callback;
pub mod config;
pub mod error;
pub mod flow;
pub mod link;
pub mod obs;
pub mod platform;
pub mod scope;
pub mod session;

mod _prelude {
	pub use std::{
		borrow::Cow,
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
