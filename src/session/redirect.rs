//! Validated in-app redirect targets restored after a successful authorization.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

const REDIRECT_PATH_MAX_LEN: usize = 2048;

/// Error returned when a redirect path is unsafe or malformed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum RedirectPathError {
	/// The path was empty.
	#[error("Redirect path cannot be empty.")]
	Empty,
	/// The path does not start with a single `/`.
	#[error("Redirect path must be an absolute in-app path: {path}.")]
	NotInApp {
		/// Offending path.
		path: String,
	},
	/// The path contains control characters.
	#[error("Redirect path contains control characters.")]
	ContainsControl,
	/// The path exceeded the allowed length.
	#[error("Redirect path exceeds {max} bytes.")]
	TooLong {
		/// Maximum permitted length in bytes.
		max: usize,
	},
}

/// In-app path (`/dashboard?tab=x`) the user returns to once the account is linked.
///
/// Only same-origin absolute paths are accepted; scheme-relative (`//host`) and
/// backslash-prefixed (`/\host`) forms are rejected so the value cannot turn into an open
/// redirect.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RedirectPath(String);
impl RedirectPath {
	/// Creates a new path after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, RedirectPathError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for RedirectPath {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for RedirectPath {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<RedirectPath> for String {
	fn from(value: RedirectPath) -> Self {
		value.0
	}
}
impl TryFrom<String> for RedirectPath {
	type Error = RedirectPathError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for RedirectPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "RedirectPath({})", self.0)
	}
}
impl Display for RedirectPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for RedirectPath {
	type Err = RedirectPathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), RedirectPathError> {
	if view.is_empty() {
		return Err(RedirectPathError::Empty);
	}
	if !view.starts_with('/') || view.starts_with("//") || view.starts_with("/\\") {
		return Err(RedirectPathError::NotInApp { path: view.to_owned() });
	}
	if view.chars().any(char::is_control) {
		return Err(RedirectPathError::ContainsControl);
	}
	if view.len() > REDIRECT_PATH_MAX_LEN {
		return Err(RedirectPathError::TooLong { max: REDIRECT_PATH_MAX_LEN });
	}

	Ok(())
}
