//! File-backed [`SessionRepository`] whose slot survives redirects and process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	session::{AuthSession, SessionRepository, StoreError, StoreFuture},
};

/// Persists the session slot to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
	path: PathBuf,
	inner: Arc<RwLock<Option<AuthSession>>>,
}
impl FileSessionStore {
	/// Opens (or creates) a store at the provided path, eagerly loading any pending session.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Option<AuthSession>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(None);
		}

		let de = &mut serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(de).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {} at `{}`: {}", path.display(), e.path(), e.inner()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &Option<AuthSession>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize session slot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl SessionRepository for FileSessionStore {
	fn save(&self, session: AuthSession) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let next = Some(session);

			self.persist_locked(&next)?;
			*guard = next;

			Ok(())
		})
	}

	fn take<'a>(&'a self, _received_state: &'a str) -> StoreFuture<'a, Option<AuthSession>> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			// The slot stays populated in memory until the file no longer holds it.
			if guard.is_some() {
				self.persist_locked(&None)?;
			}

			Ok(guard.take())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			if guard.is_some() {
				self.persist_locked(&None)?;
				*guard = None;
			}

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::{
		authorize::PkceVerifier,
		platform::Platform,
		session::{RedirectPath, StateRejection, StateValidation},
	};

	fn temp_path(label: &str) -> PathBuf {
		let unique = format!(
			"social_connect_{label}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn build_session() -> AuthSession {
		AuthSession::new(
			Platform::Twitter,
			"file-state",
			Some(RedirectPath::new("/dashboard").expect("Failed to build redirect fixture.")),
		)
		.with_code_verifier(Some(PkceVerifier::new("verifier-123")))
	}

	#[test]
	fn pending_session_survives_reopen() {
		let path = temp_path("reopen");
		let store = FileSessionStore::open(&path).expect("Failed to open file session store.");
		let session = build_session();
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.save(session.clone()))
			.expect("Failed to save fixture session to file store.");
		drop(store);

		let reopened = FileSessionStore::open(&path).expect("Failed to reopen file store.");
		let validation = rt
			.block_on(reopened.validate("file-state"))
			.expect("Failed to validate against reopened file store.");

		assert_eq!(validation, StateValidation::Valid(session));

		let again = FileSessionStore::open(&path).expect("Failed to reopen file store twice.");

		assert_eq!(
			rt.block_on(again.validate("file-state")).expect("Validation should run."),
			StateValidation::Rejected(StateRejection::NoActiveSession),
			"Consumption must be persisted."
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary session file {}: {e}", path.display())
		});
	}

	#[test]
	fn failed_writes_leave_the_slot_untouched() {
		let path = temp_path("write_failure");
		let store = FileSessionStore::open(&path).expect("Failed to open file session store.");
		let session = build_session();
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.save(session.clone()))
			.expect("Failed to save fixture session to file store.");

		let blocker = path.with_extension("tmp");

		fs::create_dir(&blocker).expect("Failed to create directory blocking the temp file.");

		let err = rt
			.block_on(store.validate("file-state"))
			.expect_err("Validation must fail while the slot cannot be persisted.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert!(
			rt.block_on(store.save(AuthSession::new(Platform::Meta, "other-state", None))).is_err(),
			"Saving must fail while the slot cannot be persisted."
		);

		fs::remove_dir(&blocker).expect("Failed to remove blocking directory.");

		assert_eq!(
			rt.block_on(store.validate("file-state")).expect("Validation should run."),
			StateValidation::Valid(session),
			"The pending session must survive failed writes."
		);

		let reopened = FileSessionStore::open(&path).expect("Failed to reopen file store.");

		assert_eq!(
			rt.block_on(reopened.validate("file-state")).expect("Validation should run."),
			StateValidation::Rejected(StateRejection::NoActiveSession),
			"Consumption must reach the file once writes succeed."
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary session file {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_is_a_hard_failure() {
		let path = temp_path("corrupt");

		fs::write(&path, b"{\"platform\":\"myspace\"}").expect("Failed to write corrupt fixture.");

		let err = FileSessionStore::open(&path).expect_err("Corrupt snapshots must be rejected.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary session file {}: {e}", path.display())
		});
	}
}
