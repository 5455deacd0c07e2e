//! Thread-safe in-memory [`SessionRepository`] for servers that keep the slot per process.

// self
use crate::{
	_prelude::*,
	session::{AuthSession, SessionRepository, StoreFuture},
};

type Slot = Arc<RwLock<Option<AuthSession>>>;

/// Process-local session slot; clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore(Slot);
impl MemorySessionStore {
	/// Returns a copy of the pending session without consuming it.
	pub fn peek(&self) -> Option<AuthSession> {
		self.0.read().clone()
	}
}
impl SessionRepository for MemorySessionStore {
	fn save(&self, session: AuthSession) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(session);

			Ok(())
		})
	}

	fn take<'a>(&'a self, _received_state: &'a str) -> StoreFuture<'a, Option<AuthSession>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.write().take()) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			slot.write().take();

			Ok(())
		})
	}
}
