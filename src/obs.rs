//! Optional observability helpers for connection flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `social_connect.flow` with the `stage`
//!   and `call_site` fields, plus a `warn` event whenever a callback `state` is rejected.
//! - Enable `metrics` to increment the `social_connect_flow_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`, and the
//!   `social_connect_state_rejected_total` counter labeled by `reason`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow stages observed by the connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
	/// Building the authorize URL and saving the session.
	Initiate,
	/// Validating the provider redirect.
	Callback,
	/// Handing the code to the account-linking service.
	Link,
}
impl FlowStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::Initiate => "initiate",
			FlowStage::Callback => "callback",
			FlowStage::Link => "link",
		}
	}
}
impl Display for FlowStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a connector operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure returned to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
