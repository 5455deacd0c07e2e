// self
use crate::{
	obs::{FlowOutcome, FlowStage},
	session::StateRejection,
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(stage: FlowStage, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"social_connect_flow_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}

/// Counts rejected callback states by reason (when enabled).
pub fn record_state_rejection(reason: StateRejection) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("social_connect_state_rejected_total", "reason" => reason.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = reason;
	}
}
