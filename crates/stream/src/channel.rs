use std::sync::mpsc::SyncSender;

use fzbook_core::MatchResult;

use crate::cancel::CancelToken;

/// How a producer pass ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum StreamPassResult {
	Completed,
	Cancelled,
	HungUp,
}

/// Producer-side handle onto the result channel.
///
/// Cloned into every rayon worker when results are delivered unordered.
#[derive(Clone)]
pub(crate) struct ResultSink {
	tx: SyncSender<MatchResult>,
	cancel: CancelToken,
}

impl ResultSink {
	pub(crate) fn new(tx: SyncSender<MatchResult>, cancel: CancelToken) -> Self {
		Self { tx, cancel }
	}

	/// Forward a result, blocking while the channel is full.
	///
	/// Returns `false` once the consumer has hung up.
	pub(crate) fn send(&self, result: MatchResult) -> bool {
		self.tx.send(result).is_ok()
	}

	pub(crate) fn should_abort(&self) -> bool {
		self.cancel.is_cancelled()
	}
}
