//! Threaded scoring pipeline.
//!
//! A single producer thread walks the paragraphs in batches, scores each batch
//! on a rayon pool owned by the stream and forwards the results over a bounded
//! channel. The consumer side is a [`SnapshotStream`], which hands out the
//! priming snapshot without waiting on the producer and then folds results
//! into the running top ten one at a time.

use std::sync::mpsc::{self, IntoIter};
use std::thread::{self, JoinHandle};

use fzbook_core::{MatchResult, ResultSnapshot};
use log::{debug, error, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::channel::{ResultSink, StreamPassResult};
use crate::error::PipelineError;
use crate::stage::Snapshots;

/// Paragraphs scored per parallel batch.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Results buffered between producer and consumer before the producer blocks.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_024;

/// Order in which scored paragraphs reach the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
	/// Results arrive in paragraph order, so intermediate snapshots are
	/// reproducible run to run.
	#[default]
	Ordered,
	/// Results arrive as workers finish them. Only the final snapshot is
	/// guaranteed to match the ordered run.
	Unordered,
}

/// Tuning knobs for [`ScoringPipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
	/// Size of the stream's scoring pool; `None` lets rayon pick its default
	/// (one thread per core, or `RAYON_NUM_THREADS`).
	pub threads: Option<usize>,
	/// Paragraphs scored per batch. Cancellation is checked between batches.
	pub chunk_size: usize,
	/// Results buffered ahead of the consumer before the producer blocks.
	pub channel_capacity: usize,
	pub delivery: Delivery,
}

impl Default for PipelineOptions {
	fn default() -> Self {
		Self {
			threads: None,
			chunk_size: DEFAULT_CHUNK_SIZE,
			channel_capacity: DEFAULT_CHANNEL_CAPACITY,
			delivery: Delivery::Ordered,
		}
	}
}

impl PipelineOptions {
	/// Pin the scoring pool to `threads` workers.
	#[must_use]
	pub fn with_threads(mut self, threads: usize) -> Self {
		self.threads = Some(threads);
		self
	}

	#[must_use]
	pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
		self.chunk_size = chunk_size;
		self
	}

	#[must_use]
	pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
		self.channel_capacity = channel_capacity;
		self
	}

	#[must_use]
	pub fn with_delivery(mut self, delivery: Delivery) -> Self {
		self.delivery = delivery;
		self
	}

	/// Reject zero-sized pools, batches and channels.
	pub fn validate(&self) -> Result<(), PipelineError> {
		if self.threads == Some(0) {
			return Err(PipelineError::InvalidOptions {
				option: "threads",
				reason: "must be greater than zero",
			});
		}
		if self.chunk_size == 0 {
			return Err(PipelineError::InvalidOptions {
				option: "chunk_size",
				reason: "must be greater than zero",
			});
		}
		if self.channel_capacity == 0 {
			return Err(PipelineError::InvalidOptions {
				option: "channel_capacity",
				reason: "must be greater than zero",
			});
		}
		Ok(())
	}
}

/// Spawns producers that score paragraphs off the calling thread.
#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
	options: PipelineOptions,
	cancel: CancelToken,
}

impl ScoringPipeline {
	#[must_use]
	pub fn new(options: PipelineOptions) -> Self {
		Self {
			options,
			cancel: CancelToken::new(),
		}
	}

	/// Share an externally owned token with the spawned stream.
	#[must_use]
	pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
		self.cancel = cancel;
		self
	}

	/// Options the next [`spawn`](Self::spawn) will use.
	#[must_use]
	pub fn options(&self) -> &PipelineOptions {
		&self.options
	}

	/// Start scoring `paragraphs` against `term`.
	///
	/// The returned stream yields its priming snapshot immediately; scoring
	/// proceeds in the background and stops as soon as the stream is cancelled
	/// or dropped.
	pub fn spawn(
		self,
		term: impl Into<String>,
		paragraphs: Vec<String>,
	) -> Result<SnapshotStream, PipelineError> {
		self.options.validate()?;

		// Never the global pool: the consumer may itself be blocking a global worker.
		let pool = ThreadPoolBuilder::new()
			.num_threads(self.options.threads.unwrap_or(0))
			.thread_name(|index| format!("fzbook-score-{index}"))
			.build()?;

		let total = paragraphs.len();
		let (tx, rx) = mpsc::sync_channel(self.options.channel_capacity);
		let producer = Producer {
			term: term.into(),
			paragraphs,
			chunk_size: self.options.chunk_size,
			delivery: self.options.delivery,
			sink: ResultSink::new(tx, self.cancel.clone()),
			pool,
		};

		debug!(
			"spawning scorer for {total} paragraphs (chunk size {}, {:?} delivery)",
			self.options.chunk_size, self.options.delivery
		);
		let thread = thread::Builder::new()
			.name("fzbook-producer".into())
			.spawn(move || producer.run())
			.map_err(PipelineError::Spawn)?;

		Ok(SnapshotStream {
			snapshots: Snapshots::new(total, rx.into_iter()),
			producer: ProducerHandle {
				cancel: self.cancel,
				thread: Some(thread),
			},
		})
	}
}

struct Producer {
	term: String,
	paragraphs: Vec<String>,
	chunk_size: usize,
	delivery: Delivery,
	sink: ResultSink,
	pool: ThreadPool,
}

impl Producer {
	fn run(self) -> StreamPassResult {
		let Self {
			term,
			paragraphs,
			chunk_size,
			delivery,
			sink,
			pool,
		} = self;

		let total = paragraphs.len();
		let mut pending = paragraphs.into_iter().enumerate();
		let mut scored = 0;

		loop {
			if sink.should_abort() {
				info!("scoring cancelled after {scored}/{total} paragraphs");
				return StreamPassResult::Cancelled;
			}

			let batch: Vec<(usize, String)> = pending.by_ref().take(chunk_size).collect();
			if batch.is_empty() {
				break;
			}
			let batch_len = batch.len();

			let outcome = pool.install(|| match delivery {
				Delivery::Ordered => score_ordered(&term, batch, &sink),
				Delivery::Unordered => score_unordered(&term, batch, &sink),
			});
			if outcome != StreamPassResult::Completed {
				if outcome == StreamPassResult::HungUp {
					info!("consumer hung up after {scored}/{total} paragraphs");
				}
				return outcome;
			}

			scored += batch_len;
			debug!("scored {scored}/{total} paragraphs");
		}

		debug!("scoring finished for {total} paragraphs");
		StreamPassResult::Completed
	}
}

/// Score a batch in parallel, then forward it in paragraph order.
fn score_ordered(term: &str, batch: Vec<(usize, String)>, sink: &ResultSink) -> StreamPassResult {
	let results: Vec<MatchResult> = batch
		.into_par_iter()
		.map(|(index, paragraph)| MatchResult::score(term, index, paragraph))
		.collect();

	for result in results {
		if !sink.send(result) {
			return StreamPassResult::HungUp;
		}
	}
	StreamPassResult::Completed
}

/// Score a batch in parallel, forwarding each result as soon as it is ready.
fn score_unordered(
	term: &str,
	batch: Vec<(usize, String)>,
	sink: &ResultSink,
) -> StreamPassResult {
	let sent = batch
		.into_par_iter()
		.try_for_each_with(sink.clone(), |sink, (index, paragraph)| {
			if sink.should_abort() {
				return Err(StreamPassResult::Cancelled);
			}
			if sink.send(MatchResult::score(term, index, paragraph)) {
				Ok(())
			} else {
				Err(StreamPassResult::HungUp)
			}
		});

	match sent {
		Ok(()) => StreamPassResult::Completed,
		Err(outcome) => outcome,
	}
}

/// Owns the producer thread; cancels and joins it when dropped.
struct ProducerHandle {
	cancel: CancelToken,
	thread: Option<JoinHandle<StreamPassResult>>,
}

impl ProducerHandle {
	fn join(&mut self) -> Option<StreamPassResult> {
		let thread = self.thread.take()?;
		match thread.join() {
			Ok(outcome) => Some(outcome),
			Err(_) => {
				error!("scoring thread panicked; results are incomplete");
				None
			}
		}
	}
}

impl Drop for ProducerHandle {
	fn drop(&mut self) {
		self.cancel.cancel();
		self.join();
	}
}

/// Consumer end of a [`ScoringPipeline`]: an iterator of snapshots.
///
/// Yields the priming snapshot first and then one snapshot per scored
/// paragraph, ending after the final, complete snapshot. Cancelling ends the
/// stream at the next call to [`Iterator::next`].
pub struct SnapshotStream {
	// Field order matters: the receiver inside `snapshots` must drop before
	// the producer is joined, or a producer blocked on a full channel would
	// never wake up.
	snapshots: Snapshots<IntoIter<MatchResult>>,
	producer: ProducerHandle,
}

impl SnapshotStream {
	/// Stop the producer and end the stream.
	pub fn cancel(&self) {
		self.producer.cancel.cancel();
	}

	/// A handle that cancels this stream from elsewhere.
	#[must_use]
	pub fn cancel_token(&self) -> CancelToken {
		self.producer.cancel.clone()
	}

	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		self.producer.cancel.is_cancelled()
	}

	/// Paragraph count of the document.
	#[must_use]
	pub fn total(&self) -> usize {
		self.snapshots.total()
	}

	/// Results folded into the ranking so far.
	#[must_use]
	pub fn processed(&self) -> usize {
		self.snapshots.processed()
	}

	/// Drain the stream and return the last snapshot it produced.
	pub fn finish(self) -> Option<ResultSnapshot> {
		self.last()
	}
}

impl Iterator for SnapshotStream {
	type Item = ResultSnapshot;

	fn next(&mut self) -> Option<ResultSnapshot> {
		if self.producer.cancel.is_cancelled() {
			return None;
		}
		let snapshot = self.snapshots.next();
		if snapshot.is_none() && self.producer.thread.is_some() {
			match self.producer.join() {
				Some(StreamPassResult::Completed) => {
					debug!("snapshot stream complete");
				}
				Some(outcome) => {
					debug!("snapshot stream ended early: {outcome:?}");
				}
				None => {}
			}
		}
		snapshot
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let (_, upper) = self.snapshots.size_hint();
		(0, upper)
	}
}

impl std::fmt::Debug for SnapshotStream {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SnapshotStream")
			.field("processed", &self.processed())
			.field("total", &self.total())
			.field("cancelled", &self.is_cancelled())
			.finish()
	}
}
