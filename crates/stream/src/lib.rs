//! Incremental top-10 search over a document's paragraphs.
//!
//! Scoring is decoupled from aggregation: a producer scores paragraphs (in
//! parallel batches, on its own thread) and pushes [`MatchResult`]s through a
//! bounded channel, while the consumer folds them into an [`Accumulator`] and
//! emits a [`ResultSnapshot`] per result. The first snapshot is emitted before
//! any scoring has finished, so a caller can render progress immediately.
//!
//! Threaded usage:
//! ```
//! use fzbook_stream::{PipelineOptions, search};
//!
//! let stream = search("quick", "the quick fox\n\nthe slow turtle", PipelineOptions::default())?;
//! let snapshots: Vec<_> = stream.collect();
//!
//! assert_eq!(snapshots.len(), 3);
//! let last = snapshots.last().unwrap();
//! assert_eq!((last.processed, last.total), (2, 2));
//! assert_eq!(last.top_matches[0].before, "the ");
//! assert_eq!(last.top_matches[0].matched, "quick");
//! assert_eq!(last.top_matches[0].after, " fox");
//! # Ok::<(), fzbook_stream::PipelineError>(())
//! ```
//!
//! The same stage runs synchronously on the calling thread through
//! [`snapshots`], which is handy for tests and small inputs.
//!
//! [`MatchResult`]: fzbook_core::MatchResult

mod accumulator;
mod cancel;
mod channel;
mod error;
mod pipeline;
mod stage;

use fzbook_core::{MatchResult, score_paragraphs, split_paragraphs};

pub use accumulator::{Accumulator, TOP_K};
pub use cancel::CancelToken;
pub use error::PipelineError;
pub use fzbook_core::{RankedMatch, ResultSnapshot};
pub use pipeline::{
	DEFAULT_CHANNEL_CAPACITY, DEFAULT_CHUNK_SIZE, Delivery, PipelineOptions, ScoringPipeline,
	SnapshotStream,
};
pub use stage::Snapshots;

/// Split `document` and score it on a background producer.
pub fn search(
	term: &str,
	document: &str,
	options: PipelineOptions,
) -> Result<SnapshotStream, PipelineError> {
	let paragraphs = split_paragraphs(document)
		.into_iter()
		.map(str::to_owned)
		.collect();
	ScoringPipeline::new(options).spawn(term, paragraphs)
}

/// Score `document` lazily on the calling thread, one snapshot per paragraph.
pub fn snapshots<'a>(
	term: &'a str,
	document: &'a str,
) -> Snapshots<impl Iterator<Item = MatchResult> + 'a> {
	let paragraphs = split_paragraphs(document);
	Snapshots::new(paragraphs.len(), score_paragraphs(term, paragraphs))
}
