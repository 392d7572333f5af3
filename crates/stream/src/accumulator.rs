use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use fzbook_core::{MatchResult, RankedMatch, ResultSnapshot};

/// Number of matches reported in every snapshot.
pub const TOP_K: usize = 10;

/// Rank of a candidate: higher similarity first, lower paragraph index on ties.
#[derive(Debug, Clone, Copy)]
struct RankKey {
	score: f64,
	paragraph_index: usize,
}

impl Ord for RankKey {
	fn cmp(&self, other: &Self) -> Ordering {
		self.score
			.total_cmp(&other.score)
			.then_with(|| other.paragraph_index.cmp(&self.paragraph_index))
	}
}

impl PartialOrd for RankKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for RankKey {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for RankKey {}

#[derive(Debug, Clone)]
struct Candidate {
	key: RankKey,
	ranked: RankedMatch,
}

impl Ord for Candidate {
	fn cmp(&self, other: &Self) -> Ordering {
		self.key.cmp(&other.key)
	}
}

impl PartialOrd for Candidate {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Candidate {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for Candidate {}

/// Running top-[`TOP_K`] over a stream of per-paragraph match results.
///
/// Results are final once produced, so anything that falls out of the top ten
/// can never re-enter it and is dropped on arrival. The heap is a min-heap
/// over the retained candidates, which keeps each insertion at
/// `O(log TOP_K)`.
///
/// The accumulator is not thread-safe; feed it from a single consumer.
#[derive(Debug)]
pub struct Accumulator {
	total: usize,
	processed: usize,
	heap: BinaryHeap<Reverse<Candidate>>,
	ranking: Vec<RankedMatch>,
	dirty: bool,
}

impl Accumulator {
	/// Create an accumulator for a document of `total` paragraphs.
	#[must_use]
	pub fn new(total: usize) -> Self {
		Self {
			total,
			processed: 0,
			heap: BinaryHeap::with_capacity(TOP_K + 1),
			ranking: Vec::with_capacity(TOP_K),
			dirty: false,
		}
	}

	/// Consume one result and return the snapshot that reflects it.
	pub fn push(&mut self, result: MatchResult) -> ResultSnapshot {
		self.processed += 1;
		if self.insert(result) {
			self.dirty = true;
		}
		self.snapshot()
	}

	fn insert(&mut self, result: MatchResult) -> bool {
		let key = RankKey {
			score: result.similarity(),
			paragraph_index: result.paragraph_index(),
		};
		if self.heap.len() < TOP_K {
			self.heap.push(Reverse(Candidate {
				key,
				ranked: result.into_ranked(),
			}));
			true
		} else if let Some(mut worst) = self.heap.peek_mut() {
			if key > worst.0.key {
				*worst = Reverse(Candidate {
					key,
					ranked: result.into_ranked(),
				});
				true
			} else {
				false
			}
		} else {
			false
		}
	}

	/// Current view of the search without consuming anything.
	pub fn snapshot(&mut self) -> ResultSnapshot {
		if self.dirty {
			let mut retained: Vec<&Candidate> = self.heap.iter().map(|entry| &entry.0).collect();
			retained.sort_unstable_by(|a, b| b.cmp(a));
			self.ranking.clear();
			self.ranking
				.extend(retained.into_iter().map(|candidate| candidate.ranked.clone()));
			self.dirty = false;
		}

		ResultSnapshot {
			top_matches: self.ranking.clone(),
			processed: self.processed,
			total: self.total,
		}
	}

	/// Number of match results pushed so far.
	#[must_use]
	pub fn processed(&self) -> usize {
		self.processed
	}

	/// Paragraph count of the document being ranked.
	#[must_use]
	pub fn total(&self) -> usize {
		self.total
	}

	/// Whether every paragraph of the document has been consumed.
	#[must_use]
	pub fn is_complete(&self) -> bool {
		self.processed >= self.total
	}
}
