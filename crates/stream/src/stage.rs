use fzbook_core::{MatchResult, ResultSnapshot};

use crate::accumulator::Accumulator;

/// Folding stage that turns match results into snapshots.
///
/// Emits one priming snapshot before pulling anything from `results`, then
/// exactly one snapshot per consumed result, and stops after the document's
/// last paragraph even if the source could yield more. A document with `N`
/// paragraphs therefore produces `N + 1` snapshots when the source delivers
/// all of them.
#[derive(Debug)]
pub struct Snapshots<I> {
	results: I,
	accumulator: Accumulator,
	primed: bool,
}

impl<I> Snapshots<I>
where
	I: Iterator<Item = MatchResult>,
{
	/// Wrap a source of results for a document of `total` paragraphs.
	pub fn new(total: usize, results: I) -> Self {
		Self {
			results,
			accumulator: Accumulator::new(total),
			primed: false,
		}
	}

	/// Whether the initial snapshot has been handed out.
	#[must_use]
	pub fn is_primed(&self) -> bool {
		self.primed
	}

	/// Results folded into the ranking so far.
	#[must_use]
	pub fn processed(&self) -> usize {
		self.accumulator.processed()
	}

	/// Paragraph count the stage stops at.
	#[must_use]
	pub fn total(&self) -> usize {
		self.accumulator.total()
	}
}

impl<I> Iterator for Snapshots<I>
where
	I: Iterator<Item = MatchResult>,
{
	type Item = ResultSnapshot;

	fn next(&mut self) -> Option<ResultSnapshot> {
		if !self.primed {
			self.primed = true;
			return Some(self.accumulator.snapshot());
		}
		if self.accumulator.is_complete() {
			return None;
		}
		let result = self.results.next()?;
		Some(self.accumulator.push(result))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.accumulator.total().saturating_sub(self.accumulator.processed());
		let upper = remaining + usize::from(!self.primed);
		(usize::from(!self.primed), Some(upper))
	}
}

#[cfg(test)]
mod tests {
	use fzbook_core::score_paragraphs;

	use super::*;

	#[test]
	fn emits_priming_snapshot_then_one_per_result() {
		let paragraphs = ["alpha", "beta", "gamma"];
		let snapshots: Vec<_> =
			Snapshots::new(paragraphs.len(), score_paragraphs("beta", paragraphs)).collect();

		assert_eq!(snapshots.len(), 4);
		for (expected, snapshot) in snapshots.iter().enumerate() {
			assert_eq!(snapshot.processed, expected);
			assert_eq!(snapshot.total, 3);
		}
		assert!(snapshots[0].top_matches.is_empty());
		assert_eq!(snapshots[3].top_matches[0].matched, "beta");
	}

	#[test]
	fn empty_document_emits_only_the_initial_snapshot() {
		let snapshots: Vec<_> =
			Snapshots::new(0, score_paragraphs("term", Vec::<String>::new())).collect();
		assert_eq!(snapshots, vec![ResultSnapshot::initial(0)]);
	}

	#[test]
	fn stops_at_the_declared_total() {
		let snapshots: Vec<_> = Snapshots::new(2, score_paragraphs("a", ["a", "b", "c"])).collect();
		assert_eq!(snapshots.len(), 3);
		assert_eq!(snapshots.last().map(|s| s.processed), Some(2));
	}

	#[test]
	fn size_hint_counts_the_priming_snapshot() {
		let stage = Snapshots::new(2, score_paragraphs("a", ["a", "b"]));
		assert_eq!(stage.size_hint(), (1, Some(3)));
	}
}
