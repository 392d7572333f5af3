use std::ops::Range;

use serde::Serialize;

use crate::error::SpanError;
use crate::scorer::MAX_SIMILARITY;

/// Half-open byte range `[start, end)` inside a paragraph.
///
/// Both offsets always sit on `char` boundaries of the paragraph the span was
/// built for, so slicing with [`MatchSpan::range`] never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct MatchSpan {
	start: usize,
	end: usize,
}

impl MatchSpan {
	/// Validate `start..end` against `text`.
	pub fn new(start: usize, end: usize, text: &str) -> Result<Self, SpanError> {
		if start > end {
			return Err(SpanError::Inverted { start, end });
		}
		if end > text.len() {
			return Err(SpanError::OutOfBounds {
				end,
				len: text.len(),
			});
		}
		for offset in [start, end] {
			if !text.is_char_boundary(offset) {
				return Err(SpanError::NotCharBoundary { offset });
			}
		}
		Ok(Self { start, end })
	}

	/// Build a span from offsets the caller already knows to be valid.
	pub(crate) const fn trusted(start: usize, end: usize) -> Self {
		Self { start, end }
	}

	/// The empty span at offset zero, valid for every text.
	#[must_use]
	pub const fn empty() -> Self {
		Self { start: 0, end: 0 }
	}

	/// Byte offset of the first matched character.
	#[must_use]
	pub const fn start(&self) -> usize {
		self.start
	}

	/// Byte offset one past the last matched character.
	#[must_use]
	pub const fn end(&self) -> usize {
		self.end
	}

	/// Length of the span in bytes.
	#[must_use]
	pub const fn len(&self) -> usize {
		self.end - self.start
	}

	/// Whether the span covers no text.
	#[must_use]
	pub const fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// The span as a slice range into its paragraph.
	#[must_use]
	pub const fn range(&self) -> Range<usize> {
		self.start..self.end
	}
}

/// Output of the scorer for one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpanScore {
	pub span: MatchSpan,
	/// Normalized similarity in `[0.0, 1.0]`.
	pub similarity: f64,
}

impl SpanScore {
	/// Degenerate result used for empty terms and empty paragraphs.
	#[must_use]
	pub const fn none() -> Self {
		Self {
			span: MatchSpan::empty(),
			similarity: 0.0,
		}
	}
}

/// The best match found inside a single paragraph.
///
/// A paragraph is identified solely by its zero-based position in the
/// document. The result owns the paragraph text so it can travel across
/// threads after the document has been split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
	paragraph_index: usize,
	paragraph: String,
	span: MatchSpan,
	similarity: f64,
}

impl MatchResult {
	/// Assemble a result from raw parts, rejecting spans that do not fit the
	/// paragraph and similarities outside `[0.0, 1.0]` (including NaN).
	pub fn new(
		paragraph_index: usize,
		paragraph: impl Into<String>,
		start: usize,
		end: usize,
		similarity: f64,
	) -> Result<Self, SpanError> {
		let paragraph = paragraph.into();
		let span = MatchSpan::new(start, end, &paragraph)?;
		if !(0.0..=MAX_SIMILARITY).contains(&similarity) {
			return Err(SpanError::InvalidSimilarity { similarity });
		}
		Ok(Self {
			paragraph_index,
			paragraph,
			span,
			similarity,
		})
	}

	/// Score `paragraph` against `term` and wrap the outcome.
	pub fn score(term: &str, paragraph_index: usize, paragraph: impl Into<String>) -> Self {
		let paragraph = paragraph.into();
		let SpanScore { span, similarity } = crate::score(term, &paragraph);
		Self {
			paragraph_index,
			paragraph,
			span,
			similarity,
		}
	}

	/// Zero-based position of the paragraph in the document.
	#[must_use]
	pub fn paragraph_index(&self) -> usize {
		self.paragraph_index
	}

	/// Full text of the scored paragraph.
	#[must_use]
	pub fn paragraph(&self) -> &str {
		&self.paragraph
	}

	/// Where the match sits inside [`paragraph`](Self::paragraph).
	#[must_use]
	pub fn span(&self) -> MatchSpan {
		self.span
	}

	/// Normalized similarity in `[0.0, 1.0]`.
	#[must_use]
	pub fn similarity(&self) -> f64 {
		self.similarity
	}

	/// The matched substring.
	#[must_use]
	pub fn matched(&self) -> &str {
		&self.paragraph[self.span.range()]
	}

	/// Split the paragraph around the span for presentation.
	#[must_use]
	pub fn ranked(&self) -> RankedMatch {
		RankedMatch {
			paragraph_index: self.paragraph_index,
			before: self.paragraph[..self.span.start].to_owned(),
			matched: self.paragraph[self.span.range()].to_owned(),
			after: self.paragraph[self.span.end..].to_owned(),
			score: self.similarity,
		}
	}

	/// Like [`ranked`](Self::ranked), reusing the paragraph's allocation.
	#[must_use]
	pub fn into_ranked(self) -> RankedMatch {
		let Self {
			paragraph_index,
			mut paragraph,
			span,
			similarity,
		} = self;
		let after = paragraph.split_off(span.end);
		let matched = paragraph.split_off(span.start);
		RankedMatch {
			paragraph_index,
			before: paragraph,
			matched,
			after,
			score: similarity,
		}
	}
}

/// Presentation form of a [`MatchResult`].
///
/// `before + matched + after` is exactly the original paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
	pub paragraph_index: usize,
	pub before: String,
	#[serde(rename = "match")]
	pub matched: String,
	pub after: String,
	pub score: f64,
}

impl RankedMatch {
	/// Rebuild the paragraph the match was cut from.
	#[must_use]
	pub fn paragraph(&self) -> String {
		let mut text =
			String::with_capacity(self.before.len() + self.matched.len() + self.after.len());
		text.push_str(&self.before);
		text.push_str(&self.matched);
		text.push_str(&self.after);
		text
	}
}

/// Point-in-time view of the search.
///
/// `top_matches` is ordered by descending score, ties going to the lower
/// paragraph index, and never holds more than ten entries. `processed` counts
/// consumed match results, which is not necessarily the highest paragraph
/// index seen when results arrive out of order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultSnapshot {
	pub top_matches: Vec<RankedMatch>,
	pub processed: usize,
	pub total: usize,
}

impl ResultSnapshot {
	/// Snapshot emitted before any paragraph has been scored.
	#[must_use]
	pub fn initial(total: usize) -> Self {
		Self {
			top_matches: Vec::new(),
			processed: 0,
			total,
		}
	}

	/// Whether every paragraph has been accounted for.
	#[must_use]
	pub fn is_complete(&self) -> bool {
		self.processed >= self.total
	}

	/// Fraction of paragraphs scored so far; an empty document counts as done.
	#[must_use]
	pub fn progress(&self) -> f64 {
		if self.total == 0 {
			1.0
		} else {
			self.processed as f64 / self.total as f64
		}
	}

	/// The current leader, if anything has been scored.
	#[must_use]
	pub fn best(&self) -> Option<&RankedMatch> {
		self.top_matches.first()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn span_rejects_inverted_offsets() {
		assert_eq!(
			MatchSpan::new(3, 1, "hello"),
			Err(SpanError::Inverted { start: 3, end: 1 })
		);
	}

	#[test]
	fn span_rejects_offsets_past_the_text() {
		assert_eq!(
			MatchSpan::new(0, 6, "hello"),
			Err(SpanError::OutOfBounds { end: 6, len: 5 })
		);
	}

	#[test]
	fn span_rejects_offsets_inside_a_character() {
		// 'é' occupies bytes 1..3
		assert_eq!(
			MatchSpan::new(2, 3, "céu"),
			Err(SpanError::NotCharBoundary { offset: 2 })
		);
	}

	#[test]
	fn ranked_match_splits_around_the_span() {
		let result = MatchResult::new(4, "the quick fox", 4, 9, 1.0).unwrap();
		let ranked = result.ranked();
		assert_eq!(ranked.paragraph_index, 4);
		assert_eq!(ranked.before, "the ");
		assert_eq!(ranked.matched, "quick");
		assert_eq!(ranked.after, " fox");
		assert_eq!(ranked.paragraph(), "the quick fox");
	}

	#[test]
	fn match_result_rejects_malformed_span() {
		let err = MatchResult::new(0, "abc", 2, 1, 0.5).unwrap_err();
		assert!(matches!(err, SpanError::Inverted { .. }));
	}

	#[test]
	fn match_result_rejects_scores_outside_the_unit_range() {
		for similarity in [f64::NAN, -0.1, 1.5, f64::INFINITY] {
			let err = MatchResult::new(0, "abc", 0, 1, similarity).unwrap_err();
			assert!(matches!(err, SpanError::InvalidSimilarity { .. }));
		}
		assert!(MatchResult::new(0, "abc", 0, 1, 0.0).is_ok());
		assert!(MatchResult::new(0, "abc", 0, 1, 1.0).is_ok());
	}

	#[test]
	fn into_ranked_matches_ranked() {
		let result = MatchResult::new(2, "über café", 6, 11, 0.5).unwrap();
		assert_eq!(result.ranked(), result.clone().into_ranked());
	}

	#[test]
	fn ranked_match_serializes_matched_text_as_match() {
		let ranked = MatchResult::new(0, "abc", 1, 2, 0.5).unwrap().into_ranked();
		let value = serde_json::to_value(&ranked).unwrap();
		assert_eq!(value["match"], "b");
		assert_eq!(value["before"], "a");
		assert_eq!(value["after"], "c");
	}

	#[test]
	fn empty_document_snapshot_is_complete() {
		let snapshot = ResultSnapshot::initial(0);
		assert!(snapshot.is_complete());
		assert_eq!(snapshot.progress(), 1.0);
		assert!(snapshot.best().is_none());
	}
}
