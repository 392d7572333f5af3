use thiserror::Error;

/// Rejected span requests.
///
/// Spans produced by the scorer are always valid; these errors only surface
/// when a caller assembles a [`MatchResult`](crate::MatchResult) or
/// [`MatchSpan`](crate::MatchSpan) from raw parts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpanError {
	#[error("span start {start} is past its end {end}")]
	Inverted { start: usize, end: usize },
	#[error("span end {end} exceeds text length {len}")]
	OutOfBounds { end: usize, len: usize },
	#[error("offset {offset} does not fall on a character boundary")]
	NotCharBoundary { offset: usize },
	#[error("similarity {similarity} is outside [0, 1]")]
	InvalidSimilarity { similarity: f64 },
}
