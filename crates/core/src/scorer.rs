//! Approximate substring scoring.
//!
//! The scorer aligns the whole search term against the best-fitting substring
//! of a paragraph using a semi-global edit distance: skipping paragraph text
//! before and after the span is free, everything inside the span costs one
//! unit per substitution, insertion or deletion. The DP runs one paragraph
//! character at a time and keeps a single column of `len(term) + 1` cells, so
//! a paragraph of `n` characters costs `O(n * m)` time and `O(m)` memory.
//!
//! A span's similarity is
//! `1 - (2 * distance + |len(span) - len(term)|) / (2 * max(len(term), len(span)))`,
//! clamped to `[0, 1]`. The length term makes a span that drops a character
//! score below one of the term's own length with a single substitution. Only
//! an exact (case-insensitive) occurrence has distance zero, and that forces
//! equal lengths, so only exact occurrences reach [`MAX_SIMILARITY`].

use crate::model::{MatchResult, MatchSpan, SpanScore};

/// Similarity of an exact case-insensitive occurrence.
pub const MAX_SIMILARITY: f64 = 1.0;

/// Find the best approximate occurrence of `term` in `paragraph`.
///
/// Total for every pair of strings. An empty term or an empty paragraph yields
/// the empty span at offset zero with similarity `0.0`. When the paragraph is
/// shorter than the term the whole usable part of the paragraph is returned
/// with a correspondingly low similarity. Ties go to the candidate whose span
/// ends first.
#[must_use]
pub fn score(term: &str, paragraph: &str) -> SpanScore {
	let needle: Vec<char> = term.chars().map(fold).collect();
	if needle.is_empty() || paragraph.is_empty() {
		return SpanScore::none();
	}

	let haystack = FoldedText::new(paragraph);
	if let Some(start) = haystack.find(&needle) {
		return SpanScore {
			span: haystack.span(start, start + needle.len()),
			similarity: MAX_SIMILARITY,
		};
	}

	align(&needle, &haystack)
}

/// Lazily score a sequence of paragraphs, numbering them from zero.
pub fn score_paragraphs<'a, I>(term: &'a str, paragraphs: I) -> impl Iterator<Item = MatchResult> + 'a
where
	I: IntoIterator,
	I::Item: Into<String>,
	I::IntoIter: 'a,
{
	paragraphs
		.into_iter()
		.enumerate()
		.map(move |(index, paragraph)| MatchResult::score(term, index, paragraph))
}

/// Case-fold a single character, keeping it when lowercasing would expand it.
fn fold(c: char) -> char {
	let mut lower = c.to_lowercase();
	match (lower.next(), lower.next()) {
		(Some(folded), None) => folded,
		_ => c,
	}
}

/// Paragraph text as folded characters plus their byte offsets.
struct FoldedText {
	chars: Vec<char>,
	/// `offsets[i]` is the byte offset of `chars[i]`; the extra last entry is
	/// the text length.
	offsets: Vec<usize>,
}

impl FoldedText {
	fn new(text: &str) -> Self {
		let mut chars = Vec::with_capacity(text.len());
		let mut offsets = Vec::with_capacity(text.len() + 1);
		for (offset, c) in text.char_indices() {
			chars.push(fold(c));
			offsets.push(offset);
		}
		offsets.push(text.len());
		Self { chars, offsets }
	}

	fn len(&self) -> usize {
		self.chars.len()
	}

	fn find(&self, needle: &[char]) -> Option<usize> {
		if needle.len() > self.chars.len() {
			return None;
		}
		self.chars.windows(needle.len()).position(|window| window == needle)
	}

	/// Convert a character range into a byte span.
	fn span(&self, start: usize, end: usize) -> MatchSpan {
		MatchSpan::trusted(self.offsets[start], self.offsets[end])
	}
}

/// One DP cell: edit distance of the term prefix and the character index where
/// the cheapest alignment of that prefix starts.
#[derive(Clone, Copy)]
struct Cell {
	cost: usize,
	start: usize,
}

fn align(needle: &[char], haystack: &FoldedText) -> SpanScore {
	let m = needle.len();
	// Column for "no paragraph characters consumed": the term prefix is all gaps.
	let mut previous: Vec<Cell> = (0..=m).map(|cost| Cell { cost, start: 0 }).collect();
	let mut current = previous.clone();

	// An empty span at zero costs `m` edits, i.e. similarity zero.
	let mut best = SpanScore::none();

	for end in 1..=haystack.len() {
		let c = haystack.chars[end - 1];
		current[0] = Cell { cost: 0, start: end };

		for i in 1..=m {
			let diagonal = Cell {
				cost: previous[i - 1].cost + usize::from(needle[i - 1] != c),
				start: previous[i - 1].start,
			};
			let skip_text = Cell {
				cost: previous[i].cost + 1,
				start: previous[i].start,
			};
			let skip_term = Cell {
				cost: current[i - 1].cost + 1,
				start: current[i - 1].start,
			};

			let mut cell = diagonal;
			if skip_text.cost < cell.cost {
				cell = skip_text;
			}
			if skip_term.cost < cell.cost {
				cell = skip_term;
			}
			current[i] = cell;
		}

		let Cell { cost, start } = current[m];
		let similarity = similarity(cost, m, end - start);
		if similarity > best.similarity {
			best = SpanScore {
				span: haystack.span(start, end),
				similarity,
			};
		}

		std::mem::swap(&mut previous, &mut current);
	}

	best
}

fn similarity(distance: usize, term_len: usize, span_len: usize) -> f64 {
	let longest = term_len.max(span_len);
	if longest == 0 {
		return 0.0;
	}
	let penalty = 2 * distance + term_len.abs_diff(span_len);
	(1.0 - penalty as f64 / (2 * longest) as f64).clamp(0.0, MAX_SIMILARITY)
}
