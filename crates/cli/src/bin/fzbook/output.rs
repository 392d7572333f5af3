use std::io::{self, Write};

use anyhow::Result;
use fzbook_stream::{RankedMatch, ResultSnapshot};

/// Characters of surrounding text shown on each side of a match.
const CONTEXT_CHARS: usize = 40;

/// Write the final ranking as a plain-text table.
pub(crate) fn write_plain(out: &mut impl Write, snapshot: &ResultSnapshot) -> io::Result<()> {
	writeln!(
		out,
		"Searched {} of {} paragraphs",
		snapshot.processed, snapshot.total
	)?;
	if snapshot.top_matches.is_empty() {
		writeln!(out, "No matches")?;
		return Ok(());
	}
	for (rank, ranked) in snapshot.top_matches.iter().enumerate() {
		writeln!(
			out,
			"{:>2}. {:.3}  #{:<5} {}",
			rank + 1,
			ranked.score,
			ranked.paragraph_index,
			excerpt(ranked, CONTEXT_CHARS)
		)?;
	}
	Ok(())
}

/// One-line progress report for an intermediate snapshot.
pub(crate) fn write_progress(out: &mut impl Write, snapshot: &ResultSnapshot) -> io::Result<()> {
	match snapshot.best() {
		Some(best) => writeln!(
			out,
			"[{}/{}] best {:.3} in #{}",
			snapshot.processed, snapshot.total, best.score, best.paragraph_index
		),
		None => writeln!(out, "[{}/{}]", snapshot.processed, snapshot.total),
	}
}

/// Serialize a snapshot as a single JSON line.
pub(crate) fn format_snapshot_json(snapshot: &ResultSnapshot) -> Result<String> {
	Ok(serde_json::to_string(snapshot)?)
}

pub(crate) fn write_json(out: &mut impl Write, snapshot: &ResultSnapshot) -> Result<()> {
	writeln!(out, "{}", format_snapshot_json(snapshot)?)?;
	Ok(())
}

/// Render `before[match]after`, trimming long context and flattening newlines.
pub(crate) fn excerpt(ranked: &RankedMatch, context: usize) -> String {
	let before = tail_chars(&ranked.before, context);
	let after = head_chars(&ranked.after, context);

	let mut line = String::new();
	if before.len() < ranked.before.len() {
		line.push('…');
	}
	line.push_str(before);
	line.push('[');
	line.push_str(&ranked.matched);
	line.push(']');
	line.push_str(after);
	if after.len() < ranked.after.len() {
		line.push('…');
	}
	line.replace(['\n', '\r'], " ")
}

fn tail_chars(text: &str, count: usize) -> &str {
	if count == 0 {
		return "";
	}
	match text.char_indices().rev().nth(count - 1) {
		Some((offset, _)) => &text[offset..],
		None => text,
	}
}

fn head_chars(text: &str, count: usize) -> &str {
	match text.char_indices().nth(count) {
		Some((offset, _)) => &text[..offset],
		None => text,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::Value;

	use super::*;

	fn ranked(before: &str, matched: &str, after: &str) -> RankedMatch {
		RankedMatch {
			paragraph_index: 3,
			before: before.into(),
			matched: matched.into(),
			after: after.into(),
			score: 0.75,
		}
	}

	#[test]
	fn excerpt_brackets_the_match() {
		assert_eq!(
			excerpt(&ranked("the ", "quick", " fox"), 40),
			"the [quick] fox"
		);
	}

	#[test]
	fn excerpt_trims_long_context_on_char_boundaries() {
		let line = excerpt(&ranked("ééééé", "x", "üüüüü"), 2);
		assert_eq!(line, "…éé[x]üü…");
	}

	#[test]
	fn excerpt_flattens_newlines() {
		assert_eq!(excerpt(&ranked("a\n", "b", "\nc"), 40), "a [b] c");
	}

	#[test]
	fn plain_output_lists_ranked_matches() {
		let snapshot = ResultSnapshot {
			top_matches: vec![ranked("the ", "quick", " fox")],
			processed: 2,
			total: 2,
		};
		let mut out = Vec::new();
		write_plain(&mut out, &snapshot).unwrap();
		let text = String::from_utf8(out).unwrap();

		assert!(text.starts_with("Searched 2 of 2 paragraphs\n"));
		assert!(text.contains(" 1. 0.750  #3"));
		assert!(text.contains("the [quick] fox"));
	}

	#[test]
	fn plain_output_reports_empty_results() {
		let mut out = Vec::new();
		write_plain(&mut out, &ResultSnapshot::initial(0)).unwrap();
		assert_eq!(
			String::from_utf8(out).unwrap(),
			"Searched 0 of 0 paragraphs\nNo matches\n"
		);
	}

	#[test]
	fn progress_line_names_the_leader() {
		let snapshot = ResultSnapshot {
			top_matches: vec![ranked("", "x", "")],
			processed: 1,
			total: 4,
		};
		let mut out = Vec::new();
		write_progress(&mut out, &snapshot).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "[1/4] best 0.750 in #3\n");
	}

	#[test]
	fn json_uses_match_as_the_field_name() {
		let snapshot = ResultSnapshot {
			top_matches: vec![ranked("the ", "quick", " fox")],
			processed: 1,
			total: 2,
		};
		let json = format_snapshot_json(&snapshot).unwrap();
		let value: Value = serde_json::from_str(&json).unwrap();
		assert_eq!(value["processed"], 1);
		assert_eq!(value["total"], 2);
		assert_eq!(value["top_matches"][0]["match"], "quick");
		assert_eq!(value["top_matches"][0]["paragraph_index"], 3);
	}
}
