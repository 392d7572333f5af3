/// Literal boundary between paragraphs.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Split a document into paragraphs on every literal blank line.
///
/// Empty segments are kept, so `"a\n\n\n\nb"` yields `["a", "", "b"]` and the
/// paragraph indices line up with a plain `\n\n` split. The empty document is
/// the single exception: it has no paragraphs at all.
#[must_use]
pub fn split_paragraphs(document: &str) -> Vec<&str> {
	if document.is_empty() {
		return Vec::new();
	}
	document.split(PARAGRAPH_SEPARATOR).collect()
}
