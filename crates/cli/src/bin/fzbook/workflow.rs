use std::io::{self, Write};

use anyhow::{Context, Result, anyhow};
use fzbook_stream::ResultSnapshot;
use log::{info, warn};

use crate::cli::OutputFormat;
use crate::output::{write_json, write_plain, write_progress};
use crate::settings::ResolvedConfig;

/// Reads the document, drives the pipeline and prints what it reports.
pub(crate) struct SearchWorkflow {
	config: ResolvedConfig,
}

impl SearchWorkflow {
	pub(crate) fn from_config(config: ResolvedConfig) -> Self {
		Self { config }
	}

	pub(crate) fn run(&self) -> Result<ResultSnapshot> {
		let document = self.config.source.read()?;
		let stdout = io::stdout();
		let mut out = stdout.lock();
		let stderr = io::stderr();
		let mut progress = stderr.lock();
		self.search(&document, &mut out, &mut progress)
	}

	/// Run the search over an in-memory document, writing results to `out`
	/// and plain-text progress to `progress`.
	pub(crate) fn search(
		&self,
		document: &str,
		out: &mut impl Write,
		progress: &mut impl Write,
	) -> Result<ResultSnapshot> {
		let ResolvedConfig {
			term,
			source,
			options,
			format,
			progress: report_progress,
		} = &self.config;

		info!("searching {source} for {term:?}");
		let stream = fzbook_stream::search(term, document, options.clone())
			.context("failed to start the scoring pipeline")?;

		let mut last = None;
		for snapshot in stream {
			if *report_progress {
				match format {
					OutputFormat::Plain => write_progress(progress, &snapshot)?,
					OutputFormat::Json => write_json(out, &snapshot)?,
				}
			}
			last = Some(snapshot);
		}

		let last = last.ok_or_else(|| anyhow!("search produced no snapshots"))?;
		if !last.is_complete() {
			warn!(
				"search stopped early after {} of {} paragraphs",
				last.processed, last.total
			);
		}

		match format {
			OutputFormat::Plain => write_plain(out, &last)?,
			// Progress mode already emitted the final snapshot as its last line.
			OutputFormat::Json if !*report_progress => write_json(out, &last)?,
			OutputFormat::Json => {}
		}

		Ok(last)
	}
}

#[cfg(test)]
mod tests {
	use fzbook_stream::PipelineOptions;

	use super::*;
	use crate::document::DocumentSource;

	fn workflow(term: &str, format: OutputFormat, progress: bool) -> SearchWorkflow {
		SearchWorkflow::from_config(ResolvedConfig {
			term: term.into(),
			source: DocumentSource::Stdin,
			options: PipelineOptions::default(),
			format,
			progress,
		})
	}

	#[test]
	fn plain_run_prints_the_final_ranking() {
		let mut out = Vec::new();
		let mut progress = Vec::new();
		let last = workflow("quick", OutputFormat::Plain, false)
			.search("the quick fox\n\nthe slow turtle", &mut out, &mut progress)
			.unwrap();

		assert_eq!(last.processed, 2);
		let text = String::from_utf8(out).unwrap();
		assert!(text.contains("the [quick] fox"));
		assert!(progress.is_empty());
	}

	#[test]
	fn plain_progress_goes_to_the_progress_writer() {
		let mut out = Vec::new();
		let mut progress = Vec::new();
		workflow("quick", OutputFormat::Plain, true)
			.search("the quick fox\n\nthe slow turtle", &mut out, &mut progress)
			.unwrap();

		let lines = String::from_utf8(progress).unwrap();
		assert_eq!(lines.lines().count(), 3);
		assert!(lines.starts_with("[0/2]\n"));
	}

	#[test]
	fn json_progress_emits_one_line_per_snapshot() {
		let mut out = Vec::new();
		let mut progress = Vec::new();
		workflow("fox", OutputFormat::Json, true)
			.search("a fox\n\nb\n\nc", &mut out, &mut progress)
			.unwrap();

		let text = String::from_utf8(out).unwrap();
		let lines: Vec<_> = text.lines().collect();
		assert_eq!(lines.len(), 4);
		let last: serde_json::Value = serde_json::from_str(lines[3]).unwrap();
		assert_eq!(last["processed"], 3);
		assert_eq!(last["top_matches"][0]["match"], "fox");
	}

	#[test]
	fn json_without_progress_emits_only_the_final_snapshot() {
		let mut out = Vec::new();
		let mut progress = Vec::new();
		workflow("fox", OutputFormat::Json, false)
			.search("a fox\n\nb", &mut out, &mut progress)
			.unwrap();

		let text = String::from_utf8(out).unwrap();
		assert_eq!(text.lines().count(), 1);
	}

	#[test]
	fn empty_document_reports_no_matches() {
		let mut out = Vec::new();
		let mut progress = Vec::new();
		let last = workflow("fox", OutputFormat::Plain, false)
			.search("", &mut out, &mut progress)
			.unwrap();

		assert_eq!(last, ResultSnapshot::initial(0));
		assert!(String::from_utf8(out).unwrap().contains("No matches"));
	}
}
