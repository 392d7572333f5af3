use fzbook_stream::PipelineOptions;

use super::ConfigError;
use super::raw::ConfigSources;
use crate::cli::OutputFormat;
use crate::document::DocumentSource;

/// Fully merged and validated settings for one search.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
	pub(crate) term: String,
	pub(crate) source: DocumentSource,
	pub(crate) options: PipelineOptions,
	pub(crate) format: OutputFormat,
	pub(crate) progress: bool,
}

impl ResolvedConfig {
	pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
		if let Some(threads) = self.options.threads
			&& threads == 0
		{
			return Err(ConfigError::invalid(
				"pipeline.threads",
				threads.to_string(),
				sources.threads,
				"must be greater than zero",
			));
		}

		if self.options.chunk_size == 0 {
			return Err(ConfigError::invalid(
				"pipeline.chunk_size",
				"0",
				sources.chunk_size,
				"must be greater than zero",
			));
		}

		if self.options.channel_capacity == 0 {
			return Err(ConfigError::invalid(
				"pipeline.channel_capacity",
				"0",
				sources.channel_capacity,
				"must be greater than zero",
			));
		}

		Ok(())
	}

	/// Print the effective settings to stderr.
	pub(crate) fn print_summary(&self) {
		let threads = self
			.options
			.threads
			.map_or_else(|| "auto".to_string(), |threads| threads.to_string());

		eprintln!("Resolved configuration:");
		eprintln!("  term: {:?}", self.term);
		eprintln!("  document: {}", self.source);
		eprintln!("  pipeline.threads: {threads}");
		eprintln!("  pipeline.chunk_size: {}", self.options.chunk_size);
		eprintln!("  pipeline.channel_capacity: {}", self.options.channel_capacity);
		eprintln!("  pipeline.delivery: {:?}", self.options.delivery);
		eprintln!("  output.format: {}", self.format.as_str());
		eprintln!("  output.progress: {}", self.progress);
	}
}
