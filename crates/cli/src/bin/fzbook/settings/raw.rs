use fzbook_stream::{Delivery, PipelineOptions};
use serde::Deserialize;

use super::resolved::ResolvedConfig;
use super::{ConfigError, SettingSource};
use crate::cli::{CliArgs, OutputFormat};
use crate::document::DocumentSource;

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	pipeline: PipelineSection,
	output: OutputSection,
	#[serde(skip)]
	sources: ConfigSources,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PipelineSection {
	threads: Option<usize>,
	chunk_size: Option<usize>,
	channel_capacity: Option<usize>,
	delivery: Option<Delivery>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct OutputSection {
	format: Option<OutputFormat>,
	progress: Option<bool>,
}

/// Origin of every value that validation can reject.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct ConfigSources {
	pub(super) threads: SettingSource,
	pub(super) chunk_size: SettingSource,
	pub(super) channel_capacity: SettingSource,
}

fn source_of<T>(value: &Option<T>) -> SettingSource {
	if value.is_some() {
		SettingSource::Configuration
	} else {
		SettingSource::Default
	}
}

impl RawConfig {
	/// Apply CLI overrides on top of the raw configuration values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		self.sources = ConfigSources {
			threads: source_of(&self.pipeline.threads),
			chunk_size: source_of(&self.pipeline.chunk_size),
			channel_capacity: source_of(&self.pipeline.channel_capacity),
		};

		if let Some(threads) = cli.threads {
			self.pipeline.threads = Some(threads);
			self.sources.threads = SettingSource::CliFlag("--threads");
		}
		if let Some(chunk_size) = cli.chunk_size {
			self.pipeline.chunk_size = Some(chunk_size);
			self.sources.chunk_size = SettingSource::CliFlag("--chunk-size");
		}
		if let Some(capacity) = cli.channel_capacity {
			self.pipeline.channel_capacity = Some(capacity);
			self.sources.channel_capacity = SettingSource::CliFlag("--channel-capacity");
		}
		if cli.unordered {
			self.pipeline.delivery = Some(Delivery::Unordered);
		}
		if let Some(format) = cli.output {
			self.output.format = Some(format);
		}
		if cli.progress {
			self.output.progress = Some(true);
		}
	}

	/// Validate the merged values and produce the final configuration.
	pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig, ConfigError> {
		let defaults = PipelineOptions::default();
		let options = PipelineOptions {
			threads: self.pipeline.threads,
			chunk_size: self.pipeline.chunk_size.unwrap_or(defaults.chunk_size),
			channel_capacity: self
				.pipeline
				.channel_capacity
				.unwrap_or(defaults.channel_capacity),
			delivery: self.pipeline.delivery.unwrap_or_default(),
		};

		let config = ResolvedConfig {
			term: cli.term.clone(),
			source: DocumentSource::from_arg(cli.file.as_deref()),
			options,
			format: self.output.format.unwrap_or_default(),
			progress: self.output.progress.unwrap_or(false),
		};
		config.validate(&self.sources)?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use clap::Parser;
	use config::{Config, File, FileFormat};

	use super::*;

	fn raw_from_toml(toml: &str) -> RawConfig {
		Config::builder()
			.add_source(File::from_str(toml, FileFormat::Toml))
			.build()
			.unwrap()
			.try_deserialize()
			.unwrap()
	}

	fn cli(args: &[&str]) -> CliArgs {
		let mut argv = vec!["fzbook", "term"];
		argv.extend_from_slice(args);
		CliArgs::try_parse_from(argv).unwrap()
	}

	#[test]
	fn empty_configuration_uses_pipeline_defaults() {
		let mut raw = RawConfig::default();
		let cli = cli(&[]);
		raw.apply_cli_overrides(&cli);
		let resolved = raw.resolve(&cli).unwrap();

		assert_eq!(resolved.options, PipelineOptions::default());
		assert_eq!(resolved.format, OutputFormat::Plain);
		assert!(!resolved.progress);
		assert_eq!(resolved.source, DocumentSource::Stdin);
	}

	#[test]
	fn file_values_are_read() {
		let mut raw = raw_from_toml(
			r#"
			[pipeline]
			threads = 2
			chunk_size = 16
			delivery = "unordered"

			[output]
			format = "json"
			progress = true
			"#,
		);
		let cli = cli(&[]);
		raw.apply_cli_overrides(&cli);
		let resolved = raw.resolve(&cli).unwrap();

		assert_eq!(resolved.options.threads, Some(2));
		assert_eq!(resolved.options.chunk_size, 16);
		assert_eq!(resolved.options.delivery, Delivery::Unordered);
		assert_eq!(resolved.format, OutputFormat::Json);
		assert!(resolved.progress);
	}

	#[test]
	fn cli_flags_override_file_values() {
		let mut raw = raw_from_toml("[pipeline]\nthreads = 2\nchunk_size = 16\n");
		let cli = cli(&["--threads", "8", "--chunk-size", "4", "-o", "json"]);
		raw.apply_cli_overrides(&cli);
		let resolved = raw.resolve(&cli).unwrap();

		assert_eq!(resolved.options.threads, Some(8));
		assert_eq!(resolved.options.chunk_size, 4);
		assert_eq!(resolved.format, OutputFormat::Json);
	}

	#[test]
	fn zero_threads_from_cli_names_the_flag() {
		let mut raw = RawConfig::default();
		let cli = cli(&["--threads", "0"]);
		raw.apply_cli_overrides(&cli);
		let err = raw.resolve(&cli).unwrap_err();

		assert_eq!(err.key, "pipeline.threads");
		let message = err.to_string();
		assert!(message.contains("value: 0"));
		assert!(message.contains("CLI flag --threads"));
	}

	#[test]
	fn zero_chunk_size_from_file_is_rejected() {
		let mut raw = raw_from_toml("[pipeline]\nchunk_size = 0\n");
		let cli = cli(&[]);
		raw.apply_cli_overrides(&cli);
		let err = raw.resolve(&cli).unwrap_err();

		assert_eq!(err.key, "pipeline.chunk_size");
		assert_eq!(err.origin, SettingSource::Configuration);
	}
}
