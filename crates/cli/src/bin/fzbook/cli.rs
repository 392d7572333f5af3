use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser, ValueEnum};
use serde::Deserialize;

/// Command-line arguments accepted by the `fzbook` binary.
#[derive(Parser, Debug)]
#[command(
	name = "fzbook",
	version,
	about = "Incremental fuzzy search over the paragraphs of a document",
	color = ColorChoice::Auto
)]
pub(crate) struct CliArgs {
	#[arg(value_name = "TERM", help = "Text to look for (matching ignores case)")]
	pub(crate) term: String,
	#[arg(
		short,
		long,
		value_name = "PATH",
		help = "Document to search; '-' reads standard input (default: standard input)"
	)]
	pub(crate) file: Option<PathBuf>,
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "FZBOOK_CONFIG",
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'j',
		long,
		value_name = "NUM",
		help = "Number of scoring threads (default: one per core)"
	)]
	pub(crate) threads: Option<usize>,
	#[arg(
		long,
		value_name = "NUM",
		help = "Paragraphs scored per batch (default: 64)"
	)]
	pub(crate) chunk_size: Option<usize>,
	#[arg(
		long,
		value_name = "NUM",
		help = "Scored paragraphs buffered ahead of the ranking (default: 1024)"
	)]
	pub(crate) channel_capacity: Option<usize>,
	#[arg(
		long,
		help = "Rank paragraphs as soon as they are scored instead of in document order"
	)]
	pub(crate) unordered: bool,
	#[arg(
		short,
		long,
		help = "Report every intermediate snapshot, not just the final ranking"
	)]
	pub(crate) progress: bool,
	#[arg(
		short,
		long,
		value_enum,
		value_name = "FORMAT",
		help = "Output format (default: plain)"
	)]
	pub(crate) output: Option<OutputFormat>,
	#[arg(
		short,
		long,
		action = ArgAction::Count,
		help = "Raise log verbosity; repeat for more detail (RUST_LOG takes precedence)"
	)]
	pub(crate) verbose: u8,
	#[arg(long, help = "Print the resolved configuration to stderr before searching")]
	pub(crate) print_config: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
	#[default]
	Plain,
	Json,
}

impl OutputFormat {
	pub(crate) fn as_str(self) -> &'static str {
		match self {
			Self::Plain => "plain",
			Self::Json => "json",
		}
	}
}

pub(crate) fn parse_cli() -> CliArgs {
	CliArgs::parse()
}
