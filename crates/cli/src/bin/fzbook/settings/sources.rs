use std::env;
use std::fmt;
use std::path::PathBuf;

use config::{Config, Environment, File};
use log::debug;

use crate::cli::CliArgs;

const APPLICATION: &str = "fzbook";

/// Where a setting's effective value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SettingSource {
	#[default]
	Default,
	/// A config file or `FZBOOK__*` environment variable.
	Configuration,
	CliFlag(&'static str),
}

impl fmt::Display for SettingSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Default => f.write_str("built-in default"),
			Self::Configuration => f.write_str("configuration"),
			Self::CliFlag(flag) => write!(f, "CLI flag {flag}"),
		}
	}
}

/// A configuration file layer. Later layers override earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct FileLayer {
	pub(super) path: PathBuf,
	/// Explicitly requested files must exist; discovered ones may not.
	pub(super) required: bool,
}

/// Every file layer for this invocation, lowest precedence first.
pub(super) fn file_layers(cli: &CliArgs) -> Vec<FileLayer> {
	let discovered = if cli.no_config {
		Vec::new()
	} else {
		default_config_files()
	};

	discovered
		.into_iter()
		.map(|path| FileLayer {
			path,
			required: false,
		})
		.chain(cli.config.iter().map(|path| FileLayer {
			path: path.clone(),
			required: true,
		}))
		.collect()
}

/// Merge the file layers and `FZBOOK__SECTION__KEY` environment variables.
pub(super) fn build_config(layers: &[FileLayer]) -> Result<Config, config::ConfigError> {
	let builder = layers
		.iter()
		.fold(Config::builder(), |builder, layer| {
			debug!(
				"config layer {} ({})",
				layer.path.display(),
				if layer.required { "required" } else { "optional" }
			);
			builder.add_source(File::from(layer.path.clone()).required(layer.required))
		});

	builder
		.add_source(
			Environment::with_prefix(APPLICATION)
				.separator("__")
				.try_parsing(true),
		)
		.build()
}

/// User-level config first, then the working directory's dotfile and plain file.
fn default_config_files() -> Vec<PathBuf> {
	let user = dirs::config_dir().map(|dir| dir.join(APPLICATION).join("config.toml"));
	let local = env::current_dir().ok().into_iter().flat_map(|dir| {
		[
			dir.join(format!(".{APPLICATION}.toml")),
			dir.join(format!("{APPLICATION}.toml")),
		]
	});
	user.into_iter().chain(local).collect()
}

#[cfg(test)]
mod tests {
	use std::fs;

	use clap::Parser;

	use super::*;

	fn cli(args: &[&str]) -> CliArgs {
		let mut argv = vec!["fzbook", "term"];
		argv.extend_from_slice(args);
		CliArgs::try_parse_from(argv).unwrap()
	}

	#[test]
	fn discovered_files_are_optional_and_come_first() {
		let layers = file_layers(&cli(&["--config", "extra.toml"]));
		let (last, discovered) = layers.split_last().unwrap();

		assert_eq!(last.path, PathBuf::from("extra.toml"));
		assert!(last.required);
		assert!(discovered.iter().all(|layer| !layer.required));
		assert!(discovered.iter().any(|layer| layer.path.ends_with(".fzbook.toml")));
		assert!(discovered.iter().any(|layer| layer.path.ends_with("fzbook.toml")));
	}

	#[test]
	fn no_config_skips_discovery() {
		let layers = file_layers(&cli(&["--no-config", "--config", "only.toml"]));
		assert_eq!(
			layers,
			vec![FileLayer {
				path: PathBuf::from("only.toml"),
				required: true,
			}]
		);
	}

	#[test]
	fn later_files_override_earlier_ones() {
		let dir = tempfile::tempdir().unwrap();
		let base = dir.path().join("base.toml");
		let local = dir.path().join("local.toml");
		fs::write(&base, "[pipeline]\nchunk_size = 8\nchannel_capacity = 32\n").unwrap();
		fs::write(&local, "[pipeline]\nchunk_size = 2\n").unwrap();

		let layers = [
			FileLayer {
				path: base,
				required: true,
			},
			FileLayer {
				path: local,
				required: true,
			},
		];
		let config = build_config(&layers).unwrap();

		assert_eq!(config.get_int("pipeline.chunk_size").unwrap(), 2);
		assert_eq!(config.get_int("pipeline.channel_capacity").unwrap(), 32);
	}

	#[test]
	fn missing_required_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let layers = [FileLayer {
			path: dir.path().join("absent.toml"),
			required: true,
		}];
		assert!(build_config(&layers).is_err());
	}

	#[test]
	fn cli_flag_source_names_the_flag() {
		assert_eq!(
			SettingSource::CliFlag("--threads").to_string(),
			"CLI flag --threads"
		);
	}
}
