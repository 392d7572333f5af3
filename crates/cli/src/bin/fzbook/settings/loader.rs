use anyhow::{Context, Result};

use super::raw::RawConfig;
use super::resolved::ResolvedConfig;
use super::sources::{build_config, file_layers};
use crate::cli::CliArgs;

/// Merge config files, environment and CLI flags into a validated
/// [`ResolvedConfig`].
pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	let layers = file_layers(cli);
	let mut raw: RawConfig = build_config(&layers)
		.context("failed to read configuration")?
		.try_deserialize()
		.context("configuration has an unexpected shape")?;
	raw.apply_cli_overrides(cli);
	Ok(raw.resolve(cli)?)
}
