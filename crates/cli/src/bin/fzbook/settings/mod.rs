//! Configuration loading and resolution.
//!
//! Values are layered in increasing precedence: default config files, files
//! passed with `--config`, `FZBOOK__*` environment variables, then CLI flags.
//! [`load`] returns a validated [`ResolvedConfig`].

mod errors;
mod loader;
mod raw;
mod resolved;
mod sources;

pub(crate) use errors::ConfigError;
pub(crate) use loader::load;
pub(crate) use resolved::ResolvedConfig;
pub(crate) use sources::SettingSource;
