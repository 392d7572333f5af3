use log::debug;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level one step
/// from `warn`. Library crates log through `log`, which the subscriber picks
/// up via its `tracing-log` bridge.
pub(crate) fn init(verbosity: u8) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

	let installed = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
	if let Err(err) = installed {
		// Another subscriber owns the process; records still reach it.
		debug!("keeping the existing log subscriber: {err}");
	}
}

fn default_level(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verbosity_raises_the_level() {
		assert_eq!(default_level(0), "warn");
		assert_eq!(default_level(1), "info");
		assert_eq!(default_level(2), "debug");
		assert_eq!(default_level(9), "trace");
	}

	#[test]
	fn repeated_init_is_harmless() {
		init(0);
		init(2);
	}
}
