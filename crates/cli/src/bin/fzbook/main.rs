mod cli;
mod document;
mod logging;
mod output;
mod settings;
mod workflow;

use anyhow::Result;
use cli::parse_cli;
use workflow::SearchWorkflow;

fn main() -> Result<()> {
	let cli = parse_cli();
	logging::init(cli.verbose);

	let resolved = settings::load(&cli)?;
	if cli.print_config {
		resolved.print_summary();
	}

	let workflow = SearchWorkflow::from_config(resolved);
	workflow.run()?;
	Ok(())
}
