use clap::Parser;
use dctc::cli::{self, CommandLineInterface};

fn main() -> anyhow::Result<()> {
    let command_line_interface = CommandLineInterface::parse();

    cli::run(command_line_interface)?;

    Ok(())
}
