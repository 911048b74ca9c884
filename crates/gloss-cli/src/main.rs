mod cli;
mod display;
mod logging;
mod tui;

use clap::Parser;
use cli::args::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init();
    let cli = Cli::parse();
    cli::run(cli)
}
