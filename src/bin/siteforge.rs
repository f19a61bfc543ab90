use clap::Parser;
use colored::Colorize;
use siteforge_core::cli::{handlers, Cli};
use siteforge_core::exit::ForgeExit;
use siteforge_core::logging;

fn main() -> ForgeExit {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match handlers::handle_verify(&cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ForgeExit::CheckFailed
        }
    }
}
