use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use log::info;
use quickparse_cli::cli_args::Args;
use quickparse_core::Result;

fn execute() -> Result<bool> {
    let args = Args::parse();
    quickparse_cli::run(&args, &mut stdout())
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => {
            info!("Parse finished with errors");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
