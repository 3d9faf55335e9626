use clap::Parser;
use sentrader::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
