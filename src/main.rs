use clap::Parser;
use tradelog::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
