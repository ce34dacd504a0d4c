use clap::Parser;
use findtext::cli::Cli;
use findtext::{Settings, run};
use log::debug;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings: Settings = Cli::parse().into();
    debug!("Resolved settings: {:?}", settings);

    match run(&settings) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
