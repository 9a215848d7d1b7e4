//! Entry point for the `sitescout` binary.
#![forbid(unsafe_code)]

use sitescout_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match sitescout_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("sitescout: {err}");
            std::process::exit(1);
        }
    }
}
