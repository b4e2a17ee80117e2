use clap::Parser;
use s7_decap_bin::{cli::Cli, logger::Logger, run, settings::Settings};
use std::process::ExitCode;
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = Settings::load(&cli);
    let verbose = loaded.as_ref().map_or(cli.verbose, |settings| settings.verbose);
    if let Err(e) = Logger::from_verbosity(verbose).initialize() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&settings, &mut out).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
