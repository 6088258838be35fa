use std::process::ExitCode;

use clap::Parser;
use edgelord::app::{App, Config};
use edgelord::cli::{banner, CheckArgs, CheckTarget, Cli, Commands, ScanArgs};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Scan(args) => run_scan(&cli, args).await,
        Commands::Check(args) => run_check(&cli, args),
    }
}

async fn run_scan(cli: &Cli, args: &ScanArgs) -> ExitCode {
    let mut config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load config: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".into();
    }
    config.init_logging();

    if !args.no_banner {
        banner::print_banner();
    }

    info!("edgelord starting scan");

    let app = App::new(config);
    let cancel = CancellationToken::new();

    let scan = app.run_scan(cancel.clone());
    tokio::pin!(scan);

    let result = tokio::select! {
        result = &mut scan => result,
        _ = signal::ctrl_c() => {
            info!("shutdown signal received, canceling scan");
            cancel.cancel();
            scan.await
        }
    };

    match result {
        Ok(report) => {
            let rendered = if args.pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            };
            match rendered {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!(error = %err, "failed to serialize scan report");
                    ExitCode::FAILURE
                }
            }
        }
        Err(err) => {
            error!(error = %err, "scan failed");
            ExitCode::FAILURE
        }
    }
}

fn run_check(cli: &Cli, args: &CheckArgs) -> ExitCode {
    match args.target {
        CheckTarget::Config => match Config::load(&cli.config) {
            Ok(_) => {
                println!("{} is valid", cli.config.display());
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{} is invalid: {err}", cli.config.display());
                ExitCode::FAILURE
            }
        },
    }
}
