use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    throwback_watch::logging::init().context("init logging")?;

    let cli = throwback_watch::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let command = cli
        .command
        .unwrap_or_else(|| throwback_watch::cli::Command::Check(Default::default()));

    match command {
        throwback_watch::cli::Command::Check(args) => {
            let config = throwback_watch::config::Config::from_check_args(&args)
                .context("build check config")?;
            // Best-effort tool: a failed run is reported through the
            // notifier and stderr, never through the exit code.
            if let Err(err) = throwback_watch::check::run(&config).await {
                eprintln!("check failed: {err:#}");
                throwback_watch::check::report_run_failure(&config, &err).await;
            }
        }
        throwback_watch::cli::Command::State(args) => {
            throwback_watch::state::print(&args).context("state")?;
        }
    }

    Ok(())
}
