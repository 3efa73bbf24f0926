use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use monitor_app::cli::Args;
use monitor_app::config::MonitorConfig;
use monitor_app::logging::{self, LogDestination};
use monitor_app::render::{print_result, TerminalPresenter};
use monitor_core::{Msg, ResultState};
use monitor_engine::{write_artifact, Monitor, ReqwestJobApi, TokioClock};
use monitor_logging::{monitor_error, monitor_info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let loaded = MonitorConfig::load(args.config.as_deref(), Path::new("."))?;
    let config = args.apply_to(loaded.config);
    logging::initialize(LogDestination::for_file_logging(config.log_to_file));
    match &loaded.source {
        Some(path) => monitor_info!("Loaded config from {:?}", path),
        None => monitor_info!("No config file; using defaults"),
    }

    let input_file = args
        .read_input_file()
        .with_context(|| format!("failed to read input file {:?}", args.file))?;
    let form = args.job_form(&config, input_file);

    let api = ReqwestJobApi::new(config.api_settings())
        .with_context(|| format!("invalid server url {:?}", config.server))?;
    monitor_info!("Monitoring jobs on {}", api.base_url());

    let mut monitor = Monitor::new(
        Arc::new(api),
        Arc::new(TokioClock),
        config.monitor_settings(),
    );
    let mut presenter = TerminalPresenter::new(io::stdout());

    monitor.dispatch(Msg::SubmitClicked(form), &mut presenter);
    let state = monitor.run_until_finished(&mut presenter).await;

    let ResultState::Retrieved(artifact) = state.result() else {
        return Ok(ExitCode::FAILURE);
    };

    print_result(&mut io::stdout().lock(), artifact).context("failed to print result")?;
    if let Some(output) = &args.output {
        match write_artifact(output, artifact) {
            Ok(path) => monitor_info!("Result written to {:?}", path),
            Err(err) => {
                monitor_error!("Failed to write result to {:?}: {}", output, err);
                return Err(err).with_context(|| format!("failed to write {:?}", output));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
