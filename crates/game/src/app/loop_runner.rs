use std::process::ExitCode;

use engine::{run_app_with_metrics, MetricsHandle};
use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::summary::{write_report, ExplorerReport};
use super::ExplorerError;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = execute(app) {
        error!(error = %err, "run_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn execute(app: AppWiring) -> Result<(), ExplorerError> {
    let AppWiring {
        config,
        mut state,
        mut scene,
        summary_path,
    } = app;

    let metrics_handle = MetricsHandle::default();
    let run = run_app_with_metrics(config, &mut state, &mut scene, metrics_handle.clone());
    let metrics = metrics_handle.snapshot();
    info!(
        tps = metrics.tps,
        moving_ticks = metrics.moving_ticks,
        blocked_ticks = metrics.blocked_ticks,
        "final_interval_metrics"
    );

    let Some(path) = summary_path else {
        return Ok(());
    };
    let report = ExplorerReport {
        run,
        edits: scene.stats(),
        last_frame: scene.last_frame().cloned(),
    };
    write_report(&path, &report)?;
    info!(path = %path.display(), "summary_written");
    Ok(())
}
