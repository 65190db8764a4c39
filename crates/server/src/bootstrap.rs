//! Process setup shared by the binaries: `.env`, logging, panic hook, Tokio
//! runtime, Ctrl+C handling and the exit code.

use std::future::Future;
use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use common::utils::logging::init_logging_from_env;
use configs::AppConfig;

/// Worker threads from config.toml, then `TOKIO_WORKER_THREADS`.
fn worker_threads(configured: Option<usize>, env: Option<&str>) -> Option<usize> {
    configured.or_else(|| env.and_then(|v| v.parse::<usize>().ok()))
}

fn install_panic_hook(service: &'static str, service_id: Uuid) {
    let pid = std::process::id();
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!(service, event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
        previous(info);
    }));
}

/// Drive `run` until it returns or Ctrl+C arrives. `true` means a clean stop.
async fn supervise<F>(service: &'static str, service_id: Uuid, run: F) -> bool
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let pid = std::process::id();
    let task = tokio::spawn(run);

    tokio::select! {
        res = task => match res {
            Ok(Ok(())) => {
                info!(service, event = "stop", %service_id, pid, "service stopped");
                true
            }
            Ok(Err(e)) => {
                error!(service, event = "run_failed", error = %e, "service returned error");
                false
            }
            Err(e) => {
                error!(service, event = "task_join_error", error = %e, "service task join error");
                false
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!(service, event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
            true
        }
    }
}

/// Entry point for a binary: set up the process, then run `run` on a
/// multi-threaded runtime.
pub fn run_binary<F>(service: &'static str, run: F) -> ExitCode
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    dotenv().ok();
    init_logging_from_env();

    let service_id = Uuid::new_v4();
    install_panic_hook(service, service_id);

    let configured = AppConfig::load_or_env().ok().and_then(|cfg| cfg.server.worker_threads);
    let threads = worker_threads(configured, std::env::var("TOKIO_WORKER_THREADS").ok().as_deref());

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service,
        event = "start",
        %service_id,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        threads = threads.unwrap_or_default(),
        "service starting"
    );

    if rt.block_on(supervise(service, service_id, run)) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
