//! Usage: Process-wide tracing setup (stdout + rolling file in the app log dir).

use crate::infra::app_paths;
use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// Keeps the non-blocking writer alive for the lifetime of the process.
static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

pub(crate) fn init<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    let _ = tracing_log::LogTracer::init();

    let filter = tracing_subscriber::EnvFilter::try_from_env("PROXYPAL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = match app_paths::log_dir(app) {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "proxypal.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            )
        }
        Err(err) => {
            eprintln!("[proxypal] log dir unavailable, file logging disabled: {err}");
            None
        }
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init();
}
