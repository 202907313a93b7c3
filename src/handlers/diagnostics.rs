use crate::{models::DiagnosticsResponse, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;
use std::sync::{Mutex, OnceLock};
use sysinfo::System;
use tracing::info;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Report board occupancy and process resource usage
pub async fn diagnostics(
    State(app_state): State<Arc<AppState>>,
) -> (StatusCode, Json<DiagnosticsResponse>) {

    // Aggregate counts from the board
    let stats = app_state.board.lock().await.stats();
    let uptime_secs = (Utc::now() - app_state.started_at).num_seconds();

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| {
            Mutex::new(System::new_all())
        });
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0)
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Sessions: {}, Objects: {}, Locks: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        stats.sessions,
        stats.objects,
        stats.locks
    );

    (
        StatusCode::OK,
        Json(DiagnosticsResponse {
            n_sessions: stats.sessions as u32,
            n_objects: stats.objects as u32,
            n_locks: stats.locks as u32,
            n_cursors: stats.cursors as u32,
            uptime_secs,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    )
}
