use crate::config::database::DatabaseTrait;
use crate::config::logging::secure_log;
use crate::response::app_response::SuccessResponse;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub database: DatabaseHealth,
    pub memory_usage: Option<MemoryUsage>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DatabaseHealth {
    pub status: String,
    pub response_time_ms: Option<u128>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MemoryUsage {
    pub total_kb: Option<u64>,
    pub free_kb: Option<u64>,
}

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

pub fn init_start_time() {
    START_TIME.set(Instant::now()).ok();
}

pub fn get_uptime_seconds() -> u64 {
    START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

pub async fn health_check(
    State(db): State<Arc<crate::config::database::Database>>,
) -> Json<SuccessResponse<HealthStatus>> {
    let start_time = Instant::now();
    let timestamp = chrono::Utc::now().to_rfc3339();

    let database_health = check_database_health(&db, start_time).await;
    let memory_usage = get_memory_usage();
    let uptime_seconds = get_uptime_seconds();

    let status = if database_health.status == "healthy" {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(SuccessResponse::send(HealthStatus {
        status: status.to_string(),
        timestamp,
        uptime_seconds,
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_health,
        memory_usage: Some(memory_usage),
    }))
}

async fn check_database_health(
    db: &Arc<crate::config::database::Database>,
    start_time: Instant,
) -> DatabaseHealth {
    match db.get_pool().acquire().await {
        Ok(_) => {
            let response_time = start_time.elapsed().as_millis();
            info!("Database health check passed in {}ms", response_time);
            DatabaseHealth {
                status: "healthy".to_string(),
                response_time_ms: Some(response_time),
                error: None,
            }
        }
        Err(e) => {
            secure_log::secure_error!("Database health check failed", e);
            DatabaseHealth {
                status: "unhealthy".to_string(),
                response_time_ms: None,
                error: Some(e.to_string()),
            }
        }
    }
}

fn get_memory_usage() -> MemoryUsage {
    match sys_info::mem_info() {
        Ok(mem) => MemoryUsage {
            total_kb: Some(mem.total),
            free_kb: Some(mem.free),
        },
        Err(_) => MemoryUsage {
            total_kb: None,
            free_kb: None,
        },
    }
}

pub async fn detailed_health_check(
    State(db): State<Arc<crate::config::database::Database>>,
) -> Json<SuccessResponse<serde_json::Value>> {
    let basic_health = health_check(State(db)).await;

    let mut details = match serde_json::to_value(&basic_health.0) {
        Ok(value) => value,
        Err(e) => {
            secure_log::secure_error!("Failed to serialize health status", e);
            return Json(SuccessResponse::send(serde_json::json!({
                "status": "error",
                "message": "Failed to generate detailed health report",
            })));
        }
    };

    if let Some(obj) = details.as_object_mut() {
        obj.insert(
            "configuration".to_string(),
            serde_json::json!({
                "status": "loaded",
                "environment_variables": crate::config::parameter::get_all().len()
            }),
        );

        let build_profile = if cfg!(debug_assertions) { "debug" } else { "release" };
        obj.insert(
            "system".to_string(),
            serde_json::json!({
                "build_profile": build_profile,
                "os": std::env::consts::OS,
                "arch": std::env::consts::ARCH,
            }),
        );
    }

    Json(SuccessResponse::send(details))
}
