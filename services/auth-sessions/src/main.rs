//! Auth Sessions Service - 会话维护入口
//!
//! 会话行从不硬删除，过期后由这里的周期清扫标记为已撤销，
//! 供审计查询与容量治理使用

use std::sync::Arc;
use std::time::Duration;

use quill_adapter_postgres::{PostgresConfig, check_connection, create_pool};
use quill_config::AppConfig;
use quill_domain_core::Entity;
use secrecy::ExposeSecret;

use auth_sessions::domain::repositories::AuthRepository;
use auth_sessions::infrastructure::persistence::PostgresAuthRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;

    if config.is_production() {
        quill_telemetry::init_tracing_json(&config.telemetry.log_level);
    } else {
        quill_telemetry::init_tracing(&config.telemetry.log_level);
    }

    if let Some(addr) = &config.telemetry.metrics_addr {
        quill_telemetry::init_metrics_exporter(addr.parse()?)?;
    }

    tracing::info!(app = %config.app_name, env = %config.app_env, "Starting session housekeeping");

    let pg_config = PostgresConfig::new(config.database.url.expose_secret())
        .with_max_connections(config.database.max_connections);
    let pool = create_pool(&pg_config).await?;
    check_connection(&pool).await?;

    let auth_repo: Arc<dyn AuthRepository> = Arc::new(PostgresAuthRepository::new(pool));

    let mut ticker =
        tokio::time::interval(Duration::from_secs(config.housekeeping.sweep_interval_secs));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = sweep_expired_sessions(auth_repo.as_ref()).await {
                    tracing::error!(error = %err, "Session sweep failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// 将已过期且尚未撤销的会话标记为已撤销
async fn sweep_expired_sessions(auth_repo: &dyn AuthRepository) -> quill_errors::AppResult<()> {
    let expired = auth_repo.find_expired_sessions().await?;

    let mut swept = 0u64;
    for session in expired.iter().filter(|s| !s.revoked()) {
        match auth_repo.revoke_session(session.id()).await {
            Ok(()) => swept += 1,
            // 并发清扫或登出竞争下行可能已消失
            Err(quill_errors::AppError::NotFound(_)) => {}
            Err(err) => return Err(err),
        }
    }

    tracing::info!(expired = expired.len(), swept, "Session sweep complete");
    metrics::counter!("auth_sessions_swept_total").increment(swept);

    Ok(())
}
