use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_scheduling::config::{DatabaseConfig, EnvironmentConfig};
use fleet_scheduling::database::create_pool;
use fleet_scheduling::repositories::memory_repository::InMemoryStore;
use fleet_scheduling::repositories::postgres_repository::PgStore;
use fleet_scheduling::repositories::SchedulingStore;
use fleet_scheduling::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("configuración inválida")?;

    // Configurar logging
    let level = tracing::Level::from_str(&config.log_level).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚌 Fleet Scheduling - planificación de giras y analítica de flota");
    info!("================================================");

    let store: Arc<dyn SchedulingStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(&DatabaseConfig::new(url.clone())).await.map_err(|e| {
                error!("❌ Error conectando a la base de datos: {}", e);
                e
            })?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida, usando almacenamiento en memoria");
            Arc::new(InMemoryStore::new())
        }
    };

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("dirección inválida: {}", config.server_url()))?;
    info!("📏 Capacidad de flota: {} vehículos", config.fleet_capacity);

    let app = create_router(AppState::new(config, store));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚌 Giras:");
    info!("   POST /api/tours - Crear gira");
    info!("   POST /api/tours/allocate - Asignación masiva");
    info!("   POST /api/tours/backfill - Asignar y persistir");
    info!("📊 Analítica:");
    info!("   GET  /api/analytics/fleet-concurrency?from&to");
    info!("   GET  /api/analytics/monthly-fleet-balance?year");
    info!("   GET  /api/analytics/recommendations?year");
    info!("   GET  /api/analytics/tour-volume?from&to&group");
    info!("   GET  /api/analytics/route-volume?from&to");
    info!("   GET  /api/analytics/daily-tours?from&to&route_id");
    info!("   GET  /api/analytics/summary?from&to");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}
