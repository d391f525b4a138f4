use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use driver_training_compliance::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use driver_training_compliance::create_app;
use driver_training_compliance::database::DatabaseConnection;
use driver_training_compliance::repositories::{MemoryRecordStore, PgRecordStore, RecordStore};
use driver_training_compliance::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚚 Truck Driver Training Dashboard API");
    info!("======================================");

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuración inválida: {:#}", e);
            return Err(e);
        }
    };

    let store = open_store(&config).await?;
    let app_state = AppState::new(store.clone(), config.clone());
    let app = create_app(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/ - Información de la API");
    info!("👷 Conductores:");
    info!("   POST /api/drivers - Crear conductor");
    info!("   GET  /api/drivers - Listar conductores activos");
    info!("   GET  /api/drivers/:id - Obtener conductor");
    info!("   PUT  /api/drivers/:id - Actualizar conductor");
    info!("   DELETE /api/drivers/:id - Desactivar conductor");
    info!("📚 Módulos de formación:");
    info!("   POST /api/training-modules - Crear módulo");
    info!("   GET  /api/training-modules - Listar módulos");
    info!("   GET  /api/training-modules/:id - Obtener módulo");
    info!("   POST /api/training-modules/initialize-defaults - Cargar catálogo");
    info!("📝 Progreso:");
    info!("   POST /api/training-progress - Asignar módulo");
    info!("   GET  /api/training-progress - Listar progreso");
    info!("   PUT  /api/training-progress/:id - Actualizar progreso");
    info!("📜 Certificaciones:");
    info!("   POST /api/certifications - Registrar certificación");
    info!("   GET  /api/certifications - Listar certificaciones");
    info!("   GET  /api/certifications/expiring - Vencidas o por vencer");
    info!("📊 Analytics:");
    info!("   GET  /api/dashboard/summary - Resumen del dashboard");
    info!("   GET  /api/analytics/driver-progress/:id - Progreso de un conductor");
    info!("   GET  /api/analytics/module-performance/:id - Rendimiento de un módulo");
    info!("   GET  /api/analytics/compliance-report - Reporte de cumplimiento");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = &served {
        error!("❌ Error del servidor: {}", e);
    }

    store.close().await;
    info!("👋 Servidor terminado");
    served.map_err(Into::into)
}

async fn open_store(config: &EnvironmentConfig) -> Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("⚠️ Usando almacén en memoria: los datos se pierden al reiniciar");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_environment(config)
                .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

            let connection = match DatabaseConnection::new(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow!("Error de base de datos: {}", e));
                }
            };
            connection.run_migrations().await?;

            Ok(Arc::new(PgRecordStore::new(connection.pool().clone())))
        }
    }
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
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
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
