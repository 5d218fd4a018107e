use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use taller_backend::config::environment::Config;
use taller_backend::routes::crear_router;
use taller_backend::services::fuentes::construir_fuentes;
use taller_backend::services::{PlateResolver, QuotaStore};
use taller_backend::state::AppState;
use taller_backend::storage::construir_storage;

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

    info!("🔧 Taller Backend - Gestión de taller mecánico");
    info!("================================================");

    let config = Config::desde_env();

    // Backend de persistencia: se resuelve una sola vez acá
    let storage = match construir_storage(&config).await {
        Ok(storage) => storage,
        Err(e) => {
            error!("❌ Error inicializando el almacenamiento: {}", e);
            return Err(e);
        }
    };

    // Motor de resolución de patentes con su store de cuotas
    let cuotas = match &config.ruta_cuotas {
        Some(ruta) => QuotaStore::con_archivo(ruta)?,
        None => QuotaStore::en_memoria(),
    };
    let resolver = Arc::new(PlateResolver::new(construir_fuentes(&config), cuotas));

    let state = AppState::new(storage, resolver, config.clone());
    let app = crear_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /salud - Health check");
    info!("🚗 Vehículos:");
    info!("   GET  /api/vehiculos/:patente - Buscar por patente");
    info!("   POST /api/vehiculos - Registrar vehículo");
    info!("   PUT  /api/vehiculos/:patente - Actualizar vehículo");
    info!("📋 Órdenes de trabajo:");
    info!("   GET  /api/ordenes - Listar (filtros: estado, patente, incluir_citas)");
    info!("   POST /api/ordenes - Crear orden");
    info!("   PUT  /api/ordenes/:id - Actualizar orden");
    info!("   DELETE /api/ordenes/:id - Archivar orden (fisico=true elimina)");
    info!("📅 Citas:");
    info!("   GET  /api/citas - Listar (rango desde/hasta)");
    info!("   POST /api/citas/:id/confirmar - Confirmar y crear orden");
    info!("👥 Clientes y personal:");
    info!("   GET  /api/clientes - Listar con estadísticas (?q= busca)");
    info!("   GET  /api/clientes/rut/:rut - Buscar por RUT");
    info!("   GET  /api/personal - Listar perfiles");
    info!("✅ Checklists:");
    info!("   GET  /api/checklists/orden/:orden_id - Checklist de una orden");
    info!("   POST /api/checklists - Guardar (upsert)");
    info!("   POST /api/checklists/:id/revisar - Confirmar revisión de ingreso");
    info!("🔎 Resolución de patentes:");
    info!("   GET  /api/patentes/:patente/resolver - Resolver contra fuentes externas");
    info!("   GET  /api/patentes/fuentes - Estado de cuotas por fuente");
    info!("   PUT  /api/patentes/fuentes/:nombre/activa - Activar/desactivar fuente");
    info!("   POST /api/patentes/fuentes/reset - Reset manual de cuotas");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
