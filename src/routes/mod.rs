//! Routers de la API
//!
//! Un router por entidad, anidados bajo `/api`. La composición completa
//! vive acá para que los tests de integración levanten la app real.

pub mod checklist_routes;
pub mod cita_routes;
pub mod cliente_routes;
pub mod lookup_routes;
pub mod orden_routes;
pub mod staff_routes;
pub mod vehiculo_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::{cors_middleware, cors_middleware_con_origenes};
use crate::state::AppState;

/// Crear el router completo de la aplicación
pub fn crear_router(state: AppState) -> Router {
    let cors = if state.config.is_development() || state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_con_origenes(&state.config.cors_origins)
    };

    Router::new()
        .route("/salud", get(salud))
        .nest("/api/vehiculos", vehiculo_routes::crear_vehiculo_router())
        .nest("/api/ordenes", orden_routes::crear_orden_router())
        .nest("/api/citas", cita_routes::crear_cita_router())
        .nest("/api/clientes", cliente_routes::crear_cliente_router())
        .nest("/api/personal", staff_routes::crear_staff_router())
        .nest("/api/checklists", checklist_routes::crear_checklist_router())
        .nest("/api/patentes", lookup_routes::crear_lookup_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check simple
async fn salud() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "taller-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
