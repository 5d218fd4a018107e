use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::lookup_controller::LookupController;
use crate::dto::lookup_dto::ActivarFuenteRequest;
use crate::models::lookup::DatosVehiculo;
use crate::services::plate_resolver::EstadoFuente;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_lookup_router() -> Router<AppState> {
    Router::new()
        .route("/:patente/resolver", get(resolver_patente))
        .route("/fuentes", get(estado_fuentes))
        .route("/fuentes/:nombre/activa", put(activar_fuente))
        .route("/fuentes/reset", post(reset_cuotas))
}

async fn resolver_patente(
    State(state): State<AppState>,
    Path(patente): Path<String>,
) -> Result<Json<DatosVehiculo>, AppError> {
    let controller = LookupController::new(state.resolver.clone());
    Ok(Json(controller.resolver(&patente).await?))
}

/// Visibilidad del operador: uso, límite y disponibilidad por fuente
async fn estado_fuentes(
    State(state): State<AppState>,
) -> Result<Json<Vec<EstadoFuente>>, AppError> {
    let controller = LookupController::new(state.resolver.clone());
    Ok(Json(controller.estado_fuentes()))
}

async fn activar_fuente(
    State(state): State<AppState>,
    Path(nombre): Path<String>,
    Json(request): Json<ActivarFuenteRequest>,
) -> Result<Json<Vec<EstadoFuente>>, AppError> {
    let controller = LookupController::new(state.resolver.clone());
    Ok(Json(controller.set_fuente_activa(&nombre, request.activa)?))
}

async fn reset_cuotas(
    State(state): State<AppState>,
) -> Result<Json<Vec<EstadoFuente>>, AppError> {
    let controller = LookupController::new(state.resolver.clone());
    Ok(Json(controller.reset_cuotas()))
}
