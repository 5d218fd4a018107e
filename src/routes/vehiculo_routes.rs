use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::vehiculo_controller::VehiculoController;
use crate::dto::ApiResponse;
use crate::models::vehiculo::{ActualizarVehiculo, NuevoVehiculo, Vehiculo};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_vehiculo_router() -> Router<AppState> {
    Router::new()
        .route("/", post(crear_vehiculo))
        .route("/", get(listar_vehiculos))
        .route("/:patente", get(buscar_vehiculo))
        .route("/:patente", put(actualizar_vehiculo))
}

/// La búsqueda por patente devuelve `null` cuando no existe: el caller
/// usa chequeo de presencia, no manejo de errores.
async fn buscar_vehiculo(
    State(state): State<AppState>,
    Path(patente): Path<String>,
) -> Result<Json<Option<Vehiculo>>, AppError> {
    let controller = VehiculoController::new(state.storage.clone());
    Ok(Json(controller.buscar(&patente).await?))
}

async fn listar_vehiculos(
    State(state): State<AppState>,
) -> Result<Json<Vec<Vehiculo>>, AppError> {
    let controller = VehiculoController::new(state.storage.clone());
    Ok(Json(controller.listar().await?))
}

async fn crear_vehiculo(
    State(state): State<AppState>,
    Json(request): Json<NuevoVehiculo>,
) -> Result<Json<ApiResponse<Vehiculo>>, AppError> {
    let controller = VehiculoController::new(state.storage.clone());
    let vehiculo = controller.crear(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        vehiculo,
        "Vehículo registrado exitosamente".to_string(),
    )))
}

async fn actualizar_vehiculo(
    State(state): State<AppState>,
    Path(patente): Path<String>,
    Json(request): Json<ActualizarVehiculo>,
) -> Result<Json<ApiResponse<Vehiculo>>, AppError> {
    let controller = VehiculoController::new(state.storage.clone());
    let vehiculo = controller.actualizar(&patente, request).await?;
    Ok(Json(ApiResponse::success(vehiculo)))
}
