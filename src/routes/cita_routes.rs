use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::cita_controller::CitaController;
use crate::dto::cita_dto::{ConfirmacionCita, ListarCitasQuery};
use crate::dto::ApiResponse;
use crate::models::cita::{ActualizarCita, Cita, NuevaCita, RangoFechas};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_cita_router() -> Router<AppState> {
    Router::new()
        .route("/", post(crear_cita))
        .route("/", get(listar_citas))
        .route("/:id", put(actualizar_cita))
        .route("/:id", delete(eliminar_cita))
        .route("/:id/confirmar", post(confirmar_cita))
}

async fn listar_citas(
    State(state): State<AppState>,
    Query(query): Query<ListarCitasQuery>,
) -> Result<Json<Vec<Cita>>, AppError> {
    let controller = CitaController::new(state.storage.clone());
    let citas = controller
        .listar(RangoFechas {
            desde: query.desde,
            hasta: query.hasta,
        })
        .await?;
    Ok(Json(citas))
}

async fn crear_cita(
    State(state): State<AppState>,
    Json(request): Json<NuevaCita>,
) -> Result<Json<ApiResponse<Cita>>, AppError> {
    let controller = CitaController::new(state.storage.clone());
    let cita = controller.crear(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        cita,
        "Cita agendada exitosamente".to_string(),
    )))
}

async fn actualizar_cita(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ActualizarCita>,
) -> Result<Json<ApiResponse<Cita>>, AppError> {
    let controller = CitaController::new(state.storage.clone());
    let cita = controller.actualizar(id, request).await?;
    Ok(Json(ApiResponse::success(cita)))
}

async fn eliminar_cita(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = CitaController::new(state.storage.clone());
    controller.eliminar(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Cita eliminada exitosamente"
    })))
}

/// Confirmar convierte la cita en orden de trabajo
async fn confirmar_cita(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ConfirmacionCita>>, AppError> {
    let controller = CitaController::new(state.storage.clone());
    let resultado = controller.confirmar(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        resultado,
        "Cita confirmada y orden creada".to_string(),
    )))
}
