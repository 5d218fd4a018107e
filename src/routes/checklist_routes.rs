use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::checklist_controller::ChecklistController;
use crate::dto::checklist_dto::RevisarChecklistRequest;
use crate::dto::ApiResponse;
use crate::models::checklist::{Checklist, GuardarChecklist};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_checklist_router() -> Router<AppState> {
    Router::new()
        .route("/", post(guardar_checklist))
        .route("/orden/:orden_id", get(obtener_por_orden))
        .route("/:id/revisar", post(revisar_checklist))
}

/// El checklist de una orden puede no existir todavía: `null`, no 404
async fn obtener_por_orden(
    State(state): State<AppState>,
    Path(orden_id): Path<i64>,
) -> Result<Json<Option<Checklist>>, AppError> {
    let controller = ChecklistController::new(state.storage.clone());
    Ok(Json(controller.obtener_por_orden(orden_id).await?))
}

async fn guardar_checklist(
    State(state): State<AppState>,
    Json(request): Json<GuardarChecklist>,
) -> Result<Json<ApiResponse<Checklist>>, AppError> {
    let controller = ChecklistController::new(state.storage.clone());
    let checklist = controller.guardar(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        checklist,
        "Checklist guardado exitosamente".to_string(),
    )))
}

async fn revisar_checklist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RevisarChecklistRequest>,
) -> Result<Json<ApiResponse<Checklist>>, AppError> {
    let controller = ChecklistController::new(state.storage.clone());
    let checklist = controller.confirmar_revision(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        checklist,
        "Revisión de ingreso confirmada".to_string(),
    )))
}
