use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::staff_controller::StaffController;
use crate::dto::ApiResponse;
use crate::models::staff::{ActualizarStaff, PerfilStaff};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_staff_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_personal))
        .route("/:id", get(obtener_staff))
        .route("/:id", put(actualizar_staff))
}

async fn listar_personal(
    State(state): State<AppState>,
) -> Result<Json<Vec<PerfilStaff>>, AppError> {
    let controller = StaffController::new(state.storage.clone());
    Ok(Json(controller.listar().await?))
}

async fn obtener_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PerfilStaff>, AppError> {
    let controller = StaffController::new(state.storage.clone());
    Ok(Json(controller.obtener(id).await?))
}

async fn actualizar_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActualizarStaff>,
) -> Result<Json<ApiResponse<PerfilStaff>>, AppError> {
    let controller = StaffController::new(state.storage.clone());
    let perfil = controller.actualizar(id, request).await?;
    Ok(Json(ApiResponse::success(perfil)))
}
