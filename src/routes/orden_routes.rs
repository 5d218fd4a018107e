use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::orden_controller::OrdenController;
use crate::dto::orden_dto::{EliminarOrdenQuery, ListarOrdenesQuery};
use crate::dto::ApiResponse;
use crate::models::orden::{ActualizarOrden, NuevaOrden, OrdenTrabajo};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_orden_router() -> Router<AppState> {
    Router::new()
        .route("/", post(crear_orden))
        .route("/", get(listar_ordenes))
        .route("/:id", get(obtener_orden))
        .route("/:id", put(actualizar_orden))
        .route("/:id", delete(eliminar_orden))
}

async fn listar_ordenes(
    State(state): State<AppState>,
    Query(query): Query<ListarOrdenesQuery>,
) -> Result<Json<Vec<OrdenTrabajo>>, AppError> {
    let controller = OrdenController::new(state.storage.clone());
    Ok(Json(controller.listar(query).await?))
}

async fn obtener_orden(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrdenTrabajo>, AppError> {
    let controller = OrdenController::new(state.storage.clone());
    Ok(Json(controller.obtener(id).await?))
}

async fn crear_orden(
    State(state): State<AppState>,
    Json(request): Json<NuevaOrden>,
) -> Result<Json<ApiResponse<OrdenTrabajo>>, AppError> {
    let controller = OrdenController::new(state.storage.clone());
    let orden = controller.crear(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        orden,
        "Orden de trabajo creada exitosamente".to_string(),
    )))
}

async fn actualizar_orden(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ActualizarOrden>,
) -> Result<Json<ApiResponse<OrdenTrabajo>>, AppError> {
    let controller = OrdenController::new(state.storage.clone());
    let orden = controller.actualizar(id, request).await?;
    Ok(Json(ApiResponse::success(orden)))
}

async fn eliminar_orden(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<EliminarOrdenQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = OrdenController::new(state.storage.clone());
    controller
        .eliminar(id, query.fisico.unwrap_or(false))
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Orden eliminada exitosamente"
    })))
}
