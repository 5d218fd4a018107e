use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::cliente_controller::ClienteController;
use crate::dto::cliente_dto::ListarClientesQuery;
use crate::dto::ApiResponse;
use crate::models::cliente::{ActualizarCliente, Cliente, ClienteConEstadisticas, NuevoCliente};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_cliente_router() -> Router<AppState> {
    Router::new()
        .route("/", post(crear_cliente))
        .route("/", get(listar_clientes))
        .route("/rut/:rut", get(buscar_por_rut))
        .route("/:id", put(actualizar_cliente))
}

async fn listar_clientes(
    State(state): State<AppState>,
    Query(query): Query<ListarClientesQuery>,
) -> Result<Json<Vec<ClienteConEstadisticas>>, AppError> {
    let controller = ClienteController::new(state.storage.clone());
    Ok(Json(controller.listar(query.q).await?))
}

/// La búsqueda por RUT devuelve `null` cuando no existe
async fn buscar_por_rut(
    State(state): State<AppState>,
    Path(rut): Path<String>,
) -> Result<Json<Option<Cliente>>, AppError> {
    let controller = ClienteController::new(state.storage.clone());
    Ok(Json(controller.buscar_por_rut(&rut).await?))
}

async fn crear_cliente(
    State(state): State<AppState>,
    Json(request): Json<NuevoCliente>,
) -> Result<Json<ApiResponse<Cliente>>, AppError> {
    let controller = ClienteController::new(state.storage.clone());
    let cliente = controller.crear(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        cliente,
        "Cliente registrado exitosamente".to_string(),
    )))
}

async fn actualizar_cliente(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActualizarCliente>,
) -> Result<Json<ApiResponse<Cliente>>, AppError> {
    let controller = ClienteController::new(state.storage.clone());
    let cliente = controller.actualizar(id, request).await?;
    Ok(Json(ApiResponse::success(cliente)))
}
