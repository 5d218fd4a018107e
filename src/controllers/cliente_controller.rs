use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::models::cliente::{
    ActualizarCliente, Cliente, ClienteConEstadisticas, NuevoCliente,
};
use crate::storage::Storage;
use crate::utils::errors::{conflict_error, AppError, AppResult};
use crate::utils::validation::{canonicalizar_telefono, validar_rut};

pub struct ClienteController {
    storage: Arc<dyn Storage>,
}

impl ClienteController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Buscar por RUT; `None` cuando no existe, nunca error
    pub async fn buscar_por_rut(&self, rut: &str) -> AppResult<Option<Cliente>> {
        self.storage.buscar_cliente_por_rut(rut).await
    }

    pub async fn listar(&self, consulta: Option<String>) -> AppResult<Vec<ClienteConEstadisticas>> {
        self.storage.listar_clientes(consulta).await
    }

    pub async fn crear(&self, mut nuevo: NuevoCliente) -> AppResult<Cliente> {
        nuevo.validate()?;

        if let Some(rut) = &nuevo.rut {
            validar_rut(rut)
                .map_err(|_| AppError::BadRequest(format!("RUT inválido: '{}'", rut)))?;
            if self.storage.buscar_cliente_por_rut(rut).await?.is_some() {
                return Err(conflict_error("un cliente", "RUT", rut));
            }
        }
        nuevo.telefono = nuevo.telefono.map(|t| canonicalizar_telefono(&t));

        self.storage.crear_cliente(nuevo).await
    }

    pub async fn actualizar(&self, id: Uuid, mut cambios: ActualizarCliente) -> AppResult<Cliente> {
        cambios.telefono = cambios
            .telefono
            .map(|o| o.map(|t| canonicalizar_telefono(&t)));
        self.storage
            .actualizar_cliente(id, cambios)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cliente {} no encontrado", id)))
    }
}
