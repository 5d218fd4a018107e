use std::sync::Arc;

use uuid::Uuid;

use crate::models::staff::{ActualizarStaff, PerfilStaff};
use crate::storage::Storage;
use crate::utils::errors::{AppError, AppResult};

pub struct StaffController {
    storage: Arc<dyn Storage>,
}

impl StaffController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn listar(&self) -> AppResult<Vec<PerfilStaff>> {
        self.storage.listar_personal().await
    }

    pub async fn obtener(&self, id: Uuid) -> AppResult<PerfilStaff> {
        self.storage
            .obtener_staff(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Perfil {} no encontrado", id)))
    }

    pub async fn actualizar(&self, id: Uuid, cambios: ActualizarStaff) -> AppResult<PerfilStaff> {
        self.storage
            .actualizar_staff(id, cambios)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Perfil {} no encontrado", id)))
    }
}
