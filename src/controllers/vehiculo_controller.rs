use std::sync::Arc;

use validator::Validate;

use crate::models::vehiculo::{ActualizarVehiculo, NuevoVehiculo, Vehiculo};
use crate::storage::Storage;
use crate::utils::errors::{conflict_error, AppError, AppResult};
use crate::utils::validation::{normalizar_patente, validar_patente};

pub struct VehiculoController {
    storage: Arc<dyn Storage>,
}

impl VehiculoController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Buscar por patente; `None` cuando no existe, nunca error
    pub async fn buscar(&self, patente: &str) -> AppResult<Option<Vehiculo>> {
        self.storage.buscar_vehiculo_por_patente(patente).await
    }

    pub async fn listar(&self) -> AppResult<Vec<Vehiculo>> {
        self.storage.listar_vehiculos().await
    }

    pub async fn crear(&self, mut nuevo: NuevoVehiculo) -> AppResult<Vehiculo> {
        nuevo.validate()?;

        let patente = normalizar_patente(&nuevo.patente);
        validar_patente(&patente)
            .map_err(|_| AppError::BadRequest(format!("Patente inválida: '{}'", nuevo.patente)))?;

        if self
            .storage
            .buscar_vehiculo_por_patente(&patente)
            .await?
            .is_some()
        {
            return Err(conflict_error("un vehículo", "patente", &patente));
        }

        nuevo.patente = patente;
        self.storage.crear_vehiculo(nuevo).await
    }

    pub async fn actualizar(
        &self,
        patente: &str,
        cambios: ActualizarVehiculo,
    ) -> AppResult<Vehiculo> {
        self.storage
            .actualizar_vehiculo(patente, cambios)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehículo {} no encontrado", patente)))
    }
}
