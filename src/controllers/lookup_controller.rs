use std::sync::Arc;

use crate::models::lookup::DatosVehiculo;
use crate::services::plate_resolver::{EstadoFuente, PlateResolver};
use crate::utils::errors::{AppError, AppResult};

pub struct LookupController {
    resolver: Arc<PlateResolver>,
}

impl LookupController {
    pub fn new(resolver: Arc<PlateResolver>) -> Self {
        Self { resolver }
    }

    /// Resolver una patente contra la cadena de fuentes externas.
    ///
    /// El agotamiento total llega al UI como "ingrese los datos
    /// manualmente"; los fallos de fuentes individuales nunca se ven.
    pub async fn resolver(&self, patente: &str) -> AppResult<DatosVehiculo> {
        Ok(self.resolver.resolver(patente).await?)
    }

    pub fn estado_fuentes(&self) -> Vec<EstadoFuente> {
        self.resolver.estado_fuentes()
    }

    pub fn set_fuente_activa(&self, nombre: &str, activa: bool) -> AppResult<Vec<EstadoFuente>> {
        if !self.resolver.set_fuente_activa(nombre, activa) {
            return Err(AppError::NotFound(format!(
                "Fuente '{}' no configurada",
                nombre
            )));
        }
        Ok(self.resolver.estado_fuentes())
    }

    pub fn reset_cuotas(&self) -> Vec<EstadoFuente> {
        self.resolver.reset_cuotas();
        self.resolver.estado_fuentes()
    }
}
