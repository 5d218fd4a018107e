//! Controllers
//!
//! Orquestación por entidad sobre el adaptador de persistencia. Acá vive
//! la validación de negocio que los stores se niegan a hacer: suma de
//! pagos contra el total, fotos obligatorias del checklist, conflictos de
//! patente/RUT duplicados y el flujo de confirmación de citas.

pub mod checklist_controller;
pub mod cita_controller;
pub mod cliente_controller;
pub mod lookup_controller;
pub mod orden_controller;
pub mod staff_controller;
pub mod vehiculo_controller;

use std::sync::Arc;

use crate::models::vehiculo::NuevoVehiculo;
use crate::storage::Storage;
use crate::utils::errors::AppResult;
use crate::utils::validation::normalizar_patente;

/// Crear el vehículo mínimo si la patente nunca se vio antes.
///
/// El primer avistamiento de una patente (al crear una orden o confirmar
/// una cita) registra el vehículo; los stores no lo hacen solos.
pub(crate) async fn asegurar_vehiculo(
    storage: &Arc<dyn Storage>,
    patente: &str,
    cliente_id: Option<uuid::Uuid>,
) -> AppResult<()> {
    let clave = normalizar_patente(patente);
    if storage.buscar_vehiculo_por_patente(&clave).await?.is_some() {
        return Ok(());
    }
    storage
        .crear_vehiculo(NuevoVehiculo {
            patente: clave,
            marca: None,
            modelo: None,
            anio: None,
            motor: None,
            color: None,
            cliente_id,
        })
        .await?;
    Ok(())
}
