use std::sync::Arc;

use validator::Validate;

use crate::dto::cita_dto::ConfirmacionCita;
use crate::models::cita::{ActualizarCita, Cita, EstadoCita, NuevaCita, RangoFechas};
use crate::models::orden::NuevaOrden;
use crate::storage::Storage;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::canonicalizar_telefono;

use super::asegurar_vehiculo;

pub struct CitaController {
    storage: Arc<dyn Storage>,
}

impl CitaController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn listar(&self, rango: RangoFechas) -> AppResult<Vec<Cita>> {
        self.storage.listar_citas(rango).await
    }

    pub async fn crear(&self, mut nueva: NuevaCita) -> AppResult<Cita> {
        nueva.validate()?;
        if nueva.fin <= nueva.inicio {
            return Err(AppError::BadRequest(
                "El fin de la cita debe ser posterior al inicio".to_string(),
            ));
        }
        nueva.telefono_cliente = nueva
            .telefono_cliente
            .map(|t| canonicalizar_telefono(&t));
        self.storage.crear_cita(nueva).await
    }

    pub async fn actualizar(&self, id: i64, mut cambios: ActualizarCita) -> AppResult<Cita> {
        cambios.telefono_cliente = cambios
            .telefono_cliente
            .map(|o| o.map(|t| canonicalizar_telefono(&t)));
        self.storage
            .actualizar_cita(id, cambios)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cita {} no encontrada", id)))
    }

    pub async fn eliminar(&self, id: i64) -> AppResult<()> {
        if !self.storage.eliminar_cita(id).await? {
            return Err(AppError::NotFound(format!("Cita {} no encontrada", id)));
        }
        Ok(())
    }

    /// Confirmar una cita: crea la orden de trabajo copiando patente y
    /// datos del cliente, y deja la cita en estado confirmada. Cita y
    /// orden siguen siendo registros separados.
    pub async fn confirmar(&self, id: i64) -> AppResult<ConfirmacionCita> {
        let cita = self
            .storage
            .obtener_cita(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cita {} no encontrada", id)))?;

        if cita.estado == EstadoCita::Confirmada {
            return Err(AppError::Conflict(format!("La cita {} ya fue confirmada", id)));
        }
        if cita.estado == EstadoCita::Cancelada {
            return Err(AppError::Conflict(format!(
                "La cita {} está cancelada y no puede confirmarse",
                id
            )));
        }

        let Some(patente) = cita.patente_vehiculo.clone() else {
            return Err(AppError::BadRequest(format!(
                "La cita {} no tiene patente asociada; registre el vehículo primero",
                id
            )));
        };

        asegurar_vehiculo(&self.storage, &patente, None).await?;

        let orden = self
            .storage
            .crear_orden(NuevaOrden {
                patente_vehiculo: patente,
                descripcion_ingreso: cita.servicio_solicitado.clone(),
                creado_por: cita.creado_por.clone(),
                estado: None,
                mecanico_asignado: None,
                precio_total: None,
                fotos: None,
                metodos_pago: None,
                nombre_cliente: Some(cita.nombre_cliente.clone()),
                telefono_cliente: cita.telefono_cliente.clone(),
            })
            .await?;

        let cita = self
            .storage
            .actualizar_cita(
                id,
                ActualizarCita {
                    estado: Some(EstadoCita::Confirmada),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cita {} no encontrada", id)))?;

        Ok(ConfirmacionCita { cita, orden })
    }
}
