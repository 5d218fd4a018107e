use std::sync::Arc;

use chrono::Utc;

use crate::dto::checklist_dto::RevisarChecklistRequest;
use crate::models::checklist::{
    ActualizarChecklist, Checklist, ChecklistSalida, GuardarChecklist, FOTOS_OBLIGATORIAS,
};
use crate::storage::Storage;
use crate::utils::errors::{AppError, AppResult};

pub struct ChecklistController {
    storage: Arc<dyn Storage>,
}

impl ChecklistController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Checklist de una orden; `None` si todavía no se creó
    pub async fn obtener_por_orden(&self, orden_id: i64) -> AppResult<Option<Checklist>> {
        self.storage.obtener_checklist_por_orden(orden_id).await
    }

    pub async fn guardar(&self, datos: GuardarChecklist) -> AppResult<Checklist> {
        // El store acepta cualquier orden_id; acá sí exigimos que la
        // orden exista antes de colgarle un checklist
        if self.storage.obtener_orden(datos.orden_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Orden {} no encontrada",
                datos.orden_id
            )));
        }
        self.storage.guardar_checklist(datos).await
    }

    /// Confirmar la revisión del checklist de ingreso.
    ///
    /// Las fotos de nivel de combustible y kilometraje son obligatorias,
    /// salvo bypass autorizado (en el registro o en el request).
    pub async fn confirmar_revision(
        &self,
        checklist_id: i64,
        request: RevisarChecklistRequest,
    ) -> AppResult<Checklist> {
        let checklist = self
            .storage
            .obtener_checklist(checklist_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Checklist {} no encontrado", checklist_id))
            })?;

        let bypass = request.omitir_fotos.unwrap_or(checklist.omitir_fotos);
        if !bypass {
            let faltantes: Vec<&str> = FOTOS_OBLIGATORIAS
                .iter()
                .copied()
                .filter(|campo| !checklist.fotos.contains_key(*campo))
                .collect();
            if !faltantes.is_empty() {
                return Err(AppError::BadRequest(format!(
                    "Faltan fotos obligatorias antes de marcar revisado: {}",
                    faltantes.join(", ")
                )));
            }
        }

        let salida = request.salida.map(|s| ChecklistSalida {
            kilometraje: s.kilometraje,
            nivel_combustible: s.nivel_combustible,
            observaciones: s.observaciones,
            fotos: s.fotos,
            fecha: Utc::now(),
        });

        self.storage
            .actualizar_checklist(
                checklist_id,
                ActualizarChecklist {
                    revisado: Some(true),
                    omitir_fotos: request.omitir_fotos,
                    checklist_salida: salida,
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Checklist {} no encontrado", checklist_id))
            })
    }
}
