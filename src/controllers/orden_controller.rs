use std::sync::Arc;

use rust_decimal::Decimal;
use validator::Validate;

use crate::dto::orden_dto::ListarOrdenesQuery;
use crate::models::cita::{Cita, EstadoCita, RangoFechas};
use crate::models::orden::{
    ActualizarOrden, EstadoOrden, FiltroOrdenes, MetodoPago, NuevaOrden, OrdenTrabajo,
};
use crate::storage::Storage;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::canonicalizar_telefono;

use super::asegurar_vehiculo;

pub struct OrdenController {
    storage: Arc<dyn Storage>,
}

/// Chequear que el desglose de pagos cierre contra el total.
///
/// Solo aplica cuando hay métodos de pago cargados; el store persiste lo
/// que le den, esta validación es responsabilidad del caller.
fn validar_suma_pagos(metodos: &[MetodoPago], precio_total: Option<Decimal>) -> AppResult<()> {
    if metodos.is_empty() {
        return Ok(());
    }
    let Some(total) = precio_total else {
        return Err(AppError::BadRequest(
            "No se pueden cargar métodos de pago sin precio total".to_string(),
        ));
    };
    let suma: Decimal = metodos.iter().map(|m| m.monto).sum();
    if suma != total {
        return Err(AppError::BadRequest(format!(
            "La suma de los métodos de pago ({}) no coincide con el precio total ({})",
            suma, total
        )));
    }
    Ok(())
}

fn validar_precio(precio: Option<Decimal>) -> AppResult<()> {
    if let Some(p) = precio {
        if p < Decimal::ZERO {
            return Err(AppError::BadRequest(
                "El precio total no puede ser negativo".to_string(),
            ));
        }
    }
    Ok(())
}

/// Proyectar una cita vigente como pseudo-orden "agendada".
///
/// El id sintético negativo garantiza que nunca colisione con el id
/// monotónico de una orden real.
fn proyectar_cita(cita: Cita) -> OrdenTrabajo {
    OrdenTrabajo {
        id: -cita.id,
        patente_vehiculo: cita.patente_vehiculo.unwrap_or_default(),
        descripcion_ingreso: cita.servicio_solicitado,
        estado: EstadoOrden::Agendada,
        mecanico_asignado: None,
        creado_por: cita.creado_por,
        precio_total: None,
        fotos: Vec::new(),
        metodos_pago: Vec::new(),
        nombre_cliente: Some(cita.nombre_cliente),
        telefono_cliente: cita.telefono_cliente,
        fecha_ingreso: cita.inicio,
        fecha_lista: None,
        fecha_entrega: None,
        fecha_completada: None,
    }
}

impl OrdenController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn listar(&self, query: ListarOrdenesQuery) -> AppResult<Vec<OrdenTrabajo>> {
        let solo_citas = query.estado == Some(EstadoOrden::Agendada);
        let mut ordenes = if solo_citas {
            Vec::new()
        } else {
            self.storage
                .listar_ordenes(FiltroOrdenes {
                    estado: query.estado,
                    patente: query.patente.clone(),
                })
                .await?
        };

        if query.incluir_citas.unwrap_or(false) || solo_citas {
            let citas = self.storage.listar_citas(RangoFechas::default()).await?;
            ordenes.extend(
                citas
                    .into_iter()
                    .filter(|c| {
                        matches!(c.estado, EstadoCita::Pendiente | EstadoCita::Confirmada)
                    })
                    .map(proyectar_cita),
            );
        }

        Ok(ordenes)
    }

    pub async fn obtener(&self, id: i64) -> AppResult<OrdenTrabajo> {
        self.storage
            .obtener_orden(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Orden {} no encontrada", id)))
    }

    pub async fn crear(&self, mut nueva: NuevaOrden) -> AppResult<OrdenTrabajo> {
        nueva.validate()?;
        validar_precio(nueva.precio_total)?;
        validar_suma_pagos(
            nueva.metodos_pago.as_deref().unwrap_or_default(),
            nueva.precio_total,
        )?;

        nueva.telefono_cliente = nueva
            .telefono_cliente
            .map(|t| canonicalizar_telefono(&t));

        asegurar_vehiculo(&self.storage, &nueva.patente_vehiculo, None).await?;
        self.storage.crear_orden(nueva).await
    }

    pub async fn actualizar(&self, id: i64, mut cambios: ActualizarOrden) -> AppResult<OrdenTrabajo> {
        let actual = self.obtener(id).await?;

        // El precio y los métodos efectivos después del patch deciden si
        // el invariante de suma aplica
        let precio_efectivo = match cambios.precio_total {
            Some(valor) => valor,
            None => actual.precio_total,
        };
        validar_precio(precio_efectivo)?;
        let metodos_efectivos = cambios
            .metodos_pago
            .as_deref()
            .unwrap_or(&actual.metodos_pago);
        validar_suma_pagos(metodos_efectivos, precio_efectivo)?;

        cambios.telefono_cliente = cambios
            .telefono_cliente
            .map(|o| o.map(|t| canonicalizar_telefono(&t)));

        self.storage
            .actualizar_orden(id, cambios)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Orden {} no encontrada", id)))
    }

    /// Borrar una orden: por defecto archiva (estado -> cancelada); con
    /// `fisico` elimina el registro y su checklist.
    pub async fn eliminar(&self, id: i64, fisico: bool) -> AppResult<()> {
        if fisico {
            if !self.storage.eliminar_orden(id).await? {
                return Err(AppError::NotFound(format!("Orden {} no encontrada", id)));
            }
            return Ok(());
        }

        self.storage
            .actualizar_orden(
                id,
                ActualizarOrden {
                    estado: Some(EstadoOrden::Cancelada),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Orden {} no encontrada", id)))?;
        Ok(())
    }
}
