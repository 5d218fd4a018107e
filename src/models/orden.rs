//! Modelo de OrdenTrabajo
//!
//! Una orden referencia vehículo, cliente y mecánico por clave natural u
//! opaca, nunca por incrustación, de modo que cada uno puede editarse sin
//! reescrituras en cascada. Los campos de cliente presentes acá son
//! desnormalizados al momento de crear la orden.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::doble_opcion;

/// Estado de una orden de trabajo
///
/// `Agendada` es un pseudo-estado legado: nunca se persiste en una orden,
/// solo aparece cuando una cita se proyecta dentro del listado de órdenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstadoOrden {
    Pendiente,
    EnProceso,
    Lista,
    Completada,
    Cancelada,
    Agendada,
}

impl EstadoOrden {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoOrden::Pendiente => "pendiente",
            EstadoOrden::EnProceso => "en_proceso",
            EstadoOrden::Lista => "lista",
            EstadoOrden::Completada => "completada",
            EstadoOrden::Cancelada => "cancelada",
            EstadoOrden::Agendada => "agendada",
        }
    }
}

impl std::str::FromStr for EstadoOrden {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(EstadoOrden::Pendiente),
            "en_proceso" => Ok(EstadoOrden::EnProceso),
            "lista" => Ok(EstadoOrden::Lista),
            "completada" => Ok(EstadoOrden::Completada),
            "cancelada" => Ok(EstadoOrden::Cancelada),
            "agendada" => Ok(EstadoOrden::Agendada),
            otro => Err(format!("estado de orden desconocido: {}", otro)),
        }
    }
}

/// Desglose de pago de una orden
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetodoPago {
    pub metodo: String,
    pub monto: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdenTrabajo {
    pub id: i64,
    pub patente_vehiculo: String,
    pub descripcion_ingreso: String,
    pub estado: EstadoOrden,
    pub mecanico_asignado: Option<Uuid>,
    pub creado_por: String,
    pub precio_total: Option<Decimal>,
    pub fotos: Vec<String>,
    pub metodos_pago: Vec<MetodoPago>,
    pub nombre_cliente: Option<String>,
    pub telefono_cliente: Option<String>,
    pub fecha_ingreso: DateTime<Utc>,
    pub fecha_lista: Option<DateTime<Utc>>,
    pub fecha_entrega: Option<DateTime<Utc>>,
    pub fecha_completada: Option<DateTime<Utc>>,
}

/// Datos de ingreso de una orden nueva
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NuevaOrden {
    #[validate(length(min = 1, max = 12))]
    pub patente_vehiculo: String,

    #[validate(length(min = 1, max = 2000))]
    pub descripcion_ingreso: String,

    #[validate(length(min = 1, max = 100))]
    pub creado_por: String,

    pub estado: Option<EstadoOrden>,
    pub mecanico_asignado: Option<Uuid>,
    pub precio_total: Option<Decimal>,
    pub fotos: Option<Vec<String>>,
    pub metodos_pago: Option<Vec<MetodoPago>>,
    pub nombre_cliente: Option<String>,
    pub telefono_cliente: Option<String>,
}

/// Patch de actualización de una orden.
///
/// Los campos con doble `Option` aceptan `null` explícito para limpiar el
/// valor guardado; el store persiste exactamente lo que recibe. Revertir
/// una orden completada a pendiente exige mandar los `fecha_*` en `null`,
/// no hay limpieza implícita.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarOrden {
    pub descripcion_ingreso: Option<String>,
    pub estado: Option<EstadoOrden>,
    pub fotos: Option<Vec<String>>,
    pub metodos_pago: Option<Vec<MetodoPago>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub mecanico_asignado: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub precio_total: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub nombre_cliente: Option<Option<String>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub telefono_cliente: Option<Option<String>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub fecha_lista: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub fecha_entrega: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub fecha_completada: Option<Option<DateTime<Utc>>>,
}

/// Filtros para el listado de órdenes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroOrdenes {
    pub estado: Option<EstadoOrden>,
    pub patente: Option<String>,
}
