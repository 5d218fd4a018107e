//! Modelo de Cita
//!
//! Al confirmar una cita se crea una orden de trabajo nueva copiando
//! patente y datos del cliente; ambas entidades siguen siendo registros
//! distintos, vinculados solo por esos campos copiados.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::doble_opcion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstadoCita {
    Pendiente,
    Confirmada,
    Completada,
    Cancelada,
}

impl EstadoCita {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoCita::Pendiente => "pendiente",
            EstadoCita::Confirmada => "confirmada",
            EstadoCita::Completada => "completada",
            EstadoCita::Cancelada => "cancelada",
        }
    }
}

impl std::str::FromStr for EstadoCita {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(EstadoCita::Pendiente),
            "confirmada" => Ok(EstadoCita::Confirmada),
            "completada" => Ok(EstadoCita::Completada),
            "cancelada" => Ok(EstadoCita::Cancelada),
            otro => Err(format!("estado de cita desconocido: {}", otro)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cita {
    pub id: i64,
    pub inicio: DateTime<Utc>,
    pub fin: DateTime<Utc>,
    pub nombre_cliente: String,
    pub telefono_cliente: Option<String>,
    pub patente_vehiculo: Option<String>,
    pub servicio_solicitado: String,
    pub estado: EstadoCita,
    pub creado_por: String,
    pub creado_en: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NuevaCita {
    pub inicio: DateTime<Utc>,
    pub fin: DateTime<Utc>,

    #[validate(length(min = 1, max = 200))]
    pub nombre_cliente: String,

    pub telefono_cliente: Option<String>,
    pub patente_vehiculo: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub servicio_solicitado: String,

    #[validate(length(min = 1, max = 100))]
    pub creado_por: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarCita {
    pub inicio: Option<DateTime<Utc>>,
    pub fin: Option<DateTime<Utc>>,
    pub nombre_cliente: Option<String>,
    pub servicio_solicitado: Option<String>,
    pub estado: Option<EstadoCita>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub telefono_cliente: Option<Option<String>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub patente_vehiculo: Option<Option<String>>,
}

/// Rango opcional de fechas para el listado de citas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangoFechas {
    pub desde: Option<DateTime<Utc>>,
    pub hasta: Option<DateTime<Utc>>,
}
