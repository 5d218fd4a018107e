//! Modelo de Cliente
//!
//! El cliente es el dueño fuerte de sus vehículos; el vehículo guarda
//! la referencia débil de vuelta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::doble_opcion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoCliente {
    Persona,
    Empresa,
}

impl TipoCliente {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoCliente::Persona => "persona",
            TipoCliente::Empresa => "empresa",
        }
    }
}

impl std::str::FromStr for TipoCliente {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "persona" => Ok(TipoCliente::Persona),
            "empresa" => Ok(TipoCliente::Empresa),
            otro => Err(format!("tipo de cliente desconocido: {}", otro)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliente {
    pub id: Uuid,
    pub nombre_completo: String,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub rut: Option<String>,
    pub tipo: TipoCliente,
    pub direccion: Option<String>,
    pub notas: Option<String>,
    pub creado_en: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NuevoCliente {
    #[validate(length(min = 1, max = 200))]
    pub nombre_completo: String,

    pub telefono: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub rut: Option<String>,
    pub tipo: Option<TipoCliente>,
    pub direccion: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarCliente {
    pub nombre_completo: Option<String>,
    pub tipo: Option<TipoCliente>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub telefono: Option<Option<String>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub email: Option<Option<String>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub direccion: Option<Option<String>>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub notas: Option<Option<String>>,
}

/// Cliente enriquecido con estadísticas para el listado
#[derive(Debug, Clone, Serialize)]
pub struct ClienteConEstadisticas {
    #[serde(flatten)]
    pub cliente: Cliente,
    pub cantidad_vehiculos: i64,
    pub cantidad_ordenes: i64,
    pub ultima_visita: Option<DateTime<Utc>>,
}
