//! Modelo de PerfilStaff
//!
//! Solo se usa como destino de lookup para mostrar asignaciones.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::doble_opcion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolStaff {
    Admin,
    Mecanico,
}

impl RolStaff {
    pub fn as_str(&self) -> &'static str {
        match self {
            RolStaff::Admin => "admin",
            RolStaff::Mecanico => "mecanico",
        }
    }
}

impl std::str::FromStr for RolStaff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(RolStaff::Admin),
            "mecanico" => Ok(RolStaff::Mecanico),
            otro => Err(format!("rol desconocido: {}", otro)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfilStaff {
    pub id: Uuid,
    pub nombre_completo: String,
    pub rol: RolStaff,
    pub activo: bool,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarStaff {
    pub nombre_completo: Option<String>,
    pub rol: Option<RolStaff>,
    pub activo: Option<bool>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub email: Option<Option<String>>,
}
