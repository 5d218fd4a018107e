//! Modelo de Vehiculo
//!
//! La patente normalizada es la clave natural del vehículo. El vínculo
//! con el cliente dueño es una referencia débil: editar o borrar al
//! cliente no arrastra reescrituras sobre el vehículo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::doble_opcion;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehiculo {
    pub patente: String,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub anio: Option<i32>,
    pub motor: Option<String>,
    pub color: Option<String>,
    pub cliente_id: Option<Uuid>,
    pub creado_en: DateTime<Utc>,
}

/// Datos para registrar un vehículo nuevo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NuevoVehiculo {
    #[validate(length(min = 1, max = 12))]
    pub patente: String,

    #[validate(length(max = 100))]
    pub marca: Option<String>,

    #[validate(length(max = 100))]
    pub modelo: Option<String>,

    #[validate(range(min = 1900, max = 2035))]
    pub anio: Option<i32>,

    pub motor: Option<String>,
    pub color: Option<String>,
    pub cliente_id: Option<Uuid>,
}

/// Patch de actualización de un vehículo.
///
/// `cliente_id` admite `null` explícito para desvincular al dueño.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarVehiculo {
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub anio: Option<i32>,
    pub motor: Option<String>,
    pub color: Option<String>,

    #[serde(default, deserialize_with = "doble_opcion")]
    pub cliente_id: Option<Option<Uuid>>,
}
