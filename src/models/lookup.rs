//! Forma canónica de los datos de vehículo resueltos externamente
//!
//! Cada fuente responde con su propio formato; el motor de resolución
//! normaliza todas las respuestas a este shape único.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatosVehiculo {
    /// Nombre de la fuente que respondió
    pub fuente: String,
    pub patente: String,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub anio: Option<i32>,
    pub motor: Option<String>,
}
