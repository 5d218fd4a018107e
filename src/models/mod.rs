//! Modelos del sistema
//!
//! Este módulo contiene las entidades del dominio y los structs tipados
//! de creación/actualización que consumen los dos backends de persistencia.

pub mod checklist;
pub mod cita;
pub mod cliente;
pub mod lookup;
pub mod orden;
pub mod staff;
pub mod vehiculo;

use serde::{Deserialize, Deserializer};

/// Deserializador para campos "limpiables" de un patch.
///
/// Distingue tres casos en el JSON de entrada:
/// - campo ausente  -> `None`            (no tocar)
/// - campo `null`   -> `Some(None)`      (limpiar el valor guardado)
/// - campo presente -> `Some(Some(v))`   (reemplazar)
///
/// Debe usarse junto con `#[serde(default)]` para que la ausencia
/// del campo no sea un error.
pub fn doble_opcion<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
