//! Modelo de Checklist
//!
//! Registro de inspección 1:1 con la orden de trabajo, con fase de
//! ingreso y una sub-ficha de salida que se agrega más adelante en la
//! vida de la orden. Las fotos van indexadas por nombre de campo.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Campos de foto obligatorios antes de marcar revisado el ingreso,
/// salvo que la orden lleve el bypass `omitir_fotos`.
pub const FOTOS_OBLIGATORIAS: [&str; 2] = ["nivel_combustible", "kilometraje"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistSalida {
    pub kilometraje: Option<i64>,
    pub nivel_combustible: Option<Decimal>,
    pub observaciones: Option<String>,
    #[serde(default)]
    pub fotos: HashMap<String, String>,
    pub fecha: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    pub id: i64,
    pub orden_id: i64,
    pub nivel_combustible: Option<Decimal>,
    pub kilometraje: Option<i64>,
    pub luces_ok: Option<bool>,
    pub frenos_ok: Option<bool>,
    pub neumaticos_ok: Option<bool>,
    pub bateria_ok: Option<bool>,
    pub carroceria_ok: Option<bool>,
    pub observaciones: Option<String>,
    #[serde(default)]
    pub fotos: HashMap<String, String>,
    pub revisado: bool,
    pub omitir_fotos: bool,
    pub checklist_salida: Option<ChecklistSalida>,
    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

/// Payload de guardado (upsert por `orden_id`)
#[derive(Debug, Clone, Deserialize)]
pub struct GuardarChecklist {
    pub orden_id: i64,
    pub nivel_combustible: Option<Decimal>,
    pub kilometraje: Option<i64>,
    pub luces_ok: Option<bool>,
    pub frenos_ok: Option<bool>,
    pub neumaticos_ok: Option<bool>,
    pub bateria_ok: Option<bool>,
    pub carroceria_ok: Option<bool>,
    pub observaciones: Option<String>,
    pub fotos: Option<HashMap<String, String>>,
    pub omitir_fotos: Option<bool>,
}

/// Patch de actualización de un checklist existente
#[derive(Debug, Clone, Default)]
pub struct ActualizarChecklist {
    pub nivel_combustible: Option<Decimal>,
    pub kilometraje: Option<i64>,
    pub luces_ok: Option<bool>,
    pub frenos_ok: Option<bool>,
    pub neumaticos_ok: Option<bool>,
    pub bateria_ok: Option<bool>,
    pub carroceria_ok: Option<bool>,
    pub observaciones: Option<String>,
    pub fotos: Option<HashMap<String, String>>,
    pub revisado: Option<bool>,
    pub omitir_fotos: Option<bool>,
    pub checklist_salida: Option<ChecklistSalida>,
}
