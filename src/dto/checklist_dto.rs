use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Sub-ficha de salida opcional al confirmar la revisión de ingreso
#[derive(Debug, Clone, Deserialize)]
pub struct SalidaChecklistRequest {
    pub kilometraje: Option<i64>,
    pub nivel_combustible: Option<Decimal>,
    pub observaciones: Option<String>,
    #[serde(default)]
    pub fotos: HashMap<String, String>,
}

/// Payload de confirmación de revisión del checklist de ingreso
#[derive(Debug, Default, Deserialize)]
pub struct RevisarChecklistRequest {
    /// Bypass autorizado de las fotos obligatorias
    pub omitir_fotos: Option<bool>,
    pub salida: Option<SalidaChecklistRequest>,
}
