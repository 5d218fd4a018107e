use serde::Deserialize;

/// Payload para activar/desactivar una fuente de consulta
#[derive(Debug, Deserialize)]
pub struct ActivarFuenteRequest {
    pub activa: bool,
}
