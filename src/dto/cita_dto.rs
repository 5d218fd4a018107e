use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::cita::Cita;
use crate::models::orden::OrdenTrabajo;

/// Query params del listado de citas
#[derive(Debug, Default, Deserialize)]
pub struct ListarCitasQuery {
    pub desde: Option<DateTime<Utc>>,
    pub hasta: Option<DateTime<Utc>>,
}

/// Resultado de confirmar una cita: la cita confirmada y la orden creada
#[derive(Debug, Serialize)]
pub struct ConfirmacionCita {
    pub cita: Cita,
    pub orden: OrdenTrabajo,
}
