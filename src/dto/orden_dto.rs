use serde::Deserialize;

use crate::models::orden::EstadoOrden;

/// Query params del listado de órdenes
#[derive(Debug, Default, Deserialize)]
pub struct ListarOrdenesQuery {
    pub estado: Option<EstadoOrden>,
    pub patente: Option<String>,
    /// Proyectar las citas vigentes como pseudo-órdenes "agendada"
    pub incluir_citas: Option<bool>,
}

/// Query params del borrado de una orden
#[derive(Debug, Default, Deserialize)]
pub struct EliminarOrdenQuery {
    /// Por defecto el borrado archiva (estado -> cancelada); con
    /// `fisico=true` se elimina el registro de verdad.
    pub fisico: Option<bool>,
}
