use serde::Deserialize;

/// Query params del listado/búsqueda de clientes
#[derive(Debug, Default, Deserialize)]
pub struct ListarClientesQuery {
    /// Busca por nombre, RUT o email
    pub q: Option<String>,
}
