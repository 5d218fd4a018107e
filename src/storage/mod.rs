//! Adaptador de persistencia de doble backend
//!
//! Todas las operaciones CRUD del sistema pasan por el trait [`Storage`],
//! implementado dos veces con la misma firma: [`LocalStore`] (estado en
//! memoria con snapshot JSON, el equivalente del almacenamiento local del
//! navegador) y [`RemoteStore`] (Postgres vía SQLx). El modo se resuelve
//! una sola vez al arranque a partir de la configuración; no hay cambio de
//! backend en caliente ni branching por llamada.

pub mod local;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::environment::Config;
use crate::models::checklist::{ActualizarChecklist, Checklist, GuardarChecklist};
use crate::models::cita::{ActualizarCita, Cita, NuevaCita, RangoFechas};
use crate::models::cliente::{
    ActualizarCliente, Cliente, ClienteConEstadisticas, NuevoCliente,
};
use crate::models::orden::{ActualizarOrden, FiltroOrdenes, NuevaOrden, OrdenTrabajo};
use crate::models::staff::{ActualizarStaff, PerfilStaff};
use crate::models::vehiculo::{ActualizarVehiculo, NuevoVehiculo, Vehiculo};
use crate::utils::errors::AppResult;

pub use local::LocalStore;
pub use remote::RemoteStore;

/// Backend de persistencia activo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Local,
    Remote,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Local => "local",
            StorageMode::Remote => "remote",
        }
    }
}

/// Resolver el modo de almacenamiento desde el flag de configuración.
///
/// Función pura: un valor no reconocido cae a `Local`, nunca falla.
pub fn resolve_storage_mode(valor: &str) -> StorageMode {
    match valor.trim().to_ascii_lowercase().as_str() {
        "remote" | "remoto" | "postgres" => StorageMode::Remote,
        _ => StorageMode::Local,
    }
}

/// Interfaz común de los dos backends.
///
/// Contratos que ambos respetan: las búsquedas por clave que pueden no
/// encontrar nada devuelven `Ok(None)`, nunca un error; los listados
/// devuelven copias propias, nunca el estado interno vivo; los stores
/// persisten exactamente lo que reciben, sin validar invariantes de
/// negocio (eso es responsabilidad de los controllers).
#[async_trait]
pub trait Storage: Send + Sync {
    // ------------------------------------------------------------------
    // Vehículos
    // ------------------------------------------------------------------
    async fn buscar_vehiculo_por_patente(&self, patente: &str) -> AppResult<Option<Vehiculo>>;
    async fn listar_vehiculos(&self) -> AppResult<Vec<Vehiculo>>;
    async fn crear_vehiculo(&self, datos: NuevoVehiculo) -> AppResult<Vehiculo>;
    async fn actualizar_vehiculo(
        &self,
        patente: &str,
        cambios: ActualizarVehiculo,
    ) -> AppResult<Option<Vehiculo>>;

    // ------------------------------------------------------------------
    // Órdenes de trabajo
    // ------------------------------------------------------------------
    async fn listar_ordenes(&self, filtro: FiltroOrdenes) -> AppResult<Vec<OrdenTrabajo>>;
    async fn obtener_orden(&self, id: i64) -> AppResult<Option<OrdenTrabajo>>;
    async fn crear_orden(&self, datos: NuevaOrden) -> AppResult<OrdenTrabajo>;
    async fn actualizar_orden(
        &self,
        id: i64,
        cambios: ActualizarOrden,
    ) -> AppResult<Option<OrdenTrabajo>>;
    async fn eliminar_orden(&self, id: i64) -> AppResult<bool>;

    // ------------------------------------------------------------------
    // Citas
    // ------------------------------------------------------------------
    async fn listar_citas(&self, rango: RangoFechas) -> AppResult<Vec<Cita>>;
    async fn obtener_cita(&self, id: i64) -> AppResult<Option<Cita>>;
    async fn crear_cita(&self, datos: NuevaCita) -> AppResult<Cita>;
    async fn actualizar_cita(&self, id: i64, cambios: ActualizarCita) -> AppResult<Option<Cita>>;
    async fn eliminar_cita(&self, id: i64) -> AppResult<bool>;

    // ------------------------------------------------------------------
    // Clientes
    // ------------------------------------------------------------------
    async fn buscar_cliente_por_rut(&self, rut: &str) -> AppResult<Option<Cliente>>;
    async fn obtener_cliente(&self, id: Uuid) -> AppResult<Option<Cliente>>;
    async fn listar_clientes(
        &self,
        consulta: Option<String>,
    ) -> AppResult<Vec<ClienteConEstadisticas>>;
    async fn crear_cliente(&self, datos: NuevoCliente) -> AppResult<Cliente>;
    async fn actualizar_cliente(
        &self,
        id: Uuid,
        cambios: ActualizarCliente,
    ) -> AppResult<Option<Cliente>>;

    // ------------------------------------------------------------------
    // Personal
    // ------------------------------------------------------------------
    async fn listar_personal(&self) -> AppResult<Vec<PerfilStaff>>;
    async fn obtener_staff(&self, id: Uuid) -> AppResult<Option<PerfilStaff>>;
    async fn actualizar_staff(
        &self,
        id: Uuid,
        cambios: ActualizarStaff,
    ) -> AppResult<Option<PerfilStaff>>;

    // ------------------------------------------------------------------
    // Checklists
    // ------------------------------------------------------------------
    async fn obtener_checklist(&self, id: i64) -> AppResult<Option<Checklist>>;
    async fn obtener_checklist_por_orden(&self, orden_id: i64) -> AppResult<Option<Checklist>>;
    async fn guardar_checklist(&self, datos: GuardarChecklist) -> AppResult<Checklist>;
    async fn actualizar_checklist(
        &self,
        id: i64,
        cambios: ActualizarChecklist,
    ) -> AppResult<Option<Checklist>>;
}

/// Construir el backend según el modo resuelto, una sola vez al arranque.
pub async fn construir_storage(config: &Config) -> anyhow::Result<Arc<dyn Storage>> {
    let modo = resolve_storage_mode(&config.storage_mode);
    tracing::info!("💾 Modo de almacenamiento activo: {}", modo.as_str());

    match modo {
        StorageMode::Local => {
            let store = match &config.ruta_datos_local {
                Some(ruta) => LocalStore::con_archivo(ruta)?,
                None => LocalStore::en_memoria(),
            };
            if config.datos_demo {
                store.sembrar_demo().await?;
            }
            Ok(Arc::new(store))
        }
        StorageMode::Remote => {
            let store = RemoteStore::conectar(config).await?;
            Ok(Arc::new(store))
        }
    }
}
