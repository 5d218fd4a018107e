//! Store local
//!
//! Emulación en memoria del schema remoto, con snapshot JSON opcional en
//! disco (el equivalente del almacenamiento local del navegador en la
//! versión web). Cada instancia encapsula su propio estado y se construye
//! con un constructor, así los tests levantan stores independientes en vez
//! de compartir estado global.
//!
//! No protege contra escrituras concurrentes de dos operadores sobre el
//! mismo registro: supuesto de operador único.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::checklist::{ActualizarChecklist, Checklist, GuardarChecklist};
use crate::models::cita::{ActualizarCita, Cita, EstadoCita, NuevaCita, RangoFechas};
use crate::models::cliente::{
    ActualizarCliente, Cliente, ClienteConEstadisticas, NuevoCliente, TipoCliente,
};
use crate::models::orden::{
    ActualizarOrden, EstadoOrden, FiltroOrdenes, NuevaOrden, OrdenTrabajo,
};
use crate::models::staff::{ActualizarStaff, PerfilStaff, RolStaff};
use crate::models::vehiculo::{ActualizarVehiculo, NuevoVehiculo, Vehiculo};
use crate::storage::Storage;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::normalizar_patente;

/// Tablas del store local, serializables como un solo documento JSON
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct Datos {
    #[serde(default)]
    vehiculos: Vec<Vehiculo>,
    #[serde(default)]
    ordenes: Vec<OrdenTrabajo>,
    #[serde(default)]
    citas: Vec<Cita>,
    #[serde(default)]
    clientes: Vec<Cliente>,
    #[serde(default)]
    personal: Vec<PerfilStaff>,
    #[serde(default)]
    checklists: Vec<Checklist>,
}

pub struct LocalStore {
    datos: RwLock<Datos>,
    ruta: Option<PathBuf>,
}

fn siguiente_id<'a, I>(ids: I) -> i64
where
    I: Iterator<Item = &'a i64>,
{
    ids.max().copied().unwrap_or(0) + 1
}

impl LocalStore {
    /// Store volátil, sin snapshot en disco
    pub fn en_memoria() -> Self {
        Self {
            datos: RwLock::new(Datos::default()),
            ruta: None,
        }
    }

    /// Store con snapshot JSON: carga el archivo si existe y lo reescribe
    /// después de cada operación de escritura.
    pub fn con_archivo(ruta: impl AsRef<Path>) -> anyhow::Result<Self> {
        let ruta = ruta.as_ref().to_path_buf();
        let datos = if ruta.exists() {
            let contenido = std::fs::read_to_string(&ruta)?;
            serde_json::from_str(&contenido)?
        } else {
            Datos::default()
        };
        tracing::debug!("Store local con snapshot en {}", ruta.display());
        Ok(Self {
            datos: RwLock::new(datos),
            ruta: Some(ruta),
        })
    }

    fn persistir(&self, datos: &Datos) -> AppResult<()> {
        let Some(ruta) = &self.ruta else {
            return Ok(());
        };
        if let Some(dir) = ruta.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| AppError::Internal(format!("No se pudo crear {}: {}", dir.display(), e)))?;
        }
        let contenido = serde_json::to_string_pretty(datos)
            .map_err(|e| AppError::Internal(format!("No se pudo serializar el snapshot: {}", e)))?;
        std::fs::write(ruta, contenido)
            .map_err(|e| AppError::Internal(format!("No se pudo escribir {}: {}", ruta.display(), e)))?;
        Ok(())
    }

    /// Cargar perfiles de personal directamente en el store.
    ///
    /// El API pública no crea personal (los perfiles son solo destino de
    /// lookup); esta vía la usan el seed de demo y los tests.
    pub async fn sembrar_personal(&self, perfiles: Vec<PerfilStaff>) -> AppResult<()> {
        let mut datos = self.datos.write().await;
        datos.personal.extend(perfiles);
        self.persistir(&datos)
    }

    /// Datos mínimos de demostración para arrancar en modo local sin nada
    pub async fn sembrar_demo(&self) -> AppResult<()> {
        let mut datos = self.datos.write().await;
        if !datos.personal.is_empty() {
            return Ok(());
        }
        datos.personal.push(PerfilStaff {
            id: Uuid::new_v4(),
            nombre_completo: "Patricio Soto".to_string(),
            rol: RolStaff::Admin,
            activo: true,
            email: Some("psoto@taller.cl".to_string()),
        });
        datos.personal.push(PerfilStaff {
            id: Uuid::new_v4(),
            nombre_completo: "Marcela Riquelme".to_string(),
            rol: RolStaff::Mecanico,
            activo: true,
            email: None,
        });
        tracing::info!("🔧 Store local sembrado con datos de demostración");
        self.persistir(&datos)
    }
}

#[async_trait]
impl Storage for LocalStore {
    // ------------------------------------------------------------------
    // Vehículos
    // ------------------------------------------------------------------

    async fn buscar_vehiculo_por_patente(&self, patente: &str) -> AppResult<Option<Vehiculo>> {
        let clave = normalizar_patente(patente);
        let datos = self.datos.read().await;
        Ok(datos
            .vehiculos
            .iter()
            .find(|v| v.patente == clave)
            .cloned())
    }

    async fn listar_vehiculos(&self) -> AppResult<Vec<Vehiculo>> {
        let datos = self.datos.read().await;
        Ok(datos.vehiculos.clone())
    }

    async fn crear_vehiculo(&self, nuevo: NuevoVehiculo) -> AppResult<Vehiculo> {
        let mut datos = self.datos.write().await;
        let vehiculo = Vehiculo {
            patente: normalizar_patente(&nuevo.patente),
            marca: nuevo.marca,
            modelo: nuevo.modelo,
            anio: nuevo.anio,
            motor: nuevo.motor,
            color: nuevo.color,
            cliente_id: nuevo.cliente_id,
            creado_en: Utc::now(),
        };
        datos.vehiculos.push(vehiculo.clone());
        self.persistir(&datos)?;
        Ok(vehiculo)
    }

    async fn actualizar_vehiculo(
        &self,
        patente: &str,
        cambios: ActualizarVehiculo,
    ) -> AppResult<Option<Vehiculo>> {
        let clave = normalizar_patente(patente);
        let mut datos = self.datos.write().await;
        let Some(vehiculo) = datos.vehiculos.iter_mut().find(|v| v.patente == clave) else {
            return Ok(None);
        };

        if let Some(marca) = cambios.marca {
            vehiculo.marca = Some(marca);
        }
        if let Some(modelo) = cambios.modelo {
            vehiculo.modelo = Some(modelo);
        }
        if let Some(anio) = cambios.anio {
            vehiculo.anio = Some(anio);
        }
        if let Some(motor) = cambios.motor {
            vehiculo.motor = Some(motor);
        }
        if let Some(color) = cambios.color {
            vehiculo.color = Some(color);
        }
        if let Some(cliente_id) = cambios.cliente_id {
            vehiculo.cliente_id = cliente_id;
        }

        let actualizado = vehiculo.clone();
        self.persistir(&datos)?;
        Ok(Some(actualizado))
    }

    // ------------------------------------------------------------------
    // Órdenes
    // ------------------------------------------------------------------

    async fn listar_ordenes(&self, filtro: FiltroOrdenes) -> AppResult<Vec<OrdenTrabajo>> {
        let patente = filtro.patente.as_deref().map(normalizar_patente);
        let datos = self.datos.read().await;
        let mut ordenes: Vec<OrdenTrabajo> = datos
            .ordenes
            .iter()
            .filter(|o| filtro.estado.map_or(true, |e| o.estado == e))
            .filter(|o| patente.as_deref().map_or(true, |p| o.patente_vehiculo == p))
            .cloned()
            .collect();
        ordenes.sort_by(|a, b| b.fecha_ingreso.cmp(&a.fecha_ingreso));
        Ok(ordenes)
    }

    async fn obtener_orden(&self, id: i64) -> AppResult<Option<OrdenTrabajo>> {
        let datos = self.datos.read().await;
        Ok(datos.ordenes.iter().find(|o| o.id == id).cloned())
    }

    async fn crear_orden(&self, nueva: NuevaOrden) -> AppResult<OrdenTrabajo> {
        let mut datos = self.datos.write().await;
        let id = siguiente_id(datos.ordenes.iter().map(|o| &o.id));
        let orden = OrdenTrabajo {
            id,
            patente_vehiculo: normalizar_patente(&nueva.patente_vehiculo),
            descripcion_ingreso: nueva.descripcion_ingreso,
            estado: nueva.estado.unwrap_or(EstadoOrden::Pendiente),
            mecanico_asignado: nueva.mecanico_asignado,
            creado_por: nueva.creado_por,
            precio_total: nueva.precio_total,
            fotos: nueva.fotos.unwrap_or_default(),
            metodos_pago: nueva.metodos_pago.unwrap_or_default(),
            nombre_cliente: nueva.nombre_cliente,
            telefono_cliente: nueva.telefono_cliente,
            fecha_ingreso: Utc::now(),
            fecha_lista: None,
            fecha_entrega: None,
            fecha_completada: None,
        };
        datos.ordenes.push(orden.clone());
        self.persistir(&datos)?;
        Ok(orden)
    }

    async fn actualizar_orden(
        &self,
        id: i64,
        cambios: ActualizarOrden,
    ) -> AppResult<Option<OrdenTrabajo>> {
        let mut datos = self.datos.write().await;
        let Some(orden) = datos.ordenes.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };

        if let Some(descripcion) = cambios.descripcion_ingreso {
            orden.descripcion_ingreso = descripcion;
        }
        if let Some(estado) = cambios.estado {
            orden.estado = estado;
        }
        if let Some(fotos) = cambios.fotos {
            orden.fotos = fotos;
        }
        if let Some(metodos) = cambios.metodos_pago {
            orden.metodos_pago = metodos;
        }
        if let Some(mecanico) = cambios.mecanico_asignado {
            orden.mecanico_asignado = mecanico;
        }
        if let Some(precio) = cambios.precio_total {
            orden.precio_total = precio;
        }
        if let Some(nombre) = cambios.nombre_cliente {
            orden.nombre_cliente = nombre;
        }
        if let Some(telefono) = cambios.telefono_cliente {
            orden.telefono_cliente = telefono;
        }
        if let Some(fecha) = cambios.fecha_lista {
            orden.fecha_lista = fecha;
        }
        if let Some(fecha) = cambios.fecha_entrega {
            orden.fecha_entrega = fecha;
        }
        if let Some(fecha) = cambios.fecha_completada {
            orden.fecha_completada = fecha;
        }

        let actualizada = orden.clone();
        self.persistir(&datos)?;
        Ok(Some(actualizada))
    }

    async fn eliminar_orden(&self, id: i64) -> AppResult<bool> {
        let mut datos = self.datos.write().await;
        let antes = datos.ordenes.len();
        datos.ordenes.retain(|o| o.id != id);
        let eliminada = datos.ordenes.len() < antes;
        if eliminada {
            datos.checklists.retain(|c| c.orden_id != id);
            self.persistir(&datos)?;
        }
        Ok(eliminada)
    }

    // ------------------------------------------------------------------
    // Citas
    // ------------------------------------------------------------------

    async fn listar_citas(&self, rango: RangoFechas) -> AppResult<Vec<Cita>> {
        let datos = self.datos.read().await;
        let mut citas: Vec<Cita> = datos
            .citas
            .iter()
            .filter(|c| rango.desde.map_or(true, |d| c.inicio >= d))
            .filter(|c| rango.hasta.map_or(true, |h| c.inicio <= h))
            .cloned()
            .collect();
        citas.sort_by(|a, b| a.inicio.cmp(&b.inicio));
        Ok(citas)
    }

    async fn obtener_cita(&self, id: i64) -> AppResult<Option<Cita>> {
        let datos = self.datos.read().await;
        Ok(datos.citas.iter().find(|c| c.id == id).cloned())
    }

    async fn crear_cita(&self, nueva: NuevaCita) -> AppResult<Cita> {
        let mut datos = self.datos.write().await;
        let id = siguiente_id(datos.citas.iter().map(|c| &c.id));
        let cita = Cita {
            id,
            inicio: nueva.inicio,
            fin: nueva.fin,
            nombre_cliente: nueva.nombre_cliente,
            telefono_cliente: nueva.telefono_cliente,
            patente_vehiculo: nueva.patente_vehiculo.as_deref().map(normalizar_patente),
            servicio_solicitado: nueva.servicio_solicitado,
            estado: EstadoCita::Pendiente,
            creado_por: nueva.creado_por,
            creado_en: Utc::now(),
        };
        datos.citas.push(cita.clone());
        self.persistir(&datos)?;
        Ok(cita)
    }

    async fn actualizar_cita(&self, id: i64, cambios: ActualizarCita) -> AppResult<Option<Cita>> {
        let mut datos = self.datos.write().await;
        let Some(cita) = datos.citas.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(inicio) = cambios.inicio {
            cita.inicio = inicio;
        }
        if let Some(fin) = cambios.fin {
            cita.fin = fin;
        }
        if let Some(nombre) = cambios.nombre_cliente {
            cita.nombre_cliente = nombre;
        }
        if let Some(servicio) = cambios.servicio_solicitado {
            cita.servicio_solicitado = servicio;
        }
        if let Some(estado) = cambios.estado {
            cita.estado = estado;
        }
        if let Some(telefono) = cambios.telefono_cliente {
            cita.telefono_cliente = telefono;
        }
        if let Some(patente) = cambios.patente_vehiculo {
            cita.patente_vehiculo = patente.as_deref().map(normalizar_patente);
        }

        let actualizada = cita.clone();
        self.persistir(&datos)?;
        Ok(Some(actualizada))
    }

    async fn eliminar_cita(&self, id: i64) -> AppResult<bool> {
        let mut datos = self.datos.write().await;
        let antes = datos.citas.len();
        datos.citas.retain(|c| c.id != id);
        let eliminada = datos.citas.len() < antes;
        if eliminada {
            self.persistir(&datos)?;
        }
        Ok(eliminada)
    }

    // ------------------------------------------------------------------
    // Clientes
    // ------------------------------------------------------------------

    async fn buscar_cliente_por_rut(&self, rut: &str) -> AppResult<Option<Cliente>> {
        let clave: String = rut
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        let datos = self.datos.read().await;
        Ok(datos
            .clientes
            .iter()
            .find(|c| {
                c.rut.as_deref().map_or(false, |r| {
                    r.chars()
                        .filter(|c| c.is_ascii_alphanumeric())
                        .map(|c| c.to_ascii_uppercase())
                        .collect::<String>()
                        == clave
                })
            })
            .cloned())
    }

    async fn obtener_cliente(&self, id: Uuid) -> AppResult<Option<Cliente>> {
        let datos = self.datos.read().await;
        Ok(datos.clientes.iter().find(|c| c.id == id).cloned())
    }

    async fn listar_clientes(
        &self,
        consulta: Option<String>,
    ) -> AppResult<Vec<ClienteConEstadisticas>> {
        let termino = consulta.map(|q| q.to_lowercase());
        let datos = self.datos.read().await;

        let mut resultado = Vec::new();
        for cliente in &datos.clientes {
            if let Some(t) = &termino {
                let coincide = cliente.nombre_completo.to_lowercase().contains(t)
                    || cliente.rut.as_deref().map_or(false, |r| r.to_lowercase().contains(t))
                    || cliente.email.as_deref().map_or(false, |e| e.to_lowercase().contains(t));
                if !coincide {
                    continue;
                }
            }

            let patentes: Vec<&str> = datos
                .vehiculos
                .iter()
                .filter(|v| v.cliente_id == Some(cliente.id))
                .map(|v| v.patente.as_str())
                .collect();
            let ordenes: Vec<&OrdenTrabajo> = datos
                .ordenes
                .iter()
                .filter(|o| patentes.contains(&o.patente_vehiculo.as_str()))
                .collect();

            resultado.push(ClienteConEstadisticas {
                cliente: cliente.clone(),
                cantidad_vehiculos: patentes.len() as i64,
                cantidad_ordenes: ordenes.len() as i64,
                ultima_visita: ordenes.iter().map(|o| o.fecha_ingreso).max(),
            });
        }

        resultado.sort_by(|a, b| a.cliente.nombre_completo.cmp(&b.cliente.nombre_completo));
        resultado.truncate(50);
        Ok(resultado)
    }

    async fn crear_cliente(&self, nuevo: NuevoCliente) -> AppResult<Cliente> {
        let mut datos = self.datos.write().await;
        let cliente = Cliente {
            id: Uuid::new_v4(),
            nombre_completo: nuevo.nombre_completo,
            telefono: nuevo.telefono,
            email: nuevo.email,
            rut: nuevo.rut,
            tipo: nuevo.tipo.unwrap_or(TipoCliente::Persona),
            direccion: nuevo.direccion,
            notas: nuevo.notas,
            creado_en: Utc::now(),
        };
        datos.clientes.push(cliente.clone());
        self.persistir(&datos)?;
        Ok(cliente)
    }

    async fn actualizar_cliente(
        &self,
        id: Uuid,
        cambios: ActualizarCliente,
    ) -> AppResult<Option<Cliente>> {
        let mut datos = self.datos.write().await;
        let Some(cliente) = datos.clientes.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(nombre) = cambios.nombre_completo {
            cliente.nombre_completo = nombre;
        }
        if let Some(tipo) = cambios.tipo {
            cliente.tipo = tipo;
        }
        if let Some(telefono) = cambios.telefono {
            cliente.telefono = telefono;
        }
        if let Some(email) = cambios.email {
            cliente.email = email;
        }
        if let Some(direccion) = cambios.direccion {
            cliente.direccion = direccion;
        }
        if let Some(notas) = cambios.notas {
            cliente.notas = notas;
        }

        let actualizado = cliente.clone();
        self.persistir(&datos)?;
        Ok(Some(actualizado))
    }

    // ------------------------------------------------------------------
    // Personal
    // ------------------------------------------------------------------

    async fn listar_personal(&self) -> AppResult<Vec<PerfilStaff>> {
        let datos = self.datos.read().await;
        Ok(datos.personal.clone())
    }

    async fn obtener_staff(&self, id: Uuid) -> AppResult<Option<PerfilStaff>> {
        let datos = self.datos.read().await;
        Ok(datos.personal.iter().find(|p| p.id == id).cloned())
    }

    async fn actualizar_staff(
        &self,
        id: Uuid,
        cambios: ActualizarStaff,
    ) -> AppResult<Option<PerfilStaff>> {
        let mut datos = self.datos.write().await;
        let Some(perfil) = datos.personal.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(nombre) = cambios.nombre_completo {
            perfil.nombre_completo = nombre;
        }
        if let Some(rol) = cambios.rol {
            perfil.rol = rol;
        }
        if let Some(activo) = cambios.activo {
            perfil.activo = activo;
        }
        if let Some(email) = cambios.email {
            perfil.email = email;
        }

        let actualizado = perfil.clone();
        self.persistir(&datos)?;
        Ok(Some(actualizado))
    }

    // ------------------------------------------------------------------
    // Checklists
    // ------------------------------------------------------------------

    async fn obtener_checklist(&self, id: i64) -> AppResult<Option<Checklist>> {
        let datos = self.datos.read().await;
        Ok(datos.checklists.iter().find(|c| c.id == id).cloned())
    }

    async fn obtener_checklist_por_orden(&self, orden_id: i64) -> AppResult<Option<Checklist>> {
        let datos = self.datos.read().await;
        Ok(datos
            .checklists
            .iter()
            .find(|c| c.orden_id == orden_id)
            .cloned())
    }

    async fn guardar_checklist(&self, guardar: GuardarChecklist) -> AppResult<Checklist> {
        let mut datos = self.datos.write().await;
        let ahora = Utc::now();

        let posicion = datos
            .checklists
            .iter()
            .position(|c| c.orden_id == guardar.orden_id);

        let resultado = if let Some(i) = posicion {
            let existente = &mut datos.checklists[i];
            if let Some(v) = guardar.nivel_combustible {
                existente.nivel_combustible = Some(v);
            }
            if let Some(v) = guardar.kilometraje {
                existente.kilometraje = Some(v);
            }
            if let Some(v) = guardar.luces_ok {
                existente.luces_ok = Some(v);
            }
            if let Some(v) = guardar.frenos_ok {
                existente.frenos_ok = Some(v);
            }
            if let Some(v) = guardar.neumaticos_ok {
                existente.neumaticos_ok = Some(v);
            }
            if let Some(v) = guardar.bateria_ok {
                existente.bateria_ok = Some(v);
            }
            if let Some(v) = guardar.carroceria_ok {
                existente.carroceria_ok = Some(v);
            }
            if let Some(v) = guardar.observaciones {
                existente.observaciones = Some(v);
            }
            if let Some(fotos) = guardar.fotos {
                existente.fotos.extend(fotos);
            }
            if let Some(v) = guardar.omitir_fotos {
                existente.omitir_fotos = v;
            }
            existente.actualizado_en = ahora;
            existente.clone()
        } else {
            let id = siguiente_id(datos.checklists.iter().map(|c| &c.id));
            let checklist = Checklist {
                id,
                orden_id: guardar.orden_id,
                nivel_combustible: guardar.nivel_combustible,
                kilometraje: guardar.kilometraje,
                luces_ok: guardar.luces_ok,
                frenos_ok: guardar.frenos_ok,
                neumaticos_ok: guardar.neumaticos_ok,
                bateria_ok: guardar.bateria_ok,
                carroceria_ok: guardar.carroceria_ok,
                observaciones: guardar.observaciones,
                fotos: guardar.fotos.unwrap_or_default(),
                revisado: false,
                omitir_fotos: guardar.omitir_fotos.unwrap_or(false),
                checklist_salida: None,
                creado_en: ahora,
                actualizado_en: ahora,
            };
            datos.checklists.push(checklist.clone());
            checklist
        };

        self.persistir(&datos)?;
        Ok(resultado)
    }

    async fn actualizar_checklist(
        &self,
        id: i64,
        cambios: ActualizarChecklist,
    ) -> AppResult<Option<Checklist>> {
        let mut datos = self.datos.write().await;
        let Some(checklist) = datos.checklists.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(v) = cambios.nivel_combustible {
            checklist.nivel_combustible = Some(v);
        }
        if let Some(v) = cambios.kilometraje {
            checklist.kilometraje = Some(v);
        }
        if let Some(v) = cambios.luces_ok {
            checklist.luces_ok = Some(v);
        }
        if let Some(v) = cambios.frenos_ok {
            checklist.frenos_ok = Some(v);
        }
        if let Some(v) = cambios.neumaticos_ok {
            checklist.neumaticos_ok = Some(v);
        }
        if let Some(v) = cambios.bateria_ok {
            checklist.bateria_ok = Some(v);
        }
        if let Some(v) = cambios.carroceria_ok {
            checklist.carroceria_ok = Some(v);
        }
        if let Some(v) = cambios.observaciones {
            checklist.observaciones = Some(v);
        }
        if let Some(fotos) = cambios.fotos {
            checklist.fotos.extend(fotos);
        }
        if let Some(v) = cambios.revisado {
            checklist.revisado = v;
        }
        if let Some(v) = cambios.omitir_fotos {
            checklist.omitir_fotos = v;
        }
        if let Some(salida) = cambios.checklist_salida {
            checklist.checklist_salida = Some(salida);
        }
        checklist.actualizado_en = Utc::now();

        let actualizado = checklist.clone();
        self.persistir(&datos)?;
        Ok(Some(actualizado))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn nueva_orden_basica(patente: &str) -> NuevaOrden {
        NuevaOrden {
            patente_vehiculo: patente.to_string(),
            descripcion_ingreso: "test".to_string(),
            creado_por: "u1".to_string(),
            estado: None,
            mecanico_asignado: None,
            precio_total: None,
            fotos: None,
            metodos_pago: None,
            nombre_cliente: None,
            telefono_cliente: None,
        }
    }

    #[tokio::test]
    async fn test_crear_orden_en_store_vacio() {
        let store = LocalStore::en_memoria();
        let orden = store.crear_orden(nueva_orden_basica("AB1234")).await.unwrap();

        assert_eq!(orden.id, 1);
        assert_eq!(orden.estado, EstadoOrden::Pendiente);
        assert_eq!(orden.patente_vehiculo, "AB1234");
        assert_eq!(orden.creado_por, "u1");
    }

    #[tokio::test]
    async fn test_crear_orden_round_trip() {
        let store = LocalStore::en_memoria();
        let mut nueva = nueva_orden_basica("BBCJ12");
        nueva.precio_total = Some(Decimal::new(45000, 0));
        nueva.nombre_cliente = Some("Ana Vergara".to_string());
        nueva.fotos = Some(vec!["https://fotos/1.jpg".to_string()]);

        let creada = store.crear_orden(nueva).await.unwrap();
        let leida = store.obtener_orden(creada.id).await.unwrap().unwrap();

        assert_eq!(leida.precio_total, Some(Decimal::new(45000, 0)));
        assert_eq!(leida.nombre_cliente.as_deref(), Some("Ana Vergara"));
        assert_eq!(leida.fotos, vec!["https://fotos/1.jpg".to_string()]);
        assert_eq!(leida.estado, EstadoOrden::Pendiente);
    }

    #[tokio::test]
    async fn test_ids_monotonicos_max_mas_uno() {
        let store = LocalStore::en_memoria();
        for patente in ["AA1111", "BB2222", "CC3333"] {
            store.crear_orden(nueva_orden_basica(patente)).await.unwrap();
        }
        assert!(store.eliminar_orden(2).await.unwrap());

        let cuarta = store.crear_orden(nueva_orden_basica("DD4444")).await.unwrap();
        assert_eq!(cuarta.id, 4);
    }

    #[tokio::test]
    async fn test_revertir_completada_con_nulls_explicitos() {
        let store = LocalStore::en_memoria();
        let orden = store.crear_orden(nueva_orden_basica("AB1234")).await.unwrap();

        // Completar con timestamps
        let completar: ActualizarOrden = serde_json::from_str(
            r#"{
                "estado": "completada",
                "fecha_lista": "2026-08-01T10:00:00Z",
                "fecha_entrega": "2026-08-02T10:00:00Z",
                "fecha_completada": "2026-08-02T10:00:00Z"
            }"#,
        )
        .unwrap();
        let completada = store
            .actualizar_orden(orden.id, completar)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(completada.estado, EstadoOrden::Completada);
        assert!(completada.fecha_completada.is_some());

        // Revertir a pendiente: los null explícitos deben limpiar, el
        // store no hace limpieza implícita.
        let revertir: ActualizarOrden = serde_json::from_str(
            r#"{
                "estado": "pendiente",
                "fecha_lista": null,
                "fecha_entrega": null,
                "fecha_completada": null
            }"#,
        )
        .unwrap();
        let revertida = store
            .actualizar_orden(orden.id, revertir)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(revertida.estado, EstadoOrden::Pendiente);
        assert!(revertida.fecha_lista.is_none());
        assert!(revertida.fecha_entrega.is_none());
        assert!(revertida.fecha_completada.is_none());
    }

    #[tokio::test]
    async fn test_patch_sin_campo_no_toca_el_valor() {
        let store = LocalStore::en_memoria();
        let orden = store.crear_orden(nueva_orden_basica("AB1234")).await.unwrap();

        let marcar_lista: ActualizarOrden = serde_json::from_str(
            r#"{"estado": "lista", "fecha_lista": "2026-08-01T10:00:00Z"}"#,
        )
        .unwrap();
        store.actualizar_orden(orden.id, marcar_lista).await.unwrap();

        // Patch que no menciona fecha_lista: debe quedar intacta
        let solo_precio: ActualizarOrden =
            serde_json::from_str(r#"{"precio_total": "99990"}"#).unwrap();
        let actualizada = store
            .actualizar_orden(orden.id, solo_precio)
            .await
            .unwrap()
            .unwrap();

        assert!(actualizada.fecha_lista.is_some());
        assert_eq!(actualizada.precio_total, Some(Decimal::new(99990, 0)));
    }

    #[tokio::test]
    async fn test_operaciones_sobre_id_inexistente_devuelven_none() {
        let store = LocalStore::en_memoria();
        assert!(store.obtener_orden(99).await.unwrap().is_none());
        assert!(store
            .actualizar_orden(99, ActualizarOrden::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.eliminar_orden(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_busqueda_de_vehiculo_normaliza_la_patente() {
        let store = LocalStore::en_memoria();
        store
            .crear_vehiculo(NuevoVehiculo {
                patente: "bb-cj·12".to_string(),
                marca: Some("Toyota".to_string()),
                modelo: None,
                anio: None,
                motor: None,
                color: None,
                cliente_id: None,
            })
            .await
            .unwrap();

        let encontrado = store
            .buscar_vehiculo_por_patente(" bbcj12 ")
            .await
            .unwrap()
            .expect("el vehículo debería encontrarse con la patente sin normalizar");
        assert_eq!(encontrado.patente, "BBCJ12");
        assert_eq!(encontrado.marca.as_deref(), Some("Toyota"));
    }

    #[tokio::test]
    async fn test_listados_devuelven_copias() {
        let store = LocalStore::en_memoria();
        store.crear_orden(nueva_orden_basica("AB1234")).await.unwrap();

        let mut listado = store.listar_ordenes(FiltroOrdenes::default()).await.unwrap();
        listado.clear();

        let de_nuevo = store.listar_ordenes(FiltroOrdenes::default()).await.unwrap();
        assert_eq!(de_nuevo.len(), 1);
    }

    #[tokio::test]
    async fn test_estadisticas_de_clientes() {
        let store = LocalStore::en_memoria();
        let cliente = store
            .crear_cliente(NuevoCliente {
                nombre_completo: "Carlos Fuentes".to_string(),
                telefono: None,
                email: None,
                rut: Some("11111111-1".to_string()),
                tipo: None,
                direccion: None,
                notas: None,
            })
            .await
            .unwrap();

        store
            .crear_vehiculo(NuevoVehiculo {
                patente: "AB1234".to_string(),
                marca: None,
                modelo: None,
                anio: None,
                motor: None,
                color: None,
                cliente_id: Some(cliente.id),
            })
            .await
            .unwrap();
        store.crear_orden(nueva_orden_basica("AB1234")).await.unwrap();
        store.crear_orden(nueva_orden_basica("AB1234")).await.unwrap();

        let listado = store.listar_clientes(None).await.unwrap();
        assert_eq!(listado.len(), 1);
        assert_eq!(listado[0].cantidad_vehiculos, 1);
        assert_eq!(listado[0].cantidad_ordenes, 2);
        assert!(listado[0].ultima_visita.is_some());

        // Búsqueda por RUT con puntos y guión
        let encontrado = store.buscar_cliente_por_rut("11.111.111-1").await.unwrap();
        assert!(encontrado.is_some());
    }

    #[tokio::test]
    async fn test_checklist_upsert_por_orden() {
        let store = LocalStore::en_memoria();
        let orden = store.crear_orden(nueva_orden_basica("AB1234")).await.unwrap();

        let primero = store
            .guardar_checklist(GuardarChecklist {
                orden_id: orden.id,
                nivel_combustible: Some(Decimal::new(50, 2)),
                kilometraje: Some(120_000),
                luces_ok: Some(true),
                frenos_ok: None,
                neumaticos_ok: None,
                bateria_ok: None,
                carroceria_ok: None,
                observaciones: None,
                fotos: None,
                omitir_fotos: None,
            })
            .await
            .unwrap();
        assert!(!primero.revisado);

        let segundo = store
            .guardar_checklist(GuardarChecklist {
                orden_id: orden.id,
                nivel_combustible: None,
                kilometraje: None,
                luces_ok: None,
                frenos_ok: Some(false),
                neumaticos_ok: None,
                bateria_ok: None,
                carroceria_ok: None,
                observaciones: Some("pastillas gastadas".to_string()),
                fotos: None,
                omitir_fotos: None,
            })
            .await
            .unwrap();

        // Mismo registro, campos previos intactos
        assert_eq!(segundo.id, primero.id);
        assert_eq!(segundo.kilometraje, Some(120_000));
        assert_eq!(segundo.frenos_ok, Some(false));

        let por_orden = store
            .obtener_checklist_por_orden(orden.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(por_orden.id, primero.id);
    }

    #[tokio::test]
    async fn test_snapshot_en_archivo_sobrevive_al_reinicio() {
        let ruta = std::env::temp_dir().join(format!(
            "taller_snapshot_test_{}_{}.json",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0)
        ));

        {
            let store = LocalStore::con_archivo(&ruta).unwrap();
            store.crear_orden(nueva_orden_basica("AB1234")).await.unwrap();
        }

        let reabierto = LocalStore::con_archivo(&ruta).unwrap();
        let orden = reabierto.obtener_orden(1).await.unwrap();
        assert!(orden.is_some());

        let _ = std::fs::remove_file(&ruta);
    }
}
