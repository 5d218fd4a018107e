//! Store remoto
//!
//! Capa de queries tipadas sobre Postgres, con las mismas firmas que el
//! store local. A diferencia del local, acá los fallos de transporte o de
//! base de datos se propagan como errores explícitos: un caller escrito
//! contra el contrato "nunca lanza" del store local debe tolerar ambos
//! estilos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::database::DatabaseConfig;
use crate::config::environment::Config;
use crate::models::checklist::{ActualizarChecklist, Checklist, ChecklistSalida, GuardarChecklist};
use crate::models::cita::{ActualizarCita, Cita, EstadoCita, NuevaCita, RangoFechas};
use crate::models::cliente::{
    ActualizarCliente, Cliente, ClienteConEstadisticas, NuevoCliente, TipoCliente,
};
use crate::models::orden::{
    ActualizarOrden, EstadoOrden, FiltroOrdenes, MetodoPago, NuevaOrden, OrdenTrabajo,
};
use crate::models::staff::{ActualizarStaff, PerfilStaff, RolStaff};
use crate::models::vehiculo::{ActualizarVehiculo, NuevoVehiculo, Vehiculo};
use crate::storage::Storage;
use crate::utils::errors::AppResult;
use crate::utils::validation::normalizar_patente;

pub struct RemoteStore {
    pool: PgPool,
}

// ----------------------------------------------------------------------
// Structs de fila: el mapeo exacto de cada tabla, convertido al modelo
// ----------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct FilaVehiculo {
    patente: String,
    marca: Option<String>,
    modelo: Option<String>,
    anio: Option<i32>,
    motor: Option<String>,
    color: Option<String>,
    cliente_id: Option<Uuid>,
    creado_en: DateTime<Utc>,
}

impl From<FilaVehiculo> for Vehiculo {
    fn from(f: FilaVehiculo) -> Self {
        Vehiculo {
            patente: f.patente,
            marca: f.marca,
            modelo: f.modelo,
            anio: f.anio,
            motor: f.motor,
            color: f.color,
            cliente_id: f.cliente_id,
            creado_en: f.creado_en,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FilaOrden {
    id: i64,
    patente_vehiculo: String,
    descripcion_ingreso: String,
    estado: String,
    mecanico_asignado: Option<Uuid>,
    creado_por: String,
    precio_total: Option<Decimal>,
    fotos: Json<Vec<String>>,
    metodos_pago: Json<Vec<MetodoPago>>,
    nombre_cliente: Option<String>,
    telefono_cliente: Option<String>,
    fecha_ingreso: DateTime<Utc>,
    fecha_lista: Option<DateTime<Utc>>,
    fecha_entrega: Option<DateTime<Utc>>,
    fecha_completada: Option<DateTime<Utc>>,
}

impl From<FilaOrden> for OrdenTrabajo {
    fn from(f: FilaOrden) -> Self {
        OrdenTrabajo {
            id: f.id,
            patente_vehiculo: f.patente_vehiculo,
            descripcion_ingreso: f.descripcion_ingreso,
            estado: f.estado.parse().unwrap_or(EstadoOrden::Pendiente),
            mecanico_asignado: f.mecanico_asignado,
            creado_por: f.creado_por,
            precio_total: f.precio_total,
            fotos: f.fotos.0,
            metodos_pago: f.metodos_pago.0,
            nombre_cliente: f.nombre_cliente,
            telefono_cliente: f.telefono_cliente,
            fecha_ingreso: f.fecha_ingreso,
            fecha_lista: f.fecha_lista,
            fecha_entrega: f.fecha_entrega,
            fecha_completada: f.fecha_completada,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FilaCita {
    id: i64,
    inicio: DateTime<Utc>,
    fin: DateTime<Utc>,
    nombre_cliente: String,
    telefono_cliente: Option<String>,
    patente_vehiculo: Option<String>,
    servicio_solicitado: String,
    estado: String,
    creado_por: String,
    creado_en: DateTime<Utc>,
}

impl From<FilaCita> for Cita {
    fn from(f: FilaCita) -> Self {
        Cita {
            id: f.id,
            inicio: f.inicio,
            fin: f.fin,
            nombre_cliente: f.nombre_cliente,
            telefono_cliente: f.telefono_cliente,
            patente_vehiculo: f.patente_vehiculo,
            servicio_solicitado: f.servicio_solicitado,
            estado: f.estado.parse().unwrap_or(EstadoCita::Pendiente),
            creado_por: f.creado_por,
            creado_en: f.creado_en,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FilaCliente {
    id: Uuid,
    nombre_completo: String,
    telefono: Option<String>,
    email: Option<String>,
    rut: Option<String>,
    tipo: String,
    direccion: Option<String>,
    notas: Option<String>,
    creado_en: DateTime<Utc>,
}

impl From<FilaCliente> for Cliente {
    fn from(f: FilaCliente) -> Self {
        Cliente {
            id: f.id,
            nombre_completo: f.nombre_completo,
            telefono: f.telefono,
            email: f.email,
            rut: f.rut,
            tipo: f.tipo.parse().unwrap_or(TipoCliente::Persona),
            direccion: f.direccion,
            notas: f.notas,
            creado_en: f.creado_en,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FilaClienteConStats {
    id: Uuid,
    nombre_completo: String,
    telefono: Option<String>,
    email: Option<String>,
    rut: Option<String>,
    tipo: String,
    direccion: Option<String>,
    notas: Option<String>,
    creado_en: DateTime<Utc>,
    cantidad_vehiculos: i64,
    cantidad_ordenes: i64,
    ultima_visita: Option<DateTime<Utc>>,
}

impl From<FilaClienteConStats> for ClienteConEstadisticas {
    fn from(f: FilaClienteConStats) -> Self {
        ClienteConEstadisticas {
            cliente: Cliente {
                id: f.id,
                nombre_completo: f.nombre_completo,
                telefono: f.telefono,
                email: f.email,
                rut: f.rut,
                tipo: f.tipo.parse().unwrap_or(TipoCliente::Persona),
                direccion: f.direccion,
                notas: f.notas,
                creado_en: f.creado_en,
            },
            cantidad_vehiculos: f.cantidad_vehiculos,
            cantidad_ordenes: f.cantidad_ordenes,
            ultima_visita: f.ultima_visita,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FilaStaff {
    id: Uuid,
    nombre_completo: String,
    rol: String,
    activo: bool,
    email: Option<String>,
}

impl From<FilaStaff> for PerfilStaff {
    fn from(f: FilaStaff) -> Self {
        PerfilStaff {
            id: f.id,
            nombre_completo: f.nombre_completo,
            rol: f.rol.parse().unwrap_or(RolStaff::Mecanico),
            activo: f.activo,
            email: f.email,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FilaChecklist {
    id: i64,
    orden_id: i64,
    nivel_combustible: Option<Decimal>,
    kilometraje: Option<i64>,
    luces_ok: Option<bool>,
    frenos_ok: Option<bool>,
    neumaticos_ok: Option<bool>,
    bateria_ok: Option<bool>,
    carroceria_ok: Option<bool>,
    observaciones: Option<String>,
    fotos: Json<HashMap<String, String>>,
    revisado: bool,
    omitir_fotos: bool,
    checklist_salida: Option<Json<ChecklistSalida>>,
    creado_en: DateTime<Utc>,
    actualizado_en: DateTime<Utc>,
}

impl From<FilaChecklist> for Checklist {
    fn from(f: FilaChecklist) -> Self {
        Checklist {
            id: f.id,
            orden_id: f.orden_id,
            nivel_combustible: f.nivel_combustible,
            kilometraje: f.kilometraje,
            luces_ok: f.luces_ok,
            frenos_ok: f.frenos_ok,
            neumaticos_ok: f.neumaticos_ok,
            bateria_ok: f.bateria_ok,
            carroceria_ok: f.carroceria_ok,
            observaciones: f.observaciones,
            fotos: f.fotos.0,
            revisado: f.revisado,
            omitir_fotos: f.omitir_fotos,
            checklist_salida: f.checklist_salida.map(|j| j.0),
            creado_en: f.creado_en,
            actualizado_en: f.actualizado_en,
        }
    }
}

impl RemoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Conectar al backend remoto con la configuración de pool del sistema
    pub async fn conectar(config: &Config) -> anyhow::Result<Self> {
        let db_config = DatabaseConfig::desde_config(config)?;
        let pool = db_config.crear_pool().await?;
        tracing::info!("🐘 Conectado a Postgres como store remoto");
        Ok(Self { pool })
    }
}

#[async_trait]
impl Storage for RemoteStore {
    // ------------------------------------------------------------------
    // Vehículos
    // ------------------------------------------------------------------

    async fn buscar_vehiculo_por_patente(&self, patente: &str) -> AppResult<Option<Vehiculo>> {
        let clave = normalizar_patente(patente);
        let fila = sqlx::query_as::<_, FilaVehiculo>(
            "SELECT * FROM vehiculos WHERE patente = $1",
        )
        .bind(&clave)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(Vehiculo::from))
    }

    async fn listar_vehiculos(&self) -> AppResult<Vec<Vehiculo>> {
        let filas = sqlx::query_as::<_, FilaVehiculo>(
            "SELECT * FROM vehiculos ORDER BY creado_en DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(filas.into_iter().map(Vehiculo::from).collect())
    }

    async fn crear_vehiculo(&self, nuevo: NuevoVehiculo) -> AppResult<Vehiculo> {
        let fila = sqlx::query_as::<_, FilaVehiculo>(
            r#"
            INSERT INTO vehiculos (patente, marca, modelo, anio, motor, color, cliente_id, creado_en)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now())
            RETURNING *
            "#,
        )
        .bind(normalizar_patente(&nuevo.patente))
        .bind(&nuevo.marca)
        .bind(&nuevo.modelo)
        .bind(nuevo.anio)
        .bind(&nuevo.motor)
        .bind(&nuevo.color)
        .bind(nuevo.cliente_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.into())
    }

    async fn actualizar_vehiculo(
        &self,
        patente: &str,
        cambios: ActualizarVehiculo,
    ) -> AppResult<Option<Vehiculo>> {
        // Leer-mezclar-escribir: el merge del patch (incluyendo null
        // explícito) se resuelve acá y el UPDATE escribe el registro
        // completo, igual que el store local.
        let Some(actual) = self.buscar_vehiculo_por_patente(patente).await? else {
            return Ok(None);
        };

        let marca = cambios.marca.or(actual.marca);
        let modelo = cambios.modelo.or(actual.modelo);
        let anio = cambios.anio.or(actual.anio);
        let motor = cambios.motor.or(actual.motor);
        let color = cambios.color.or(actual.color);
        let cliente_id = match cambios.cliente_id {
            Some(valor) => valor,
            None => actual.cliente_id,
        };

        let fila = sqlx::query_as::<_, FilaVehiculo>(
            r#"
            UPDATE vehiculos
            SET marca = $2, modelo = $3, anio = $4, motor = $5, color = $6, cliente_id = $7
            WHERE patente = $1
            RETURNING *
            "#,
        )
        .bind(&actual.patente)
        .bind(&marca)
        .bind(&modelo)
        .bind(anio)
        .bind(&motor)
        .bind(&color)
        .bind(cliente_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(Vehiculo::from))
    }

    // ------------------------------------------------------------------
    // Órdenes
    // ------------------------------------------------------------------

    async fn listar_ordenes(&self, filtro: FiltroOrdenes) -> AppResult<Vec<OrdenTrabajo>> {
        let estado = filtro.estado.map(|e| e.as_str().to_string());
        let patente = filtro.patente.as_deref().map(normalizar_patente);
        let filas = sqlx::query_as::<_, FilaOrden>(
            r#"
            SELECT * FROM ordenes_trabajo
            WHERE ($1::text IS NULL OR estado = $1)
              AND ($2::text IS NULL OR patente_vehiculo = $2)
            ORDER BY fecha_ingreso DESC
            "#,
        )
        .bind(estado)
        .bind(patente)
        .fetch_all(&self.pool)
        .await?;
        Ok(filas.into_iter().map(OrdenTrabajo::from).collect())
    }

    async fn obtener_orden(&self, id: i64) -> AppResult<Option<OrdenTrabajo>> {
        let fila = sqlx::query_as::<_, FilaOrden>(
            "SELECT * FROM ordenes_trabajo WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(OrdenTrabajo::from))
    }

    async fn crear_orden(&self, nueva: NuevaOrden) -> AppResult<OrdenTrabajo> {
        let estado = nueva.estado.unwrap_or(EstadoOrden::Pendiente);
        let fila = sqlx::query_as::<_, FilaOrden>(
            r#"
            INSERT INTO ordenes_trabajo (
                patente_vehiculo, descripcion_ingreso, estado, mecanico_asignado,
                creado_por, precio_total, fotos, metodos_pago,
                nombre_cliente, telefono_cliente, fecha_ingreso
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
            RETURNING *
            "#,
        )
        .bind(normalizar_patente(&nueva.patente_vehiculo))
        .bind(&nueva.descripcion_ingreso)
        .bind(estado.as_str())
        .bind(nueva.mecanico_asignado)
        .bind(&nueva.creado_por)
        .bind(nueva.precio_total)
        .bind(Json(nueva.fotos.unwrap_or_default()))
        .bind(Json(nueva.metodos_pago.unwrap_or_default()))
        .bind(&nueva.nombre_cliente)
        .bind(&nueva.telefono_cliente)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.into())
    }

    async fn actualizar_orden(
        &self,
        id: i64,
        cambios: ActualizarOrden,
    ) -> AppResult<Option<OrdenTrabajo>> {
        let Some(actual) = self.obtener_orden(id).await? else {
            return Ok(None);
        };

        let descripcion = cambios.descripcion_ingreso.unwrap_or(actual.descripcion_ingreso);
        let estado = cambios.estado.unwrap_or(actual.estado);
        let fotos = cambios.fotos.unwrap_or(actual.fotos);
        let metodos = cambios.metodos_pago.unwrap_or(actual.metodos_pago);
        let mecanico = match cambios.mecanico_asignado {
            Some(valor) => valor,
            None => actual.mecanico_asignado,
        };
        let precio = match cambios.precio_total {
            Some(valor) => valor,
            None => actual.precio_total,
        };
        let nombre_cliente = match cambios.nombre_cliente {
            Some(valor) => valor,
            None => actual.nombre_cliente,
        };
        let telefono_cliente = match cambios.telefono_cliente {
            Some(valor) => valor,
            None => actual.telefono_cliente,
        };
        let fecha_lista = match cambios.fecha_lista {
            Some(valor) => valor,
            None => actual.fecha_lista,
        };
        let fecha_entrega = match cambios.fecha_entrega {
            Some(valor) => valor,
            None => actual.fecha_entrega,
        };
        let fecha_completada = match cambios.fecha_completada {
            Some(valor) => valor,
            None => actual.fecha_completada,
        };

        let fila = sqlx::query_as::<_, FilaOrden>(
            r#"
            UPDATE ordenes_trabajo
            SET descripcion_ingreso = $2, estado = $3, mecanico_asignado = $4,
                precio_total = $5, fotos = $6, metodos_pago = $7,
                nombre_cliente = $8, telefono_cliente = $9,
                fecha_lista = $10, fecha_entrega = $11, fecha_completada = $12
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&descripcion)
        .bind(estado.as_str())
        .bind(mecanico)
        .bind(precio)
        .bind(Json(fotos))
        .bind(Json(metodos))
        .bind(&nombre_cliente)
        .bind(&telefono_cliente)
        .bind(fecha_lista)
        .bind(fecha_entrega)
        .bind(fecha_completada)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(OrdenTrabajo::from))
    }

    async fn eliminar_orden(&self, id: i64) -> AppResult<bool> {
        let resultado = sqlx::query("DELETE FROM ordenes_trabajo WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Citas
    // ------------------------------------------------------------------

    async fn listar_citas(&self, rango: RangoFechas) -> AppResult<Vec<Cita>> {
        let filas = sqlx::query_as::<_, FilaCita>(
            r#"
            SELECT * FROM citas
            WHERE ($1::timestamptz IS NULL OR inicio >= $1)
              AND ($2::timestamptz IS NULL OR inicio <= $2)
            ORDER BY inicio ASC
            "#,
        )
        .bind(rango.desde)
        .bind(rango.hasta)
        .fetch_all(&self.pool)
        .await?;
        Ok(filas.into_iter().map(Cita::from).collect())
    }

    async fn obtener_cita(&self, id: i64) -> AppResult<Option<Cita>> {
        let fila = sqlx::query_as::<_, FilaCita>("SELECT * FROM citas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fila.map(Cita::from))
    }

    async fn crear_cita(&self, nueva: NuevaCita) -> AppResult<Cita> {
        let fila = sqlx::query_as::<_, FilaCita>(
            r#"
            INSERT INTO citas (
                inicio, fin, nombre_cliente, telefono_cliente, patente_vehiculo,
                servicio_solicitado, estado, creado_por, creado_en
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pendiente', $7, now())
            RETURNING *
            "#,
        )
        .bind(nueva.inicio)
        .bind(nueva.fin)
        .bind(&nueva.nombre_cliente)
        .bind(&nueva.telefono_cliente)
        .bind(nueva.patente_vehiculo.as_deref().map(normalizar_patente))
        .bind(&nueva.servicio_solicitado)
        .bind(&nueva.creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.into())
    }

    async fn actualizar_cita(&self, id: i64, cambios: ActualizarCita) -> AppResult<Option<Cita>> {
        let Some(actual) = self.obtener_cita(id).await? else {
            return Ok(None);
        };

        let inicio = cambios.inicio.unwrap_or(actual.inicio);
        let fin = cambios.fin.unwrap_or(actual.fin);
        let nombre = cambios.nombre_cliente.unwrap_or(actual.nombre_cliente);
        let servicio = cambios
            .servicio_solicitado
            .unwrap_or(actual.servicio_solicitado);
        let estado = cambios.estado.unwrap_or(actual.estado);
        let telefono = match cambios.telefono_cliente {
            Some(valor) => valor,
            None => actual.telefono_cliente,
        };
        let patente = match cambios.patente_vehiculo {
            Some(valor) => valor.as_deref().map(normalizar_patente),
            None => actual.patente_vehiculo,
        };

        let fila = sqlx::query_as::<_, FilaCita>(
            r#"
            UPDATE citas
            SET inicio = $2, fin = $3, nombre_cliente = $4, telefono_cliente = $5,
                patente_vehiculo = $6, servicio_solicitado = $7, estado = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(inicio)
        .bind(fin)
        .bind(&nombre)
        .bind(&telefono)
        .bind(&patente)
        .bind(&servicio)
        .bind(estado.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(Cita::from))
    }

    async fn eliminar_cita(&self, id: i64) -> AppResult<bool> {
        let resultado = sqlx::query("DELETE FROM citas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
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
        let fila = sqlx::query_as::<_, FilaCliente>(
            r#"
            SELECT * FROM clientes
            WHERE upper(regexp_replace(coalesce(rut, ''), '[^A-Za-z0-9]', '', 'g')) = $1
            "#,
        )
        .bind(&clave)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(Cliente::from))
    }

    async fn obtener_cliente(&self, id: Uuid) -> AppResult<Option<Cliente>> {
        let fila = sqlx::query_as::<_, FilaCliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fila.map(Cliente::from))
    }

    async fn listar_clientes(
        &self,
        consulta: Option<String>,
    ) -> AppResult<Vec<ClienteConEstadisticas>> {
        let termino = consulta.map(|q| format!("%{}%", q));
        let filas = sqlx::query_as::<_, FilaClienteConStats>(
            r#"
            SELECT c.*,
                (SELECT count(*) FROM vehiculos v
                  WHERE v.cliente_id = c.id) AS cantidad_vehiculos,
                (SELECT count(*) FROM ordenes_trabajo o
                  JOIN vehiculos v ON v.patente = o.patente_vehiculo
                  WHERE v.cliente_id = c.id) AS cantidad_ordenes,
                (SELECT max(o.fecha_ingreso) FROM ordenes_trabajo o
                  JOIN vehiculos v ON v.patente = o.patente_vehiculo
                  WHERE v.cliente_id = c.id) AS ultima_visita
            FROM clientes c
            WHERE ($1::text IS NULL
                   OR c.nombre_completo ILIKE $1
                   OR c.rut ILIKE $1
                   OR c.email ILIKE $1)
            ORDER BY c.nombre_completo ASC
            LIMIT 50
            "#,
        )
        .bind(termino)
        .fetch_all(&self.pool)
        .await?;
        Ok(filas.into_iter().map(ClienteConEstadisticas::from).collect())
    }

    async fn crear_cliente(&self, nuevo: NuevoCliente) -> AppResult<Cliente> {
        let tipo = nuevo.tipo.unwrap_or(TipoCliente::Persona);
        let fila = sqlx::query_as::<_, FilaCliente>(
            r#"
            INSERT INTO clientes (
                id, nombre_completo, telefono, email, rut, tipo, direccion, notas, creado_en
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&nuevo.nombre_completo)
        .bind(&nuevo.telefono)
        .bind(&nuevo.email)
        .bind(&nuevo.rut)
        .bind(tipo.as_str())
        .bind(&nuevo.direccion)
        .bind(&nuevo.notas)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.into())
    }

    async fn actualizar_cliente(
        &self,
        id: Uuid,
        cambios: ActualizarCliente,
    ) -> AppResult<Option<Cliente>> {
        let Some(actual) = self.obtener_cliente(id).await? else {
            return Ok(None);
        };

        let nombre = cambios.nombre_completo.unwrap_or(actual.nombre_completo);
        let tipo = cambios.tipo.unwrap_or(actual.tipo);
        let telefono = match cambios.telefono {
            Some(valor) => valor,
            None => actual.telefono,
        };
        let email = match cambios.email {
            Some(valor) => valor,
            None => actual.email,
        };
        let direccion = match cambios.direccion {
            Some(valor) => valor,
            None => actual.direccion,
        };
        let notas = match cambios.notas {
            Some(valor) => valor,
            None => actual.notas,
        };

        let fila = sqlx::query_as::<_, FilaCliente>(
            r#"
            UPDATE clientes
            SET nombre_completo = $2, telefono = $3, email = $4,
                tipo = $5, direccion = $6, notas = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&nombre)
        .bind(&telefono)
        .bind(&email)
        .bind(tipo.as_str())
        .bind(&direccion)
        .bind(&notas)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(Cliente::from))
    }

    // ------------------------------------------------------------------
    // Personal
    // ------------------------------------------------------------------

    async fn listar_personal(&self) -> AppResult<Vec<PerfilStaff>> {
        let filas = sqlx::query_as::<_, FilaStaff>(
            "SELECT * FROM personal ORDER BY nombre_completo ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(filas.into_iter().map(PerfilStaff::from).collect())
    }

    async fn obtener_staff(&self, id: Uuid) -> AppResult<Option<PerfilStaff>> {
        let fila = sqlx::query_as::<_, FilaStaff>("SELECT * FROM personal WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fila.map(PerfilStaff::from))
    }

    async fn actualizar_staff(
        &self,
        id: Uuid,
        cambios: ActualizarStaff,
    ) -> AppResult<Option<PerfilStaff>> {
        let Some(actual) = self.obtener_staff(id).await? else {
            return Ok(None);
        };

        let nombre = cambios.nombre_completo.unwrap_or(actual.nombre_completo);
        let rol = cambios.rol.unwrap_or(actual.rol);
        let activo = cambios.activo.unwrap_or(actual.activo);
        let email = match cambios.email {
            Some(valor) => valor,
            None => actual.email,
        };

        let fila = sqlx::query_as::<_, FilaStaff>(
            r#"
            UPDATE personal
            SET nombre_completo = $2, rol = $3, activo = $4, email = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&nombre)
        .bind(rol.as_str())
        .bind(activo)
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(PerfilStaff::from))
    }

    // ------------------------------------------------------------------
    // Checklists
    // ------------------------------------------------------------------

    async fn obtener_checklist(&self, id: i64) -> AppResult<Option<Checklist>> {
        let fila = sqlx::query_as::<_, FilaChecklist>("SELECT * FROM checklists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fila.map(Checklist::from))
    }

    async fn obtener_checklist_por_orden(&self, orden_id: i64) -> AppResult<Option<Checklist>> {
        let fila = sqlx::query_as::<_, FilaChecklist>(
            "SELECT * FROM checklists WHERE orden_id = $1",
        )
        .bind(orden_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(Checklist::from))
    }

    async fn guardar_checklist(&self, guardar: GuardarChecklist) -> AppResult<Checklist> {
        let fila = sqlx::query_as::<_, FilaChecklist>(
            r#"
            INSERT INTO checklists (
                orden_id, nivel_combustible, kilometraje, luces_ok, frenos_ok,
                neumaticos_ok, bateria_ok, carroceria_ok, observaciones,
                fotos, omitir_fotos, creado_en, actualizado_en
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                    COALESCE($10, '{}'::jsonb), COALESCE($11, false), now(), now())
            ON CONFLICT (orden_id) DO UPDATE SET
                nivel_combustible = COALESCE($2, checklists.nivel_combustible),
                kilometraje       = COALESCE($3, checklists.kilometraje),
                luces_ok          = COALESCE($4, checklists.luces_ok),
                frenos_ok         = COALESCE($5, checklists.frenos_ok),
                neumaticos_ok     = COALESCE($6, checklists.neumaticos_ok),
                bateria_ok        = COALESCE($7, checklists.bateria_ok),
                carroceria_ok     = COALESCE($8, checklists.carroceria_ok),
                observaciones     = COALESCE($9, checklists.observaciones),
                fotos             = checklists.fotos || COALESCE($10, '{}'::jsonb),
                omitir_fotos      = COALESCE($11, checklists.omitir_fotos),
                actualizado_en    = now()
            RETURNING *
            "#,
        )
        .bind(guardar.orden_id)
        .bind(guardar.nivel_combustible)
        .bind(guardar.kilometraje)
        .bind(guardar.luces_ok)
        .bind(guardar.frenos_ok)
        .bind(guardar.neumaticos_ok)
        .bind(guardar.bateria_ok)
        .bind(guardar.carroceria_ok)
        .bind(&guardar.observaciones)
        .bind(guardar.fotos.map(Json))
        .bind(guardar.omitir_fotos)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.into())
    }

    async fn actualizar_checklist(
        &self,
        id: i64,
        cambios: ActualizarChecklist,
    ) -> AppResult<Option<Checklist>> {
        let Some(actual) = self.obtener_checklist(id).await? else {
            return Ok(None);
        };

        let nivel = cambios.nivel_combustible.or(actual.nivel_combustible);
        let kilometraje = cambios.kilometraje.or(actual.kilometraje);
        let luces = cambios.luces_ok.or(actual.luces_ok);
        let frenos = cambios.frenos_ok.or(actual.frenos_ok);
        let neumaticos = cambios.neumaticos_ok.or(actual.neumaticos_ok);
        let bateria = cambios.bateria_ok.or(actual.bateria_ok);
        let carroceria = cambios.carroceria_ok.or(actual.carroceria_ok);
        let observaciones = cambios.observaciones.or(actual.observaciones);
        let mut fotos = actual.fotos;
        if let Some(nuevas) = cambios.fotos {
            fotos.extend(nuevas);
        }
        let revisado = cambios.revisado.unwrap_or(actual.revisado);
        let omitir = cambios.omitir_fotos.unwrap_or(actual.omitir_fotos);
        let salida = cambios.checklist_salida.or(actual.checklist_salida);

        let fila = sqlx::query_as::<_, FilaChecklist>(
            r#"
            UPDATE checklists
            SET nivel_combustible = $2, kilometraje = $3, luces_ok = $4,
                frenos_ok = $5, neumaticos_ok = $6, bateria_ok = $7,
                carroceria_ok = $8, observaciones = $9, fotos = $10,
                revisado = $11, omitir_fotos = $12, checklist_salida = $13,
                actualizado_en = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nivel)
        .bind(kilometraje)
        .bind(luces)
        .bind(frenos)
        .bind(neumaticos)
        .bind(bateria)
        .bind(carroceria)
        .bind(&observaciones)
        .bind(Json(fotos))
        .bind(revisado)
        .bind(omitir)
        .bind(salida.map(Json))
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(Checklist::from))
    }
}
