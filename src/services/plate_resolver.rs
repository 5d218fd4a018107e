//! Motor de resolución de patentes
//!
//! Intenta las fuentes externas en orden de prioridad fijo (la más
//! barata/confiable primero), respetando la cuota diaria de cada una y con
//! timeout duro por intento. El primer éxito corta la iteración; los
//! fallos de una fuente son recuperables y solo avanzan a la siguiente.
//! Las fuentes se intentan estrictamente en secuencia, nunca en paralelo:
//! lo que se cuida acá es la cuota y el orden de costo, no la latencia.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::lookup::DatosVehiculo;
use crate::services::quota_store::QuotaStore;
use crate::utils::validation::normalizar_patente;

/// Fallo recuperable de una fuente puntual: el motor sigue con la próxima
#[derive(Error, Debug)]
pub enum FallaFuente {
    #[error("timeout")]
    Timeout,

    #[error("respuesta HTTP {0}")]
    Estado(u16),

    #[error("error de transporte: {0}")]
    Transporte(String),

    #[error("respuesta no parseable: {0}")]
    Parseo(String),
}

/// Error terminal de la resolución completa
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ErrorResolucion {
    #[error("la patente quedó vacía después de normalizar")]
    PatenteInvalida,

    #[error("todas las fuentes fueron salteadas o fallaron")]
    FuentesAgotadas,
}

/// Una fuente externa de datos de vehículo por patente
#[async_trait]
pub trait FuentePatente: Send + Sync {
    fn nombre(&self) -> &str;
    fn limite_diario(&self) -> u32;
    fn timeout(&self) -> Duration;
    async fn buscar(&self, patente: &str) -> Result<DatosVehiculo, FallaFuente>;
}

/// Estado operator-facing de una fuente
#[derive(Debug, Clone, Serialize)]
pub struct EstadoFuente {
    pub nombre: String,
    pub usado: u32,
    pub limite: u32,
    pub disponible: u32,
    pub activa: bool,
}

pub struct PlateResolver {
    fuentes: Vec<Arc<dyn FuentePatente>>,
    cuotas: QuotaStore,
}

impl PlateResolver {
    /// Las fuentes quedan en el orden de prioridad recibido
    pub fn new(fuentes: Vec<Arc<dyn FuentePatente>>, cuotas: QuotaStore) -> Self {
        Self { fuentes, cuotas }
    }

    /// Resolver una patente contra la cadena de fuentes.
    ///
    /// Devuelve los datos de la primera fuente que responda bien;
    /// `FuentesAgotadas` recién cuando todas fueron salteadas (inactivas o
    /// sin cuota) o fallaron. Una fuente inactiva y una sin cuota se
    /// saltean igual: la distinción solo existe en [`estado_fuentes`].
    ///
    /// [`estado_fuentes`]: PlateResolver::estado_fuentes
    pub async fn resolver(&self, patente: &str) -> Result<DatosVehiculo, ErrorResolucion> {
        let patente = normalizar_patente(patente);
        if patente.is_empty() {
            return Err(ErrorResolucion::PatenteInvalida);
        }

        for fuente in &self.fuentes {
            let nombre = fuente.nombre();

            if !self.cuotas.activa(nombre) {
                debug!("Fuente {} inactiva, salteando", nombre);
                continue;
            }

            let usado = self.cuotas.uso(nombre);
            if usado >= fuente.limite_diario() {
                info!(
                    "Fuente {} sin cuota ({}/{}), salteando",
                    nombre,
                    usado,
                    fuente.limite_diario()
                );
                continue;
            }

            match tokio::time::timeout(fuente.timeout(), fuente.buscar(&patente)).await {
                Err(_) => {
                    warn!(
                        "Fuente {} superó el timeout de {:?} para {}",
                        nombre,
                        fuente.timeout(),
                        patente
                    );
                }
                Ok(Err(falla)) => {
                    warn!("Fuente {} falló para {}: {}", nombre, patente, falla);
                }
                Ok(Ok(datos)) => {
                    self.cuotas.registrar_uso(nombre);
                    info!(
                        "✅ Patente {} resuelta por {} ({}/{})",
                        patente,
                        nombre,
                        usado + 1,
                        fuente.limite_diario()
                    );
                    return Ok(datos);
                }
            }
        }

        warn!("Ninguna fuente pudo resolver la patente {}", patente);
        Err(ErrorResolucion::FuentesAgotadas)
    }

    /// Estado por fuente para visibilidad del operador
    pub fn estado_fuentes(&self) -> Vec<EstadoFuente> {
        self.fuentes
            .iter()
            .map(|f| {
                let usado = self.cuotas.uso(f.nombre());
                let limite = f.limite_diario();
                EstadoFuente {
                    nombre: f.nombre().to_string(),
                    usado,
                    limite,
                    disponible: limite.saturating_sub(usado),
                    activa: self.cuotas.activa(f.nombre()),
                }
            })
            .collect()
    }

    /// Activar/desactivar una fuente; `false` si el nombre no existe
    pub fn set_fuente_activa(&self, nombre: &str, activa: bool) -> bool {
        if !self.fuentes.iter().any(|f| f.nombre() == nombre) {
            return false;
        }
        self.cuotas.set_activa(nombre, activa);
        info!(
            "Fuente {} {}",
            nombre,
            if activa { "activada" } else { "desactivada" }
        );
        true
    }

    /// Reset inmediato de todos los contadores del día
    pub fn reset_cuotas(&self) {
        self.cuotas.reset_manual();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    enum Comportamiento {
        Exito { marca: &'static str, modelo: &'static str, anio: i32 },
        Falla(u16),
        Demora(Duration),
    }

    struct FuenteFalsa {
        nombre: &'static str,
        limite: u32,
        timeout: Duration,
        comportamiento: Comportamiento,
        llamadas: AtomicU32,
    }

    impl FuenteFalsa {
        fn nueva(nombre: &'static str, comportamiento: Comportamiento) -> Arc<Self> {
            Arc::new(Self {
                nombre,
                limite: 10,
                timeout: Duration::from_millis(50),
                comportamiento,
                llamadas: AtomicU32::new(0),
            })
        }

        fn con_limite(nombre: &'static str, limite: u32, comportamiento: Comportamiento) -> Arc<Self> {
            Arc::new(Self {
                nombre,
                limite,
                timeout: Duration::from_millis(50),
                comportamiento,
                llamadas: AtomicU32::new(0),
            })
        }

        fn llamadas(&self) -> u32 {
            self.llamadas.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FuentePatente for FuenteFalsa {
        fn nombre(&self) -> &str {
            self.nombre
        }

        fn limite_diario(&self) -> u32 {
            self.limite
        }

        fn timeout(&self) -> Duration {
            self.timeout
        }

        async fn buscar(&self, patente: &str) -> Result<DatosVehiculo, FallaFuente> {
            self.llamadas.fetch_add(1, Ordering::SeqCst);
            match &self.comportamiento {
                Comportamiento::Exito { marca, modelo, anio } => Ok(DatosVehiculo {
                    fuente: self.nombre.to_string(),
                    patente: patente.to_string(),
                    marca: Some(marca.to_string()),
                    modelo: Some(modelo.to_string()),
                    anio: Some(*anio),
                    motor: None,
                }),
                Comportamiento::Falla(estado) => Err(FallaFuente::Estado(*estado)),
                Comportamiento::Demora(d) => {
                    tokio::time::sleep(*d).await;
                    Ok(DatosVehiculo {
                        fuente: self.nombre.to_string(),
                        patente: patente.to_string(),
                        marca: None,
                        modelo: None,
                        anio: None,
                        motor: None,
                    })
                }
            }
        }
    }

    fn exito(marca: &'static str, modelo: &'static str, anio: i32) -> Comportamiento {
        Comportamiento::Exito { marca, modelo, anio }
    }

    #[tokio::test]
    async fn test_primer_exito_corta_la_iteracion() {
        let a = FuenteFalsa::nueva("A", exito("Toyota", "Corolla", 2018));
        let b = FuenteFalsa::nueva("B", exito("Nissan", "Versa", 2019));
        let resolver = PlateResolver::new(vec![a.clone(), b.clone()], QuotaStore::en_memoria());

        let datos = resolver.resolver("AB1234").await.unwrap();

        assert_eq!(datos.fuente, "A");
        assert_eq!(a.llamadas(), 1);
        // La segunda fuente nunca se invoca
        assert_eq!(b.llamadas(), 0);
    }

    #[tokio::test]
    async fn test_fuente_sin_cuota_se_saltea() {
        let cuotas = QuotaStore::en_memoria();
        cuotas.registrar_uso("A");
        cuotas.registrar_uso("A");

        let a = FuenteFalsa::con_limite("A", 2, exito("Toyota", "Corolla", 2018));
        let b = FuenteFalsa::nueva("B", exito("Nissan", "Versa", 2019));
        let resolver = PlateResolver::new(vec![a.clone(), b.clone()], cuotas);

        let datos = resolver.resolver("AB1234").await.unwrap();

        // El resultado viene de la primera fuente con cuota disponible
        assert_eq!(datos.fuente, "B");
        assert_eq!(a.llamadas(), 0);
        assert_eq!(b.llamadas(), 1);
    }

    #[tokio::test]
    async fn test_fuente_inactiva_se_saltea() {
        let cuotas = QuotaStore::en_memoria();
        cuotas.set_activa("A", false);

        let a = FuenteFalsa::nueva("A", exito("Toyota", "Corolla", 2018));
        let b = FuenteFalsa::nueva("B", exito("Nissan", "Versa", 2019));
        let resolver = PlateResolver::new(vec![a.clone(), b.clone()], cuotas);

        let datos = resolver.resolver("AB1234").await.unwrap();
        assert_eq!(datos.fuente, "B");
        assert_eq!(a.llamadas(), 0);
    }

    #[tokio::test]
    async fn test_timeout_avanza_a_la_siguiente_fuente() {
        let a = FuenteFalsa::nueva("A", Comportamiento::Demora(Duration::from_millis(300)));
        let b = FuenteFalsa::nueva("B", exito("Toyota", "Yaris", 2020));
        let resolver = PlateResolver::new(vec![a.clone(), b.clone()], QuotaStore::en_memoria());

        let datos = resolver.resolver("BBCJ12").await.unwrap();

        assert_eq!(datos.fuente, "B");
        assert_eq!(datos.marca.as_deref(), Some("Toyota"));
        assert_eq!(datos.modelo.as_deref(), Some("Yaris"));
        assert_eq!(datos.anio, Some(2020));

        // El contador de la fuente que se cayó por timeout no se mueve;
        // el de la que respondió sube en uno.
        let estado = resolver.estado_fuentes();
        assert_eq!(estado[0].nombre, "A");
        assert_eq!(estado[0].usado, 0);
        assert_eq!(estado[1].nombre, "B");
        assert_eq!(estado[1].usado, 1);
    }

    #[tokio::test]
    async fn test_falla_http_es_recuperable() {
        let a = FuenteFalsa::nueva("A", Comportamiento::Falla(500));
        let b = FuenteFalsa::nueva("B", exito("Hyundai", "Accent", 2017));
        let resolver = PlateResolver::new(vec![a.clone(), b.clone()], QuotaStore::en_memoria());

        let datos = resolver.resolver("CD5678").await.unwrap();
        assert_eq!(datos.fuente, "B");
        assert_eq!(a.llamadas(), 1);
    }

    #[tokio::test]
    async fn test_todas_las_fuentes_sin_cuota() {
        let cuotas = QuotaStore::en_memoria();
        cuotas.registrar_uso("A");
        cuotas.registrar_uso("B");

        let a = FuenteFalsa::con_limite("A", 1, exito("Toyota", "Corolla", 2018));
        let b = FuenteFalsa::con_limite("B", 1, exito("Nissan", "Versa", 2019));
        let resolver = PlateResolver::new(vec![a.clone(), b.clone()], cuotas);

        let resultado = resolver.resolver("AB1234").await;
        assert_eq!(resultado.unwrap_err(), ErrorResolucion::FuentesAgotadas);
        assert_eq!(a.llamadas(), 0);
        assert_eq!(b.llamadas(), 0);
    }

    #[tokio::test]
    async fn test_patente_vacia_falla_rapido() {
        let a = FuenteFalsa::nueva("A", exito("Toyota", "Corolla", 2018));
        let resolver = PlateResolver::new(vec![a.clone()], QuotaStore::en_memoria());

        let resultado = resolver.resolver("·· -- ··").await;
        assert_eq!(resultado.unwrap_err(), ErrorResolucion::PatenteInvalida);
        assert_eq!(a.llamadas(), 0);
    }

    #[tokio::test]
    async fn test_estado_distingue_inactiva_de_agotada() {
        let cuotas = QuotaStore::en_memoria();
        cuotas.set_activa("A", false);
        cuotas.registrar_uso("B");

        let a = FuenteFalsa::nueva("A", exito("Toyota", "Corolla", 2018));
        let b = FuenteFalsa::con_limite("B", 1, exito("Nissan", "Versa", 2019));
        let resolver = PlateResolver::new(vec![a, b], cuotas);

        let estado = resolver.estado_fuentes();
        assert!(!estado[0].activa);
        assert_eq!(estado[0].disponible, 10);
        assert!(estado[1].activa);
        assert_eq!(estado[1].disponible, 0);
    }

    #[tokio::test]
    async fn test_set_fuente_activa_desconocida() {
        let resolver = PlateResolver::new(vec![], QuotaStore::en_memoria());
        assert!(!resolver.set_fuente_activa("no-existe", false));
    }
}
