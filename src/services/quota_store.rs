//! Store de cuotas diarias por fuente de consulta
//!
//! Persiste los contadores de uso como un documento JSON keyed por la
//! fecha ISO del día. El rollover de fecha se detecta perezosamente en el
//! próximo acceso comparando strings, no con un job agendado: si la fecha
//! guardada no es hoy, todos los contadores vuelven a cero.
//!
//! Los contadores se leen y reescriben, no se incrementan atómicamente.
//! Con un solo operador manejando consultas a la vez eso alcanza; dos
//! operadores compartiendo el mismo archivo podrían sub o sobrecontar.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstadoFuentePersistido {
    pub usado: u32,
    pub activa: bool,
}

impl Default for EstadoFuentePersistido {
    fn default() -> Self {
        Self {
            usado: 0,
            activa: true,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Persistido {
    fecha: String,
    #[serde(default)]
    fuentes: HashMap<String, EstadoFuentePersistido>,
}

pub struct QuotaStore {
    ruta: Option<PathBuf>,
    estado: Mutex<Persistido>,
}

fn hoy() -> String {
    Utc::now().date_naive().to_string()
}

impl QuotaStore {
    /// Store volátil para tests o despliegues sin disco
    pub fn en_memoria() -> Self {
        Self {
            ruta: None,
            estado: Mutex::new(Persistido::default()),
        }
    }

    /// Store respaldado por un archivo JSON; carga el estado previo si existe
    pub fn con_archivo(ruta: impl AsRef<Path>) -> anyhow::Result<Self> {
        let ruta = ruta.as_ref().to_path_buf();
        let persistido = if ruta.exists() {
            let contenido = std::fs::read_to_string(&ruta)?;
            serde_json::from_str(&contenido)?
        } else {
            Persistido::default()
        };
        Ok(Self {
            ruta: Some(ruta),
            estado: Mutex::new(persistido),
        })
    }

    fn guardar(&self, persistido: &Persistido) {
        let Some(ruta) = &self.ruta else {
            return;
        };
        if let Some(dir) = ruta.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        match serde_json::to_string_pretty(persistido) {
            Ok(contenido) => {
                if let Err(e) = std::fs::write(ruta, contenido) {
                    tracing::error!("No se pudo guardar las cuotas en {}: {}", ruta.display(), e);
                }
            }
            Err(e) => tracing::error!("No se pudo serializar las cuotas: {}", e),
        }
    }

    /// Ejecutar una operación sobre el estado ya rolleado al día de hoy
    fn con_estado<R>(&self, f: impl FnOnce(&mut Persistido) -> R) -> R {
        let mut persistido = self.estado.lock().expect("lock de cuotas envenenado");
        let fecha_actual = hoy();
        if persistido.fecha != fecha_actual {
            if !persistido.fecha.is_empty() {
                tracing::info!(
                    "📅 Rollover de cuotas: {} -> {}, contadores a cero",
                    persistido.fecha,
                    fecha_actual
                );
            }
            for estado in persistido.fuentes.values_mut() {
                estado.usado = 0;
            }
            persistido.fecha = fecha_actual;
            self.guardar(&persistido);
        }
        f(&mut persistido)
    }

    /// Contadores de uso del día, por nombre de fuente
    pub fn cargar_contadores(&self) -> HashMap<String, u32> {
        self.con_estado(|p| {
            p.fuentes
                .iter()
                .map(|(nombre, estado)| (nombre.clone(), estado.usado))
                .collect()
        })
    }

    /// Uso de hoy para una fuente (0 si nunca se usó)
    pub fn uso(&self, nombre: &str) -> u32 {
        self.con_estado(|p| p.fuentes.get(nombre).map(|e| e.usado).unwrap_or(0))
    }

    /// Registrar una consulta exitosa contra la fuente
    pub fn registrar_uso(&self, nombre: &str) {
        self.con_estado(|p| {
            p.fuentes.entry(nombre.to_string()).or_default().usado += 1;
            self.guardar(p);
        });
    }

    /// Una fuente desconocida se considera activa por defecto
    pub fn activa(&self, nombre: &str) -> bool {
        self.con_estado(|p| p.fuentes.get(nombre).map(|e| e.activa).unwrap_or(true))
    }

    /// Activar o desactivar una fuente sin tocar su contador
    pub fn set_activa(&self, nombre: &str, activa: bool) {
        self.con_estado(|p| {
            p.fuentes.entry(nombre.to_string()).or_default().activa = activa;
            self.guardar(p);
        });
    }

    /// Escape hatch del operador: todos los contadores a cero, ya mismo
    pub fn reset_manual(&self) {
        self.con_estado(|p| {
            for estado in p.fuentes.values_mut() {
                estado.usado = 0;
            }
            self.guardar(p);
            tracing::info!("🧹 Reset manual de cuotas de consulta");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ruta_temporal(nombre: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "taller_cuotas_{}_{}_{}.json",
            nombre,
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or(0)
        ))
    }

    #[test]
    fn test_contadores_parten_en_cero() {
        let store = QuotaStore::en_memoria();
        assert_eq!(store.uso("boostr"), 0);
        assert!(store.cargar_contadores().is_empty());
    }

    #[test]
    fn test_registrar_uso_incrementa() {
        let store = QuotaStore::en_memoria();
        store.registrar_uso("boostr");
        store.registrar_uso("boostr");
        store.registrar_uso("patentechile");
        assert_eq!(store.uso("boostr"), 2);
        assert_eq!(store.uso("patentechile"), 1);
    }

    #[test]
    fn test_rollover_de_fecha_resetea_contadores() {
        let ruta = ruta_temporal("rollover");
        let ayer = (Utc::now().date_naive() - Duration::days(1)).to_string();
        std::fs::write(
            &ruta,
            format!(
                r#"{{"fecha": "{}", "fuentes": {{"boostr": {{"usado": 47, "activa": true}}}}}}"#,
                ayer
            ),
        )
        .unwrap();

        let store = QuotaStore::con_archivo(&ruta).unwrap();
        // El contador de ayer debe volver a cero sin importar su valor
        assert_eq!(store.uso("boostr"), 0);
        let contadores = store.cargar_contadores();
        assert_eq!(contadores.get("boostr"), Some(&0));

        let _ = std::fs::remove_file(&ruta);
    }

    #[test]
    fn test_set_activa_no_toca_el_contador() {
        let store = QuotaStore::en_memoria();
        store.registrar_uso("boostr");
        store.set_activa("boostr", false);
        assert!(!store.activa("boostr"));
        assert_eq!(store.uso("boostr"), 1);

        store.set_activa("boostr", true);
        assert!(store.activa("boostr"));
        assert_eq!(store.uso("boostr"), 1);
    }

    #[test]
    fn test_reset_manual() {
        let store = QuotaStore::en_memoria();
        store.registrar_uso("boostr");
        store.registrar_uso("patentechile");
        store.reset_manual();
        assert_eq!(store.uso("boostr"), 0);
        assert_eq!(store.uso("patentechile"), 0);
    }

    #[test]
    fn test_persistencia_sobrevive_al_reinicio() {
        let ruta = ruta_temporal("persistencia");
        {
            let store = QuotaStore::con_archivo(&ruta).unwrap();
            store.registrar_uso("boostr");
            store.set_activa("patentechile", false);
        }

        let reabierto = QuotaStore::con_archivo(&ruta).unwrap();
        assert_eq!(reabierto.uso("boostr"), 1);
        assert!(!reabierto.activa("patentechile"));

        let _ = std::fs::remove_file(&ruta);
    }
}
