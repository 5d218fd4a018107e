//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. A diferencia del modo
//! remoto, el modo local tiene que poder arrancar sin ninguna variable
//! seteada, así que todo lo opcional cae a un default razonable.

use std::env;
use std::path::PathBuf;

/// Configuración de una fuente externa de consulta de patentes
#[derive(Debug, Clone)]
pub struct ConfiguracionFuente {
    pub nombre: String,
    /// Plantilla de URL con `{patente}` como placeholder
    pub url_plantilla: String,
    pub api_key: Option<String>,
    pub limite_diario: u32,
    pub timeout_ms: u64,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,

    /// Flag de modo de almacenamiento: "local" o "remote"
    pub storage_mode: String,
    /// Solo la usa el store remoto
    pub database_url: Option<String>,
    /// Snapshot JSON del store local; None = solo memoria
    pub ruta_datos_local: Option<PathBuf>,
    /// Contadores de cuota persistidos; None = solo memoria
    pub ruta_cuotas: Option<PathBuf>,
    /// Sembrar datos de demostración al arrancar en modo local
    pub datos_demo: bool,

    pub fuente_boostr: ConfiguracionFuente,
    pub fuente_patentechile: ConfiguracionFuente,
}

fn var_o(clave: &str, default: &str) -> String {
    env::var(clave).unwrap_or_else(|_| default.to_string())
}

fn var_parseada_o<T: std::str::FromStr>(clave: &str, default: T) -> T {
    env::var(clave)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn desde_env() -> Self {
        Self {
            environment: var_o("ENVIRONMENT", "development"),
            host: var_o("HOST", "0.0.0.0"),
            port: var_parseada_o("PORT", 3000),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),

            storage_mode: var_o("STORAGE_MODE", "local"),
            database_url: env::var("DATABASE_URL").ok(),
            ruta_datos_local: env::var("RUTA_DATOS_LOCAL")
                .ok()
                .map(PathBuf::from)
                .or_else(|| Some(PathBuf::from("data/taller_local.json"))),
            ruta_cuotas: env::var("RUTA_CUOTAS")
                .ok()
                .map(PathBuf::from)
                .or_else(|| Some(PathBuf::from("data/cuotas_consulta.json"))),
            datos_demo: var_parseada_o("DATOS_DEMO", false),

            fuente_boostr: ConfiguracionFuente {
                nombre: "boostr".to_string(),
                url_plantilla: var_o(
                    "BOOSTR_URL",
                    "https://api.boostr.cl/vehicle/{patente}.json",
                ),
                api_key: env::var("BOOSTR_API_KEY").ok(),
                limite_diario: var_parseada_o("BOOSTR_LIMITE_DIARIO", 50),
                timeout_ms: var_parseada_o("BOOSTR_TIMEOUT_MS", 8000),
            },
            fuente_patentechile: ConfiguracionFuente {
                nombre: "patentechile".to_string(),
                url_plantilla: var_o(
                    "PATENTECHILE_URL",
                    "https://api.patentechile.cl/consulta?patente={patente}",
                ),
                api_key: env::var("PATENTECHILE_API_KEY").ok(),
                limite_diario: var_parseada_o("PATENTECHILE_LIMITE_DIARIO", 100),
                timeout_ms: var_parseada_o("PATENTECHILE_TIMEOUT_MS", 8000),
            },
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
