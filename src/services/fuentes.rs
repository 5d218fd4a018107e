//! Fuentes HTTP de consulta de patentes
//!
//! Cada proveedor responde con su propio shape; acá vive el cliente HTTP y
//! el parser de cada uno. El orden de prioridad (la más barata primero) lo
//! fija la configuración al construir la cadena.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::environment::{Config, ConfiguracionFuente};
use crate::models::lookup::DatosVehiculo;
use crate::services::plate_resolver::{FallaFuente, FuentePatente};

fn construir_cliente(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent("TallerBackend/1.0")
        .build()
        .expect("no se pudo construir el cliente HTTP")
}

fn clasificar_error(e: reqwest::Error) -> FallaFuente {
    if e.is_timeout() {
        FallaFuente::Timeout
    } else {
        FallaFuente::Transporte(e.to_string())
    }
}

/// Armar la URL del proveedor interpolando la patente en la plantilla
fn armar_url(plantilla: &str, patente: &str) -> String {
    plantilla.replace("{patente}", &urlencoding::encode(patente))
}

// ----------------------------------------------------------------------
// Boostr: GET https://api.boostr.cl/vehicle/{patente}.json
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RespuestaBoostr {
    status: String,
    data: Option<DatosBoostr>,
}

#[derive(Debug, Deserialize)]
struct DatosBoostr {
    make: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    engine: Option<String>,
}

pub struct FuenteBoostr {
    config: ConfiguracionFuente,
    client: reqwest::Client,
}

impl FuenteBoostr {
    pub fn new(config: ConfiguracionFuente) -> Self {
        let client = construir_cliente(Duration::from_millis(config.timeout_ms));
        Self { config, client }
    }

    fn parsear(&self, patente: &str, cuerpo: &str) -> Result<DatosVehiculo, FallaFuente> {
        let respuesta: RespuestaBoostr =
            serde_json::from_str(cuerpo).map_err(|e| FallaFuente::Parseo(e.to_string()))?;

        if respuesta.status != "success" {
            return Err(FallaFuente::Parseo(format!(
                "status inesperado: {}",
                respuesta.status
            )));
        }
        let datos = respuesta
            .data
            .ok_or_else(|| FallaFuente::Parseo("respuesta sin data".to_string()))?;

        Ok(DatosVehiculo {
            fuente: self.config.nombre.clone(),
            patente: patente.to_string(),
            marca: datos.make,
            modelo: datos.model,
            anio: datos.year,
            motor: datos.engine,
        })
    }
}

#[async_trait]
impl FuentePatente for FuenteBoostr {
    fn nombre(&self) -> &str {
        &self.config.nombre
    }

    fn limite_diario(&self) -> u32 {
        self.config.limite_diario
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }

    async fn buscar(&self, patente: &str) -> Result<DatosVehiculo, FallaFuente> {
        let url = armar_url(&self.config.url_plantilla, patente);
        let mut peticion = self.client.get(&url);
        if let Some(key) = &self.config.api_key {
            peticion = peticion.header("X-API-KEY", key);
        }

        let respuesta = peticion.send().await.map_err(clasificar_error)?;
        let estado = respuesta.status();
        if !estado.is_success() {
            return Err(FallaFuente::Estado(estado.as_u16()));
        }

        let cuerpo = respuesta.text().await.map_err(clasificar_error)?;
        self.parsear(patente, &cuerpo)
    }
}

// ----------------------------------------------------------------------
// PatenteChile: GET {url}?patente={patente}, key por query string
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RespuestaPatenteChile {
    exito: bool,
    resultado: Option<ResultadoPatenteChile>,
}

#[derive(Debug, Deserialize)]
struct ResultadoPatenteChile {
    marca: Option<String>,
    modelo: Option<String>,
    ano: Option<i32>,
    motor: Option<String>,
}

pub struct FuentePatenteChile {
    config: ConfiguracionFuente,
    client: reqwest::Client,
}

impl FuentePatenteChile {
    pub fn new(config: ConfiguracionFuente) -> Self {
        let client = construir_cliente(Duration::from_millis(config.timeout_ms));
        Self { config, client }
    }

    fn parsear(&self, patente: &str, cuerpo: &str) -> Result<DatosVehiculo, FallaFuente> {
        let respuesta: RespuestaPatenteChile =
            serde_json::from_str(cuerpo).map_err(|e| FallaFuente::Parseo(e.to_string()))?;

        if !respuesta.exito {
            return Err(FallaFuente::Parseo("exito=false".to_string()));
        }
        let resultado = respuesta
            .resultado
            .ok_or_else(|| FallaFuente::Parseo("respuesta sin resultado".to_string()))?;

        Ok(DatosVehiculo {
            fuente: self.config.nombre.clone(),
            patente: patente.to_string(),
            marca: resultado.marca,
            modelo: resultado.modelo,
            anio: resultado.ano,
            motor: resultado.motor,
        })
    }
}

#[async_trait]
impl FuentePatente for FuentePatenteChile {
    fn nombre(&self) -> &str {
        &self.config.nombre
    }

    fn limite_diario(&self) -> u32 {
        self.config.limite_diario
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }

    async fn buscar(&self, patente: &str) -> Result<DatosVehiculo, FallaFuente> {
        let mut url = armar_url(&self.config.url_plantilla, patente);
        if let Some(key) = &self.config.api_key {
            let separador = if url.contains('?') { '&' } else { '?' };
            url = format!("{}{}key={}", url, separador, urlencoding::encode(key));
        }

        let respuesta = self.client.get(&url).send().await.map_err(clasificar_error)?;
        let estado = respuesta.status();
        if !estado.is_success() {
            return Err(FallaFuente::Estado(estado.as_u16()));
        }

        let cuerpo = respuesta.text().await.map_err(clasificar_error)?;
        self.parsear(patente, &cuerpo)
    }
}

/// Construir la cadena de fuentes en orden de prioridad según configuración
pub fn construir_fuentes(config: &Config) -> Vec<Arc<dyn FuentePatente>> {
    vec![
        Arc::new(FuenteBoostr::new(config.fuente_boostr.clone())),
        Arc::new(FuentePatenteChile::new(config.fuente_patentechile.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_de_prueba(nombre: &str) -> ConfiguracionFuente {
        ConfiguracionFuente {
            nombre: nombre.to_string(),
            url_plantilla: "https://ejemplo.cl/{patente}.json".to_string(),
            api_key: None,
            limite_diario: 10,
            timeout_ms: 1000,
        }
    }

    #[test]
    fn test_armar_url_escapa_la_patente() {
        assert_eq!(
            armar_url("https://ejemplo.cl/{patente}.json", "AB1234"),
            "https://ejemplo.cl/AB1234.json"
        );
    }

    #[test]
    fn test_parsear_respuesta_boostr() {
        let fuente = FuenteBoostr::new(config_de_prueba("boostr"));
        let cuerpo = r#"{
            "status": "success",
            "data": {"make": "Toyota", "model": "Yaris", "year": 2020, "engine": "1.5"}
        }"#;

        let datos = fuente.parsear("BBCJ12", cuerpo).unwrap();
        assert_eq!(datos.fuente, "boostr");
        assert_eq!(datos.marca.as_deref(), Some("Toyota"));
        assert_eq!(datos.modelo.as_deref(), Some("Yaris"));
        assert_eq!(datos.anio, Some(2020));
        assert_eq!(datos.motor.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_parsear_boostr_sin_exito() {
        let fuente = FuenteBoostr::new(config_de_prueba("boostr"));
        let cuerpo = r#"{"status": "error", "data": null}"#;
        assert!(matches!(
            fuente.parsear("BBCJ12", cuerpo),
            Err(FallaFuente::Parseo(_))
        ));
    }

    #[test]
    fn test_parsear_respuesta_patentechile() {
        let fuente = FuentePatenteChile::new(config_de_prueba("patentechile"));
        let cuerpo = r#"{
            "exito": true,
            "resultado": {"marca": "Nissan", "modelo": "Versa", "ano": 2019, "motor": "1.6"}
        }"#;

        let datos = fuente.parsear("CD5678", cuerpo).unwrap();
        assert_eq!(datos.fuente, "patentechile");
        assert_eq!(datos.marca.as_deref(), Some("Nissan"));
        assert_eq!(datos.anio, Some(2019));
    }

    #[test]
    fn test_parsear_patentechile_cuerpo_invalido() {
        let fuente = FuentePatenteChile::new(config_de_prueba("patentechile"));
        assert!(matches!(
            fuente.parsear("CD5678", "<html>mantenimiento</html>"),
            Err(FallaFuente::Parseo(_))
        ));
    }
}
