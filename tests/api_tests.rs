//! Tests de integración contra la app real
//!
//! Levantan el router completo sobre el store local en memoria y un
//! resolver sin fuentes configuradas, en un puerto efímero, y lo golpean
//! con un cliente HTTP de verdad.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use taller_backend::config::environment::{Config, ConfiguracionFuente};
use taller_backend::routes::crear_router;
use taller_backend::services::{PlateResolver, QuotaStore};
use taller_backend::state::AppState;
use taller_backend::storage::LocalStore;

fn config_de_prueba() -> Config {
    let fuente = |nombre: &str| ConfiguracionFuente {
        nombre: nombre.to_string(),
        url_plantilla: "https://ejemplo.invalido/{patente}.json".to_string(),
        api_key: None,
        limite_diario: 10,
        timeout_ms: 1000,
    };
    Config {
        environment: "development".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: Vec::new(),
        storage_mode: "local".to_string(),
        database_url: None,
        ruta_datos_local: None,
        ruta_cuotas: None,
        datos_demo: false,
        fuente_boostr: fuente("boostr"),
        fuente_patentechile: fuente("patentechile"),
    }
}

/// Servir la app en un puerto efímero; devuelve la URL base
async fn levantar_app() -> String {
    let storage = Arc::new(LocalStore::en_memoria());
    let resolver = Arc::new(PlateResolver::new(Vec::new(), QuotaStore::en_memoria()));
    let state = AppState::new(storage, resolver, config_de_prueba());
    let app = crear_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("no se pudo abrir el puerto de prueba");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health_check() {
    let base = levantar_app().await;
    let respuesta = reqwest::get(format!("{}/salud", base)).await.unwrap();

    assert_eq!(respuesta.status(), StatusCode::OK);
    let cuerpo: serde_json::Value = respuesta.json().await.unwrap();
    assert_eq!(cuerpo["status"], "ok");
}

#[tokio::test]
async fn test_crear_orden_en_store_vacio() {
    let base = levantar_app().await;
    let cliente = reqwest::Client::new();

    let respuesta = cliente
        .post(format!("{}/api/ordenes", base))
        .json(&json!({
            "patente_vehiculo": "AB1234",
            "descripcion_ingreso": "test",
            "creado_por": "u1"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(respuesta.status(), StatusCode::OK);
    let cuerpo: serde_json::Value = respuesta.json().await.unwrap();
    assert_eq!(cuerpo["success"], true);
    assert_eq!(cuerpo["data"]["id"], 1);
    assert_eq!(cuerpo["data"]["estado"], "pendiente");

    // El primer avistamiento de la patente registra el vehículo
    let vehiculo: serde_json::Value = cliente
        .get(format!("{}/api/vehiculos/AB1234", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vehiculo["patente"], "AB1234");
}

#[tokio::test]
async fn test_vehiculo_inexistente_devuelve_null() {
    let base = levantar_app().await;
    let respuesta = reqwest::get(format!("{}/api/vehiculos/ZZ9999", base))
        .await
        .unwrap();

    assert_eq!(respuesta.status(), StatusCode::OK);
    let cuerpo: serde_json::Value = respuesta.json().await.unwrap();
    assert!(cuerpo.is_null());
}

#[tokio::test]
async fn test_resolucion_agotada_pide_ingreso_manual() {
    let base = levantar_app().await;
    let respuesta = reqwest::get(format!("{}/api/patentes/AB1234/resolver", base))
        .await
        .unwrap();

    assert_eq!(respuesta.status(), StatusCode::NOT_FOUND);
    let cuerpo: serde_json::Value = respuesta.json().await.unwrap();
    assert_eq!(cuerpo["code"], "INGRESO_MANUAL");
}

#[tokio::test]
async fn test_suma_de_pagos_debe_cerrar_contra_el_total() {
    let base = levantar_app().await;
    let cliente = reqwest::Client::new();

    cliente
        .post(format!("{}/api/ordenes", base))
        .json(&json!({
            "patente_vehiculo": "CD5678",
            "descripcion_ingreso": "cambio de pastillas",
            "creado_por": "u1"
        }))
        .send()
        .await
        .unwrap();

    let respuesta = cliente
        .put(format!("{}/api/ordenes/1", base))
        .json(&json!({
            "precio_total": "50000",
            "metodos_pago": [
                {"metodo": "efectivo", "monto": "20000"},
                {"metodo": "tarjeta", "monto": "20000"}
            ]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(respuesta.status(), StatusCode::BAD_REQUEST);

    // Con el desglose correcto la actualización pasa
    let respuesta = cliente
        .put(format!("{}/api/ordenes/1", base))
        .json(&json!({
            "precio_total": "50000",
            "metodos_pago": [
                {"metodo": "efectivo", "monto": "20000"},
                {"metodo": "tarjeta", "monto": "30000"}
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(respuesta.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_confirmar_cita_crea_orden() {
    let base = levantar_app().await;
    let cliente = reqwest::Client::new();

    let creada: serde_json::Value = cliente
        .post(format!("{}/api/citas", base))
        .json(&json!({
            "inicio": "2026-09-01T10:00:00Z",
            "fin": "2026-09-01T11:00:00Z",
            "nombre_cliente": "Rosa Morales",
            "telefono_cliente": "912345678",
            "patente_vehiculo": "EF9012",
            "servicio_solicitado": "mantención 10.000 km",
            "creado_por": "u1"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let cita_id = creada["data"]["id"].as_i64().unwrap();

    let respuesta = cliente
        .post(format!("{}/api/citas/{}/confirmar", base, cita_id))
        .send()
        .await
        .unwrap();
    assert_eq!(respuesta.status(), StatusCode::OK);

    let cuerpo: serde_json::Value = respuesta.json().await.unwrap();
    assert_eq!(cuerpo["data"]["cita"]["estado"], "confirmada");
    assert_eq!(cuerpo["data"]["orden"]["estado"], "pendiente");
    assert_eq!(cuerpo["data"]["orden"]["patente_vehiculo"], "EF9012");
    assert_eq!(cuerpo["data"]["orden"]["nombre_cliente"], "Rosa Morales");

    // Confirmar dos veces es conflicto, no una segunda orden
    let repetida = cliente
        .post(format!("{}/api/citas/{}/confirmar", base, cita_id))
        .send()
        .await
        .unwrap();
    assert_eq!(repetida.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_checklist_exige_fotos_antes_de_revisar() {
    let base = levantar_app().await;
    let cliente = reqwest::Client::new();

    cliente
        .post(format!("{}/api/ordenes", base))
        .json(&json!({
            "patente_vehiculo": "GH3456",
            "descripcion_ingreso": "ruido en tren delantero",
            "creado_por": "u1"
        }))
        .send()
        .await
        .unwrap();

    let guardado: serde_json::Value = cliente
        .post(format!("{}/api/checklists", base))
        .json(&json!({
            "orden_id": 1,
            "kilometraje": 88000,
            "luces_ok": true
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let checklist_id = guardado["data"]["id"].as_i64().unwrap();

    // Sin fotos obligatorias la revisión se rechaza
    let rechazada = cliente
        .post(format!("{}/api/checklists/{}/revisar", base, checklist_id))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(rechazada.status(), StatusCode::BAD_REQUEST);

    // Con bypass autorizado pasa
    let aceptada = cliente
        .post(format!("{}/api/checklists/{}/revisar", base, checklist_id))
        .json(&json!({"omitir_fotos": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(aceptada.status(), StatusCode::OK);
    let cuerpo: serde_json::Value = aceptada.json().await.unwrap();
    assert_eq!(cuerpo["data"]["revisado"], true);
}
