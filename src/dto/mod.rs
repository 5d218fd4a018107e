//! DTOs de la API
//!
//! Este módulo contiene los shapes de request/response propios de la capa
//! HTTP. Los payloads de creación y actualización viven en `models`, que
//! es donde los consumen los dos backends de persistencia.

pub mod checklist_dto;
pub mod cita_dto;
pub mod cliente_dto;
pub mod lookup_dto;
pub mod orden_dto;

use serde::Serialize;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
