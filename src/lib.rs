//! Backend de gestión de taller mecánico
//!
//! Citas, órdenes de trabajo, clientes, vehículos, checklists. El núcleo
//! es el adaptador de persistencia de doble backend ([`storage`]) y el
//! motor de resolución de patentes con failover entre fuentes externas
//! ([`services`]); el resto es la proyección HTTP que consume el frontend.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;
