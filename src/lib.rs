// src/lib.rs

// Cliente de terminal para a API de inventário multi-tenant
pub mod common;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repo;
pub mod services;
