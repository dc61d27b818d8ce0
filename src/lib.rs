//! Health program registry: programs, clients and enrollments over a
//! relational store, served as a JSON API with a terminal admin console.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod projection;
pub mod routes;
pub mod server;
pub mod services;
pub mod ui;

pub use error::{RegistryError, RegistryResult};
