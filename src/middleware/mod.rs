//! Middleware del sistema
//!
//! Este módulo contiene las capas HTTP compartidas por todas las rutas.

pub mod cors;

pub use cors::*;
