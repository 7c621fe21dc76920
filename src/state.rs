//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::SchedulingStore;
use crate::services::{AnalyticsService, TourService};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: Arc<dyn SchedulingStore>,
    pub tours: TourService,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: Arc<dyn SchedulingStore>) -> Self {
        Self {
            tours: TourService::new(store.clone()),
            analytics: AnalyticsService::new(store.clone(), config.fleet_capacity),
            config,
            store,
        }
    }
}
