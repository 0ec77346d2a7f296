//! medequip-api Library
//!
//! Back-office core for a medical-equipment distributor: clients, product
//! catalog, installed equipment and price quotes. The quote subsystem owns
//! folio allocation, totals derivation and the status lifecycle with its
//! client-statistics side effects.
//!
//! The crate is consumed as a library from request handlers; it owns no
//! HTTP surface of its own.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod logging;
pub mod migrator;
pub mod services;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: services::AppServices,
}

impl AppState {
    /// Wires the shared pool, configuration and event channel into the
    /// full service set.
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let services = services::AppServices::build(
            db.clone(),
            Some(Arc::new(event_sender.clone())),
            config.quote.clone(),
        );
        Self {
            db,
            config,
            event_sender,
            services,
        }
    }

    pub fn quote_service(&self) -> &services::QuoteService {
        &self.services.quotes
    }

    pub fn client_service(&self) -> &services::ClientService {
        &self.services.clients
    }
}
