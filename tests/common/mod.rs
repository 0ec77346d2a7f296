use std::sync::Arc;

use medequip_api::{
    config::QuoteConfig,
    db::{self, DbConfig, DbPool},
    entities::client::{ClientType, Model as ClientModel},
    events,
    services::{clients::CreateClientRequest, AppServices},
};
use tempfile::TempDir;

/// Helper harness for spinning up the service set backed by a file-based
/// SQLite database with a single-connection pool.
pub struct TestContext {
    pub db: Arc<DbPool>,
    pub services: AppServices,
    _event_task: tokio::task::JoinHandle<()>,
    _tmp: TempDir,
}

impl TestContext {
    /// Construct a new test context with fresh database state.
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().expect("temp dir for test database");
        let db_path = tmp.path().join("medequip_test.db");
        let db_cfg = DbConfig {
            url: format!("sqlite://{}?mode=rwc", db_path.display()),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };

        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("connect to test database");
        db::run_migrations(&pool).await.expect("run migrations");
        let pool = Arc::new(pool);

        let (event_sender, event_rx) = events::channel(64);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::build(
            pool.clone(),
            Some(Arc::new(event_sender)),
            QuoteConfig::default(),
        );

        Self {
            db: pool,
            services,
            _event_task: event_task,
            _tmp: tmp,
        }
    }

    /// Seeds a hospital client with sensible defaults.
    #[allow(dead_code)]
    pub async fn seed_client(&self, name: &str, email: &str) -> ClientModel {
        self.services
            .clients
            .create_client(CreateClientRequest {
                name: name.to_string(),
                contact: "Dr. Ruiz".to_string(),
                email: email.to_string(),
                phone: "5551234567".to_string(),
                street: Some("Av. Reforma 123".to_string()),
                city: Some("CDMX".to_string()),
                state: None,
                postal_code: None,
                country: None,
                rfc: None,
                client_type: ClientType::Hospital,
                status: None,
                notes: None,
            })
            .await
            .expect("seed client")
    }
}
