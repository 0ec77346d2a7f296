pub mod categories;
pub mod clients;
pub mod equipment;
pub mod products;
pub mod quotes;

use std::sync::Arc;

use crate::config::QuoteConfig;
use crate::db::DbPool;
use crate::events::EventSender;

pub use categories::CategoryService;
pub use clients::ClientService;
pub use equipment::EquipmentService;
pub use products::ProductService;
pub use quotes::QuoteService;

/// Bundle of every domain service, sharing one pool and event channel.
#[derive(Clone)]
pub struct AppServices {
    pub quotes: QuoteService,
    pub clients: ClientService,
    pub products: ProductService,
    pub categories: CategoryService,
    pub equipment: EquipmentService,
}

impl AppServices {
    pub fn build(
        db: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        quote_config: QuoteConfig,
    ) -> Self {
        Self {
            quotes: QuoteService::new(db.clone(), event_sender.clone(), quote_config),
            clients: ClientService::new(db.clone(), event_sender.clone()),
            products: ProductService::new(db.clone(), event_sender.clone()),
            categories: CategoryService::new(db.clone(), event_sender.clone()),
            equipment: EquipmentService::new(db, event_sender),
        }
    }
}
