use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Handle for publishing domain events from services.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Quote events
    QuoteCreated(Uuid),
    QuoteUpdated(Uuid),
    QuoteDeleted(Uuid),
    QuoteStatusChanged {
        quote_id: Uuid,
        old_status: String,
        new_status: String,
    },
    QuoteConfirmed {
        quote_id: Uuid,
        client_id: Option<Uuid>,
        total: Decimal,
    },

    // Client events
    ClientCreated(Uuid),
    ClientUpdated(Uuid),
    ClientDeleted(Uuid),

    // Catalog events
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductDeleted(Uuid),
    CategoryCreated(Uuid),
    CategoryUpdated(Uuid),
    CategoryDeleted(Uuid),

    // Equipment events
    EquipmentCreated(Uuid),
    EquipmentUpdated(Uuid),
    EquipmentDeleted(Uuid),
}

/// Creates a bounded event channel.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging each event. Downstream consumers
/// (email, PDF rendering) subscribe here in the full deployment; the
/// library itself only observes.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        info!(event = ?event, "domain event");
    }
}
