use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Currency;

/// Lifecycle status of a quote.
///
/// The transition table lives in [`QuoteStatus::can_transition_to`];
/// services never compare raw status strings.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuoteStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl QuoteStatus {
    /// Terminal states admit no outbound transitions. Re-entering one is
    /// rejected, which keeps the confirmation side effect single-shot.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            QuoteStatus::Confirmed
                | QuoteStatus::Rejected
                | QuoteStatus::Cancelled
                | QuoteStatus::Expired
        )
    }

    /// A quote's fields may change only while it is in one of these states.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            QuoteStatus::Draft | QuoteStatus::Sent | QuoteStatus::Pending
        )
    }

    /// The transition table. `sent` and `pending` are reachable from
    /// `draft` and from each other; confirmation, rejection and expiry
    /// require the quote to have left `draft`.
    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Draft, Sent)
                | (Draft, Pending)
                | (Draft, Cancelled)
                | (Sent, Pending)
                | (Sent, Confirmed)
                | (Sent, Rejected)
                | (Sent, Cancelled)
                | (Sent, Expired)
                | (Pending, Sent)
                | (Pending, Confirmed)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Pending, Expired)
        )
    }
}

/// One product entry within a quote. Product details are value-copied at
/// creation time so the document stays stable if the catalog changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    pub product_id: Option<Uuid>,
    pub code: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// The `quotes` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-readable document number, `{PREFIX}{DD}{MM}{YY}C{seq}`.
    /// Unique; immutable once assigned.
    #[validate(length(min = 1, max = 20))]
    pub folio: String,

    /// Optional link to a stored client; prospect quotes carry only the
    /// snapshot fields below.
    pub client_id: Option<Uuid>,

    /// Client snapshot, captured at creation and independent of any later
    /// change to the referenced client record.
    pub client_name: String,
    pub client_contact: String,
    #[validate(email)]
    pub client_email: String,
    pub client_phone: String,
    pub client_address: String,
    pub client_position: Option<String>,

    /// Ordered line items, serialized as JSON.
    pub line_items: Json,

    /// `subtotal`, `tax_amount` and `total` are always consistent with
    /// `line_items`; every write path that changes the items recomputes
    /// all three in the same transaction.
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,

    pub currency: Currency,
    pub status: QuoteStatus,

    pub terms_payment_conditions: String,
    pub terms_delivery_time: String,
    pub terms_warranty: String,
    pub terms_observations: String,
    pub terms_valid_until: Option<DateTime<Utc>>,

    pub notes: Option<Json>,

    /// Set exactly once, on the first transition into the matching state.
    pub sent_date: Option<DateTime<Utc>>,
    pub confirmed_date: Option<DateTime<Utc>>,
    pub rejected_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Deserializes the line items column.
    pub fn items(&self) -> Result<Vec<QuoteLineItem>, serde_json::Error> {
        serde_json::from_value(self.line_items.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::QuoteStatus::*;
    use super::*;
    use sea_orm::Iterable;
    use std::str::FromStr;

    #[test]
    fn terminal_states_have_no_outbound_transitions() {
        for from in [Confirmed, Rejected, Cancelled, Expired] {
            for to in QuoteStatus::iter() {
                assert!(
                    !from.can_transition_to(to),
                    "{from} must not transition to {to}"
                );
            }
        }
    }

    #[test]
    fn draft_cannot_jump_to_terminal_outcomes() {
        assert!(!Draft.can_transition_to(Confirmed));
        assert!(!Draft.can_transition_to(Rejected));
        assert!(!Draft.can_transition_to(Expired));
        assert!(Draft.can_transition_to(Cancelled));
    }

    #[test]
    fn sent_and_pending_are_mutually_reachable() {
        assert!(Draft.can_transition_to(Sent));
        assert!(Draft.can_transition_to(Pending));
        assert!(Sent.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Sent));
    }

    #[test]
    fn same_status_is_not_a_transition() {
        for status in QuoteStatus::iter() {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn editable_and_terminal_partition_the_states() {
        for status in QuoteStatus::iter() {
            assert_ne!(status.is_editable(), status.is_terminal());
        }
    }

    #[test]
    fn status_parses_from_lowercase_names() {
        assert_eq!(QuoteStatus::from_str("confirmed").unwrap(), Confirmed);
        assert!(QuoteStatus::from_str("archived").is_err());
    }
}
