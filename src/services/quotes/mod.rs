use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::QuoteConfig,
    db::DbPool,
    entities::client::Entity as ClientEntity,
    entities::quote::{
        self, ActiveModel as QuoteActiveModel, Entity as QuoteEntity, Model as QuoteModel,
        QuoteStatus,
    },
    entities::Currency,
    errors::ServiceError,
    events::{Event, EventSender},
    services::clients as client_stats,
};

pub mod folio;
pub mod totals;

pub use totals::{compute_totals, normalize_line_items, QuoteTotals};

/// Request/Response types for the quote service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemInput {
    pub product_id: Option<Uuid>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermsInput {
    pub payment_conditions: Option<String>,
    pub delivery_time: Option<String>,
    pub warranty: Option<String>,
    pub observations: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub client_contact: Option<String>,
    #[validate(
        length(min = 1, message = "Client email is required"),
        email(message = "Client email must be valid")
    )]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub line_items: Vec<LineItemInput>,
    pub terms: Option<TermsInput>,
    pub currency: Option<Currency>,
    /// Overrides the configured default tax rate when present.
    pub tax_rate: Option<Decimal>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateQuoteRequest {
    pub client_name: Option<String>,
    pub client_contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub line_items: Option<Vec<LineItemInput>>,
    pub terms: Option<TermsInput>,
    pub currency: Option<Currency>,
    pub notes: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    pub page: u64,
    pub per_page: u64,
    pub status: Option<QuoteStatus>,
    pub client_id: Option<Uuid>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteListResponse {
    pub quotes: Vec<QuoteModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteStatsResponse {
    pub total_quotes: u64,
    pub draft_quotes: u64,
    pub sent_quotes: u64,
    pub pending_quotes: u64,
    pub confirmed_quotes: u64,
    pub rejected_quotes: u64,
    pub cancelled_quotes: u64,
    pub expired_quotes: u64,
    /// Cumulative value of confirmed quotes.
    pub total_value: Decimal,
    pub average_quote_value: Decimal,
}

/// Service for managing quotes: folio allocation, totals derivation and
/// the status lifecycle with its client-statistics side effects.
#[derive(Clone)]
pub struct QuoteService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    settings: QuoteConfig,
}

impl QuoteService {
    /// Creates a new quote service instance
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        settings: QuoteConfig,
    ) -> Self {
        Self {
            db,
            event_sender,
            settings,
        }
    }

    /// Creates a new quote.
    ///
    /// Folio allocation, the quote insert and the client-statistics bump
    /// commit as one transaction per attempt. A unique-constraint hit on
    /// the folio rolls the attempt back and retries with a recomputed
    /// sequence, up to the configured budget.
    #[instrument(skip(self, request), fields(client_id = ?request.client_id))]
    pub async fn create_quote(
        &self,
        request: CreateQuoteRequest,
    ) -> Result<QuoteModel, ServiceError> {
        request.validate()?;

        let items = totals::normalize_line_items(&request.line_items)?;
        let tax_rate = request.tax_rate.unwrap_or(self.settings.tax_rate);
        let computed = totals::compute_totals(&items, tax_rate);
        let line_items_json = serde_json::to_value(&items)
            .map_err(|e| ServiceError::InternalError(format!("line item serialization: {}", e)))?;

        let date_prefix =
            folio::folio_prefix(&self.settings.folio_prefix, Local::now().date_naive());
        let terms = request.terms.clone().unwrap_or_default();

        for attempt in 1..=self.settings.folio_max_attempts {
            let txn = self.db.begin().await.map_err(|e| {
                error!(error = %e, "Failed to start transaction for quote creation");
                ServiceError::DatabaseError(e)
            })?;

            let resolved_client = match request.client_id {
                Some(client_id) => Some(
                    ClientEntity::find_by_id(client_id)
                        .one(&txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?
                        .ok_or_else(|| {
                            warn!(client_id = %client_id, "Referenced client not found");
                            ServiceError::NotFound(format!("Client {} not found", client_id))
                        })?,
                ),
                None => None,
            };

            let folio = next_folio(&txn, &date_prefix).await?;
            let now = Utc::now();
            let quote_id = Uuid::new_v4();

            let active = QuoteActiveModel {
                id: Set(quote_id),
                folio: Set(folio.clone()),
                client_id: Set(request.client_id),
                client_name: Set(request
                    .client_name
                    .clone()
                    .or_else(|| resolved_client.as_ref().map(|c| c.name.clone()))
                    .unwrap_or_else(|| "Cliente".to_string())),
                client_contact: Set(request
                    .client_contact
                    .clone()
                    .or_else(|| resolved_client.as_ref().map(|c| c.contact.clone()))
                    .unwrap_or_else(|| "Contacto".to_string())),
                client_email: Set(request.email.clone()),
                client_phone: Set(request
                    .phone
                    .clone()
                    .or_else(|| resolved_client.as_ref().map(|c| c.phone.clone()))
                    .unwrap_or_default()),
                client_address: Set(request
                    .address
                    .clone()
                    .or_else(|| resolved_client.as_ref().and_then(|c| c.full_address.clone()))
                    .unwrap_or_default()),
                client_position: Set(request.position.clone()),
                line_items: Set(line_items_json.clone()),
                subtotal: Set(computed.subtotal),
                tax_rate: Set(tax_rate),
                tax_amount: Set(computed.tax_amount),
                total: Set(computed.total),
                currency: Set(request.currency.unwrap_or_default()),
                status: Set(QuoteStatus::Draft),
                terms_payment_conditions: Set(terms
                    .payment_conditions
                    .clone()
                    .unwrap_or_else(|| self.settings.default_payment_conditions.clone())),
                terms_delivery_time: Set(terms
                    .delivery_time
                    .clone()
                    .unwrap_or_else(|| self.settings.default_delivery_time.clone())),
                terms_warranty: Set(terms
                    .warranty
                    .clone()
                    .unwrap_or_else(|| self.settings.default_warranty.clone())),
                terms_observations: Set(terms
                    .observations
                    .clone()
                    .unwrap_or_else(|| self.settings.default_observations.clone())),
                terms_valid_until: Set(terms.valid_until),
                notes: Set(None),
                sent_date: Set(None),
                confirmed_date: Set(None),
                rejected_date: Set(None),
                created_at: Set(now),
                updated_at: Set(Some(now)),
            };

            match active.insert(&txn).await {
                Ok(model) => {
                    if let Some(client) = &resolved_client {
                        client_stats::record_quote_created(&txn, client.id, now)
                            .await
                            .map_err(|e| {
                                error!(error = %e, client_id = %client.id, "Failed to update client statistics");
                                ServiceError::DatabaseError(e)
                            })?;
                    }

                    txn.commit().await.map_err(|e| {
                        error!(error = %e, quote_id = %quote_id, "Failed to commit quote creation");
                        ServiceError::DatabaseError(e)
                    })?;

                    info!(quote_id = %quote_id, folio = %model.folio, "Quote created successfully");
                    self.emit(Event::QuoteCreated(quote_id)).await;
                    return Ok(model);
                }
                Err(e) => {
                    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                        warn!(folio = %folio, attempt, "Folio already taken, retrying allocation");
                        continue;
                    }
                    error!(error = %e, folio = %folio, "Failed to insert quote");
                    return Err(ServiceError::DatabaseError(e));
                }
            }
        }

        Err(ServiceError::FolioAllocationFailed(format!(
            "no free folio for prefix {} after {} attempts",
            date_prefix, self.settings.folio_max_attempts
        )))
    }

    /// Retrieves a quote by ID
    #[instrument(skip(self), fields(quote_id = %quote_id))]
    pub async fn get_quote(&self, quote_id: Uuid) -> Result<Option<QuoteModel>, ServiceError> {
        let quote = QuoteEntity::find_by_id(quote_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(quote)
    }

    /// Retrieves a quote by folio
    #[instrument(skip(self))]
    pub async fn get_quote_by_folio(
        &self,
        folio: &str,
    ) -> Result<Option<QuoteModel>, ServiceError> {
        let quote = QuoteEntity::find()
            .filter(quote::Column::Folio.eq(folio))
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(quote)
    }

    /// Lists quotes with pagination and optional filters
    #[instrument(skip(self))]
    pub async fn list_quotes(
        &self,
        filter: QuoteFilter,
    ) -> Result<QuoteListResponse, ServiceError> {
        let page = filter.page.max(1);
        let per_page = if filter.per_page == 0 { 10 } else { filter.per_page };

        let mut query = QuoteEntity::find();

        if let Some(status) = filter.status {
            query = query.filter(quote::Column::Status.eq(status));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(quote::Column::ClientId.eq(client_id));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(quote::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(quote::Column::CreatedAt.lte(to));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(quote::Column::Folio.contains(search))
                    .add(quote::Column::ClientName.contains(search))
                    .add(quote::Column::ClientContact.contains(search)),
            );
        }

        let paginator = query
            .order_by_desc(quote::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count quotes");
            ServiceError::DatabaseError(e)
        })?;
        let quotes = paginator.fetch_page(page - 1).await.map_err(|e| {
            error!(error = %e, page, per_page, "Failed to fetch quotes page");
            ServiceError::DatabaseError(e)
        })?;

        Ok(QuoteListResponse {
            quotes,
            total,
            page,
            per_page,
        })
    }

    /// Updates a quote's fields.
    ///
    /// Rejected once the quote reached a terminal state. A payload that
    /// includes line items recomputes subtotal, tax and total in the same
    /// transaction.
    #[instrument(skip(self, request), fields(quote_id = %quote_id))]
    pub async fn update_quote(
        &self,
        quote_id: Uuid,
        request: UpdateQuoteRequest,
    ) -> Result<QuoteModel, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for quote update");
            ServiceError::DatabaseError(e)
        })?;

        let existing = QuoteEntity::find_by_id(quote_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(quote_id = %quote_id, "Quote not found for update");
                ServiceError::NotFound(format!("Quote {} not found", quote_id))
            })?;

        if !existing.status.is_editable() {
            return Err(ServiceError::IllegalTransition(format!(
                "Quote {} is {} and can no longer be edited",
                existing.folio, existing.status
            )));
        }

        if let Some(email) = &request.email {
            if email.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "Client email cannot be empty".to_string(),
                ));
            }
        }

        let tax_rate = existing.tax_rate;
        let folio = existing.folio.clone();
        let mut active: QuoteActiveModel = existing.into();

        if let Some(items_input) = &request.line_items {
            if items_input.is_empty() {
                return Err(ServiceError::ValidationError(
                    "At least one line item is required".to_string(),
                ));
            }
            let items = totals::normalize_line_items(items_input)?;
            let computed = totals::compute_totals(&items, tax_rate);
            let json = serde_json::to_value(&items).map_err(|e| {
                ServiceError::InternalError(format!("line item serialization: {}", e))
            })?;

            active.line_items = Set(json);
            active.subtotal = Set(computed.subtotal);
            active.tax_amount = Set(computed.tax_amount);
            active.total = Set(computed.total);
        }

        if let Some(name) = request.client_name {
            active.client_name = Set(name);
        }
        if let Some(contact) = request.client_contact {
            active.client_contact = Set(contact);
        }
        if let Some(email) = request.email {
            active.client_email = Set(email);
        }
        if let Some(phone) = request.phone {
            active.client_phone = Set(phone);
        }
        if let Some(address) = request.address {
            active.client_address = Set(address);
        }
        if let Some(position) = request.position {
            active.client_position = Set(Some(position));
        }
        if let Some(currency) = request.currency {
            active.currency = Set(currency);
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(terms) = request.terms {
            if let Some(v) = terms.payment_conditions {
                active.terms_payment_conditions = Set(v);
            }
            if let Some(v) = terms.delivery_time {
                active.terms_delivery_time = Set(v);
            }
            if let Some(v) = terms.warranty {
                active.terms_warranty = Set(v);
            }
            if let Some(v) = terms.observations {
                active.terms_observations = Set(v);
            }
            if let Some(v) = terms.valid_until {
                active.terms_valid_until = Set(Some(v));
            }
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, quote_id = %quote_id, "Failed to update quote");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, quote_id = %quote_id, "Failed to commit quote update");
            ServiceError::DatabaseError(e)
        })?;

        info!(quote_id = %quote_id, folio = %folio, "Quote updated successfully");
        self.emit(Event::QuoteUpdated(quote_id)).await;

        Ok(updated)
    }

    /// Moves a quote through its lifecycle.
    ///
    /// Transition legality comes from [`QuoteStatus::can_transition_to`];
    /// confirming a quote linked to a client adds its total to the
    /// client's lifetime amount inside the same transaction.
    #[instrument(skip(self), fields(quote_id = %quote_id, new_status = %new_status))]
    pub async fn update_status(
        &self,
        quote_id: Uuid,
        new_status: QuoteStatus,
    ) -> Result<QuoteModel, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for status update");
            ServiceError::DatabaseError(e)
        })?;

        let existing = QuoteEntity::find_by_id(quote_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(quote_id = %quote_id, "Quote not found for status update");
                ServiceError::NotFound(format!("Quote {} not found", quote_id))
            })?;

        let old_status = existing.status;
        if !old_status.can_transition_to(new_status) {
            return Err(ServiceError::IllegalTransition(format!(
                "Cannot transition quote {} from '{}' to '{}'",
                existing.folio, old_status, new_status
            )));
        }

        let now = Utc::now();
        let client_id = existing.client_id;
        let total = existing.total;
        let sent_date_unset = existing.sent_date.is_none();
        let confirmed_date_unset = existing.confirmed_date.is_none();
        let rejected_date_unset = existing.rejected_date.is_none();

        let mut active: QuoteActiveModel = existing.into();
        active.status = Set(new_status);
        active.updated_at = Set(Some(now));

        match new_status {
            QuoteStatus::Sent if sent_date_unset => {
                active.sent_date = Set(Some(now));
            }
            QuoteStatus::Confirmed => {
                if confirmed_date_unset {
                    active.confirmed_date = Set(Some(now));
                }
                if let Some(client_id) = client_id {
                    client_stats::record_quote_confirmed(&txn, client_id, total)
                        .await
                        .map_err(|e| {
                            error!(error = %e, client_id = %client_id, "Failed to update client total amount");
                            ServiceError::DatabaseError(e)
                        })?;
                }
            }
            QuoteStatus::Rejected if rejected_date_unset => {
                active.rejected_date = Set(Some(now));
            }
            _ => {}
        }

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, quote_id = %quote_id, "Failed to update quote status");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, quote_id = %quote_id, "Failed to commit status update");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            quote_id = %quote_id,
            old_status = %old_status,
            new_status = %new_status,
            "Quote status updated successfully"
        );

        self.emit(Event::QuoteStatusChanged {
            quote_id,
            old_status: old_status.to_string(),
            new_status: new_status.to_string(),
        })
        .await;
        if new_status == QuoteStatus::Confirmed {
            self.emit(Event::QuoteConfirmed {
                quote_id,
                client_id,
                total,
            })
            .await;
        }

        Ok(updated)
    }

    /// Parses and applies a status sent as text, e.g. from a request body.
    pub async fn update_status_str(
        &self,
        quote_id: Uuid,
        new_status: &str,
    ) -> Result<QuoteModel, ServiceError> {
        let status = QuoteStatus::from_str(new_status).map_err(|_| {
            ServiceError::InvalidStatus(format!("Unknown quote status '{}'", new_status))
        })?;
        self.update_status(quote_id, status).await
    }

    /// Deletes a quote. Only drafts are deletable; the linked client's
    /// quote counter is decremented in the same transaction.
    #[instrument(skip(self), fields(quote_id = %quote_id))]
    pub async fn delete_quote(&self, quote_id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for quote deletion");
            ServiceError::DatabaseError(e)
        })?;

        let existing = QuoteEntity::find_by_id(quote_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(quote_id = %quote_id, "Quote not found for deletion");
                ServiceError::NotFound(format!("Quote {} not found", quote_id))
            })?;

        if existing.status != QuoteStatus::Draft {
            return Err(ServiceError::IllegalTransition(format!(
                "Only draft quotes can be deleted; {} is {}",
                existing.folio, existing.status
            )));
        }

        let client_id = existing.client_id;
        QuoteEntity::delete_by_id(quote_id)
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, quote_id = %quote_id, "Failed to delete quote");
                ServiceError::DatabaseError(e)
            })?;

        if let Some(client_id) = client_id {
            client_stats::record_quote_deleted(&txn, client_id)
                .await
                .map_err(|e| {
                    error!(error = %e, client_id = %client_id, "Failed to update client statistics");
                    ServiceError::DatabaseError(e)
                })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, quote_id = %quote_id, "Failed to commit quote deletion");
            ServiceError::DatabaseError(e)
        })?;

        info!(quote_id = %quote_id, "Quote deleted successfully");
        self.emit(Event::QuoteDeleted(quote_id)).await;

        Ok(())
    }

    /// Aggregate statistics across all quotes
    #[instrument(skip(self))]
    pub async fn quote_stats(&self) -> Result<QuoteStatsResponse, ServiceError> {
        let db = &*self.db;

        let total_quotes = QuoteEntity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let count_status = |status: QuoteStatus| {
            QuoteEntity::find().filter(quote::Column::Status.eq(status))
        };
        let draft_quotes = count_status(QuoteStatus::Draft)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let sent_quotes = count_status(QuoteStatus::Sent)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let pending_quotes = count_status(QuoteStatus::Pending)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let confirmed_quotes = count_status(QuoteStatus::Confirmed)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let rejected_quotes = count_status(QuoteStatus::Rejected)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let cancelled_quotes = count_status(QuoteStatus::Cancelled)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let expired_quotes = count_status(QuoteStatus::Expired)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let confirmed_totals: Vec<Decimal> = QuoteEntity::find()
            .select_only()
            .column(quote::Column::Total)
            .filter(quote::Column::Status.eq(QuoteStatus::Confirmed))
            .into_tuple()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let total_value: Decimal = confirmed_totals.iter().copied().sum();
        let average_quote_value = if confirmed_quotes > 0 {
            (total_value / Decimal::from(confirmed_quotes)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        Ok(QuoteStatsResponse {
            total_quotes,
            draft_quotes,
            sent_quotes,
            pending_quotes,
            confirmed_quotes,
            rejected_quotes,
            cancelled_quotes,
            expired_quotes,
            total_value,
            average_quote_value,
        })
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send domain event");
            }
        }
    }
}

/// Computes the next free folio for the day inside the caller's
/// transaction: load the day's folios, take the numeric max of the parsed
/// sequences, add one.
async fn next_folio<C: ConnectionTrait>(db: &C, date_prefix: &str) -> Result<String, ServiceError> {
    let existing: Vec<String> = QuoteEntity::find()
        .select_only()
        .column(quote::Column::Folio)
        .filter(quote::Column::Folio.starts_with(date_prefix))
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| {
            error!(error = %e, date_prefix, "Failed to look up folios for the day");
            ServiceError::DatabaseError(e)
        })?;

    let sequence = folio::next_sequence(existing.iter().map(String::as_str));
    Ok(folio::format_folio(date_prefix, sequence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn minimal_request() -> CreateQuoteRequest {
        CreateQuoteRequest {
            client_id: None,
            client_name: None,
            client_contact: None,
            email: "buyer@hospital.mx".to_string(),
            phone: None,
            address: None,
            position: None,
            line_items: vec![LineItemInput {
                quantity: Some(1),
                unit_price: Some(dec!(100)),
                ..Default::default()
            }],
            terms: None,
            currency: None,
            tax_rate: None,
        }
    }

    #[test]
    fn create_request_requires_email() {
        let mut request = minimal_request();
        request.email = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_requires_line_items() {
        let mut request = minimal_request();
        request.line_items.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn well_formed_request_passes_validation() {
        assert!(minimal_request().validate().is_ok());
    }
}
