use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, Iterable,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::client::{
        self, ActiveModel as ClientActiveModel, ClientStatus, ClientType, Entity as ClientEntity,
        Model as ClientModel,
    },
    entities::{equipment, quote},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Request/Response types for the client service
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 200, message = "Client name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Contact person is required"))]
    pub contact: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "Phone is required"))]
    pub phone: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub rfc: Option<String>,
    pub client_type: ClientType,
    pub status: Option<ClientStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub rfc: Option<String>,
    pub client_type: Option<ClientType>,
    pub status: Option<ClientStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub page: u64,
    pub per_page: u64,
    pub search: Option<String>,
    pub client_type: Option<ClientType>,
    pub status: Option<ClientStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientListResponse {
    pub clients: Vec<ClientModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientStatsResponse {
    pub total_clients: u64,
    pub active_clients: u64,
    pub inactive_clients: u64,
    pub suspended_clients: u64,
    pub clients_by_type: Vec<(ClientType, u64)>,
}

/// Service for managing clients
#[derive(Clone)]
pub struct ClientService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ClientService {
    /// Creates a new client service instance
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a new client
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_client(
        &self,
        request: CreateClientRequest,
    ) -> Result<ClientModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let existing = ClientEntity::find()
            .filter(client::Column::Email.eq(request.email.clone()))
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to check client email uniqueness");
                ServiceError::DatabaseError(e)
            })?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A client with email {} already exists",
                request.email
            )));
        }

        let now = Utc::now();
        let client_id = Uuid::new_v4();
        let country = request.country.unwrap_or_else(|| "México".to_string());
        let full_address = compose_full_address(
            request.street.as_deref(),
            request.city.as_deref(),
            request.state.as_deref(),
            request.postal_code.as_deref(),
            Some(&country),
        );

        let active = ClientActiveModel {
            id: Set(client_id),
            name: Set(request.name),
            contact: Set(request.contact),
            email: Set(request.email),
            phone: Set(request.phone),
            street: Set(request.street),
            city: Set(request.city),
            state: Set(request.state),
            postal_code: Set(request.postal_code),
            country: Set(country),
            full_address: Set(full_address),
            rfc: Set(request.rfc),
            client_type: Set(request.client_type),
            status: Set(request.status.unwrap_or(ClientStatus::Active)),
            notes: Set(request.notes),
            last_quote_date: Set(None),
            total_quotes: Set(0),
            total_amount: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let model = active.insert(db).await.map_err(|e| {
            error!(error = %e, client_id = %client_id, "Failed to create client");
            ServiceError::DatabaseError(e)
        })?;

        info!(client_id = %client_id, "Client created successfully");
        self.emit(Event::ClientCreated(client_id)).await;

        Ok(model)
    }

    /// Retrieves a client by ID
    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn get_client(&self, client_id: Uuid) -> Result<Option<ClientModel>, ServiceError> {
        let client = ClientEntity::find_by_id(client_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(client)
    }

    /// Retrieves a client by email
    #[instrument(skip(self))]
    pub async fn get_client_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ClientModel>, ServiceError> {
        let client = ClientEntity::find()
            .filter(client::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(client)
    }

    /// Lists clients with pagination and optional filters
    #[instrument(skip(self))]
    pub async fn list_clients(
        &self,
        filter: ClientFilter,
    ) -> Result<ClientListResponse, ServiceError> {
        let page = filter.page.max(1);
        let per_page = if filter.per_page == 0 { 10 } else { filter.per_page };

        let mut query = ClientEntity::find();

        if let Some(client_type) = filter.client_type {
            query = query.filter(client::Column::ClientType.eq(client_type));
        }
        if let Some(status) = filter.status {
            query = query.filter(client::Column::Status.eq(status));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(client::Column::Name.contains(search))
                    .add(client::Column::Contact.contains(search))
                    .add(client::Column::Email.contains(search)),
            );
        }

        let paginator = query
            .order_by_desc(client::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count clients");
            ServiceError::DatabaseError(e)
        })?;
        let clients = paginator.fetch_page(page - 1).await.map_err(|e| {
            error!(error = %e, page, per_page, "Failed to fetch clients page");
            ServiceError::DatabaseError(e)
        })?;

        Ok(ClientListResponse {
            clients,
            total,
            page,
            per_page,
        })
    }

    /// Updates an existing client
    #[instrument(skip(self, request), fields(client_id = %client_id))]
    pub async fn update_client(
        &self,
        client_id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<ClientModel, ServiceError> {
        let db = &*self.db;

        let existing = ClientEntity::find_by_id(client_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(client_id = %client_id, "Client not found for update");
                ServiceError::NotFound(format!("Client {} not found", client_id))
            })?;

        if let Some(email) = &request.email {
            if *email != existing.email {
                let taken = ClientEntity::find()
                    .filter(client::Column::Email.eq(email.clone()))
                    .one(db)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                if taken.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "A client with email {} already exists",
                        email
                    )));
                }
            }
        }

        let street = request.street.clone().or(existing.street.clone());
        let city = request.city.clone().or(existing.city.clone());
        let state = request.state.clone().or(existing.state.clone());
        let postal_code = request.postal_code.clone().or(existing.postal_code.clone());
        let country = request
            .country
            .clone()
            .unwrap_or_else(|| existing.country.clone());
        let full_address = compose_full_address(
            street.as_deref(),
            city.as_deref(),
            state.as_deref(),
            postal_code.as_deref(),
            Some(&country),
        );

        let mut active: ClientActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(contact) = request.contact {
            active.contact = Set(contact);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(rfc) = request.rfc {
            active.rfc = Set(Some(rfc));
        }
        if let Some(client_type) = request.client_type {
            active.client_type = Set(client_type);
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }
        active.street = Set(street);
        active.city = Set(city);
        active.state = Set(state);
        active.postal_code = Set(postal_code);
        active.country = Set(country);
        active.full_address = Set(full_address);
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, client_id = %client_id, "Failed to update client");
            ServiceError::DatabaseError(e)
        })?;

        info!(client_id = %client_id, "Client updated successfully");
        self.emit(Event::ClientUpdated(client_id)).await;

        Ok(updated)
    }

    /// Deletes a client. Rejected while quotes or equipment still
    /// reference it.
    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn delete_client(&self, client_id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for client deletion");
            ServiceError::DatabaseError(e)
        })?;

        let existing = ClientEntity::find_by_id(client_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Client {} not found", client_id)))?;

        let quote_count = quote::Entity::find()
            .filter(quote::Column::ClientId.eq(client_id))
            .count(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if quote_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "Client {} still has {} quote(s)",
                existing.name, quote_count
            )));
        }

        let equipment_count = equipment::Entity::find()
            .filter(equipment::Column::ClientId.eq(client_id))
            .count(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if equipment_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "Client {} still has {} equipment record(s)",
                existing.name, equipment_count
            )));
        }

        ClientEntity::delete_by_id(client_id)
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, client_id = %client_id, "Failed to delete client");
                ServiceError::DatabaseError(e)
            })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, client_id = %client_id, "Failed to commit client deletion");
            ServiceError::DatabaseError(e)
        })?;

        info!(client_id = %client_id, "Client deleted successfully");
        self.emit(Event::ClientDeleted(client_id)).await;

        Ok(())
    }

    /// Aggregate counts by status and type
    #[instrument(skip(self))]
    pub async fn client_stats(&self) -> Result<ClientStatsResponse, ServiceError> {
        let db = &*self.db;

        let total_clients = ClientEntity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let count_status = |status: ClientStatus| {
            ClientEntity::find().filter(client::Column::Status.eq(status))
        };
        let active_clients = count_status(ClientStatus::Active)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let inactive_clients = count_status(ClientStatus::Inactive)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let suspended_clients = count_status(ClientStatus::Suspended)
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut clients_by_type = Vec::new();
        for client_type in ClientType::iter() {
            let count = ClientEntity::find()
                .filter(client::Column::ClientType.eq(client_type))
                .count(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            clients_by_type.push((client_type, count));
        }

        Ok(ClientStatsResponse {
            total_clients,
            active_clients,
            inactive_clients,
            suspended_clients,
            clients_by_type,
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

/// Joins the non-empty address parts into one display line.
fn compose_full_address(
    street: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    postal_code: Option<&str>,
    country: Option<&str>,
) -> Option<String> {
    let parts: Vec<&str> = [street, city, state, postal_code, country]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

// Client statistics are mutated exclusively by the quote lifecycle through
// the helpers below, always as storage-level "add N to current value"
// expressions inside the caller's transaction.

/// Quote created for this client: bump the counter, stamp the date.
pub(crate) async fn record_quote_created<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    ClientEntity::update_many()
        .col_expr(
            client::Column::TotalQuotes,
            Expr::col(client::Column::TotalQuotes).add(1),
        )
        .col_expr(client::Column::LastQuoteDate, Expr::value(now))
        .col_expr(client::Column::UpdatedAt, Expr::value(now))
        .filter(client::Column::Id.eq(client_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Draft quote deleted: decrement the counter, never below zero.
pub(crate) async fn record_quote_deleted<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
) -> Result<(), DbErr> {
    ClientEntity::update_many()
        .col_expr(
            client::Column::TotalQuotes,
            Expr::col(client::Column::TotalQuotes).sub(1),
        )
        .filter(client::Column::Id.eq(client_id))
        .filter(client::Column::TotalQuotes.gt(0))
        .exec(db)
        .await?;
    Ok(())
}

/// Quote confirmed: accumulate its total into the client's lifetime value.
pub(crate) async fn record_quote_confirmed<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
    amount: Decimal,
) -> Result<(), DbErr> {
    ClientEntity::update_many()
        .col_expr(
            client::Column::TotalAmount,
            Expr::col(client::Column::TotalAmount).add(amount),
        )
        .filter(client::Column::Id.eq(client_id))
        .exec(db)
        .await?;
    Ok(())
}
