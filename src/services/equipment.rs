use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::client::Entity as ClientEntity,
    entities::equipment::{
        self, ActiveModel as EquipmentActiveModel, Entity as EquipmentEntity, EquipmentCategory,
        EquipmentStatus, MaintenanceOutlook, Model as EquipmentModel,
    },
    entities::Currency,
    errors::ServiceError,
    events::{Event, EventSender},
};

const DEFAULT_MAINTENANCE_INTERVAL_MONTHS: i32 = 12;
const DEFAULT_MAINTENANCE_WARNING_DAYS: i64 = 30;

/// Request/Response types for the equipment service
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateEquipmentRequest {
    pub client_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(length(min = 1, max = 100))]
    pub serial_number: String,
    pub category: EquipmentCategory,
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    pub install_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub last_maintenance: Option<NaiveDate>,
    #[validate(range(min = 1, max = 60))]
    pub maintenance_interval_months: Option<i32>,
    pub status: Option<EquipmentStatus>,
    pub specifications: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub supplier: Option<String>,
    pub cost: Option<Decimal>,
    pub currency: Option<Currency>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateEquipmentRequest {
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<EquipmentCategory>,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub install_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub last_maintenance: Option<NaiveDate>,
    pub maintenance_interval_months: Option<i32>,
    pub status: Option<EquipmentStatus>,
    pub specifications: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub supplier: Option<String>,
    pub cost: Option<Decimal>,
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Default)]
pub struct EquipmentFilter {
    pub page: u64,
    pub per_page: u64,
    pub category: Option<EquipmentCategory>,
    pub status: Option<EquipmentStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EquipmentListResponse {
    pub equipment: Vec<EquipmentModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// A device together with its maintenance outlook.
#[derive(Debug, Serialize, Deserialize)]
pub struct MaintenanceAlert {
    pub equipment: EquipmentModel,
    pub outlook: MaintenanceOutlook,
}

/// Service for managing devices installed at client sites
#[derive(Clone)]
pub struct EquipmentService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl EquipmentService {
    /// Creates a new equipment service instance
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Registers a device at a client site.
    ///
    /// Serial numbers are stored uppercase and trimmed, and must be unique
    /// across the installed base.
    #[instrument(skip(self, request), fields(client_id = %request.client_id, serial = %request.serial_number))]
    pub async fn create_equipment(
        &self,
        request: CreateEquipmentRequest,
    ) -> Result<EquipmentModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;

        ClientEntity::find_by_id(request.client_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(client_id = %request.client_id, "Referenced client not found");
                ServiceError::NotFound(format!("Client {} not found", request.client_id))
            })?;

        let serial_number = request.serial_number.trim().to_uppercase();
        let existing = EquipmentEntity::find()
            .filter(equipment::Column::SerialNumber.eq(serial_number.clone()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Equipment with serial number {} already exists",
                serial_number
            )));
        }

        let now = Utc::now();
        let equipment_id = Uuid::new_v4();
        let active = EquipmentActiveModel {
            id: Set(equipment_id),
            client_id: Set(request.client_id),
            name: Set(request.name),
            model: Set(request.model),
            serial_number: Set(serial_number),
            category: Set(request.category),
            brand: Set(request.brand),
            location: Set(request.location),
            install_date: Set(request.install_date),
            purchase_date: Set(request.purchase_date),
            warranty_expiry: Set(request.warranty_expiry),
            last_maintenance: Set(request.last_maintenance),
            maintenance_interval_months: Set(request
                .maintenance_interval_months
                .unwrap_or(DEFAULT_MAINTENANCE_INTERVAL_MONTHS)),
            status: Set(request.status.unwrap_or(EquipmentStatus::Active)),
            specifications: Set(request.specifications),
            notes: Set(request.notes),
            supplier: Set(request.supplier),
            cost: Set(request.cost),
            currency: Set(request.currency.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let model = active.insert(db).await.map_err(|e| {
            error!(error = %e, equipment_id = %equipment_id, "Failed to create equipment");
            ServiceError::DatabaseError(e)
        })?;

        info!(equipment_id = %equipment_id, serial = %model.serial_number, "Equipment created successfully");
        self.emit(Event::EquipmentCreated(equipment_id)).await;

        Ok(model)
    }

    /// Retrieves a device by ID
    #[instrument(skip(self), fields(equipment_id = %equipment_id))]
    pub async fn get_equipment(
        &self,
        equipment_id: Uuid,
    ) -> Result<Option<EquipmentModel>, ServiceError> {
        let equipment = EquipmentEntity::find_by_id(equipment_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(equipment)
    }

    /// Lists a client's installed devices
    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn list_equipment_for_client(
        &self,
        client_id: Uuid,
        filter: EquipmentFilter,
    ) -> Result<EquipmentListResponse, ServiceError> {
        let page = filter.page.max(1);
        let per_page = if filter.per_page == 0 { 10 } else { filter.per_page };

        let mut query = EquipmentEntity::find()
            .filter(equipment::Column::ClientId.eq(client_id));
        if let Some(category) = filter.category {
            query = query.filter(equipment::Column::Category.eq(category));
        }
        if let Some(status) = filter.status {
            query = query.filter(equipment::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(equipment::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count equipment");
            ServiceError::DatabaseError(e)
        })?;
        let equipment = paginator.fetch_page(page - 1).await.map_err(|e| {
            error!(error = %e, page, per_page, "Failed to fetch equipment page");
            ServiceError::DatabaseError(e)
        })?;

        Ok(EquipmentListResponse {
            equipment,
            total,
            page,
            per_page,
        })
    }

    /// Updates a device
    #[instrument(skip(self, request), fields(equipment_id = %equipment_id))]
    pub async fn update_equipment(
        &self,
        equipment_id: Uuid,
        request: UpdateEquipmentRequest,
    ) -> Result<EquipmentModel, ServiceError> {
        let db = &*self.db;

        let existing = EquipmentEntity::find_by_id(equipment_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(equipment_id = %equipment_id, "Equipment not found for update");
                ServiceError::NotFound(format!("Equipment {} not found", equipment_id))
            })?;

        if let Some(interval) = request.maintenance_interval_months {
            if !(1..=60).contains(&interval) {
                return Err(ServiceError::ValidationError(
                    "Maintenance interval must be between 1 and 60 months".to_string(),
                ));
            }
        }

        if let Some(serial) = &request.serial_number {
            let serial = serial.trim().to_uppercase();
            if serial != existing.serial_number {
                let taken = EquipmentEntity::find()
                    .filter(equipment::Column::SerialNumber.eq(serial.clone()))
                    .one(db)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                if taken.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "Equipment with serial number {} already exists",
                        serial
                    )));
                }
            }
        }

        let mut active: EquipmentActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(model) = request.model {
            active.model = Set(model);
        }
        if let Some(serial) = request.serial_number {
            active.serial_number = Set(serial.trim().to_uppercase());
        }
        if let Some(category) = request.category {
            active.category = Set(category);
        }
        if let Some(brand) = request.brand {
            active.brand = Set(brand);
        }
        if let Some(location) = request.location {
            active.location = Set(location);
        }
        if let Some(v) = request.install_date {
            active.install_date = Set(Some(v));
        }
        if let Some(v) = request.purchase_date {
            active.purchase_date = Set(Some(v));
        }
        if let Some(v) = request.warranty_expiry {
            active.warranty_expiry = Set(Some(v));
        }
        if let Some(v) = request.last_maintenance {
            active.last_maintenance = Set(Some(v));
        }
        if let Some(v) = request.maintenance_interval_months {
            active.maintenance_interval_months = Set(v);
        }
        if let Some(v) = request.status {
            active.status = Set(v);
        }
        if let Some(v) = request.specifications {
            active.specifications = Set(Some(v));
        }
        if let Some(v) = request.notes {
            active.notes = Set(Some(v));
        }
        if let Some(v) = request.supplier {
            active.supplier = Set(Some(v));
        }
        if let Some(v) = request.cost {
            active.cost = Set(Some(v));
        }
        if let Some(v) = request.currency {
            active.currency = Set(v);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, equipment_id = %equipment_id, "Failed to update equipment");
            ServiceError::DatabaseError(e)
        })?;

        info!(equipment_id = %equipment_id, "Equipment updated successfully");
        self.emit(Event::EquipmentUpdated(equipment_id)).await;

        Ok(updated)
    }

    /// Deletes a device
    #[instrument(skip(self), fields(equipment_id = %equipment_id))]
    pub async fn delete_equipment(&self, equipment_id: Uuid) -> Result<(), ServiceError> {
        let result = EquipmentEntity::delete_by_id(equipment_id)
            .exec(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, equipment_id = %equipment_id, "Failed to delete equipment");
                ServiceError::DatabaseError(e)
            })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Equipment {} not found",
                equipment_id
            )));
        }

        info!(equipment_id = %equipment_id, "Equipment deleted successfully");
        self.emit(Event::EquipmentDeleted(equipment_id)).await;

        Ok(())
    }

    /// Active devices due (or overdue) for maintenance within the warning
    /// window, most urgent first.
    #[instrument(skip(self))]
    pub async fn maintenance_alerts(
        &self,
        warning_days: Option<i64>,
    ) -> Result<Vec<MaintenanceAlert>, ServiceError> {
        let warning_days = warning_days.unwrap_or(DEFAULT_MAINTENANCE_WARNING_DAYS);
        let today = Local::now().date_naive();

        let devices = EquipmentEntity::find()
            .filter(equipment::Column::Status.eq(EquipmentStatus::Active))
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut alerts: Vec<MaintenanceAlert> = devices
            .into_iter()
            .filter_map(|device| {
                let outlook = device.maintenance_outlook(today, warning_days);
                outlook.needed.then_some(MaintenanceAlert {
                    equipment: device,
                    outlook,
                })
            })
            .collect();

        alerts.sort_by_key(|alert| alert.outlook.days_until.unwrap_or(i64::MIN));

        Ok(alerts)
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send domain event");
            }
        }
    }
}
