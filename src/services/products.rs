use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::product::{
        self, ActiveModel as ProductActiveModel, Entity as ProductEntity, Model as ProductModel,
    },
    entities::Currency,
    errors::ServiceError,
    events::{Event, EventSender},
};

const NEAR_EXPIRY_WARNING_DAYS: i64 = 30;

/// Request/Response types for the product service
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 50, message = "Product code is required"))]
    pub code: String,
    pub item: Option<String>,
    pub service_line: Option<String>,
    pub specialty: Option<String>,
    pub classification: Option<String>,
    pub description: Option<String>,
    pub usage_notes: Option<String>,
    pub includes: Option<String>,
    #[validate(range(min = 1, message = "Package quantity must be at least 1"))]
    pub package_quantity: Option<i32>,
    pub currency: Option<Currency>,
    pub cost: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub expiry_date: Option<NaiveDate>,
    pub warehouse_location: Option<String>,
    pub storage_conditions: Option<String>,
    pub supplier: Option<String>,
    pub tax_percent: Option<Decimal>,
    pub factory_price: Option<Decimal>,
    pub landed_factor: Option<Decimal>,
    pub margin_factor: Option<Decimal>,
    pub currency_factor: Option<Decimal>,
    pub sales_commission_percent: Option<Decimal>,
    pub package_price: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub item: Option<String>,
    pub service_line: Option<String>,
    pub specialty: Option<String>,
    pub classification: Option<String>,
    pub description: Option<String>,
    pub usage_notes: Option<String>,
    pub includes: Option<String>,
    pub package_quantity: Option<i32>,
    pub currency: Option<Currency>,
    pub cost: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub expiry_date: Option<NaiveDate>,
    pub warehouse_location: Option<String>,
    pub storage_conditions: Option<String>,
    pub supplier: Option<String>,
    pub tax_percent: Option<Decimal>,
    pub factory_price: Option<Decimal>,
    pub landed_factor: Option<Decimal>,
    pub margin_factor: Option<Decimal>,
    pub currency_factor: Option<Decimal>,
    pub sales_commission_percent: Option<Decimal>,
    pub package_price: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub page: u64,
    pub per_page: u64,
    pub search: Option<String>,
    pub service_line: Option<String>,
    pub classification: Option<String>,
    pub supplier: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductStatsResponse {
    pub total_products: u64,
    pub expired: u64,
    pub near_expiry: u64,
}

/// Service for managing the product catalog
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a new catalog product.
    ///
    /// Codes are stored uppercase and trimmed; unit price and unit cost
    /// derive from their package counterparts when not provided.
    #[instrument(skip(self, request), fields(code = %request.code))]
    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductModel, ServiceError> {
        request.validate()?;

        let code = request.code.trim().to_uppercase();
        let db = &*self.db;

        let existing = ProductEntity::find()
            .filter(product::Column::Code.eq(code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A product with code {} already exists",
                code
            )));
        }

        let package_quantity = request.package_quantity.unwrap_or(1);
        let unit_price = derive_unit_value(
            request.unit_price,
            request.package_price,
            package_quantity,
        );
        let unit_cost = derive_unit_value(request.unit_cost, request.cost, package_quantity);

        let now = Utc::now();
        let product_id = Uuid::new_v4();
        let active = ProductActiveModel {
            id: Set(product_id),
            code: Set(code),
            item: Set(request.item),
            service_line: Set(request.service_line),
            specialty: Set(request.specialty),
            classification: Set(request.classification),
            description: Set(request.description),
            usage_notes: Set(request.usage_notes),
            includes: Set(request.includes),
            package_quantity: Set(package_quantity),
            currency: Set(request.currency.unwrap_or_default()),
            cost: Set(request.cost),
            unit_cost: Set(unit_cost),
            expiry_date: Set(request.expiry_date),
            warehouse_location: Set(request.warehouse_location),
            storage_conditions: Set(request.storage_conditions),
            supplier: Set(request.supplier),
            tax_percent: Set(request.tax_percent.unwrap_or(dec!(16.00))),
            factory_price: Set(request.factory_price),
            landed_factor: Set(request.landed_factor.unwrap_or(Decimal::ONE)),
            margin_factor: Set(request.margin_factor.unwrap_or(Decimal::ONE)),
            currency_factor: Set(request.currency_factor.unwrap_or(Decimal::ONE)),
            sales_commission_percent: Set(request
                .sales_commission_percent
                .unwrap_or(Decimal::ZERO)),
            package_price: Set(request.package_price),
            unit_price: Set(unit_price),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let model = active.insert(db).await.map_err(|e| {
            error!(error = %e, product_id = %product_id, "Failed to create product");
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = %product_id, code = %model.code, "Product created successfully");
        self.emit(Event::ProductCreated(product_id)).await;

        Ok(model)
    }

    /// Retrieves a product by ID
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(
        &self,
        product_id: Uuid,
    ) -> Result<Option<ProductModel>, ServiceError> {
        let product = ProductEntity::find_by_id(product_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(product)
    }

    /// Retrieves a product by catalog code (case-insensitive)
    #[instrument(skip(self))]
    pub async fn get_product_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ProductModel>, ServiceError> {
        let product = ProductEntity::find()
            .filter(product::Column::Code.eq(code.trim().to_uppercase()))
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(product)
    }

    /// Lists products with pagination, text search and filters
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<ProductListResponse, ServiceError> {
        let page = filter.page.max(1);
        let per_page = if filter.per_page == 0 { 10 } else { filter.per_page };

        let mut query = ProductEntity::find();

        if let Some(service_line) = &filter.service_line {
            query = query.filter(product::Column::ServiceLine.eq(service_line.clone()));
        }
        if let Some(classification) = &filter.classification {
            query = query.filter(product::Column::Classification.eq(classification.clone()));
        }
        if let Some(supplier) = &filter.supplier {
            query = query.filter(product::Column::Supplier.eq(supplier.clone()));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(product::Column::Code.contains(search))
                    .add(product::Column::Item.contains(search))
                    .add(product::Column::ServiceLine.contains(search))
                    .add(product::Column::Specialty.contains(search))
                    .add(product::Column::Classification.contains(search))
                    .add(product::Column::Description.contains(search))
                    .add(product::Column::Supplier.contains(search)),
            );
        }

        let paginator = query
            .order_by_desc(product::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count products");
            ServiceError::DatabaseError(e)
        })?;
        let products = paginator.fetch_page(page - 1).await.map_err(|e| {
            error!(error = %e, page, per_page, "Failed to fetch products page");
            ServiceError::DatabaseError(e)
        })?;

        Ok(ProductListResponse {
            products,
            total,
            page,
            per_page,
        })
    }

    /// Updates a product
    #[instrument(skip(self, request), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<ProductModel, ServiceError> {
        let db = &*self.db;

        let existing = ProductEntity::find_by_id(product_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(product_id = %product_id, "Product not found for update");
                ServiceError::NotFound(format!("Product {} not found", product_id))
            })?;

        if let Some(quantity) = request.package_quantity {
            if quantity < 1 {
                return Err(ServiceError::ValidationError(
                    "Package quantity must be at least 1".to_string(),
                ));
            }
        }

        let pricing_changed = request.package_quantity.is_some()
            || request.package_price.is_some()
            || request.cost.is_some()
            || request.unit_price.is_some()
            || request.unit_cost.is_some();
        let package_quantity = request.package_quantity.unwrap_or(existing.package_quantity);
        let package_price = request.package_price.or(existing.package_price);
        let cost = request.cost.or(existing.cost);
        let unit_price = derive_unit_value(request.unit_price, package_price, package_quantity);
        let unit_cost = derive_unit_value(request.unit_cost, cost, package_quantity);

        let mut active: ProductActiveModel = existing.into();
        if let Some(item) = request.item {
            active.item = Set(Some(item));
        }
        if let Some(v) = request.service_line {
            active.service_line = Set(Some(v));
        }
        if let Some(v) = request.specialty {
            active.specialty = Set(Some(v));
        }
        if let Some(v) = request.classification {
            active.classification = Set(Some(v));
        }
        if let Some(v) = request.description {
            active.description = Set(Some(v));
        }
        if let Some(v) = request.usage_notes {
            active.usage_notes = Set(Some(v));
        }
        if let Some(v) = request.includes {
            active.includes = Set(Some(v));
        }
        if let Some(v) = request.currency {
            active.currency = Set(v);
        }
        if let Some(v) = request.expiry_date {
            active.expiry_date = Set(Some(v));
        }
        if let Some(v) = request.warehouse_location {
            active.warehouse_location = Set(Some(v));
        }
        if let Some(v) = request.storage_conditions {
            active.storage_conditions = Set(Some(v));
        }
        if let Some(v) = request.supplier {
            active.supplier = Set(Some(v));
        }
        if let Some(v) = request.tax_percent {
            active.tax_percent = Set(v);
        }
        if let Some(v) = request.factory_price {
            active.factory_price = Set(Some(v));
        }
        if let Some(v) = request.landed_factor {
            active.landed_factor = Set(v);
        }
        if let Some(v) = request.margin_factor {
            active.margin_factor = Set(v);
        }
        if let Some(v) = request.currency_factor {
            active.currency_factor = Set(v);
        }
        if let Some(v) = request.sales_commission_percent {
            active.sales_commission_percent = Set(v);
        }
        if pricing_changed {
            active.package_quantity = Set(package_quantity);
            active.package_price = Set(package_price);
            active.cost = Set(cost);
            active.unit_price = Set(unit_price);
            active.unit_cost = Set(unit_cost);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, product_id = %product_id, "Failed to update product");
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = %product_id, "Product updated successfully");
        self.emit(Event::ProductUpdated(product_id)).await;

        Ok(updated)
    }

    /// Deletes a product
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: Uuid) -> Result<(), ServiceError> {
        let result = ProductEntity::delete_by_id(product_id)
            .exec(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, product_id = %product_id, "Failed to delete product");
                ServiceError::DatabaseError(e)
            })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Product {} not found",
                product_id
            )));
        }

        info!(product_id = %product_id, "Product deleted successfully");
        self.emit(Event::ProductDeleted(product_id)).await;

        Ok(())
    }

    /// Catalog-wide counts, including expiry outlook
    #[instrument(skip(self))]
    pub async fn product_stats(&self) -> Result<ProductStatsResponse, ServiceError> {
        let db = &*self.db;
        let today = Local::now().date_naive();

        let total_products = ProductEntity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let dated: Vec<ProductModel> = ProductEntity::find()
            .filter(product::Column::ExpiryDate.is_not_null())
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let expired = dated.iter().filter(|p| p.is_expired(today)).count() as u64;
        let near_expiry = dated
            .iter()
            .filter(|p| !p.is_expired(today) && p.is_near_expiry(today, NEAR_EXPIRY_WARNING_DAYS))
            .count() as u64;

        Ok(ProductStatsResponse {
            total_products,
            expired,
            near_expiry,
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

/// Derives a per-unit value from a package value when no explicit unit
/// value was given.
fn derive_unit_value(
    explicit: Option<Decimal>,
    package_value: Option<Decimal>,
    package_quantity: i32,
) -> Option<Decimal> {
    explicit.or_else(|| {
        package_value
            .filter(|_| package_quantity > 0)
            .map(|v| (v / Decimal::from(package_quantity)).round_dp(2))
    })
}
