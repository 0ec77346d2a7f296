use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::category::{
        self, ActiveModel as CategoryActiveModel, Entity as CategoryEntity, Model as CategoryModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Request/Response types for the category service
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 300))]
    pub description: String,
    pub parent_category_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_category_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Service for managing product categories
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl CategoryService {
    /// Creates a new category service instance
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a category, generating its slug from the name.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<CategoryModel, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let slug = slugify(&request.name);
        if slug.is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "Category name '{}' does not yield a usable slug",
                request.name
            )));
        }

        let clash = CategoryEntity::find()
            .filter(
                category::Column::Name
                    .eq(request.name.clone())
                    .or(category::Column::Slug.eq(slug.clone())),
            )
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if clash.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A category named '{}' already exists",
                request.name
            )));
        }

        if let Some(parent_id) = request.parent_category_id {
            CategoryEntity::find_by_id(parent_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Parent category {} not found", parent_id))
                })?;
        }

        let now = Utc::now();
        let category_id = Uuid::new_v4();
        let active = CategoryActiveModel {
            id: Set(category_id),
            name: Set(request.name),
            description: Set(request.description),
            slug: Set(slug),
            parent_category_id: Set(request.parent_category_id),
            is_active: Set(request.is_active.unwrap_or(true)),
            sort_order: Set(request.sort_order.unwrap_or(0)),
            product_count: Set(0),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let model = active.insert(db).await.map_err(|e| {
            error!(error = %e, category_id = %category_id, "Failed to create category");
            ServiceError::DatabaseError(e)
        })?;

        info!(category_id = %category_id, slug = %model.slug, "Category created successfully");
        self.emit(Event::CategoryCreated(category_id)).await;

        Ok(model)
    }

    /// Retrieves a category by ID
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn get_category(
        &self,
        category_id: Uuid,
    ) -> Result<Option<CategoryModel>, ServiceError> {
        let category = CategoryEntity::find_by_id(category_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(category)
    }

    /// Retrieves a category by slug
    #[instrument(skip(self))]
    pub async fn get_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CategoryModel>, ServiceError> {
        let category = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(category)
    }

    /// Lists categories ordered by sort order, then name.
    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        only_active: bool,
    ) -> Result<Vec<CategoryModel>, ServiceError> {
        let mut query = CategoryEntity::find();
        if only_active {
            query = query.filter(category::Column::IsActive.eq(true));
        }

        let categories = query
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(categories)
    }

    /// Updates a category; renaming regenerates the slug.
    #[instrument(skip(self, request), fields(category_id = %category_id))]
    pub async fn update_category(
        &self,
        category_id: Uuid,
        request: UpdateCategoryRequest,
    ) -> Result<CategoryModel, ServiceError> {
        let db = &*self.db;

        let existing = CategoryEntity::find_by_id(category_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(category_id = %category_id, "Category not found for update");
                ServiceError::NotFound(format!("Category {} not found", category_id))
            })?;

        let renamed = request
            .name
            .as_ref()
            .map(|name| *name != existing.name)
            .unwrap_or(false);

        if renamed {
            let name = request.name.clone().unwrap_or_default();
            let slug = slugify(&name);
            let clash = CategoryEntity::find()
                .filter(category::Column::Id.ne(category_id))
                .filter(
                    category::Column::Name
                        .eq(name.clone())
                        .or(category::Column::Slug.eq(slug.clone())),
                )
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            if clash.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "A category named '{}' already exists",
                    name
                )));
            }
        }

        let mut active: CategoryActiveModel = existing.into();
        if let Some(name) = request.name {
            if renamed {
                active.slug = Set(slugify(&name));
            }
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(parent_id) = request.parent_category_id {
            if parent_id == category_id {
                return Err(ServiceError::InvalidOperation(
                    "A category cannot be its own parent".to_string(),
                ));
            }
            active.parent_category_id = Set(Some(parent_id));
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(sort_order) = request.sort_order {
            active.sort_order = Set(sort_order);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, category_id = %category_id, "Failed to update category");
            ServiceError::DatabaseError(e)
        })?;

        info!(category_id = %category_id, "Category updated successfully");
        self.emit(Event::CategoryUpdated(category_id)).await;

        Ok(updated)
    }

    /// Deletes a category. Rejected while subcategories point at it.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn delete_category(&self, category_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;

        let children = CategoryEntity::find()
            .filter(category::Column::ParentCategoryId.eq(category_id))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if children > 0 {
            return Err(ServiceError::Conflict(format!(
                "Category {} still has {} subcategorie(s)",
                category_id, children
            )));
        }

        let result = CategoryEntity::delete_by_id(category_id)
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, category_id = %category_id, "Failed to delete category");
                ServiceError::DatabaseError(e)
            })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }

        info!(category_id = %category_id, "Category deleted successfully");
        self.emit(Event::CategoryDeleted(category_id)).await;

        Ok(())
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send domain event");
            }
        }
    }
}

/// Lowercases the name, keeps alphanumerics, collapses everything else
/// into single hyphens.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Monitoreo de Pacientes"), "monitoreo-de-pacientes");
        assert_eq!(slugify("  Rayos   X  "), "rayos-x");
        assert_eq!(slugify("Cirugía & Anestesia"), "ciruga-anestesia");
    }

    #[test]
    fn slugify_of_symbols_is_empty() {
        assert_eq!(slugify("¡¿?!"), "");
    }
}
