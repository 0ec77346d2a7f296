use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Currency;

/// The `products` table: catalog of sellable items and consumables.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Catalog code, stored uppercase and trimmed. Unique.
    #[validate(length(min = 1, max = 50, message = "Product code is required"))]
    pub code: String,

    /// Display name of the item.
    #[validate(length(max = 200))]
    pub item: Option<String>,

    /// Service line the product belongs to.
    pub service_line: Option<String>,

    /// Medical specialty the product targets.
    pub specialty: Option<String>,

    pub classification: Option<String>,
    pub description: Option<String>,
    pub usage_notes: Option<String>,
    pub includes: Option<String>,

    /// Units per package; unit prices derive from package prices through it.
    #[validate(range(min = 1, message = "Package quantity must be at least 1"))]
    pub package_quantity: i32,

    pub currency: Currency,

    pub cost: Option<Decimal>,
    pub unit_cost: Option<Decimal>,

    pub expiry_date: Option<NaiveDate>,
    pub warehouse_location: Option<String>,
    pub storage_conditions: Option<String>,
    pub supplier: Option<String>,

    /// Tax percentage applied to this product (16.00 = 16%).
    pub tax_percent: Decimal,

    pub factory_price: Option<Decimal>,
    pub landed_factor: Decimal,
    pub margin_factor: Decimal,
    pub currency_factor: Decimal,
    pub sales_commission_percent: Decimal,

    pub package_price: Option<Decimal>,
    pub unit_price: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Display name, falling back to the catalog code.
    pub fn display_name(&self) -> &str {
        self.item.as_deref().unwrap_or(&self.code)
    }

    /// Final sale price: factory price adjusted by the landed, margin and
    /// currency factors plus the sales commission. Falls back to the list
    /// package price when no factory price is recorded.
    pub fn final_price(&self) -> Decimal {
        let Some(factory) = self.factory_price else {
            return self
                .package_price
                .or(self.unit_price)
                .unwrap_or(Decimal::ZERO);
        };

        let mut price = factory * self.landed_factor * self.margin_factor * self.currency_factor;
        if self.sales_commission_percent > Decimal::ZERO {
            price *= Decimal::ONE + self.sales_commission_percent / Decimal::from(100);
        }
        price
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.map_or(false, |d| d < today)
    }

    pub fn is_near_expiry(&self, today: NaiveDate, warning_days: i64) -> bool {
        self.expiry_date
            .map_or(false, |d| d <= today + chrono::Duration::days(warning_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_product() -> Model {
        Model {
            id: Uuid::new_v4(),
            code: "MON-100".to_string(),
            item: Some("Patient monitor".to_string()),
            service_line: None,
            specialty: None,
            classification: None,
            description: None,
            usage_notes: None,
            includes: None,
            package_quantity: 1,
            currency: Currency::Mxn,
            cost: None,
            unit_cost: None,
            expiry_date: None,
            warehouse_location: None,
            storage_conditions: None,
            supplier: None,
            tax_percent: dec!(16.00),
            factory_price: None,
            landed_factor: Decimal::ONE,
            margin_factor: Decimal::ONE,
            currency_factor: Decimal::ONE,
            sales_commission_percent: Decimal::ZERO,
            package_price: None,
            unit_price: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn final_price_applies_all_factors() {
        let mut p = base_product();
        p.factory_price = Some(dec!(100.00));
        p.landed_factor = dec!(1.10);
        p.margin_factor = dec!(1.50);
        p.currency_factor = dec!(2.00);
        p.sales_commission_percent = dec!(10.00);

        // 100 * 1.10 * 1.50 * 2.00 = 330, + 10% commission = 363
        assert_eq!(p.final_price(), dec!(363));
    }

    #[test]
    fn final_price_falls_back_to_list_price() {
        let mut p = base_product();
        p.package_price = Some(dec!(250.00));
        assert_eq!(p.final_price(), dec!(250.00));

        p.package_price = None;
        assert_eq!(p.final_price(), Decimal::ZERO);
    }

    #[test]
    fn expiry_checks_compare_against_given_day() {
        let mut p = base_product();
        let today = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();

        p.expiry_date = Some(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert!(p.is_expired(today));

        p.expiry_date = Some(NaiveDate::from_ymd_opt(2025, 4, 20).unwrap());
        assert!(!p.is_expired(today));
        assert!(p.is_near_expiry(today, 30));
        assert!(!p.is_near_expiry(today, 5));
    }
}
