use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Currency;

/// Clinical area an installed device belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    #[sea_orm(string_value = "monitoring")]
    Monitoring,
    #[sea_orm(string_value = "emergency")]
    Emergency,
    #[sea_orm(string_value = "ventilation")]
    Ventilation,
    #[sea_orm(string_value = "diagnostics")]
    Diagnostics,
    #[sea_orm(string_value = "laboratory")]
    Laboratory,
    #[sea_orm(string_value = "surgery")]
    Surgery,
    #[sea_orm(string_value = "radiology")]
    Radiology,
    #[sea_orm(string_value = "rehabilitation")]
    Rehabilitation,
    #[sea_orm(string_value = "anesthesia")]
    Anesthesia,
    #[sea_orm(string_value = "neonatology")]
    Neonatology,
    #[sea_orm(string_value = "cardiology")]
    Cardiology,
    #[sea_orm(string_value = "neurology")]
    Neurology,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Operational status of an installed device.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    #[sea_orm(string_value = "out_of_service")]
    OutOfService,
    #[sea_orm(string_value = "retired")]
    Retired,
}

/// Maintenance outlook for a device, derived from its last maintenance
/// date and service interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceOutlook {
    pub needed: bool,
    pub overdue: bool,
    pub next_maintenance_date: Option<NaiveDate>,
    pub days_until: Option<i64>,
}

/// The `equipment` table: devices installed at client sites.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "equipment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub client_id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    /// Serial number, stored uppercase and trimmed. Unique.
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

    /// Service interval in months.
    #[validate(range(min = 1, max = 60))]
    pub maintenance_interval_months: i32,

    pub status: EquipmentStatus,

    /// Free-form list of technical specifications.
    pub specifications: Option<Json>,

    pub notes: Option<String>,
    pub supplier: Option<String>,
    pub cost: Option<Decimal>,
    pub currency: Currency,

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
    /// Computes whether the device is due for maintenance, relative to
    /// `today`. A device with no recorded maintenance is always due.
    pub fn maintenance_outlook(&self, today: NaiveDate, warning_days: i64) -> MaintenanceOutlook {
        let Some(last) = self.last_maintenance else {
            return MaintenanceOutlook {
                needed: true,
                overdue: true,
                next_maintenance_date: None,
                days_until: None,
            };
        };

        let next = last
            .checked_add_months(Months::new(self.maintenance_interval_months as u32))
            .unwrap_or(last);
        let days_until = (next - today).num_days();

        MaintenanceOutlook {
            needed: days_until <= warning_days,
            overdue: today > next,
            next_maintenance_date: Some(next),
            days_until: Some(days_until),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(last_maintenance: Option<NaiveDate>, interval: i32) -> Model {
        Model {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            name: "Ventilator".to_string(),
            model: "V60".to_string(),
            serial_number: "SN-001".to_string(),
            category: EquipmentCategory::Ventilation,
            brand: "Acme".to_string(),
            location: "ICU".to_string(),
            install_date: None,
            purchase_date: None,
            warranty_expiry: None,
            last_maintenance,
            maintenance_interval_months: interval,
            status: EquipmentStatus::Active,
            specifications: None,
            notes: None,
            supplier: None,
            cost: None,
            currency: Currency::Mxn,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn unserviced_device_is_always_due() {
        let outlook = device(None, 12)
            .maintenance_outlook(NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(), 30);
        assert!(outlook.needed);
        assert!(outlook.overdue);
        assert_eq!(outlook.next_maintenance_date, None);
    }

    #[test]
    fn outlook_tracks_interval_in_months() {
        let last = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();

        // 6-month interval: next service 2025-07-15, not due within 30 days
        let outlook = device(Some(last), 6).maintenance_outlook(today, 30);
        assert!(!outlook.needed);
        assert!(!outlook.overdue);
        assert_eq!(
            outlook.next_maintenance_date,
            NaiveDate::from_ymd_opt(2025, 7, 15)
        );

        // 2-month interval: next service 2025-03-15, already overdue
        let outlook = device(Some(last), 2).maintenance_outlook(today, 30);
        assert!(outlook.needed);
        assert!(outlook.overdue);
    }
}
