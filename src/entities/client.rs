use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Lifecycle status of a client account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

/// Kind of institution the client is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    #[sea_orm(string_value = "hospital")]
    Hospital,
    #[sea_orm(string_value = "clinic")]
    Clinic,
    #[sea_orm(string_value = "laboratory")]
    Laboratory,
    #[sea_orm(string_value = "diagnostic_center")]
    DiagnosticCenter,
    #[sea_orm(string_value = "practice")]
    Practice,
    #[sea_orm(string_value = "other")]
    Other,
}

/// The `clients` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

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
    pub country: String,

    /// Address parts joined into a single display line, derived on write.
    pub full_address: Option<String>,

    /// Mexican tax id; optional but format-checked when present.
    #[validate(custom = "validate_rfc")]
    pub rfc: Option<String>,

    pub client_type: ClientType,
    pub status: ClientStatus,
    pub notes: Option<String>,

    /// Timestamp of the most recent quote issued to this client.
    /// Maintained by the quote lifecycle only, never computed ad hoc.
    pub last_quote_date: Option<DateTime<Utc>>,

    /// Count of quotes ever issued to this client (never below zero).
    /// Maintained by the quote lifecycle only.
    pub total_quotes: i32,

    /// Cumulative value of confirmed quotes.
    /// Maintained by the quote lifecycle only.
    pub total_amount: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quote::Entity")]
    Quotes,
    #[sea_orm(has_many = "super::equipment::Entity")]
    Equipment,
}

impl Related<super::quote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotes.def()
    }
}

impl Related<super::equipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Validates the RFC format: 3-4 uppercase letters (Ñ and & allowed),
/// 6 digits of date, 3 alphanumeric homoclave characters.
fn validate_rfc(rfc: &str) -> Result<(), ValidationError> {
    let chars: Vec<char> = rfc.trim().chars().collect();
    let len = chars.len();
    if !(12..=13).contains(&len) {
        return Err(ValidationError::new("rfc_length"));
    }

    let letters = len - 9;
    let letters_ok = chars[..letters]
        .iter()
        .all(|c| c.is_ascii_uppercase() || *c == 'Ñ' || *c == '&');
    let digits_ok = chars[letters..letters + 6].iter().all(|c| c.is_ascii_digit());
    let homoclave_ok = chars[letters + 6..]
        .iter()
        .all(|c| c.is_ascii_alphanumeric());

    if letters_ok && digits_ok && homoclave_ok {
        Ok(())
    } else {
        Err(ValidationError::new("rfc_format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc_accepts_generic_and_company_formats() {
        assert!(validate_rfc("XAXX010101000").is_ok());
        assert!(validate_rfc("ABC680524P76").is_ok());
    }

    #[test]
    fn rfc_rejects_malformed_values() {
        assert!(validate_rfc("not-an-rfc").is_err());
        assert!(validate_rfc("xaxx010101000").is_err());
        assert!(validate_rfc("XAXX01010").is_err());
    }
}
