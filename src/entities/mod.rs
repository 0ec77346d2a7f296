pub mod category;
pub mod client;
pub mod equipment;
pub mod product;
pub mod quote;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Currency a monetary amount is denominated in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum Currency {
    #[sea_orm(string_value = "MXN")]
    #[serde(rename = "MXN")]
    Mxn,
    #[sea_orm(string_value = "USD")]
    #[serde(rename = "USD")]
    Usd,
    #[sea_orm(string_value = "EUR")]
    #[serde(rename = "EUR")]
    Eur,
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Mxn
    }
}
