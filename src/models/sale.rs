use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::ContractError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: i64,
    pub company_id: i64,
    pub customer_id: i64,
    pub seller_id: i64,
    pub status: String,
    pub price: Decimal,
    pub square_feet: f64,
    pub notes: Option<String>,
    pub project_address: Option<String>,
    pub sale_date: DateTime<Utc>,
    pub cancelled_date: Option<DateTime<Utc>>,
    pub installed_date: Option<DateTime<Utc>>,
}

impl Sale {
    pub fn status(&self) -> Result<SaleStatus, ContractError> {
        self.status.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Cut,
    Sold,
    Installed,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Cut => "cut",
            Self::Sold => "sold",
            Self::Installed => "installed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Forward moves only. Cancelling goes through `Contract::unsell`.
    pub fn can_transition_to(self, next: SaleStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Cut)
                | (Self::Pending, Self::Sold)
                | (Self::Cut, Self::Sold)
                | (Self::Cut, Self::Installed)
                | (Self::Sold, Self::Installed)
        )
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleStatus {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "cut" => Ok(Self::Cut),
            "sold" => Ok(Self::Sold),
            "installed" => Ok(Self::Installed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ContractError::invalid(format!("unknown sale status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub company_id: i64,
    pub customer_id: i64,
    pub seller_id: i64,
    pub price: Decimal,
    pub square_feet: f64,
    pub notes: Option<String>,
    pub project_address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SaleUpdate {
    pub customer_id: i64,
    pub seller_id: i64,
    pub price: Decimal,
    pub square_feet: f64,
    pub notes: Option<String>,
    pub project_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            SaleStatus::Pending,
            SaleStatus::Cut,
            SaleStatus::Sold,
            SaleStatus::Installed,
            SaleStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SaleStatus>().unwrap(), status);
        }
        assert!("shipped".parse::<SaleStatus>().is_err());
    }

    #[test]
    fn lifecycle_moves_forward() {
        assert!(SaleStatus::Pending.can_transition_to(SaleStatus::Cut));
        assert!(SaleStatus::Pending.can_transition_to(SaleStatus::Sold));
        assert!(SaleStatus::Cut.can_transition_to(SaleStatus::Installed));
        assert!(SaleStatus::Sold.can_transition_to(SaleStatus::Installed));

        assert!(!SaleStatus::Pending.can_transition_to(SaleStatus::Installed));
        assert!(!SaleStatus::Sold.can_transition_to(SaleStatus::Cut));
        assert!(!SaleStatus::Pending.can_transition_to(SaleStatus::Cancelled));
        assert!(!SaleStatus::Installed.can_transition_to(SaleStatus::Sold));
        assert!(!SaleStatus::Cancelled.can_transition_to(SaleStatus::Pending));
    }
}
