use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ContractError, Result},
    models::{Customer, NewCustomer, RoomAttributes, Sale},
};

/// The "customer + rooms" submission behind a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractData {
    /// Existing customer. When absent, the contact fields create one.
    pub customer_id: Option<i64>,
    /// Defaults to the acting user.
    pub seller_id: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub billing_address: Option<String>,
    pub billing_zip_code: Option<String>,
    pub company_name: Option<String>,
    pub project_address: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    pub notes_to_sale: Option<String>,
    #[serde(default)]
    pub rooms: Vec<RoomData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    #[serde(flatten)]
    pub attributes: RoomAttributes,
    #[serde(default)]
    pub slabs: Vec<SlabSelection>,
    #[serde(default)]
    pub sink_type: Vec<FixtureSelection>,
    #[serde(default)]
    pub faucet_type: Vec<FixtureSelection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlabSelection {
    pub id: i64,
    /// `false` keeps the rest of the slab in stock as a remainder.
    #[serde(default = "default_true")]
    pub is_full: bool,
}

/// One requested fixture instance of a catalog type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixtureSelection {
    pub type_id: i64,
    /// Overrides the type's retail price.
    pub price: Option<Decimal>,
}

fn default_true() -> bool {
    true
}

impl ContractData {
    pub fn validate(&self) -> Result<()> {
        if self.rooms.is_empty() {
            return Err(ContractError::invalid("at least one room is required"));
        }
        if self.price < Decimal::ZERO {
            return Err(ContractError::invalid("price must not be negative"));
        }
        if self.customer_id.is_none()
            && self.name.as_deref().map_or(true, |name| name.trim().is_empty())
        {
            return Err(ContractError::invalid("customer name is required"));
        }

        let mut seen = HashSet::new();
        for room in &self.rooms {
            let label = &room.attributes.room;
            if room.slabs.is_empty() {
                return Err(ContractError::invalid(format!("room '{}' has no slabs", label)));
            }
            let square_feet = room.attributes.square_feet;
            if !square_feet.is_finite() || square_feet < 0.0 {
                return Err(ContractError::invalid(format!(
                    "room '{}' has an invalid square footage",
                    label
                )));
            }
            for slab in &room.slabs {
                if !seen.insert(slab.id) {
                    return Err(ContractError::invalid(format!(
                        "slab {} appears more than once",
                        slab.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Builders buy on behalf of a company.
    pub fn is_builder(&self) -> bool {
        self.company_name
            .as_deref()
            .map_or(false, |name| !name.trim().is_empty())
    }

    pub fn total_square_feet(&self) -> f64 {
        self.rooms.iter().map(|room| room.attributes.square_feet).sum()
    }

    pub fn new_customer(&self) -> NewCustomer {
        NewCustomer {
            name: self.name.clone().unwrap_or_default().trim().to_string(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.billing_address.clone(),
            postal_code: self.billing_zip_code.clone(),
            company_name: self.company_name.clone(),
        }
    }

    /// Customer and sale fields only, for sales without slabs.
    pub fn from_sale(sale: &Sale, customer: Option<&Customer>) -> Self {
        let mut data = Self {
            customer_id: Some(sale.customer_id),
            seller_id: Some(sale.seller_id),
            name: None,
            phone: None,
            email: None,
            billing_address: None,
            billing_zip_code: None,
            company_name: None,
            project_address: sale.project_address.clone(),
            price: sale.price,
            notes_to_sale: sale.notes.clone(),
            rooms: Vec::new(),
        };
        if let Some(customer) = customer {
            data.name = Some(customer.name.clone());
            data.phone = customer.phone.clone();
            data.email = customer.email.clone();
            data.billing_address = customer.address.clone();
            data.billing_zip_code = customer.postal_code.clone();
            data.company_name = customer.company_name.clone();
        }
        data
    }
}

impl RoomData {
    /// The slab sinks and faucets are attached to.
    pub fn anchor_slab(&self) -> Option<i64> {
        self.slabs.first().map(|slab| slab.id)
    }
}
