use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Slab {
    pub id: i64,
    pub stone_id: i64,
    pub bundle: String,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub url: Option<String>,
    pub parent_id: Option<i64>,
    pub sale_id: Option<i64>,
    pub room: Option<String>,
    pub room_uuid: Option<Uuid>,
    pub edge: Option<String>,
    pub backsplash: Option<String>,
    pub tear_out: Option<String>,
    pub stove: Option<String>,
    pub waterfall: Option<String>,
    pub corbels: Option<i32>,
    pub seam: Option<String>,
    pub square_feet: Option<f64>,
    pub price: Option<Decimal>,
    pub extras: Option<Json<BTreeMap<String, Decimal>>>,
}

impl Slab {
    pub fn is_sold(&self) -> bool {
        self.sale_id.is_some()
    }

    /// Room attributes written when the slab was sold, if it carries a room key.
    pub fn room_attributes(&self) -> Option<RoomAttributes> {
        let room_uuid = self.room_uuid?;

        Some(RoomAttributes {
            room_uuid,
            room: self.room.clone().unwrap_or_default(),
            edge: self.edge.clone(),
            backsplash: self.backsplash.clone(),
            tear_out: self.tear_out.clone(),
            stove: self.stove.clone(),
            waterfall: self.waterfall.clone(),
            corbels: self.corbels.unwrap_or_default(),
            seam: self.seam.clone(),
            square_feet: self.square_feet.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            extras: self
                .extras
                .as_ref()
                .map(|extras| extras.0.clone())
                .unwrap_or_default(),
        })
    }
}

/// What a room contributes to each of its slabs once sold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomAttributes {
    #[serde(alias = "room_id")]
    pub room_uuid: Uuid,
    pub room: String,
    pub edge: Option<String>,
    pub backsplash: Option<String>,
    pub tear_out: Option<String>,
    pub stove: Option<String>,
    pub waterfall: Option<String>,
    #[serde(default)]
    pub corbels: i32,
    pub seam: Option<String>,
    #[serde(default)]
    pub square_feet: f64,
    #[serde(default)]
    pub price: Decimal,
    /// Priced add-ons, keyed by name.
    #[serde(default)]
    pub extras: BTreeMap<String, Decimal>,
}

impl RoomAttributes {
    pub fn extras_total(&self) -> Decimal {
        self.extras.values().copied().sum()
    }
}
