use rust_decimal::Decimal;

use super::data::{ContractData, FixtureSelection, RoomData};

// Template-friendly view of a contract
#[derive(Debug)]
pub struct ContractSummary {
    pub sale_id: i64,
    pub customer_name: String,
    pub is_builder: bool,
    pub project_address: String,
    pub notes: String,
    pub price: Decimal,
    pub square_feet: f64,
    pub rooms: Vec<RoomSummary>,
}

#[derive(Debug)]
pub struct RoomSummary {
    pub name: String,
    pub edge: String,
    pub backsplash: String,
    pub square_feet: f64,
    pub slabs: Vec<SlabLine>,
    pub sink_count: usize,
    pub faucet_count: usize,
    pub price: Decimal,
    pub extras_total: Decimal,
    pub fixtures_total: Decimal,
    pub total: Decimal,
}

#[derive(Debug)]
pub struct SlabLine {
    pub id: i64,
    pub is_full: bool,
}

impl ContractSummary {
    pub fn new(sale_id: i64, data: &ContractData) -> Self {
        Self {
            sale_id,
            customer_name: data.name.clone().unwrap_or_default(),
            is_builder: data.is_builder(),
            project_address: data.project_address.clone().unwrap_or_default(),
            notes: data.notes_to_sale.clone().unwrap_or_default(),
            price: data.price,
            square_feet: data.total_square_feet(),
            rooms: data.rooms.iter().map(RoomSummary::from).collect(),
        }
    }

    /// Sum of the room totals, which may differ from the agreed contract price.
    pub fn rooms_total(&self) -> Decimal {
        self.rooms.iter().map(|room| room.total).sum()
    }
}

impl From<&RoomData> for RoomSummary {
    fn from(room: &RoomData) -> Self {
        let attributes = &room.attributes;
        let extras_total = attributes.extras_total();
        let fixtures_total = fixtures_total(&room.sink_type) + fixtures_total(&room.faucet_type);

        Self {
            name: attributes.room.clone(),
            edge: attributes.edge.clone().unwrap_or_default(),
            backsplash: attributes.backsplash.clone().unwrap_or_default(),
            square_feet: attributes.square_feet,
            slabs: room
                .slabs
                .iter()
                .map(|slab| SlabLine {
                    id: slab.id,
                    is_full: slab.is_full,
                })
                .collect(),
            sink_count: room.sink_type.len(),
            faucet_count: room.faucet_type.len(),
            price: attributes.price,
            extras_total,
            fixtures_total,
            total: attributes.price + extras_total + fixtures_total,
        }
    }
}

fn fixtures_total(selections: &[FixtureSelection]) -> Decimal {
    selections.iter().filter_map(|selection| selection.price).sum()
}
