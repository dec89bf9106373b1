use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    error::Result,
    models::{Customer, Fixture, FixtureKind, Sale, Slab},
    repository::SaleRepository,
};

use super::data::{ContractData, FixtureSelection, RoomData, SlabSelection};

/// Rebuilds the submission a sale was created from. `None` when the sale, its
/// customer or its slabs cannot be found.
pub async fn get_customer_schema_from_sale_id<R: SaleRepository>(
    repo: &mut R,
    company_id: i64,
    sale_id: i64,
) -> Result<Option<ContractData>> {
    let Some(sale) = repo.find_sale(company_id, sale_id).await? else {
        return Ok(None);
    };
    let Some(customer) = repo.find_customer(company_id, sale.customer_id).await? else {
        return Ok(None);
    };

    let slabs = repo.sale_slabs(sale.id).await?;
    if slabs.is_empty() {
        return Ok(None);
    }

    let slab_ids: Vec<i64> = slabs.iter().map(|slab| slab.id).collect();
    let partial: HashSet<i64> = repo.partially_sold(&slab_ids).await?.into_iter().collect();
    let sinks = repo.slab_fixtures(FixtureKind::Sink, &slab_ids).await?;
    let faucets = repo.slab_fixtures(FixtureKind::Faucet, &slab_ids).await?;

    Ok(Some(assemble(&sale, &customer, &slabs, &partial, &sinks, &faucets)))
}

fn assemble(
    sale: &Sale,
    customer: &Customer,
    slabs: &[Slab],
    partial: &HashSet<i64>,
    sinks: &[Fixture],
    faucets: &[Fixture],
) -> ContractData {
    let mut rooms: Vec<RoomData> = Vec::new();

    for slab in slabs {
        let key = slab.room_uuid.unwrap_or_else(Uuid::nil);
        let index = match rooms.iter().position(|room| room.attributes.room_uuid == key) {
            Some(index) => index,
            None => {
                rooms.push(RoomData {
                    attributes: slab.room_attributes().unwrap_or_default(),
                    slabs: Vec::new(),
                    sink_type: Vec::new(),
                    faucet_type: Vec::new(),
                });
                rooms.len() - 1
            }
        };

        let room = &mut rooms[index];
        room.slabs.push(SlabSelection {
            id: slab.id,
            is_full: !partial.contains(&slab.id),
        });
        room.sink_type.extend(selections_for(sinks, slab.id));
        room.faucet_type.extend(selections_for(faucets, slab.id));
    }

    let mut data = ContractData::from_sale(sale, Some(customer));
    data.rooms = rooms;
    data
}

fn selections_for(fixtures: &[Fixture], slab_id: i64) -> impl Iterator<Item = FixtureSelection> + '_ {
    fixtures
        .iter()
        .filter(move |fixture| fixture.slab_id == Some(slab_id))
        .map(|fixture| FixtureSelection {
            type_id: fixture.type_id,
            price: fixture.price,
        })
}
