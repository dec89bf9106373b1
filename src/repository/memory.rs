//! In-process store used by the lifecycle tests. A unit of work edits a
//! private copy of the state and publishes it on commit.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::types::Json;

use crate::{
    error::Result,
    models::{
        Customer, Fixture, FixtureKind, NewCustomer, NewSale, RoomAttributes, Sale, SaleStatus,
        SaleUpdate, Slab, User,
    },
};

use super::{SaleRepository, Store};

#[derive(Debug, Clone)]
pub struct FixtureType {
    pub kind: FixtureKind,
    pub id: i64,
    pub company_id: i64,
    pub retail_price: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    next_id: i64,
    /// `(stone id, company id)`
    pub stones: Vec<(i64, i64)>,
    pub users: Vec<User>,
    pub customers: Vec<Customer>,
    pub sales: Vec<Sale>,
    pub slabs: Vec<Slab>,
    pub fixture_types: Vec<FixtureType>,
    pub sinks: Vec<Fixture>,
    pub faucets: Vec<Fixture>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_stone(&mut self, company_id: i64) -> i64 {
        let id = self.next_id();
        self.stones.push((id, company_id));
        id
    }

    /// Users keep the id they are given, like the ids inside issued tokens.
    pub fn add_user(&mut self, id: i64, company_id: i64, name: &str) {
        self.users.push(User {
            id,
            company_id,
            email: format!("{}@granite.example", name.to_lowercase().replace(' ', ".")),
            name: name.to_string(),
            is_active: true,
        });
    }

    pub fn add_customer(&mut self, company_id: i64, name: &str) -> i64 {
        let id = self.next_id();
        self.customers.push(Customer {
            id,
            company_id,
            name: name.to_string(),
            phone: None,
            email: None,
            address: None,
            postal_code: None,
            company_name: None,
            created_date: Utc::now(),
        });
        id
    }

    pub fn add_slab(&mut self, stone_id: i64, bundle: &str) -> i64 {
        let id = self.next_id();
        self.slabs.push(Slab {
            id,
            stone_id,
            bundle: bundle.to_string(),
            length: Some(126.0),
            width: Some(63.0),
            url: Some(format!("https://slabs.example/{}.jpg", id)),
            parent_id: None,
            sale_id: None,
            room: None,
            room_uuid: None,
            edge: None,
            backsplash: None,
            tear_out: None,
            stove: None,
            waterfall: None,
            corbels: None,
            seam: None,
            square_feet: None,
            price: None,
            extras: None,
        });
        id
    }

    pub fn add_fixture_type(&mut self, kind: FixtureKind, company_id: i64, retail_price: Decimal) -> i64 {
        let id = self.next_id();
        self.fixture_types.push(FixtureType {
            kind,
            id,
            company_id,
            retail_price,
        });
        id
    }

    /// Adds `count` in-stock instances of the type.
    pub fn stock_fixtures(&mut self, kind: FixtureKind, type_id: i64, count: usize) {
        for _ in 0..count {
            let id = self.next_id();
            self.fixtures_mut(kind).push(Fixture {
                id,
                type_id,
                slab_id: None,
                price: None,
                is_deleted: false,
            });
        }
    }

    pub fn fixtures(&self, kind: FixtureKind) -> &Vec<Fixture> {
        match kind {
            FixtureKind::Sink => &self.sinks,
            FixtureKind::Faucet => &self.faucets,
        }
    }

    fn fixtures_mut(&mut self, kind: FixtureKind) -> &mut Vec<Fixture> {
        match kind {
            FixtureKind::Sink => &mut self.sinks,
            FixtureKind::Faucet => &mut self.faucets,
        }
    }

    pub fn slab(&self, id: i64) -> Option<&Slab> {
        self.slabs.iter().find(|slab| slab.id == id)
    }

    pub fn sale(&self, id: i64) -> Option<&Sale> {
        self.sales.iter().find(|sale| sale.id == id)
    }

    pub fn remainders_of(&self, parent_id: i64) -> Vec<&Slab> {
        self.slabs
            .iter()
            .filter(|slab| slab.parent_id == Some(parent_id))
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed state.
    pub fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Unit = MemoryUnit;

    async fn begin(&self) -> Result<MemoryUnit> {
        let working = self.state().clone();
        Ok(MemoryUnit {
            shared: Arc::clone(&self.state),
            working,
        })
    }
}

pub struct MemoryUnit {
    shared: Arc<Mutex<MemoryState>>,
    working: MemoryState,
}

#[async_trait]
impl SaleRepository for MemoryUnit {
    async fn commit(self) -> Result<()> {
        *self.shared.lock().unwrap() = self.working;
        Ok(())
    }

    async fn find_customer(&mut self, company_id: i64, customer_id: i64) -> Result<Option<Customer>> {
        Ok(self
            .working
            .customers
            .iter()
            .find(|c| c.id == customer_id && c.company_id == company_id)
            .cloned())
    }

    async fn insert_customer(&mut self, company_id: i64, customer: &NewCustomer) -> Result<i64> {
        let id = self.working.next_id();
        self.working.customers.push(Customer {
            id,
            company_id,
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone(),
            address: customer.address.clone(),
            postal_code: customer.postal_code.clone(),
            company_name: customer.company_name.clone(),
            created_date: Utc::now(),
        });
        Ok(id)
    }

    async fn find_seller(&mut self, company_id: i64, user_id: i64) -> Result<Option<User>> {
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.id == user_id && u.company_id == company_id && u.is_active)
            .cloned())
    }

    async fn find_sale(&mut self, company_id: i64, sale_id: i64) -> Result<Option<Sale>> {
        Ok(self
            .working
            .sales
            .iter()
            .find(|s| s.id == sale_id && s.company_id == company_id)
            .cloned())
    }

    async fn lock_sale(&mut self, company_id: i64, sale_id: i64) -> Result<Option<Sale>> {
        self.find_sale(company_id, sale_id).await
    }

    async fn insert_sale(&mut self, sale: &NewSale) -> Result<i64> {
        let id = self.working.next_id();
        self.working.sales.push(Sale {
            id,
            company_id: sale.company_id,
            customer_id: sale.customer_id,
            seller_id: sale.seller_id,
            status: SaleStatus::Pending.as_str().to_string(),
            price: sale.price,
            square_feet: sale.square_feet,
            notes: sale.notes.clone(),
            project_address: sale.project_address.clone(),
            sale_date: Utc::now(),
            cancelled_date: None,
            installed_date: None,
        });
        Ok(id)
    }

    async fn update_sale(&mut self, sale_id: i64, update: &SaleUpdate) -> Result<()> {
        if let Some(sale) = self.working.sales.iter_mut().find(|s| s.id == sale_id) {
            sale.customer_id = update.customer_id;
            sale.seller_id = update.seller_id;
            sale.price = update.price;
            sale.square_feet = update.square_feet;
            sale.notes = update.notes.clone();
            sale.project_address = update.project_address.clone();
        }
        Ok(())
    }

    async fn cancel_sale(&mut self, sale_id: i64) -> Result<()> {
        if let Some(sale) = self.working.sales.iter_mut().find(|s| s.id == sale_id) {
            sale.status = SaleStatus::Cancelled.as_str().to_string();
            sale.cancelled_date = Some(Utc::now());
        }
        Ok(())
    }

    async fn set_sale_status(&mut self, sale_id: i64, status: SaleStatus) -> Result<()> {
        if let Some(sale) = self.working.sales.iter_mut().find(|s| s.id == sale_id) {
            sale.status = status.as_str().to_string();
            if status == SaleStatus::Installed {
                sale.installed_date = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn lock_slab(&mut self, company_id: i64, slab_id: i64) -> Result<Option<Slab>> {
        let stones = &self.working.stones;
        Ok(self
            .working
            .slabs
            .iter()
            .find(|slab| {
                slab.id == slab_id
                    && stones
                        .iter()
                        .any(|(stone, company)| *stone == slab.stone_id && *company == company_id)
            })
            .cloned())
    }

    async fn sell_slab(&mut self, slab_id: i64, sale_id: i64, room: &RoomAttributes) -> Result<()> {
        if let Some(slab) = self.working.slabs.iter_mut().find(|s| s.id == slab_id) {
            slab.sale_id = Some(sale_id);
            slab.room = Some(room.room.clone());
            slab.room_uuid = Some(room.room_uuid);
            slab.edge = room.edge.clone();
            slab.backsplash = room.backsplash.clone();
            slab.tear_out = room.tear_out.clone();
            slab.stove = room.stove.clone();
            slab.waterfall = room.waterfall.clone();
            slab.corbels = Some(room.corbels);
            slab.seam = room.seam.clone();
            slab.square_feet = Some(room.square_feet);
            slab.price = Some(room.price);
            slab.extras = Some(Json(room.extras.clone()));
        }
        Ok(())
    }

    async fn duplicate_slab(&mut self, slab_id: i64) -> Result<Option<i64>> {
        let Some(parent) = self.working.slab(slab_id).cloned() else {
            return Ok(None);
        };
        let id = self.working.add_slab(parent.stone_id, &parent.bundle);
        if let Some(copy) = self.working.slabs.iter_mut().find(|s| s.id == id) {
            copy.length = parent.length;
            copy.width = parent.width;
            copy.url = parent.url;
            copy.parent_id = Some(parent.id);
        }
        Ok(Some(id))
    }

    async fn sale_slabs(&mut self, sale_id: i64) -> Result<Vec<Slab>> {
        let mut slabs: Vec<Slab> = self
            .working
            .slabs
            .iter()
            .filter(|slab| slab.sale_id == Some(sale_id))
            .cloned()
            .collect();
        slabs.sort_by_key(|slab| slab.id);
        Ok(slabs)
    }

    async fn partially_sold(&mut self, slab_ids: &[i64]) -> Result<Vec<i64>> {
        Ok(slab_ids
            .iter()
            .copied()
            .filter(|id| !self.working.remainders_of(*id).is_empty())
            .collect())
    }

    async fn release_slabs(&mut self, sale_id: i64) -> Result<u64> {
        let mut released = 0;
        for slab in self.working.slabs.iter_mut().filter(|s| s.sale_id == Some(sale_id)) {
            slab.sale_id = None;
            slab.room = None;
            slab.room_uuid = None;
            slab.edge = None;
            slab.backsplash = None;
            slab.tear_out = None;
            slab.stove = None;
            slab.waterfall = None;
            slab.corbels = None;
            slab.seam = None;
            slab.square_feet = None;
            slab.price = None;
            slab.extras = None;
            released += 1;
        }
        Ok(released)
    }

    async fn delete_unsold_remainders(&mut self, parent_ids: &[i64]) -> Result<u64> {
        let before = self.working.slabs.len();
        self.working.slabs.retain(|slab| {
            !(slab.sale_id.is_none()
                && slab.parent_id.map_or(false, |parent| parent_ids.contains(&parent)))
        });
        Ok((before - self.working.slabs.len()) as u64)
    }

    async fn claim_fixture(
        &mut self,
        kind: FixtureKind,
        company_id: i64,
        type_id: i64,
        slab_id: i64,
        price: Option<Decimal>,
    ) -> Result<Option<i64>> {
        let Some(fixture_type) = self
            .working
            .fixture_types
            .iter()
            .find(|t| t.kind == kind && t.id == type_id && t.company_id == company_id)
            .cloned()
        else {
            return Ok(None);
        };

        let claimed = self
            .working
            .fixtures_mut(kind)
            .iter_mut()
            .find(|f| f.type_id == type_id && f.slab_id.is_none() && !f.is_deleted)
            .map(|fixture| {
                fixture.slab_id = Some(slab_id);
                fixture.is_deleted = true;
                fixture.price = Some(price.unwrap_or(fixture_type.retail_price));
                fixture.id
            });
        Ok(claimed)
    }

    async fn slab_fixtures(&mut self, kind: FixtureKind, slab_ids: &[i64]) -> Result<Vec<Fixture>> {
        Ok(self
            .working
            .fixtures(kind)
            .iter()
            .filter(|f| f.slab_id.map_or(false, |slab| slab_ids.contains(&slab)))
            .cloned()
            .collect())
    }

    async fn release_fixtures(&mut self, kind: FixtureKind, slab_ids: &[i64]) -> Result<u64> {
        let mut released = 0;
        for fixture in self
            .working
            .fixtures_mut(kind)
            .iter_mut()
            .filter(|f| f.slab_id.map_or(false, |slab| slab_ids.contains(&slab)))
        {
            fixture.slab_id = None;
            fixture.is_deleted = false;
            fixture.price = None;
            released += 1;
        }
        Ok(released)
    }
}
