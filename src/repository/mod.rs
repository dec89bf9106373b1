//! Persistence seam for the contract lifecycle.
//!
//! A [`Store`] hands out units of work. Everything done through a
//! [`SaleRepository`] is visible to other requests only after
//! [`SaleRepository::commit`]; dropping a unit of work discards it.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    error::Result,
    models::{
        Customer, Fixture, FixtureKind, NewCustomer, NewSale, RoomAttributes, Sale, SaleStatus,
        SaleUpdate, Slab, User,
    },
};

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    type Unit: SaleRepository;

    async fn begin(&self) -> Result<Self::Unit>;
}

#[async_trait]
pub trait SaleRepository: Send + Sized {
    async fn commit(self) -> Result<()>;

    async fn find_customer(&mut self, company_id: i64, customer_id: i64) -> Result<Option<Customer>>;
    async fn insert_customer(&mut self, company_id: i64, customer: &NewCustomer) -> Result<i64>;

    /// An active user of the company.
    async fn find_seller(&mut self, company_id: i64, user_id: i64) -> Result<Option<User>>;

    async fn find_sale(&mut self, company_id: i64, sale_id: i64) -> Result<Option<Sale>>;
    /// Like `find_sale`, holding the row until the unit of work ends.
    async fn lock_sale(&mut self, company_id: i64, sale_id: i64) -> Result<Option<Sale>>;
    async fn insert_sale(&mut self, sale: &NewSale) -> Result<i64>;
    async fn update_sale(&mut self, sale_id: i64, update: &SaleUpdate) -> Result<()>;
    async fn cancel_sale(&mut self, sale_id: i64) -> Result<()>;
    async fn set_sale_status(&mut self, sale_id: i64, status: SaleStatus) -> Result<()>;

    /// Locks a slab of one of the company's stones.
    async fn lock_slab(&mut self, company_id: i64, slab_id: i64) -> Result<Option<Slab>>;
    async fn sell_slab(&mut self, slab_id: i64, sale_id: i64, room: &RoomAttributes) -> Result<()>;
    /// Copies stone, bundle, dimensions and url into a new unsold slab whose
    /// parent is `slab_id`. Returns the new slab id.
    async fn duplicate_slab(&mut self, slab_id: i64) -> Result<Option<i64>>;
    async fn sale_slabs(&mut self, sale_id: i64) -> Result<Vec<Slab>>;
    /// The subset of `slab_ids` that some other slab names as its parent.
    async fn partially_sold(&mut self, slab_ids: &[i64]) -> Result<Vec<i64>>;
    /// Clears `sale_id` and the room attributes of every slab of the sale.
    async fn release_slabs(&mut self, sale_id: i64) -> Result<u64>;
    async fn delete_unsold_remainders(&mut self, parent_ids: &[i64]) -> Result<u64>;

    /// Attaches one available fixture of the type to the slab. A `None` price
    /// captures the type's retail price.
    async fn claim_fixture(
        &mut self,
        kind: FixtureKind,
        company_id: i64,
        type_id: i64,
        slab_id: i64,
        price: Option<Decimal>,
    ) -> Result<Option<i64>>;
    async fn slab_fixtures(&mut self, kind: FixtureKind, slab_ids: &[i64]) -> Result<Vec<Fixture>>;
    /// Detaches fixtures from the slabs and puts them back in stock.
    async fn release_fixtures(&mut self, kind: FixtureKind, slab_ids: &[i64]) -> Result<u64>;
}
