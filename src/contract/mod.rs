//! The sale lifecycle: sell, edit, unsell and status changes.
//!
//! Every operation runs in a single unit of work, so a failure at any step
//! (an unavailable slab, an out-of-stock sink) leaves no partial sale behind.

pub mod data;
pub mod read_model;
pub mod summary;

use log::{debug, info, warn};

use crate::{
    error::{ContractError, Result},
    middleware::CurrentUser,
    models::{FixtureKind, NewSale, Sale, SaleStatus, SaleUpdate},
    repository::{SaleRepository, Store},
};

pub use data::ContractData;
pub use read_model::get_customer_schema_from_sale_id;

#[derive(Debug, Clone)]
pub struct Contract {
    pub data: ContractData,
    /// `None` until the contract has been sold.
    pub sale_id: Option<i64>,
}

impl Contract {
    pub fn new(data: ContractData, sale_id: Option<i64>) -> Self {
        Self { data, sale_id }
    }

    /// Loads the contract of an existing sale.
    pub async fn from_sales_id<S: Store>(store: &S, user: &CurrentUser, sale_id: i64) -> Result<Self> {
        let mut unit = store.begin().await?;

        let sale = unit
            .find_sale(user.company_id, sale_id)
            .await?
            .ok_or(ContractError::SaleNotFound)?;

        let data = match get_customer_schema_from_sale_id(&mut unit, user.company_id, sale.id).await? {
            Some(data) => data,
            None => {
                let customer = unit.find_customer(user.company_id, sale.customer_id).await?;
                ContractData::from_sale(&sale, customer.as_ref())
            }
        };

        unit.commit().await?;
        Ok(Self::new(data, Some(sale.id)))
    }

    /// Records the sale and takes its slabs, sinks and faucets out of stock.
    /// Returns the new sale id.
    pub async fn sell<S: Store>(&self, store: &S, user: &CurrentUser) -> Result<i64> {
        self.data.validate()?;

        let mut unit = store.begin().await?;
        let customer_id = self.resolve_customer(&mut unit, user).await?;
        let seller_id = self.resolve_seller(&mut unit, user, user.id).await?;

        let sale_id = unit
            .insert_sale(&NewSale {
                company_id: user.company_id,
                customer_id,
                seller_id,
                price: self.data.price,
                square_feet: self.data.total_square_feet(),
                notes: self.data.notes_to_sale.clone(),
                project_address: self.data.project_address.clone(),
            })
            .await?;

        self.place_rooms(&mut unit, user, sale_id, &[]).await?;
        unit.commit().await?;

        info!(
            "Sale {} created for customer {} by user {} ({} rooms)",
            sale_id,
            customer_id,
            user.id,
            self.data.rooms.len()
        );
        Ok(sale_id)
    }

    /// Cancels the sale and returns everything it took to stock.
    pub async fn unsell<S: Store>(&self, store: &S, user: &CurrentUser) -> Result<()> {
        let sale_id = self.sale_id.ok_or(ContractError::SaleNotFound)?;

        let mut unit = store.begin().await?;
        let sale = lock_open_sale(&mut unit, user, sale_id).await?;

        release_inventory(&mut unit, sale.id).await?;
        unit.cancel_sale(sale.id).await?;
        unit.commit().await?;

        info!("Sale {} cancelled by user {}", sale.id, user.id);
        Ok(())
    }

    /// Replaces the sale's customer, rooms and pricing with `self.data`.
    pub async fn edit<S: Store>(&self, store: &S, user: &CurrentUser) -> Result<()> {
        let sale_id = self.sale_id.ok_or(ContractError::SaleNotFound)?;
        self.data.validate()?;

        let mut unit = store.begin().await?;
        let sale = lock_open_sale(&mut unit, user, sale_id).await?;
        let customer_id = self.resolve_customer(&mut unit, user).await?;
        let seller_id = self.resolve_seller(&mut unit, user, sale.seller_id).await?;

        let previous = release_inventory(&mut unit, sale.id).await?;
        self.place_rooms(&mut unit, user, sale.id, &previous).await?;

        unit.update_sale(
            sale.id,
            &SaleUpdate {
                customer_id,
                seller_id,
                price: self.data.price,
                square_feet: self.data.total_square_feet(),
                notes: self.data.notes_to_sale.clone(),
                project_address: self.data.project_address.clone(),
            },
        )
        .await?;
        unit.commit().await?;

        info!("Sale {} edited by user {}", sale.id, user.id);
        Ok(())
    }

    /// Moves the sale forward in its lifecycle.
    pub async fn set_status<S: Store>(&self, store: &S, user: &CurrentUser, status: SaleStatus) -> Result<()> {
        let sale_id = self.sale_id.ok_or(ContractError::SaleNotFound)?;

        let mut unit = store.begin().await?;
        let sale = unit
            .lock_sale(user.company_id, sale_id)
            .await?
            .ok_or(ContractError::SaleNotFound)?;

        let current = sale.status()?;
        if !current.can_transition_to(status) {
            warn!("Rejected status change of sale {} from {} to {}", sale.id, current, status);
            return Err(ContractError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        unit.set_sale_status(sale.id, status).await?;
        unit.commit().await?;

        info!("Sale {} moved from {} to {}", sale.id, current, status);
        Ok(())
    }

    async fn resolve_customer<R: SaleRepository>(&self, repo: &mut R, user: &CurrentUser) -> Result<i64> {
        match self.data.customer_id {
            Some(customer_id) => {
                let customer = repo.find_customer(user.company_id, customer_id).await?;
                match customer {
                    Some(customer) => Ok(customer.id),
                    None => {
                        warn!(
                            "Customer {} not found in company {}",
                            customer_id, user.company_id
                        );
                        Err(ContractError::CustomerNotFound)
                    }
                }
            }
            None => repo.insert_customer(user.company_id, &self.data.new_customer()).await,
        }
    }

    /// A seller other than the acting user or `current` must be an active
    /// user of the acting company.
    async fn resolve_seller<R: SaleRepository>(&self, repo: &mut R, user: &CurrentUser, current: i64) -> Result<i64> {
        let seller_id = match self.data.seller_id {
            None => return Ok(current),
            Some(seller_id) if seller_id == user.id || seller_id == current => return Ok(seller_id),
            Some(seller_id) => seller_id,
        };

        match repo.find_seller(user.company_id, seller_id).await? {
            Some(seller) => Ok(seller.id),
            None => {
                warn!("Seller {} not found in company {}", seller_id, user.company_id);
                Err(ContractError::SellerNotFound)
            }
        }
    }

    /// `previous` holds the slabs the sale had before an edit released them.
    async fn place_rooms<R: SaleRepository>(
        &self,
        repo: &mut R,
        user: &CurrentUser,
        sale_id: i64,
        previous: &[i64],
    ) -> Result<()> {
        for room in &self.data.rooms {
            for selection in &room.slabs {
                let slab = repo
                    .lock_slab(user.company_id, selection.id)
                    .await?
                    .filter(|slab| !slab.is_sold())
                    .ok_or(ContractError::SlabUnavailable(selection.id))?;

                repo.sell_slab(slab.id, sale_id, &room.attributes).await?;

                if !selection.is_full {
                    // An edit keeps the remainder the slab already left behind
                    if previous.contains(&slab.id) && !repo.partially_sold(&[slab.id]).await?.is_empty() {
                        continue;
                    }
                    let remainder = repo
                        .duplicate_slab(slab.id)
                        .await?
                        .ok_or(ContractError::SlabUnavailable(slab.id))?;
                    debug!("Slab {} partially sold, remainder {}", slab.id, remainder);
                }
            }

            let Some(anchor) = room.anchor_slab() else {
                continue;
            };
            for (kind, selections) in [
                (FixtureKind::Sink, &room.sink_type),
                (FixtureKind::Faucet, &room.faucet_type),
            ] {
                for selection in selections {
                    repo.claim_fixture(kind, user.company_id, selection.type_id, anchor, selection.price)
                        .await?
                        .ok_or_else(|| ContractError::fixture_unavailable(kind, selection.type_id))?;
                }
            }
        }

        Ok(())
    }
}

async fn lock_open_sale<R: SaleRepository>(repo: &mut R, user: &CurrentUser, sale_id: i64) -> Result<Sale> {
    let sale = repo
        .lock_sale(user.company_id, sale_id)
        .await?
        .ok_or(ContractError::SaleNotFound)?;

    if sale.status()? == SaleStatus::Cancelled {
        return Err(ContractError::SaleCancelled(sale.id));
    }
    Ok(sale)
}

/// Puts the sale's fixtures back in stock, drops remainders nobody bought
/// and detaches the sale's slabs. Returns the detached slab ids.
async fn release_inventory<R: SaleRepository>(repo: &mut R, sale_id: i64) -> Result<Vec<i64>> {
    let slab_ids: Vec<i64> = repo
        .sale_slabs(sale_id)
        .await?
        .iter()
        .map(|slab| slab.id)
        .collect();

    for kind in FixtureKind::ALL {
        repo.release_fixtures(kind, &slab_ids).await?;
    }
    // Before detaching, so remainders sold within this same sale are kept
    let removed = repo.delete_unsold_remainders(&slab_ids).await?;
    let released = repo.release_slabs(sale_id).await?;

    debug!(
        "Sale {}: released {} slabs, removed {} remainders",
        sale_id,
        released,
        removed
    );
    Ok(slab_ids)
}
