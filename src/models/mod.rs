pub mod customer;
pub mod fixture;
pub mod sale;
pub mod slab;
pub mod user;

pub use customer::{Customer, NewCustomer};
pub use fixture::{Fixture, FixtureKind};
pub use sale::{NewSale, Sale, SaleStatus, SaleUpdate};
pub use slab::{RoomAttributes, Slab};
pub use user::User;
