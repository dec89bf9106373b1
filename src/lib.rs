//! Contract and sale lifecycle for a stone fabrication shop: selling slabs,
//! sinks and faucets to customers, editing and cancelling those sales.

pub mod config;
pub mod contract;
pub mod database;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod utils;
