use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use rust_decimal::Decimal;

/// The two kinds of fixtures that get attached to sold slabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureKind {
    Sink,
    Faucet,
}

impl FixtureKind {
    pub const ALL: [FixtureKind; 2] = [FixtureKind::Sink, FixtureKind::Faucet];

    /// Instance table.
    pub fn table(self) -> &'static str {
        match self {
            Self::Sink => "sinks",
            Self::Faucet => "faucets",
        }
    }

    /// Catalog table.
    pub fn type_table(self) -> &'static str {
        match self {
            Self::Sink => "sink_type",
            Self::Faucet => "faucet_type",
        }
    }

    pub fn type_column(self) -> &'static str {
        match self {
            Self::Sink => "sink_type_id",
            Self::Faucet => "faucet_type_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sink => "sink",
            Self::Faucet => "faucet",
        }
    }
}

/// A sink or faucet instance. `type_id` is selected from the kind's type column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Fixture {
    pub id: i64,
    pub type_id: i64,
    pub slab_id: Option<i64>,
    pub price: Option<Decimal>,
    pub is_deleted: bool,
}
