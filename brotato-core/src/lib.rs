use thiserror::Error;

pub mod characters;
pub mod constants;
pub mod datapackage;
pub mod host;
pub mod item_weights;
pub mod items;
pub mod locations;
pub mod loot_crates;
pub mod options;
pub mod pool;
pub mod regions;
pub mod rules;
pub mod sampling;
pub mod slot_data;
pub mod waves;
pub mod world;

pub use host::{ItemState, MemoryWorld, MultiWorld};
pub use options::BrotatoOptions;
pub use slot_data::SlotData;
pub use world::{BrotatoWorld, GenerationContext};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
    #[error("internal invariant violated: {0}")]
    Invariant(String),
    #[error("unknown item '{0}'")]
    UnknownItem(String),
    #[error("unknown location '{0}'")]
    UnknownLocation(String),
    #[error("{phase} must run right after {required}")]
    Lifecycle {
        phase: &'static str,
        required: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, GenerationError>;
