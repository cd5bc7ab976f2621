//! Configuration loading and snapshot management for the shipping engine.
//!
//! This module provides functionality to load shipping configuration from
//! YAML files into an immutable, versioned, read-optimized snapshot.
//!
//! # Example
//!
//! ```no_run
//! use shipping_engine::config::ConfigLoader;
//!
//! let snapshot = ConfigLoader::load("./config/marketplace").unwrap();
//! println!("Snapshot version: {}", snapshot.version());
//! ```

mod loader;
mod snapshot;
mod types;

pub use loader::ConfigLoader;
pub use snapshot::ShippingSnapshot;
pub use types::{
    AdditionalCharge, DeliveryMethod, DeliveryMethodsConfig, EngineSettings, ExtraWeightCharge,
    FreeShippingConfig, FreeShippingRule, PostalCodePrefix, ProducerMethod, ProducerMethodsConfig,
    ProducerRate, RatesConfig, ShippingZone, SurchargesConfig, WeightTier, WeightTiersConfig,
    ZoneRate, ZonesConfig,
};
