//! Shipping Cost Resolution Engine
//!
//! This crate computes a single, explainable shipping total for marketplace
//! orders whose line items may belong to several independent producers. It
//! combines per-zone, per-weight, per-delivery-method base rates,
//! producer-specific overrides, free-shipping thresholds, overweight
//! surcharges, order-level additional charges, and a multi-producer
//! consolidation discount into one auditable cost breakdown.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
