//! Core data models for the Shipping Cost Resolution Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod quote;
mod shipment;

pub use quote::{
    AuditStep, AuditTrace, AuditWarning, ChargeLine, DiscountLine, ProducerLeg, ShippingQuote,
};
pub use shipment::{Dimensions, ShipmentItem, ShipmentRequest};
