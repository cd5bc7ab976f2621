//! Calculation logic for the Shipping Cost Resolution Engine.
//!
//! This module contains all the calculation functions for resolving a
//! shipping quote, including postal-code to zone resolution, chargeable
//! weight and weight tier resolution, base rate lookup with producer
//! override priority, overweight surcharge calculation, free-shipping
//! threshold evaluation, order-level additional charges, the
//! multi-producer consolidation discount, and the quote orchestrator that
//! composes them.

mod additional_charges;
mod base_rate;
mod free_shipping;
mod method_availability;
mod multi_producer_discount;
mod overweight;
mod quote;
mod weight_tier;
mod zone_resolution;

pub use additional_charges::{apply_additional_charges, AdditionalChargesResult, COD_CHARGE_CODE};
pub use base_rate::{resolve_base_rate, BaseRateResolution, DiscountPolicy};
pub use free_shipping::{evaluate_free_shipping, FreeShippingOutcome};
pub use method_availability::{resolve_method, validate_method_for_producer};
pub use multi_producer_discount::{
    apply_multi_producer_discount, dominant_leg, DiscountResult,
};
pub use overweight::{calculate_overweight_surcharge, OverweightResult};
pub use quote::calculate_quote;
pub use weight_tier::{
    chargeable_weight_grams, resolve_weight_tier, volumetric_weight_grams, WeightTierResolution,
};
pub use zone_resolution::{resolve_zone, ZoneResolution};
