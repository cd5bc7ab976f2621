//! Chargeable-weight determination and weight-tier resolution.
//!
//! A producer leg is priced on its chargeable weight: the greater of the
//! real weight of the producer's items and the volumetric weight derived
//! from their dimensions. The chargeable weight then resolves to a discrete
//! weight tier; weight beyond the heaviest tier becomes `overflow_grams`
//! for the overweight surcharge.

use crate::config::{ShippingSnapshot, WeightTier};
use crate::models::{AuditStep, ShipmentItem};

/// The result of resolving a weight to a tier.
#[derive(Debug, Clone)]
pub struct WeightTierResolution {
    /// The code of the matched tier.
    pub tier: String,
    /// The chargeable weight that was resolved.
    pub chargeable_weight_grams: u64,
    /// Grams beyond the heaviest tier's ceiling (0 when within a tier).
    pub overflow_grams: u64,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Computes the volumetric weight in grams for a set of items.
///
/// Follows the courier convention: the largest item dimensions across the
/// shipment, multiplied out and divided by the volumetric divisor
/// (cm³ per kg). Items without dimensions contribute nothing.
pub fn volumetric_weight_grams(items: &[&ShipmentItem], divisor: u32) -> u64 {
    let mut max_length: u64 = 0;
    let mut max_width: u64 = 0;
    let mut max_height: u64 = 0;

    for item in items {
        if let Some(dims) = &item.dimensions {
            max_length = max_length.max(u64::from(dims.length_cm));
            max_width = max_width.max(u64::from(dims.width_cm));
            max_height = max_height.max(u64::from(dims.height_cm));
        }
    }

    if max_length == 0 || max_width == 0 || max_height == 0 {
        return 0;
    }

    // Volume in cm³ over divisor gives kilograms; scale to grams before
    // dividing to avoid losing sub-kilogram precision.
    (max_length * max_width * max_height) * 1000 / u64::from(divisor)
}

/// Computes the chargeable weight in grams for a producer's items.
///
/// The chargeable weight is the greater of the summed real weight and the
/// volumetric weight.
pub fn chargeable_weight_grams(items: &[&ShipmentItem], snapshot: &ShippingSnapshot) -> u64 {
    let real: u64 = items.iter().map(|item| item.line_weight_grams()).sum();
    let volumetric = volumetric_weight_grams(items, snapshot.settings().volumetric_divisor);
    real.max(volumetric)
}

/// Resolves the weight tier for a chargeable weight.
///
/// Finds the tier where `min_grams <= weight <= max_grams`. A weight below
/// the lowest tier's floor resolves to the lowest tier; a weight above the
/// heaviest tier's ceiling resolves to the heaviest tier with a positive
/// `overflow_grams`. There is no "no tier" failure for weight: the loader
/// guarantees at least one tier and contiguous brackets.
///
/// # Arguments
///
/// * `weight_grams` - The chargeable weight to resolve
/// * `snapshot` - The configuration snapshot
/// * `step_number` - The audit step number to record
pub fn resolve_weight_tier(
    weight_grams: u64,
    snapshot: &ShippingSnapshot,
    step_number: u32,
) -> WeightTierResolution {
    let tiers = snapshot.tiers();
    let heaviest = snapshot.heaviest_tier();

    let (tier, overflow_grams): (&WeightTier, u64) = if weight_grams > heaviest.max_grams {
        (heaviest, weight_grams - heaviest.max_grams)
    } else {
        let matched = tiers
            .iter()
            .find(|t| weight_grams >= t.min_grams && weight_grams <= t.max_grams)
            // Below the lowest floor; tiers are contiguous otherwise.
            .unwrap_or(&tiers[0]);
        (matched, 0)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "weight_tier_resolution".to_string(),
        rule_name: "Weight Tier Resolution".to_string(),
        input: serde_json::json!({
            "chargeable_weight_grams": weight_grams,
        }),
        output: serde_json::json!({
            "tier": tier.code,
            "tier_min_grams": tier.min_grams,
            "tier_max_grams": tier.max_grams,
            "overflow_grams": overflow_grams,
        }),
        reasoning: if overflow_grams > 0 {
            format!(
                "Weight {}g exceeds heaviest tier '{}' ({}g); {}g overflow carried to overweight surcharge",
                weight_grams, tier.code, tier.max_grams, overflow_grams
            )
        } else {
            format!(
                "Weight {}g falls in tier '{}' ({}g-{}g)",
                weight_grams, tier.code, tier.min_grams, tier.max_grams
            )
        },
    };

    WeightTierResolution {
        tier: tier.code.clone(),
        chargeable_weight_grams: weight_grams,
        overflow_grams,
        audit_step,
    }
}
