//! Overweight surcharge calculation.
//!
//! Weight beyond the heaviest tier's ceiling is charged per started
//! kilogram: a 1-gram overage charges a full kilogram, matching the
//! estimate semantics of the source rate tables. The per-kilogram rate
//! resolution prefers producer-scoped charges over zone-scoped ones, and
//! method-specific charges over method-agnostic ones within each scope.

use rust_decimal::Decimal;

use crate::config::{ExtraWeightCharge, ShippingSnapshot};
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// The result of an overweight surcharge calculation.
#[derive(Debug, Clone)]
pub struct OverweightResult {
    /// The surcharge amount (zero when there is no overflow).
    pub surcharge: Decimal,
    /// The billed overflow in whole kilograms.
    pub billed_kg: u64,
    /// The audit step recording this calculation, when a charge applied.
    pub audit_step: Option<AuditStep>,
}

/// Charge specificity, higher is more specific.
fn charge_rank(charge: &ExtraWeightCharge) -> u8 {
    match (charge.producer_id.is_some(), charge.method.is_some()) {
        (true, true) => 4,
        (true, false) => 3,
        (false, true) => 2,
        (false, false) => 1,
    }
}

/// Finds the applicable per-kilogram rate for (producer, zone, method).
fn find_rate(
    producer_id: u32,
    zone_id: u32,
    method: &str,
    snapshot: &ShippingSnapshot,
) -> Option<Decimal> {
    snapshot
        .extra_weight_charges()
        .iter()
        .filter(|charge| {
            charge.active
                && charge.zone_id == zone_id
                && charge
                    .producer_id
                    .is_none_or(|scoped| scoped == producer_id)
                && charge
                    .method
                    .as_ref()
                    .is_none_or(|scoped| scoped == method)
        })
        .max_by_key(|charge| charge_rank(charge))
        .map(|charge| charge.price_per_kg)
}

/// Calculates the overweight surcharge for a producer leg.
///
/// `surcharge = ceil(overflow_grams / 1000) * price_per_kg`. When
/// `overflow_grams` is zero no rate lookup occurs at all, so shipments
/// that never exceed the tiers cannot fail on a missing extra-weight
/// charge.
///
/// # Arguments
///
/// * `overflow_grams` - Grams beyond the heaviest tier (0 if none)
/// * `producer_id` - The producer whose leg is being priced
/// * `zone_id` - The destination zone
/// * `method` - The delivery method code
/// * `snapshot` - The configuration snapshot
/// * `step_number` - The audit step number to record
///
/// # Returns
///
/// Returns an `OverweightResult`, or `RateNotConfigured` when overflow is
/// positive but no active extra-weight charge covers the zone.
pub fn calculate_overweight_surcharge(
    overflow_grams: u64,
    producer_id: u32,
    zone_id: u32,
    method: &str,
    snapshot: &ShippingSnapshot,
    step_number: u32,
) -> EngineResult<OverweightResult> {
    if overflow_grams == 0 {
        return Ok(OverweightResult {
            surcharge: Decimal::ZERO,
            billed_kg: 0,
            audit_step: None,
        });
    }

    let price_per_kg = find_rate(producer_id, zone_id, method, snapshot).ok_or_else(|| {
        EngineError::RateNotConfigured {
            producer_id,
            zone_id,
            tier: "extra_weight".to_string(),
            method: method.to_string(),
        }
    })?;

    // Partial kilograms round up.
    let billed_kg = overflow_grams.div_ceil(1000);
    let surcharge = Decimal::from(billed_kg) * price_per_kg;

    let audit_step = AuditStep {
        step_number,
        rule_id: "overweight_surcharge".to_string(),
        rule_name: "Overweight Surcharge".to_string(),
        input: serde_json::json!({
            "producer_id": producer_id,
            "zone_id": zone_id,
            "method": method,
            "overflow_grams": overflow_grams,
        }),
        output: serde_json::json!({
            "billed_kg": billed_kg,
            "price_per_kg": price_per_kg.to_string(),
            "surcharge": surcharge.to_string(),
        }),
        reasoning: format!(
            "Overflow {}g billed as {}kg at {} per kg",
            overflow_grams, billed_kg, price_per_kg
        ),
    };

    Ok(OverweightResult {
        surcharge,
        billed_kg,
        audit_step: Some(audit_step),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineSettings, WeightTier};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn snapshot(charges: Vec<ExtraWeightCharge>) -> ShippingSnapshot {
        ShippingSnapshot::new(
            1,
            vec![],
            vec![],
            vec![WeightTier {
                code: "t_2000".to_string(),
                min_grams: 0,
                max_grams: 2000,
            }],
            vec![],
            vec![],
            vec![],
            vec![],
            charges,
            vec![],
            vec![],
            EngineSettings::default(),
        )
    }

    fn charge(
        producer_id: Option<u32>,
        method: Option<&str>,
        price_per_kg: &str,
    ) -> ExtraWeightCharge {
        ExtraWeightCharge {
            zone_id: 1,
            producer_id,
            method: method.map(String::from),
            price_per_kg: dec(price_per_kg),
            active: true,
        }
    }

    /// OW-001: zero overflow means zero surcharge and no lookup
    #[test]
    fn test_zero_overflow_no_surcharge() {
        // No charges configured at all; must still succeed.
        let snapshot = snapshot(vec![]);

        let result = calculate_overweight_surcharge(0, 1, 1, "home", &snapshot, 1).unwrap();

        assert_eq!(result.surcharge, Decimal::ZERO);
        assert_eq!(result.billed_kg, 0);
        assert!(result.audit_step.is_none());
    }

    /// OW-002: partial kilograms round up
    #[test]
    fn test_partial_kg_rounds_up() {
        let snapshot = snapshot(vec![charge(None, None, "1.20")]);

        let result = calculate_overweight_surcharge(300, 1, 1, "home", &snapshot, 1).unwrap();

        assert_eq!(result.billed_kg, 1);
        assert_eq!(result.surcharge, dec("1.20"));
    }

    /// OW-003: exact kilograms do not round up further
    #[test]
    fn test_exact_kg_not_rounded_up() {
        let snapshot = snapshot(vec![charge(None, None, "0.90")]);

        let result = calculate_overweight_surcharge(2000, 1, 1, "home", &snapshot, 1).unwrap();

        assert_eq!(result.billed_kg, 2);
        assert_eq!(result.surcharge, dec("1.80"));
    }

    /// OW-004: producer-scoped charge overrides zone-scoped charge
    #[test]
    fn test_producer_charge_overrides_zone_charge() {
        let snapshot = snapshot(vec![
            charge(None, None, "0.90"),
            charge(Some(7), None, "0.60"),
        ]);

        let result = calculate_overweight_surcharge(1000, 7, 1, "home", &snapshot, 1).unwrap();
        assert_eq!(result.surcharge, dec("0.60"));

        // Other producers still get the zone rate.
        let result = calculate_overweight_surcharge(1000, 8, 1, "home", &snapshot, 1).unwrap();
        assert_eq!(result.surcharge, dec("0.90"));
    }

    /// OW-005: method-specific charge preferred within the same scope
    #[test]
    fn test_method_specific_preferred() {
        let snapshot = snapshot(vec![
            charge(None, None, "0.90"),
            charge(None, Some("locker"), "1.50"),
        ]);

        let result = calculate_overweight_surcharge(1000, 1, 1, "locker", &snapshot, 1).unwrap();
        assert_eq!(result.surcharge, dec("1.50"));

        let result = calculate_overweight_surcharge(1000, 1, 1, "home", &snapshot, 1).unwrap();
        assert_eq!(result.surcharge, dec("0.90"));
    }

    /// OW-006: overflow without any configured charge is an error
    #[test]
    fn test_overflow_without_charge_is_error() {
        let snapshot = snapshot(vec![]);

        let result = calculate_overweight_surcharge(500, 1, 1, "home", &snapshot, 1);

        match result.unwrap_err() {
            EngineError::RateNotConfigured { tier, .. } => {
                assert_eq!(tier, "extra_weight");
            }
            other => panic!("Expected RateNotConfigured, got {:?}", other),
        }
    }

    /// OW-007: inactive charges are ignored
    #[test]
    fn test_inactive_charge_ignored() {
        let mut inactive = charge(None, None, "0.90");
        inactive.active = false;
        let snapshot = snapshot(vec![inactive]);

        assert!(calculate_overweight_surcharge(500, 1, 1, "home", &snapshot, 1).is_err());
    }

    #[test]
    fn test_audit_step_records_billed_kg() {
        let snapshot = snapshot(vec![charge(None, None, "1.20")]);

        let result = calculate_overweight_surcharge(2300, 1, 1, "home", &snapshot, 4).unwrap();

        let step = result.audit_step.unwrap();
        assert_eq!(step.step_number, 4);
        assert_eq!(step.output["billed_kg"], 3);
    }
}
