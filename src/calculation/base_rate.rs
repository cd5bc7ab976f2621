//! Base rate lookup functionality.
//!
//! This module resolves the effective base shipping price for one producer
//! leg, honoring producer overrides over zone defaults. The multi-producer
//! discount policy always comes from the zone-level rate: a producer
//! override replaces the price, never the policy.

use rust_decimal::Decimal;

use crate::config::ShippingSnapshot;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// The discount policy attached to a zone rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountPolicy {
    /// Percentage discount on the combined shipping subtotal.
    pub percentage: Decimal,
    /// Minimum number of distinct producers for the discount to apply.
    pub min_producers: u32,
}

/// The result of a base rate lookup, including the rate and audit step.
#[derive(Debug, Clone)]
pub struct BaseRateResolution {
    /// The effective base price.
    pub price: Decimal,
    /// The discount policy from the zone-level rate, when configured.
    pub discount_policy: Option<DiscountPolicy>,
    /// Whether the price came from a producer override.
    pub producer_override: bool,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Resolves the effective base rate for (producer, zone, tier, method).
///
/// Resolution order:
/// 1. A producer override for the exact key wins on price; the discount
///    policy is still borrowed from the zone-level rate for the same
///    (zone, tier, method) when one exists.
/// 2. Otherwise the zone-level rate supplies both price and policy.
///
/// # Arguments
///
/// * `producer_id` - The producer whose leg is being priced
/// * `zone_id` - The destination zone
/// * `tier` - The weight tier code
/// * `method` - The delivery method code
/// * `snapshot` - The configuration snapshot
/// * `step_number` - The audit step number to record
///
/// # Returns
///
/// Returns a `BaseRateResolution`, or `RateNotConfigured` when neither a
/// producer override nor a zone rate exists. Substituting zero here would
/// silently give away shipping, so the quote must abort instead.
pub fn resolve_base_rate(
    producer_id: u32,
    zone_id: u32,
    tier: &str,
    method: &str,
    snapshot: &ShippingSnapshot,
    step_number: u32,
) -> EngineResult<BaseRateResolution> {
    let zone_rate = snapshot.zone_rate(zone_id, tier, method);
    let discount_policy = zone_rate.and_then(|rate| {
        match (
            rate.multi_producer_discount_pct,
            rate.min_producers_for_discount,
        ) {
            (Some(percentage), Some(min_producers)) => Some(DiscountPolicy {
                percentage,
                min_producers,
            }),
            _ => None,
        }
    });

    if let Some(override_price) = snapshot.producer_rate(producer_id, zone_id, tier, method) {
        let audit_step = AuditStep {
            step_number,
            rule_id: "base_rate_lookup".to_string(),
            rule_name: "Base Rate Lookup".to_string(),
            input: serde_json::json!({
                "producer_id": producer_id,
                "zone_id": zone_id,
                "tier": tier,
                "method": method,
            }),
            output: serde_json::json!({
                "price": override_price.to_string(),
                "source": "producer_override",
                "zone_price": zone_rate.map(|r| r.price.to_string()),
            }),
            reasoning: format!(
                "Producer {} override price {} takes precedence over zone default",
                producer_id, override_price
            ),
        };

        return Ok(BaseRateResolution {
            price: override_price,
            discount_policy,
            producer_override: true,
            audit_step,
        });
    }

    match zone_rate {
        Some(rate) => {
            let audit_step = AuditStep {
                step_number,
                rule_id: "base_rate_lookup".to_string(),
                rule_name: "Base Rate Lookup".to_string(),
                input: serde_json::json!({
                    "producer_id": producer_id,
                    "zone_id": zone_id,
                    "tier": tier,
                    "method": method,
                }),
                output: serde_json::json!({
                    "price": rate.price.to_string(),
                    "source": "zone_default",
                }),
                reasoning: format!(
                    "No producer override; zone {} default price {} for tier '{}', method '{}'",
                    zone_id, rate.price, tier, method
                ),
            };

            Ok(BaseRateResolution {
                price: rate.price,
                discount_policy,
                producer_override: false,
                audit_step,
            })
        }
        None => Err(EngineError::RateNotConfigured {
            producer_id,
            zone_id,
            tier: tier.to_string(),
            method: method.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineSettings, ProducerRate, ShippingSnapshot, WeightTier, ZoneRate};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn snapshot(zone_rates: Vec<ZoneRate>, producer_rates: Vec<ProducerRate>) -> ShippingSnapshot {
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
            zone_rates,
            producer_rates,
            vec![],
            vec![],
            vec![],
            vec![],
            EngineSettings::default(),
        )
    }

    fn zone_rate(price: &str, discount: Option<(&str, u32)>) -> ZoneRate {
        ZoneRate {
            zone_id: 1,
            tier: "t_2000".to_string(),
            method: "home".to_string(),
            price: dec(price),
            multi_producer_discount_pct: discount.map(|(pct, _)| dec(pct)),
            min_producers_for_discount: discount.map(|(_, min)| min),
        }
    }

    fn producer_rate(producer_id: u32, price: &str) -> ProducerRate {
        ProducerRate {
            producer_id,
            zone_id: 1,
            tier: "t_2000".to_string(),
            method: "home".to_string(),
            price: dec(price),
        }
    }

    /// BR-001: zone default used when no override exists
    #[test]
    fn test_zone_default_used_without_override() {
        let snapshot = snapshot(vec![zone_rate("3.50", None)], vec![]);

        let result = resolve_base_rate(7, 1, "t_2000", "home", &snapshot, 1).unwrap();

        assert_eq!(result.price, dec("3.50"));
        assert!(!result.producer_override);
        assert_eq!(result.audit_step.output["source"], "zone_default");
    }

    /// BR-002: producer override takes precedence over zone default
    #[test]
    fn test_producer_override_takes_precedence() {
        let snapshot = snapshot(
            vec![zone_rate("3.50", None)],
            vec![producer_rate(7, "2.80")],
        );

        let result = resolve_base_rate(7, 1, "t_2000", "home", &snapshot, 1).unwrap();

        assert_eq!(result.price, dec("2.80"));
        assert!(result.producer_override);
        assert_eq!(result.audit_step.output["source"], "producer_override");
    }

    /// BR-003: override price borrows the zone rate's discount policy
    #[test]
    fn test_override_borrows_zone_discount_policy() {
        let snapshot = snapshot(
            vec![zone_rate("3.50", Some(("10", 2)))],
            vec![producer_rate(7, "2.80")],
        );

        let result = resolve_base_rate(7, 1, "t_2000", "home", &snapshot, 1).unwrap();

        assert_eq!(result.price, dec("2.80"));
        let policy = result.discount_policy.unwrap();
        assert_eq!(policy.percentage, dec("10"));
        assert_eq!(policy.min_producers, 2);
    }

    /// BR-004: override without any zone rate has no discount policy
    #[test]
    fn test_override_without_zone_rate_has_no_policy() {
        let snapshot = snapshot(vec![], vec![producer_rate(7, "2.80")]);

        let result = resolve_base_rate(7, 1, "t_2000", "home", &snapshot, 1).unwrap();

        assert_eq!(result.price, dec("2.80"));
        assert!(result.discount_policy.is_none());
    }

    /// BR-005: neither rate configured is an error
    #[test]
    fn test_missing_rates_is_error() {
        let snapshot = snapshot(vec![], vec![]);

        let result = resolve_base_rate(7, 1, "t_2000", "home", &snapshot, 1);

        match result.unwrap_err() {
            EngineError::RateNotConfigured {
                producer_id,
                zone_id,
                tier,
                method,
            } => {
                assert_eq!(producer_id, 7);
                assert_eq!(zone_id, 1);
                assert_eq!(tier, "t_2000");
                assert_eq!(method, "home");
            }
            other => panic!("Expected RateNotConfigured, got {:?}", other),
        }
    }

    /// BR-006: a partially configured discount policy is ignored
    #[test]
    fn test_partial_discount_policy_ignored() {
        let mut rate = zone_rate("3.50", None);
        rate.multi_producer_discount_pct = Some(dec("10"));
        // min_producers_for_discount left unset
        let snapshot = snapshot(vec![rate], vec![]);

        let result = resolve_base_rate(7, 1, "t_2000", "home", &snapshot, 1).unwrap();

        assert!(result.discount_policy.is_none());
    }

    #[test]
    fn test_audit_step_has_step_number() {
        let snapshot = snapshot(vec![zone_rate("3.50", None)], vec![]);

        let result = resolve_base_rate(7, 1, "t_2000", "home", &snapshot, 5).unwrap();

        assert_eq!(result.audit_step.step_number, 5);
    }
}
