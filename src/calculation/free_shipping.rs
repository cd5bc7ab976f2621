//! Free-shipping threshold evaluation.
//!
//! A producer may waive their shipping leg when the customer's subtotal for
//! that producer reaches a configured threshold. Rules can be scoped to a
//! zone, a delivery method, both, or neither; the most specific applicable
//! rule wins. A waiver covers the base rate and overweight surcharge only,
//! never order-level additional charges.

use rust_decimal::Decimal;

use crate::config::{FreeShippingRule, ShippingSnapshot};
use crate::models::AuditStep;

/// The outcome of a free-shipping evaluation.
#[derive(Debug, Clone)]
pub struct FreeShippingOutcome {
    /// Whether the producer's leg is waived.
    pub waived: bool,
    /// The id of the rule that applied, when one did.
    pub rule_id: Option<u32>,
    /// The threshold of the applied rule.
    pub threshold: Option<Decimal>,
    /// The audit step recording this evaluation, when a rule applied.
    pub audit_step: Option<AuditStep>,
}

impl FreeShippingOutcome {
    fn no_rule() -> Self {
        Self {
            waived: false,
            rule_id: None,
            threshold: None,
            audit_step: None,
        }
    }
}

/// Rule specificity: zone+method > zone-only > method-only > neither.
fn rule_rank(rule: &FreeShippingRule) -> u8 {
    match (rule.zone_id.is_some(), rule.method.is_some()) {
        (true, true) => 4,
        (true, false) => 3,
        (false, true) => 2,
        (false, false) => 1,
    }
}

/// Evaluates free shipping for one producer leg.
///
/// Collects the producer's active rules applicable to (zone, method), picks
/// the most specific one (ties break on the lowest rule id for
/// determinism), and waives the leg when the producer subtotal meets the
/// rule's threshold. Without any applicable rule, shipping is never waived.
///
/// # Arguments
///
/// * `producer_id` - The producer being evaluated
/// * `zone_id` - The destination zone
/// * `method` - The delivery method code
/// * `producer_subtotal` - Sum of `quantity * unit_price` for the
///   producer's items, shipping and tax excluded
/// * `snapshot` - The configuration snapshot
/// * `step_number` - The audit step number to record
pub fn evaluate_free_shipping(
    producer_id: u32,
    zone_id: u32,
    method: &str,
    producer_subtotal: Decimal,
    snapshot: &ShippingSnapshot,
    step_number: u32,
) -> FreeShippingOutcome {
    let applicable = snapshot
        .free_shipping_rules(producer_id)
        .iter()
        .filter(|rule| {
            rule.active
                && rule.zone_id.is_none_or(|scoped| scoped == zone_id)
                && rule.method.as_ref().is_none_or(|scoped| scoped == method)
        })
        .min_by_key(|rule| (std::cmp::Reverse(rule_rank(rule)), rule.id));

    let Some(rule) = applicable else {
        return FreeShippingOutcome::no_rule();
    };

    let waived = producer_subtotal >= rule.threshold;

    let audit_step = AuditStep {
        step_number,
        rule_id: "free_shipping_evaluation".to_string(),
        rule_name: "Free Shipping Evaluation".to_string(),
        input: serde_json::json!({
            "producer_id": producer_id,
            "zone_id": zone_id,
            "method": method,
            "producer_subtotal": producer_subtotal.to_string(),
        }),
        output: serde_json::json!({
            "rule_id": rule.id,
            "threshold": rule.threshold.to_string(),
            "waived": waived,
        }),
        reasoning: if waived {
            format!(
                "Producer {} subtotal {} meets threshold {} (rule {}); leg waived",
                producer_id, producer_subtotal, rule.threshold, rule.id
            )
        } else {
            format!(
                "Producer {} subtotal {} below threshold {} (rule {}); leg charged",
                producer_id, producer_subtotal, rule.threshold, rule.id
            )
        },
    };

    FreeShippingOutcome {
        waived,
        rule_id: Some(rule.id),
        threshold: Some(rule.threshold),
        audit_step: Some(audit_step),
    }
}
