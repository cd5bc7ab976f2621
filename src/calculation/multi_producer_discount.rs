//! Multi-producer consolidation discount.
//!
//! When an order contains items from enough distinct producers sharing one
//! shipment, the combined shipping subtotal is reduced by a configured
//! percentage. The discount is applied once to the sum of all non-waived
//! legs rather than to each leg individually, so rounding drift cannot
//! compound across producers.

use rust_decimal::Decimal;

use crate::models::{AuditStep, DiscountLine, ProducerLeg};

use super::base_rate::DiscountPolicy;

/// The result of the multi-producer discount evaluation.
#[derive(Debug, Clone)]
pub struct DiscountResult {
    /// The discount line, when the discount applied.
    pub discount: Option<DiscountLine>,
    /// The audit step recording the evaluation, when a policy was present.
    pub audit_step: Option<AuditStep>,
}

/// Selects the dominant leg: the non-waived leg with the largest amount,
/// ties broken by ascending producer id.
///
/// Legs are already ordered by producer id, so a strict `>` scan picks the
/// lowest producer id among equals.
pub fn dominant_leg(legs: &[ProducerLeg]) -> Option<&ProducerLeg> {
    let mut dominant: Option<&ProducerLeg> = None;
    for leg in legs.iter().filter(|leg| !leg.waived) {
        match dominant {
            Some(current) if leg.amount > current.amount => dominant = Some(leg),
            None => dominant = Some(leg),
            _ => {}
        }
    }
    dominant
}

/// Applies the multi-producer discount to the combined shipping subtotal.
///
/// # Arguments
///
/// * `policy` - The discount policy of the dominant leg's (zone, tier,
///   method) rate, when one is configured
/// * `dominant` - The dominant leg (identifies the governing rate in the
///   discount line)
/// * `zone_id` - The destination zone
/// * `method` - The delivery method code
/// * `producer_count` - The number of distinct producers in the shipment
/// * `subtotal` - The sum of all non-waived leg amounts
/// * `step_number` - The audit step number to record
///
/// # Returns
///
/// A `DiscountResult` whose discount is present iff a policy exists and
/// `producer_count >= policy.min_producers`.
pub fn apply_multi_producer_discount(
    policy: Option<DiscountPolicy>,
    dominant: &ProducerLeg,
    zone_id: u32,
    method: &str,
    producer_count: u32,
    subtotal: Decimal,
    step_number: u32,
) -> DiscountResult {
    let Some(policy) = policy else {
        return DiscountResult {
            discount: None,
            audit_step: None,
        };
    };

    let applies = producer_count >= policy.min_producers;
    let amount = if applies {
        subtotal * policy.percentage / Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let rule = format!("{}/{}/{}", zone_id, dominant.tier, method);

    let audit_step = AuditStep {
        step_number,
        rule_id: "multi_producer_discount".to_string(),
        rule_name: "Multi-Producer Discount".to_string(),
        input: serde_json::json!({
            "governing_rate": rule.clone(),
            "producer_count": producer_count,
            "min_producers": policy.min_producers,
            "subtotal": subtotal.to_string(),
        }),
        output: serde_json::json!({
            "applies": applies,
            "percentage": policy.percentage.to_string(),
            "amount": amount.to_string(),
        }),
        reasoning: if applies {
            format!(
                "{} distinct producers meet the minimum of {}; {}% off combined subtotal {} saves {}",
                producer_count, policy.min_producers, policy.percentage, subtotal, amount
            )
        } else {
            format!(
                "{} distinct producers below the minimum of {}; no discount",
                producer_count, policy.min_producers
            )
        },
    };

    let discount = applies.then(|| DiscountLine {
        rule,
        percentage: policy.percentage,
        min_producers: policy.min_producers,
        producer_count,
        amount,
    });

    DiscountResult {
        discount,
        audit_step: Some(audit_step),
    }
}
