//! The quote orchestrator.
//!
//! Composes the resolvers and calculators into the full per-producer and
//! order-level breakdown. All derived values are produced here by explicit,
//! ordered computation steps; any component failure aborts the whole quote
//! with a typed error identifying the offending producer, zone, or method.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::ShippingSnapshot;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, AuditWarning, ProducerLeg, ShipmentRequest, ShippingQuote};

use super::additional_charges::{apply_additional_charges, COD_CHARGE_CODE};
use super::base_rate::{resolve_base_rate, DiscountPolicy};
use super::free_shipping::evaluate_free_shipping;
use super::method_availability::{resolve_method, validate_method_for_producer};
use super::multi_producer_discount::{apply_multi_producer_discount, dominant_leg};
use super::overweight::calculate_overweight_surcharge;
use super::weight_tier::{chargeable_weight_grams, resolve_weight_tier};
use super::zone_resolution::resolve_zone;

/// Rounds a monetary amount to two decimals, half away from zero.
fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn validate_request(request: &ShipmentRequest) -> EngineResult<()> {
    if request.items.is_empty() {
        return Err(EngineError::InvalidShipment {
            message: "shipment contains no items".to_string(),
        });
    }
    for item in &request.items {
        if item.quantity == 0 {
            return Err(EngineError::InvalidShipment {
                message: format!(
                    "item for producer {} has zero quantity",
                    item.producer_id
                ),
            });
        }
        if item.unit_price.is_sign_negative() {
            return Err(EngineError::InvalidShipment {
                message: format!(
                    "item for producer {} has a negative unit price",
                    item.producer_id
                ),
            });
        }
    }
    Ok(())
}

/// Computes a shipping quote for a shipment against a configuration
/// snapshot.
///
/// Steps, in order: refuse stale snapshots; validate the shipment; resolve
/// the delivery method and the destination zone once; per producer resolve
/// chargeable weight, method availability, weight tier, base rate,
/// overweight surcharge, and free-shipping waiver; sum the non-waived legs;
/// apply the multi-producer discount to the sum; apply additional charges
/// against the pre-waiver subtotal; round the final total to two decimals.
///
/// The computation is a pure function of its inputs: quoting the same
/// shipment against the same snapshot twice yields identical output.
///
/// # Errors
///
/// * [`EngineError::SnapshotStale`] - the snapshot was invalidated
/// * [`EngineError::InvalidShipment`] - structurally invalid request
/// * [`EngineError::MethodNotAvailable`] - method unknown, inactive, not
///   enabled by a producer, over its weight ceiling, or lacking COD support
/// * [`EngineError::ZoneNotResolved`] - postal code matches no prefix
/// * [`EngineError::RateNotConfigured`] - a required rate is missing
/// * [`EngineError::ChargeNotConfigured`] - a requested charge is unknown
///
/// # Example
///
/// ```no_run
/// use shipping_engine::calculation::calculate_quote;
/// use shipping_engine::config::ConfigLoader;
/// use shipping_engine::models::{ShipmentItem, ShipmentRequest};
/// use rust_decimal::Decimal;
///
/// let snapshot = ConfigLoader::load("./config/marketplace")?;
/// let request = ShipmentRequest {
///     destination_postal_code: "10432".to_string(),
///     delivery_method: "home".to_string(),
///     items: vec![ShipmentItem {
///         producer_id: 1,
///         weight_grams: 1500,
///         unit_price: Decimal::new(1000, 2),
///         quantity: 1,
///         dimensions: None,
///     }],
///     additional_charges: vec![],
/// };
/// let quote = calculate_quote(&request, &snapshot)?;
/// println!("Shipping total: {}", quote.total);
/// # Ok::<(), shipping_engine::error::EngineError>(())
/// ```
pub fn calculate_quote(
    request: &ShipmentRequest,
    snapshot: &ShippingSnapshot,
) -> EngineResult<ShippingQuote> {
    if snapshot.is_stale() {
        return Err(EngineError::SnapshotStale {
            version: snapshot.version(),
        });
    }

    validate_request(request)?;

    let mut steps = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let cod_requested = request
        .additional_charges
        .iter()
        .any(|code| code == COD_CHARGE_CODE);

    let method = resolve_method(&request.delivery_method, snapshot)?;

    let zone = resolve_zone(&request.destination_postal_code, snapshot, step_number)?;
    steps.push(zone.audit_step.clone());
    step_number += 1;

    let groups = request.items_by_producer();
    let producer_count = groups.len() as u32;

    let mut legs: Vec<ProducerLeg> = Vec::with_capacity(groups.len());
    // Discount policy per leg, parallel to `legs`.
    let mut policies: Vec<Option<DiscountPolicy>> = Vec::with_capacity(groups.len());
    let mut raw_subtotal = Decimal::ZERO;

    for (producer_id, items) in &groups {
        let producer_id = *producer_id;
        let weight = chargeable_weight_grams(items, snapshot);

        validate_method_for_producer(method, producer_id, weight, cod_requested, snapshot)?;

        let tier = resolve_weight_tier(weight, snapshot, step_number);
        steps.push(tier.audit_step.clone());
        step_number += 1;

        let base_rate = resolve_base_rate(
            producer_id,
            zone.zone_id,
            &tier.tier,
            &method.code,
            snapshot,
            step_number,
        )?;
        steps.push(base_rate.audit_step.clone());
        step_number += 1;

        let overweight = calculate_overweight_surcharge(
            tier.overflow_grams,
            producer_id,
            zone.zone_id,
            &method.code,
            snapshot,
            step_number,
        )?;
        if let Some(step) = &overweight.audit_step {
            steps.push(step.clone());
            step_number += 1;
        }

        let producer_subtotal: Decimal = items.iter().map(|item| item.line_subtotal()).sum();
        let free_shipping = evaluate_free_shipping(
            producer_id,
            zone.zone_id,
            &method.code,
            producer_subtotal,
            snapshot,
            step_number,
        );
        if let Some(step) = &free_shipping.audit_step {
            steps.push(step.clone());
            step_number += 1;
        }

        let leg = ProducerLeg {
            producer_id,
            tier: tier.tier,
            chargeable_weight_grams: weight,
            base_rate: base_rate.price,
            overweight_surcharge: overweight.surcharge,
            waived: free_shipping.waived,
            amount: if free_shipping.waived {
                Decimal::ZERO
            } else {
                base_rate.price + overweight.surcharge
            },
        };
        raw_subtotal += leg.raw_amount();

        legs.push(leg);
        policies.push(base_rate.discount_policy);
    }

    let subtotal_before_discount: Decimal = legs.iter().map(|leg| leg.amount).sum();

    let discount = match dominant_leg(&legs) {
        Some(dominant) => {
            let policy = legs
                .iter()
                .position(|leg| leg.producer_id == dominant.producer_id)
                .and_then(|index| policies[index]);

            if policy.is_none() && producer_count >= 2 {
                warnings.push(AuditWarning {
                    code: "no_discount_policy".to_string(),
                    message: format!(
                        "multi-producer shipment has no discount policy on the dominant leg \
                         (producer {})",
                        dominant.producer_id
                    ),
                    severity: "low".to_string(),
                });
            }

            let result = apply_multi_producer_discount(
                policy,
                dominant,
                zone.zone_id,
                &method.code,
                producer_count,
                subtotal_before_discount,
                step_number,
            );
            if let Some(step) = result.audit_step {
                steps.push(step);
                step_number += 1;
            }
            result.discount
        }
        None => None,
    };

    let charges = apply_additional_charges(
        &request.additional_charges,
        raw_subtotal,
        snapshot,
        step_number,
    )?;
    steps.extend(charges.audit_steps);

    let discount_amount = discount
        .as_ref()
        .map(|d| d.amount)
        .unwrap_or(Decimal::ZERO);
    let charges_total: Decimal = charges.lines.iter().map(|line| line.amount).sum();
    let total = round2(subtotal_before_discount - discount_amount + charges_total);

    Ok(ShippingQuote {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        snapshot_version: snapshot.version(),
        zone_id: zone.zone_id,
        delivery_method: method.code.clone(),
        per_producer: legs,
        subtotal_before_discount,
        discount,
        additional_charges: charges.lines,
        total,
        audit_trace: AuditTrace { steps, warnings },
    })
}
