//! Order-level additional charge application.
//!
//! Additional charges (e.g. cash on delivery) are a property of the whole
//! order's handling, not of any one producer's goods: they are applied once
//! per order and are never waived by free shipping. Flat charges add
//! directly; percentage charges are computed against the raw shipping
//! subtotal (all legs' base rates plus overweight surcharges, before
//! free-shipping waivers and before the multi-producer discount).

use rust_decimal::Decimal;

use crate::config::ShippingSnapshot;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ChargeLine};

/// The charge code customers request cash on delivery by.
///
/// Requesting this code additionally requires the chosen delivery method
/// to support COD.
pub const COD_CHARGE_CODE: &str = "cod";

/// The result of resolving the requested additional charges.
#[derive(Debug, Clone)]
pub struct AdditionalChargesResult {
    /// The resolved charge lines, in request order.
    pub lines: Vec<ChargeLine>,
    /// The audit steps recording each charge.
    pub audit_steps: Vec<AuditStep>,
}

/// Resolves and prices the requested additional-charge codes.
///
/// # Arguments
///
/// * `codes` - The requested charge codes (e.g. `["cod"]`)
/// * `raw_shipping_subtotal` - Sum of all legs' base + overweight amounts,
///   before waivers and discount
/// * `snapshot` - The configuration snapshot
/// * `first_step_number` - The audit step number of the first charge
///
/// # Returns
///
/// Returns the charge lines, or `ChargeNotConfigured` when a requested
/// code is unknown or inactive. A repeated code is applied once only.
pub fn apply_additional_charges(
    codes: &[String],
    raw_shipping_subtotal: Decimal,
    snapshot: &ShippingSnapshot,
    first_step_number: u32,
) -> EngineResult<AdditionalChargesResult> {
    let mut lines = Vec::new();
    let mut audit_steps = Vec::new();
    let mut step_number = first_step_number;
    let mut seen: Vec<&str> = Vec::new();

    for code in codes {
        if seen.contains(&code.as_str()) {
            continue;
        }
        seen.push(code.as_str());

        let charge = snapshot
            .additional_charge(code)
            .filter(|c| c.active)
            .ok_or_else(|| EngineError::ChargeNotConfigured { code: code.clone() })?;

        let (amount, percentage) = if charge.is_percentage {
            let amount = raw_shipping_subtotal * charge.price / Decimal::ONE_HUNDRED;
            (amount, Some(charge.price))
        } else {
            (charge.price, None)
        };

        audit_steps.push(AuditStep {
            step_number,
            rule_id: "additional_charge".to_string(),
            rule_name: "Additional Charge".to_string(),
            input: serde_json::json!({
                "code": charge.code,
                "is_percentage": charge.is_percentage,
                "raw_shipping_subtotal": raw_shipping_subtotal.to_string(),
            }),
            output: serde_json::json!({
                "amount": amount.to_string(),
            }),
            reasoning: if charge.is_percentage {
                format!(
                    "Charge '{}' at {}% of raw shipping subtotal {} adds {}",
                    charge.code, charge.price, raw_shipping_subtotal, amount
                )
            } else {
                format!("Flat charge '{}' adds {}", charge.code, amount)
            },
        });
        step_number += 1;

        lines.push(ChargeLine {
            code: charge.code.clone(),
            name: charge.name.clone(),
            percentage,
            amount,
        });
    }

    Ok(AdditionalChargesResult { lines, audit_steps })
}
