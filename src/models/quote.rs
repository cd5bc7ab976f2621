//! Quote models for the Shipping Cost Resolution Engine.
//!
//! This module contains the [`ShippingQuote`] type and its associated
//! structures that capture all outputs from a quote computation, including
//! per-producer legs, the multi-producer discount, additional charges, and
//! the audit trace explaining every figure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The shipping cost breakdown for a single producer's leg of the order.
///
/// # Example
///
/// ```
/// use shipping_engine::models::ProducerLeg;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let leg = ProducerLeg {
///     producer_id: 1,
///     tier: "t_2000".to_string(),
///     chargeable_weight_grams: 1500,
///     base_rate: Decimal::from_str("3.50").unwrap(),
///     overweight_surcharge: Decimal::ZERO,
///     waived: false,
///     amount: Decimal::from_str("3.50").unwrap(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerLeg {
    /// The producer this leg belongs to.
    pub producer_id: u32,
    /// The weight tier code the leg was priced under.
    pub tier: String,
    /// The chargeable weight (max of real and volumetric) in grams.
    pub chargeable_weight_grams: u64,
    /// The resolved base rate for (zone, tier, method).
    pub base_rate: Decimal,
    /// The surcharge for weight exceeding the heaviest tier.
    pub overweight_surcharge: Decimal,
    /// Whether a free-shipping rule waived this leg.
    pub waived: bool,
    /// The amount this leg contributes to the shipping subtotal.
    ///
    /// Zero when waived, otherwise base rate plus overweight surcharge.
    pub amount: Decimal,
}

impl ProducerLeg {
    /// Returns the leg's raw cost before any free-shipping waiver.
    pub fn raw_amount(&self) -> Decimal {
        self.base_rate + self.overweight_surcharge
    }
}

/// The multi-producer consolidation discount applied to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountLine {
    /// Identifier of the rate row whose policy triggered the discount,
    /// as `zone/tier/method` of the dominant leg.
    pub rule: String,
    /// The discount percentage applied.
    pub percentage: Decimal,
    /// The minimum number of distinct producers required.
    pub min_producers: u32,
    /// The number of distinct producers in the shipment.
    pub producer_count: u32,
    /// The discount amount subtracted from the shipping subtotal.
    pub amount: Decimal,
}

/// An order-level additional charge line (e.g. cash on delivery).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLine {
    /// The charge code (e.g. `"cod"`).
    pub code: String,
    /// The human-readable name of the charge.
    pub name: String,
    /// The percentage applied, for percentage charges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    /// The resulting charge amount.
    pub amount: Decimal,
}

/// A single step in the audit trace recording a pricing decision.
///
/// Each step captures the input, output, and reasoning for a rule
/// application, so every figure in the quote can be traced back to the
/// configuration rows that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during quote computation.
///
/// Warnings indicate potential issues that don't prevent quoting but may
/// require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a quote.
///
/// Deliberately free of timestamps and durations so that quoting the same
/// shipment against the same snapshot twice yields identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of pricing steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during computation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a shipping cost computation.
///
/// The order subsystem persists [`total`](Self::total) as the order's
/// shipping cost and may store the full breakdown for display and audit.
/// All intermediate figures carry full precision; two-decimal rounding is
/// applied only to the final total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingQuote {
    /// The engine version that produced this quote.
    pub engine_version: String,
    /// The configuration snapshot version the quote was priced against.
    pub snapshot_version: u64,
    /// The resolved destination zone.
    pub zone_id: u32,
    /// The delivery method the order was priced for.
    pub delivery_method: String,
    /// One leg per producer, ordered by producer id ascending.
    pub per_producer: Vec<ProducerLeg>,
    /// Sum of all non-waived leg amounts, before the discount.
    pub subtotal_before_discount: Decimal,
    /// The multi-producer discount, when one applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountLine>,
    /// Order-level additional charges.
    pub additional_charges: Vec<ChargeLine>,
    /// The final total, rounded to two decimals.
    pub total: Decimal,
    /// The audit trace explaining the computation.
    pub audit_trace: AuditTrace,
}

impl ShippingQuote {
    /// Returns the total discount amount (zero when no discount applied).
    pub fn discount_amount(&self) -> Decimal {
        self.discount
            .as_ref()
            .map(|d| d.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns the sum of all additional charge amounts.
    pub fn additional_charges_total(&self) -> Decimal {
        self.additional_charges.iter().map(|c| c.amount).sum()
    }
}
