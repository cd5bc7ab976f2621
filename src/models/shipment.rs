//! Shipment models describing what is being priced.
//!
//! A shipment is a read-only view of an order at quote time: the destination
//! postal code, the chosen delivery method, the line items grouped by
//! producer, and any additional charges the customer requested.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Physical dimensions of an item in centimetres.
///
/// Used to derive a volumetric weight; items without dimensions are charged
/// on their real weight alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length in centimetres.
    pub length_cm: u32,
    /// Width in centimetres.
    pub width_cm: u32,
    /// Height in centimetres.
    pub height_cm: u32,
}

/// A single order line item as seen by the shipping engine.
///
/// # Example
///
/// ```
/// use shipping_engine::models::ShipmentItem;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let item = ShipmentItem {
///     producer_id: 1,
///     weight_grams: 750,
///     unit_price: Decimal::from_str("12.50").unwrap(),
///     quantity: 2,
///     dimensions: None,
/// };
/// assert_eq!(item.line_weight_grams(), 1500);
/// assert_eq!(item.line_subtotal(), Decimal::from_str("25.00").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentItem {
    /// The producer this item belongs to.
    pub producer_id: u32,
    /// Weight of a single unit in grams.
    pub weight_grams: u64,
    /// Price of a single unit.
    pub unit_price: Decimal,
    /// Number of units ordered.
    pub quantity: u32,
    /// Physical dimensions of a single unit, if known.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

impl ShipmentItem {
    /// Returns the total real weight of this line in grams.
    pub fn line_weight_grams(&self) -> u64 {
        self.weight_grams * u64::from(self.quantity)
    }

    /// Returns the total price of this line (unit price times quantity).
    pub fn line_subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The full shipment description consumed by the quote orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    /// The destination postal code.
    pub destination_postal_code: String,
    /// The delivery method code chosen for the whole order.
    pub delivery_method: String,
    /// The order line items.
    pub items: Vec<ShipmentItem>,
    /// Additional charge codes requested by the customer (e.g. `"cod"`).
    #[serde(default)]
    pub additional_charges: Vec<String>,
}

impl ShipmentRequest {
    /// Groups the shipment's items by producer id.
    ///
    /// The returned map is ordered by producer id ascending so that
    /// per-producer processing is deterministic.
    pub fn items_by_producer(&self) -> BTreeMap<u32, Vec<&ShipmentItem>> {
        let mut groups: BTreeMap<u32, Vec<&ShipmentItem>> = BTreeMap::new();
        for item in &self.items {
            groups.entry(item.producer_id).or_default().push(item);
        }
        groups
    }

    /// Returns the number of distinct producers in the shipment.
    pub fn distinct_producer_count(&self) -> u32 {
        self.items_by_producer().len() as u32
    }
}
