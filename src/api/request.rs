//! Request types for the shipping engine API.
//!
//! This module defines the JSON request structures for the `/quote`
//! endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Dimensions, ShipmentItem, ShipmentRequest};

/// Request body for the `/quote` endpoint.
///
/// Contains the read-only order snapshot the engine prices: destination,
/// chosen delivery method, line items, and any requested additional
/// charges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// The destination postal code.
    pub destination_postal_code: String,
    /// The delivery method code chosen for the whole order.
    pub delivery_method: String,
    /// The order line items.
    pub items: Vec<QuoteItemRequest>,
    /// Additional charge codes requested by the customer (e.g. `"cod"`).
    #[serde(default)]
    pub additional_charges: Vec<String>,
}

/// A line item in a quote request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItemRequest {
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
    pub dimensions: Option<DimensionsRequest>,
}

/// Item dimensions in a quote request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DimensionsRequest {
    /// Length in centimetres.
    pub length_cm: u32,
    /// Width in centimetres.
    pub width_cm: u32,
    /// Height in centimetres.
    pub height_cm: u32,
}

impl From<QuoteRequest> for ShipmentRequest {
    fn from(req: QuoteRequest) -> Self {
        ShipmentRequest {
            destination_postal_code: req.destination_postal_code,
            delivery_method: req.delivery_method,
            items: req.items.into_iter().map(Into::into).collect(),
            additional_charges: req.additional_charges,
        }
    }
}

impl From<QuoteItemRequest> for ShipmentItem {
    fn from(req: QuoteItemRequest) -> Self {
        ShipmentItem {
            producer_id: req.producer_id,
            weight_grams: req.weight_grams,
            unit_price: req.unit_price,
            quantity: req.quantity,
            dimensions: req.dimensions.map(Into::into),
        }
    }
}

impl From<DimensionsRequest> for Dimensions {
    fn from(req: DimensionsRequest) -> Self {
        Dimensions {
            length_cm: req.length_cm,
            width_cm: req.width_cm,
            height_cm: req.height_cm,
        }
    }
}
