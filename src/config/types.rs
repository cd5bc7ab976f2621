//! Configuration types for the shipping engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. All of them are
//! administrator-managed data; the engine only ever reads them.

use rust_decimal::Decimal;
use serde::Deserialize;

/// A geographic pricing region.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingZone {
    /// The zone id referenced by prefixes, rates, and rules.
    pub id: u32,
    /// The human-readable name of the zone.
    pub name: String,
    /// Whether the zone is currently serviceable.
    #[serde(default = "default_true")]
    pub active: bool,
}

/// A postal-code-prefix to zone mapping.
///
/// Prefixes are globally unique; the longest prefix matching a destination
/// postal code determines its zone.
#[derive(Debug, Clone, Deserialize)]
pub struct PostalCodePrefix {
    /// The postal code prefix (digits).
    pub prefix: String,
    /// The zone this prefix maps to.
    pub zone_id: u32,
}

/// A contiguous weight bracket used to look up a base shipping price.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightTier {
    /// The tier code referenced by rate rows (e.g. `"t_2000"`).
    pub code: String,
    /// The lower bound of the bracket in grams (inclusive).
    pub min_grams: u64,
    /// The upper bound of the bracket in grams (inclusive).
    pub max_grams: u64,
}

/// A fulfillment channel (home delivery, pickup point, locker).
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryMethod {
    /// The method code (e.g. `"home"`).
    pub code: String,
    /// The human-readable name of the method.
    pub name: String,
    /// Whether the method is currently offered at all.
    #[serde(default = "default_true")]
    pub active: bool,
    /// The heaviest shipment the method can carry, if limited.
    #[serde(default)]
    pub max_weight_grams: Option<u64>,
    /// Whether the method supports cash on delivery.
    #[serde(default)]
    pub supports_cod: bool,
}

/// The zone-default price for a (zone, tier, method) combination.
///
/// Also carries the multi-producer discount policy for that combination;
/// producer overrides never replace the policy, only the price.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneRate {
    /// The destination zone.
    pub zone_id: u32,
    /// The weight tier code.
    pub tier: String,
    /// The delivery method code.
    pub method: String,
    /// The base price for this combination.
    pub price: Decimal,
    /// Percentage discount when enough distinct producers share a shipment.
    #[serde(default)]
    pub multi_producer_discount_pct: Option<Decimal>,
    /// Minimum number of distinct producers for the discount to apply.
    #[serde(default)]
    pub min_producers_for_discount: Option<u32>,
}

/// A producer-specific price overriding the zone default.
#[derive(Debug, Clone, Deserialize)]
pub struct ProducerRate {
    /// The producer this override belongs to.
    pub producer_id: u32,
    /// The destination zone.
    pub zone_id: u32,
    /// The weight tier code.
    pub tier: String,
    /// The delivery method code.
    pub method: String,
    /// The overriding price.
    pub price: Decimal,
}

/// A per-producer free-shipping rule.
///
/// A `None` zone or method means the rule applies regardless of that
/// dimension; the most specific applicable rule wins.
#[derive(Debug, Clone, Deserialize)]
pub struct FreeShippingRule {
    /// Unique rule id, used as the deterministic tie-break.
    pub id: u32,
    /// The producer the rule belongs to.
    pub producer_id: u32,
    /// The zone the rule is scoped to, if any.
    #[serde(default)]
    pub zone_id: Option<u32>,
    /// The delivery method the rule is scoped to, if any.
    #[serde(default)]
    pub method: Option<String>,
    /// The producer-subtotal threshold at or above which shipping is waived.
    pub threshold: Decimal,
    /// Whether the rule is currently in force.
    #[serde(default = "default_true")]
    pub active: bool,
}

/// A per-kilogram surcharge for weight beyond the heaviest tier.
///
/// A producer-scoped charge overrides a zone-scoped one; within each scope a
/// method-specific charge is preferred over a method-agnostic one.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtraWeightCharge {
    /// The zone the charge applies in.
    pub zone_id: u32,
    /// The producer the charge is scoped to, if any.
    #[serde(default)]
    pub producer_id: Option<u32>,
    /// The delivery method the charge is scoped to, if any.
    #[serde(default)]
    pub method: Option<String>,
    /// The price per started kilogram of overflow.
    pub price_per_kg: Decimal,
    /// Whether the charge is currently in force.
    #[serde(default = "default_true")]
    pub active: bool,
}

/// An order-level flat or percentage surcharge (e.g. cash on delivery).
#[derive(Debug, Clone, Deserialize)]
pub struct AdditionalCharge {
    /// The charge code customers request it by (e.g. `"cod"`).
    pub code: String,
    /// The human-readable name of the charge.
    pub name: String,
    /// The flat amount, or the percentage when `is_percentage` is set.
    pub price: Decimal,
    /// Whether `price` is a percentage of the shipping subtotal.
    #[serde(default)]
    pub is_percentage: bool,
    /// Whether the charge is currently offered.
    #[serde(default = "default_true")]
    pub active: bool,
}

/// A producer's enablement of a delivery method.
///
/// Methods a producer has not explicitly enabled are unavailable for their
/// items.
#[derive(Debug, Clone, Deserialize)]
pub struct ProducerMethod {
    /// The producer.
    pub producer_id: u32,
    /// The delivery method code.
    pub method: String,
    /// Whether the producer currently offers the method.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Engine-level tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Divisor for volumetric weight (cm³ per kg).
    #[serde(default = "default_volumetric_divisor")]
    pub volumetric_divisor: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            volumetric_divisor: default_volumetric_divisor(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_volumetric_divisor() -> u32 {
    5000
}

/// `zones.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ZonesConfig {
    /// The configured zones.
    pub zones: Vec<ShippingZone>,
    /// The prefix-to-zone mappings.
    pub postal_prefixes: Vec<PostalCodePrefix>,
}

/// `weight_tiers.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightTiersConfig {
    /// The configured weight tiers.
    pub tiers: Vec<WeightTier>,
}

/// `delivery_methods.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryMethodsConfig {
    /// The configured delivery methods.
    pub methods: Vec<DeliveryMethod>,
}

/// `rates.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Zone-default rates.
    pub zone_rates: Vec<ZoneRate>,
    /// Producer price overrides.
    #[serde(default)]
    pub producer_rates: Vec<ProducerRate>,
}

/// `free_shipping.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct FreeShippingConfig {
    /// The configured free-shipping rules.
    #[serde(default)]
    pub rules: Vec<FreeShippingRule>,
}

/// `surcharges.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SurchargesConfig {
    /// Per-kilogram overweight charges.
    #[serde(default)]
    pub extra_weight_charges: Vec<ExtraWeightCharge>,
    /// Order-level additional charges.
    #[serde(default)]
    pub additional_charges: Vec<AdditionalCharge>,
}

/// `producer_methods.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ProducerMethodsConfig {
    /// The producer method enablements.
    pub producer_methods: Vec<ProducerMethod>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_active_defaults_to_true() {
        let yaml = "id: 1\nname: Attica\n";
        let zone: ShippingZone = serde_yaml::from_str(yaml).unwrap();
        assert!(zone.active);
    }

    #[test]
    fn test_zone_rate_discount_policy_is_optional() {
        let yaml = "zone_id: 1\ntier: t_2000\nmethod: home\nprice: '3.50'\n";
        let rate: ZoneRate = serde_yaml::from_str(yaml).unwrap();
        assert!(rate.multi_producer_discount_pct.is_none());
        assert!(rate.min_producers_for_discount.is_none());
    }

    #[test]
    fn test_free_shipping_rule_scopes_are_optional() {
        let yaml = "id: 1\nproducer_id: 4\nthreshold: '50.00'\n";
        let rule: FreeShippingRule = serde_yaml::from_str(yaml).unwrap();
        assert!(rule.zone_id.is_none());
        assert!(rule.method.is_none());
        assert!(rule.active);
    }

    #[test]
    fn test_engine_settings_default_divisor() {
        let settings = EngineSettings::default();
        assert_eq!(settings.volumetric_divisor, 5000);
    }
}
