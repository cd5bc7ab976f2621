//! The immutable, read-optimized configuration snapshot.
//!
//! All rate and zone configuration is loaded once into a
//! [`ShippingSnapshot`] and indexed for constant-time lookup during quote
//! evaluation. The snapshot is shared read-only across requests; the
//! configuration collaborator replaces it wholesale and marks the old one
//! stale when administrators change rates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use super::types::{
    AdditionalCharge, DeliveryMethod, EngineSettings, ExtraWeightCharge, FreeShippingRule,
    PostalCodePrefix, ProducerMethod, ProducerRate, ShippingZone, WeightTier, ZoneRate,
};

/// Key for a zone-default rate: (zone, tier code, method code).
pub type ZoneRateKey = (u32, String, String);

/// Key for a producer override: (producer, zone, tier code, method code).
pub type ProducerRateKey = (u32, u32, String, String);

/// An immutable configuration snapshot indexed for quote evaluation.
///
/// Construction sorts postal prefixes longest-first and weight tiers by
/// their lower bound, and builds hash indexes for rate lookup, so the hot
/// path never scans raw configuration lists.
#[derive(Debug)]
pub struct ShippingSnapshot {
    version: u64,
    loaded_at: DateTime<Utc>,
    stale: AtomicBool,

    zones: HashMap<u32, ShippingZone>,
    /// Prefixes sorted by length descending (then lexicographically).
    prefixes: Vec<PostalCodePrefix>,
    /// Tiers sorted by `min_grams` ascending.
    tiers: Vec<WeightTier>,
    methods: HashMap<String, DeliveryMethod>,
    zone_rates: HashMap<ZoneRateKey, ZoneRate>,
    producer_rates: HashMap<ProducerRateKey, Decimal>,
    free_shipping: HashMap<u32, Vec<FreeShippingRule>>,
    extra_weight_charges: Vec<ExtraWeightCharge>,
    additional_charges: HashMap<String, AdditionalCharge>,
    producer_methods: HashMap<u32, HashSet<String>>,
    settings: EngineSettings,
}

impl ShippingSnapshot {
    /// Builds a snapshot from raw configuration lists.
    ///
    /// The loader validates structural invariants before calling this; the
    /// constructor only sorts and indexes.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        version: u64,
        zones: Vec<ShippingZone>,
        prefixes: Vec<PostalCodePrefix>,
        tiers: Vec<WeightTier>,
        methods: Vec<DeliveryMethod>,
        zone_rates: Vec<ZoneRate>,
        producer_rates: Vec<ProducerRate>,
        free_shipping_rules: Vec<FreeShippingRule>,
        extra_weight_charges: Vec<ExtraWeightCharge>,
        additional_charges: Vec<AdditionalCharge>,
        producer_methods: Vec<ProducerMethod>,
        settings: EngineSettings,
    ) -> Self {
        let zones: HashMap<u32, ShippingZone> = zones.into_iter().map(|z| (z.id, z)).collect();

        let mut prefixes = prefixes;
        prefixes.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });

        let mut tiers = tiers;
        tiers.sort_by_key(|t| t.min_grams);

        let methods: HashMap<String, DeliveryMethod> =
            methods.into_iter().map(|m| (m.code.clone(), m)).collect();

        let zone_rates: HashMap<ZoneRateKey, ZoneRate> = zone_rates
            .into_iter()
            .map(|r| ((r.zone_id, r.tier.clone(), r.method.clone()), r))
            .collect();

        let producer_rates: HashMap<ProducerRateKey, Decimal> = producer_rates
            .into_iter()
            .map(|r| ((r.producer_id, r.zone_id, r.tier, r.method), r.price))
            .collect();

        let mut free_shipping: HashMap<u32, Vec<FreeShippingRule>> = HashMap::new();
        for rule in free_shipping_rules {
            free_shipping.entry(rule.producer_id).or_default().push(rule);
        }

        let additional_charges: HashMap<String, AdditionalCharge> = additional_charges
            .into_iter()
            .map(|c| (c.code.clone(), c))
            .collect();

        let mut producer_method_sets: HashMap<u32, HashSet<String>> = HashMap::new();
        for pm in producer_methods {
            if pm.enabled {
                producer_method_sets
                    .entry(pm.producer_id)
                    .or_default()
                    .insert(pm.method);
            }
        }

        Self {
            version,
            loaded_at: Utc::now(),
            stale: AtomicBool::new(false),
            zones,
            prefixes,
            tiers,
            methods,
            zone_rates,
            producer_rates,
            free_shipping,
            extra_weight_charges,
            additional_charges,
            producer_methods: producer_method_sets,
            settings,
        }
    }

    /// Returns the snapshot version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the snapshot was loaded.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Marks the snapshot stale.
    ///
    /// Called by the configuration collaborator when the underlying rate
    /// data changes; subsequent quote attempts against this snapshot fail
    /// rather than price from deleted rows.
    pub fn invalidate(&self) {
        self.stale.store(true, Ordering::Release);
    }

    /// Returns whether the snapshot has been invalidated.
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    /// Returns the zone with the given id.
    pub fn zone(&self, zone_id: u32) -> Option<&ShippingZone> {
        self.zones.get(&zone_id)
    }

    /// Returns the postal prefixes, longest first.
    pub fn prefixes(&self) -> &[PostalCodePrefix] {
        &self.prefixes
    }

    /// Returns the weight tiers, lightest first.
    pub fn tiers(&self) -> &[WeightTier] {
        &self.tiers
    }

    /// Returns the heaviest configured tier.
    ///
    /// The loader guarantees at least one tier exists.
    pub fn heaviest_tier(&self) -> &WeightTier {
        self.tiers.last().expect("snapshot has no weight tiers")
    }

    /// Returns the delivery method with the given code.
    pub fn method(&self, code: &str) -> Option<&DeliveryMethod> {
        self.methods.get(code)
    }

    /// Returns the zone-default rate for (zone, tier, method).
    pub fn zone_rate(&self, zone_id: u32, tier: &str, method: &str) -> Option<&ZoneRate> {
        self.zone_rates
            .get(&(zone_id, tier.to_string(), method.to_string()))
    }

    /// Returns the producer price override for (producer, zone, tier, method).
    pub fn producer_rate(
        &self,
        producer_id: u32,
        zone_id: u32,
        tier: &str,
        method: &str,
    ) -> Option<Decimal> {
        self.producer_rates
            .get(&(producer_id, zone_id, tier.to_string(), method.to_string()))
            .copied()
    }

    /// Returns the free-shipping rules for a producer.
    pub fn free_shipping_rules(&self, producer_id: u32) -> &[FreeShippingRule] {
        self.free_shipping
            .get(&producer_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns all extra-weight charges.
    pub fn extra_weight_charges(&self) -> &[ExtraWeightCharge] {
        &self.extra_weight_charges
    }

    /// Returns the additional charge with the given code.
    pub fn additional_charge(&self, code: &str) -> Option<&AdditionalCharge> {
        self.additional_charges.get(code)
    }

    /// Returns whether the producer has enabled the given method.
    pub fn producer_has_method(&self, producer_id: u32, method: &str) -> bool {
        self.producer_methods
            .get(&producer_id)
            .is_some_and(|methods| methods.contains(method))
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}
