//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a shipping
//! configuration snapshot from a directory of YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::snapshot::ShippingSnapshot;
use super::types::{
    DeliveryMethodsConfig, EngineSettings, FreeShippingConfig, PostalCodePrefix,
    ProducerMethodsConfig, RatesConfig, ShippingZone, SurchargesConfig, WeightTier,
    WeightTiersConfig, ZonesConfig,
};

/// Loads shipping configuration snapshots from YAML files.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/marketplace/
/// ├── zones.yaml             # Zones and postal-code prefixes
/// ├── weight_tiers.yaml      # Weight brackets
/// ├── delivery_methods.yaml  # Fulfillment channels
/// ├── rates.yaml             # Zone rates and producer overrides
/// ├── free_shipping.yaml     # Per-producer free-shipping rules
/// ├── surcharges.yaml        # Extra-weight and additional charges
/// ├── producer_methods.yaml  # Producer method enablement
/// └── settings.yaml          # Engine settings (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use shipping_engine::config::ConfigLoader;
///
/// let snapshot = ConfigLoader::load("./config/marketplace").unwrap();
/// println!("Loaded snapshot version {}", snapshot.version());
/// ```
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a snapshot with version 1 from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory
    ///
    /// # Returns
    ///
    /// Returns a validated [`ShippingSnapshot`] on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The configuration violates a structural invariant (duplicate
    ///   prefixes, overlapping tiers, dangling references, duplicate rate
    ///   keys)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<ShippingSnapshot> {
        Self::load_with_version(path, 1)
    }

    /// Loads a snapshot from the specified directory with an explicit
    /// version number.
    ///
    /// The configuration collaborator bumps the version on every refresh so
    /// that stale-snapshot failures identify which generation they priced
    /// against.
    pub fn load_with_version<P: AsRef<Path>>(
        path: P,
        version: u64,
    ) -> EngineResult<ShippingSnapshot> {
        let path = path.as_ref();

        let zones_config = Self::load_yaml::<ZonesConfig>(&path.join("zones.yaml"))?;
        let tiers_config = Self::load_yaml::<WeightTiersConfig>(&path.join("weight_tiers.yaml"))?;
        let methods_config =
            Self::load_yaml::<DeliveryMethodsConfig>(&path.join("delivery_methods.yaml"))?;
        let rates_config = Self::load_yaml::<RatesConfig>(&path.join("rates.yaml"))?;
        let free_shipping_config =
            Self::load_yaml::<FreeShippingConfig>(&path.join("free_shipping.yaml"))?;
        let surcharges_config =
            Self::load_yaml::<SurchargesConfig>(&path.join("surcharges.yaml"))?;
        let producer_methods_config =
            Self::load_yaml::<ProducerMethodsConfig>(&path.join("producer_methods.yaml"))?;

        // settings.yaml is optional; defaults apply when absent.
        let settings_path = path.join("settings.yaml");
        let settings = if settings_path.exists() {
            Self::load_yaml::<EngineSettings>(&settings_path)?
        } else {
            EngineSettings::default()
        };

        Self::validate_zones(&zones_config.zones, &zones_config.postal_prefixes)?;
        Self::validate_tiers(&tiers_config.tiers)?;
        Self::validate_methods(&methods_config)?;
        Self::validate_rates(&rates_config, &zones_config, &tiers_config, &methods_config)?;
        Self::validate_references(
            &zones_config,
            &methods_config,
            &free_shipping_config,
            &surcharges_config,
            &producer_methods_config,
        )?;

        if settings.volumetric_divisor == 0 {
            return Err(EngineError::ConfigInvalid {
                message: "volumetric_divisor must be positive".to_string(),
            });
        }

        Ok(ShippingSnapshot::new(
            version,
            zones_config.zones,
            zones_config.postal_prefixes,
            tiers_config.tiers,
            methods_config.methods,
            rates_config.zone_rates,
            rates_config.producer_rates,
            free_shipping_config.rules,
            surcharges_config.extra_weight_charges,
            surcharges_config.additional_charges,
            producer_methods_config.producer_methods,
            settings,
        ))
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_zones(
        zones: &[ShippingZone],
        prefixes: &[PostalCodePrefix],
    ) -> EngineResult<()> {
        if zones.is_empty() {
            return Err(EngineError::ConfigInvalid {
                message: "no shipping zones configured".to_string(),
            });
        }

        let mut zone_active = std::collections::HashMap::new();
        for zone in zones {
            if zone_active.insert(zone.id, zone.active).is_some() {
                return Err(EngineError::ConfigInvalid {
                    message: format!("duplicate zone id {}", zone.id),
                });
            }
        }

        let mut seen_prefixes = HashSet::new();
        for mapping in prefixes {
            if mapping.prefix.is_empty() {
                return Err(EngineError::ConfigInvalid {
                    message: "empty postal code prefix".to_string(),
                });
            }
            if !seen_prefixes.insert(mapping.prefix.as_str()) {
                return Err(EngineError::ConfigInvalid {
                    message: format!("duplicate postal code prefix '{}'", mapping.prefix),
                });
            }
            // Every prefix must map to exactly one active zone, so the
            // resolver can take the longest match unconditionally.
            match zone_active.get(&mapping.zone_id) {
                None => {
                    return Err(EngineError::ConfigInvalid {
                        message: format!(
                            "postal prefix '{}' references unknown zone {}",
                            mapping.prefix, mapping.zone_id
                        ),
                    });
                }
                Some(false) => {
                    return Err(EngineError::ConfigInvalid {
                        message: format!(
                            "postal prefix '{}' references inactive zone {}",
                            mapping.prefix, mapping.zone_id
                        ),
                    });
                }
                Some(true) => {}
            }
        }

        Ok(())
    }

    fn validate_tiers(tiers: &[WeightTier]) -> EngineResult<()> {
        if tiers.is_empty() {
            return Err(EngineError::ConfigInvalid {
                message: "no weight tiers configured".to_string(),
            });
        }

        let mut codes = HashSet::new();
        for tier in tiers {
            if !codes.insert(tier.code.as_str()) {
                return Err(EngineError::ConfigInvalid {
                    message: format!("duplicate weight tier code '{}'", tier.code),
                });
            }
            if tier.min_grams > tier.max_grams {
                return Err(EngineError::ConfigInvalid {
                    message: format!(
                        "weight tier '{}' has min_grams {} above max_grams {}",
                        tier.code, tier.min_grams, tier.max_grams
                    ),
                });
            }
        }

        // Brackets must be contiguous and non-overlapping so exactly one
        // tier matches any weight below the ceiling.
        let mut sorted: Vec<&WeightTier> = tiers.iter().collect();
        sorted.sort_by_key(|t| t.min_grams);
        for pair in sorted.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.min_grams != prev.max_grams + 1 {
                return Err(EngineError::ConfigInvalid {
                    message: format!(
                        "weight tiers '{}' and '{}' are not contiguous: {} ends at {}g, {} starts at {}g",
                        prev.code, next.code, prev.code, prev.max_grams, next.code, next.min_grams
                    ),
                });
            }
        }

        Ok(())
    }

    fn validate_methods(methods: &DeliveryMethodsConfig) -> EngineResult<()> {
        let mut codes = HashSet::new();
        for method in &methods.methods {
            if !codes.insert(method.code.as_str()) {
                return Err(EngineError::ConfigInvalid {
                    message: format!("duplicate delivery method code '{}'", method.code),
                });
            }
        }
        Ok(())
    }

    fn validate_rates(
        rates: &RatesConfig,
        zones: &ZonesConfig,
        tiers: &WeightTiersConfig,
        methods: &DeliveryMethodsConfig,
    ) -> EngineResult<()> {
        let zone_ids: HashSet<u32> = zones.zones.iter().map(|z| z.id).collect();
        let tier_codes: HashSet<&str> = tiers.tiers.iter().map(|t| t.code.as_str()).collect();
        let method_codes: HashSet<&str> =
            methods.methods.iter().map(|m| m.code.as_str()).collect();

        let mut zone_rate_keys = HashSet::new();
        for rate in &rates.zone_rates {
            Self::check_rate_refs(
                rate.zone_id,
                &rate.tier,
                &rate.method,
                &zone_ids,
                &tier_codes,
                &method_codes,
            )?;
            if !zone_rate_keys.insert((rate.zone_id, rate.tier.as_str(), rate.method.as_str())) {
                return Err(EngineError::ConfigInvalid {
                    message: format!(
                        "duplicate zone rate for zone {}, tier '{}', method '{}'",
                        rate.zone_id, rate.tier, rate.method
                    ),
                });
            }
        }

        let mut producer_rate_keys = HashSet::new();
        for rate in &rates.producer_rates {
            Self::check_rate_refs(
                rate.zone_id,
                &rate.tier,
                &rate.method,
                &zone_ids,
                &tier_codes,
                &method_codes,
            )?;
            let key = (
                rate.producer_id,
                rate.zone_id,
                rate.tier.as_str(),
                rate.method.as_str(),
            );
            if !producer_rate_keys.insert(key) {
                return Err(EngineError::ConfigInvalid {
                    message: format!(
                        "duplicate producer rate for producer {}, zone {}, tier '{}', method '{}'",
                        rate.producer_id, rate.zone_id, rate.tier, rate.method
                    ),
                });
            }
        }

        Ok(())
    }

    fn check_rate_refs(
        zone_id: u32,
        tier: &str,
        method: &str,
        zone_ids: &HashSet<u32>,
        tier_codes: &HashSet<&str>,
        method_codes: &HashSet<&str>,
    ) -> EngineResult<()> {
        if !zone_ids.contains(&zone_id) {
            return Err(EngineError::ConfigInvalid {
                message: format!("rate references unknown zone {}", zone_id),
            });
        }
        if !tier_codes.contains(tier) {
            return Err(EngineError::ConfigInvalid {
                message: format!("rate references unknown weight tier '{}'", tier),
            });
        }
        if !method_codes.contains(method) {
            return Err(EngineError::ConfigInvalid {
                message: format!("rate references unknown delivery method '{}'", method),
            });
        }
        Ok(())
    }

    fn validate_references(
        zones: &ZonesConfig,
        methods: &DeliveryMethodsConfig,
        free_shipping: &FreeShippingConfig,
        surcharges: &SurchargesConfig,
        producer_methods: &ProducerMethodsConfig,
    ) -> EngineResult<()> {
        let zone_ids: HashSet<u32> = zones.zones.iter().map(|z| z.id).collect();
        let method_codes: HashSet<&str> =
            methods.methods.iter().map(|m| m.code.as_str()).collect();

        let mut rule_ids = HashSet::new();
        for rule in &free_shipping.rules {
            if !rule_ids.insert(rule.id) {
                return Err(EngineError::ConfigInvalid {
                    message: format!("duplicate free shipping rule id {}", rule.id),
                });
            }
            if let Some(zone_id) = rule.zone_id {
                if !zone_ids.contains(&zone_id) {
                    return Err(EngineError::ConfigInvalid {
                        message: format!(
                            "free shipping rule {} references unknown zone {}",
                            rule.id, zone_id
                        ),
                    });
                }
            }
            if let Some(method) = &rule.method {
                if !method_codes.contains(method.as_str()) {
                    return Err(EngineError::ConfigInvalid {
                        message: format!(
                            "free shipping rule {} references unknown method '{}'",
                            rule.id, method
                        ),
                    });
                }
            }
        }

        for charge in &surcharges.extra_weight_charges {
            if !zone_ids.contains(&charge.zone_id) {
                return Err(EngineError::ConfigInvalid {
                    message: format!(
                        "extra weight charge references unknown zone {}",
                        charge.zone_id
                    ),
                });
            }
            if let Some(method) = &charge.method {
                if !method_codes.contains(method.as_str()) {
                    return Err(EngineError::ConfigInvalid {
                        message: format!(
                            "extra weight charge references unknown method '{}'",
                            method
                        ),
                    });
                }
            }
        }

        let mut charge_codes = HashSet::new();
        for charge in &surcharges.additional_charges {
            if !charge_codes.insert(charge.code.as_str()) {
                return Err(EngineError::ConfigInvalid {
                    message: format!("duplicate additional charge code '{}'", charge.code),
                });
            }
        }

        for pm in &producer_methods.producer_methods {
            if !method_codes.contains(pm.method.as_str()) {
                return Err(EngineError::ConfigInvalid {
                    message: format!(
                        "producer {} enables unknown delivery method '{}'",
                        pm.producer_id, pm.method
                    ),
                });
            }
        }

        Ok(())
    }
}
