//! Postal-code to shipping-zone resolution.
//!
//! This module maps a destination postal code onto a shipping zone via
//! longest-prefix match over the configured prefix table.

use crate::config::ShippingSnapshot;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// The result of a zone resolution, including the audit step.
#[derive(Debug, Clone)]
pub struct ZoneResolution {
    /// The resolved zone id.
    pub zone_id: u32,
    /// The prefix that matched.
    pub matched_prefix: String,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Resolves the shipping zone for a destination postal code.
///
/// Among all configured prefixes that are a prefix of the (trimmed) postal
/// code, the longest match wins; ties are impossible because prefixes are
/// globally unique. The loader guarantees every prefix references an
/// active zone, so no activeness check happens here.
///
/// # Arguments
///
/// * `postal_code` - The destination postal code
/// * `snapshot` - The configuration snapshot
/// * `step_number` - The audit step number to record
///
/// # Returns
///
/// Returns a `ZoneResolution`, or `ZoneNotResolved` when no prefix matches.
/// Callers must treat that as "cannot ship to this address" rather than
/// falling back to a default zone.
pub fn resolve_zone(
    postal_code: &str,
    snapshot: &ShippingSnapshot,
    step_number: u32,
) -> EngineResult<ZoneResolution> {
    let trimmed = postal_code.trim();

    if trimmed.is_empty() {
        return Err(EngineError::ZoneNotResolved {
            postal_code: postal_code.to_string(),
        });
    }

    // Prefixes are pre-sorted longest first, so the first hit is the
    // longest match.
    let matched = snapshot
        .prefixes()
        .iter()
        .find(|mapping| trimmed.starts_with(mapping.prefix.as_str()));

    match matched {
        Some(mapping) => {
            let zone_name = snapshot
                .zone(mapping.zone_id)
                .map(|z| z.name.clone())
                .unwrap_or_default();
            let audit_step = AuditStep {
                step_number,
                rule_id: "zone_resolution".to_string(),
                rule_name: "Zone Resolution".to_string(),
                input: serde_json::json!({
                    "postal_code": trimmed,
                }),
                output: serde_json::json!({
                    "zone_id": mapping.zone_id,
                    "zone_name": zone_name,
                    "matched_prefix": mapping.prefix,
                }),
                reasoning: format!(
                    "Postal code '{}' matched prefix '{}' for zone {} ({})",
                    trimmed, mapping.prefix, mapping.zone_id, zone_name
                ),
            };

            Ok(ZoneResolution {
                zone_id: mapping.zone_id,
                matched_prefix: mapping.prefix.clone(),
                audit_step,
            })
        }
        None => Err(EngineError::ZoneNotResolved {
            postal_code: trimmed.to_string(),
        }),
    }
}
