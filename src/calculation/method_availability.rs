//! Delivery-method availability validation.
//!
//! Before any pricing happens, the chosen method must be offered at all,
//! enabled by every producer in the shipment, within its physical weight
//! ceiling for each producer leg, and COD-capable when a cash-on-delivery
//! charge was requested. A method failing any of these checks fails the
//! whole quote; splitting an order across methods is a product decision the
//! engine does not make.

use crate::config::{DeliveryMethod, ShippingSnapshot};
use crate::error::{EngineError, EngineResult};

/// Looks up the chosen delivery method and checks it is active.
///
/// # Arguments
///
/// * `method_code` - The delivery method code from the request
/// * `snapshot` - The configuration snapshot
///
/// # Returns
///
/// The method, or `MethodNotAvailable` when it is unknown or inactive.
/// `producer_id` is 0 in that error because the failure precedes any
/// producer-specific check.
pub fn resolve_method<'a>(
    method_code: &str,
    snapshot: &'a ShippingSnapshot,
) -> EngineResult<&'a DeliveryMethod> {
    let method = snapshot
        .method(method_code)
        .ok_or_else(|| EngineError::MethodNotAvailable {
            producer_id: 0,
            method: method_code.to_string(),
            reason: "unknown delivery method".to_string(),
        })?;

    if !method.active {
        return Err(EngineError::MethodNotAvailable {
            producer_id: 0,
            method: method_code.to_string(),
            reason: "delivery method is not active".to_string(),
        });
    }

    Ok(method)
}

/// Validates the chosen method for one producer's leg.
///
/// Checks producer enablement, the method's weight ceiling against the
/// leg's chargeable weight, and COD support when COD was requested.
///
/// # Arguments
///
/// * `method` - The resolved delivery method
/// * `producer_id` - The producer being validated
/// * `chargeable_weight_grams` - The leg's chargeable weight
/// * `cod_requested` - Whether a cash-on-delivery charge was requested
/// * `snapshot` - The configuration snapshot
pub fn validate_method_for_producer(
    method: &DeliveryMethod,
    producer_id: u32,
    chargeable_weight_grams: u64,
    cod_requested: bool,
    snapshot: &ShippingSnapshot,
) -> EngineResult<()> {
    if !snapshot.producer_has_method(producer_id, &method.code) {
        return Err(EngineError::MethodNotAvailable {
            producer_id,
            method: method.code.clone(),
            reason: "not enabled by producer".to_string(),
        });
    }

    if let Some(max_weight) = method.max_weight_grams {
        if chargeable_weight_grams > max_weight {
            return Err(EngineError::MethodNotAvailable {
                producer_id,
                method: method.code.clone(),
                reason: format!(
                    "shipment weight {}g exceeds method limit {}g",
                    chargeable_weight_grams, max_weight
                ),
            });
        }
    }

    if cod_requested && !method.supports_cod {
        return Err(EngineError::MethodNotAvailable {
            producer_id,
            method: method.code.clone(),
            reason: "cash on delivery not supported by this method".to_string(),
        });
    }

    Ok(())
}
