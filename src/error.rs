//! Error types for the Shipping Cost Resolution Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while resolving a shipping quote.

use thiserror::Error;

/// The main error type for the Shipping Cost Resolution Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application. Every failure
/// aborts the quote as a whole; the engine never returns a partial or
/// best-effort price.
///
/// # Example
///
/// ```
/// use shipping_engine::error::EngineError;
///
/// let error = EngineError::ZoneNotResolved {
///     postal_code: "99999".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "No shipping zone configured for postal code '99999'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration data violates a structural invariant.
    #[error("Invalid configuration: {message}")]
    ConfigInvalid {
        /// A description of the violated invariant.
        message: String,
    },

    /// The destination postal code matches no configured zone prefix.
    ///
    /// Surfaced to the customer as "shipping not available to this address".
    #[error("No shipping zone configured for postal code '{postal_code}'")]
    ZoneNotResolved {
        /// The postal code that could not be resolved.
        postal_code: String,
    },

    /// No base or extra-weight rate exists for a required combination.
    ///
    /// Indicates a configuration gap an administrator must close; logged as
    /// an operational alert by the API layer.
    #[error(
        "No shipping rate configured for producer {producer_id}, zone {zone_id}, \
         tier '{tier}', method '{method}'"
    )]
    RateNotConfigured {
        /// The producer whose leg could not be priced.
        producer_id: u32,
        /// The destination zone.
        zone_id: u32,
        /// The weight tier code.
        tier: String,
        /// The delivery method code.
        method: String,
    },

    /// The chosen delivery method cannot serve one of the producers.
    #[error("Delivery method '{method}' not available for producer {producer_id}: {reason}")]
    MethodNotAvailable {
        /// The producer the method is unavailable for.
        producer_id: u32,
        /// The delivery method code.
        method: String,
        /// Why the method cannot be used.
        reason: String,
    },

    /// A requested additional charge is unknown or inactive.
    #[error("Additional charge '{code}' is not configured or not active")]
    ChargeNotConfigured {
        /// The requested charge code.
        code: String,
    },

    /// The configuration snapshot has been invalidated.
    ///
    /// The engine refuses to quote against an expired snapshot rather than
    /// risk pricing from deleted rate rows.
    #[error("Configuration snapshot (version {version}) is stale; refresh required")]
    SnapshotStale {
        /// The version of the invalidated snapshot.
        version: u64,
    },

    /// The shipment description is structurally invalid.
    #[error("Invalid shipment: {message}")]
    InvalidShipment {
        /// A description of what made the shipment invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/zones.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/zones.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_zone_not_resolved_displays_postal_code() {
        let error = EngineError::ZoneNotResolved {
            postal_code: "99999".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No shipping zone configured for postal code '99999'"
        );
    }

    #[test]
    fn test_rate_not_configured_displays_full_key() {
        let error = EngineError::RateNotConfigured {
            producer_id: 7,
            zone_id: 2,
            tier: "t_2000".to_string(),
            method: "home".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No shipping rate configured for producer 7, zone 2, tier 't_2000', method 'home'"
        );
    }

    #[test]
    fn test_method_not_available_displays_reason() {
        let error = EngineError::MethodNotAvailable {
            producer_id: 3,
            method: "locker".to_string(),
            reason: "not enabled by producer".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Delivery method 'locker' not available for producer 3: not enabled by producer"
        );
    }

    #[test]
    fn test_charge_not_configured_displays_code() {
        let error = EngineError::ChargeNotConfigured {
            code: "giftwrap".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Additional charge 'giftwrap' is not configured or not active"
        );
    }

    #[test]
    fn test_snapshot_stale_displays_version() {
        let error = EngineError::SnapshotStale { version: 42 };
        assert_eq!(
            error.to_string(),
            "Configuration snapshot (version 42) is stale; refresh required"
        );
    }

    #[test]
    fn test_invalid_shipment_displays_message() {
        let error = EngineError::InvalidShipment {
            message: "shipment contains no items".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid shipment: shipment contains no items"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_zone_not_resolved() -> EngineResult<()> {
            Err(EngineError::ZoneNotResolved {
                postal_code: "00000".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_zone_not_resolved()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
