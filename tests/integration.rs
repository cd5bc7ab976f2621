//! Comprehensive integration tests for the Shipping Cost Resolution Engine.
//!
//! This test suite covers all quoting scenarios including:
//! - Single-producer quotes at zone and producer-override rates
//! - Free-shipping waivers
//! - Overweight surcharges with producer-scoped per-kg rates
//! - Multi-producer discount gating
//! - Additional charges (flat and percentage, COD on waived orders)
//! - Volumetric weight
//! - Method availability and weight ceilings
//! - Error cases

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;

use shipping_engine::api::{create_router, AppState};
use shipping_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let snapshot = ConfigLoader::load("./config/marketplace").expect("Failed to load config");
    AppState::new(snapshot)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    let d = Decimal::from_str(s).unwrap();
    d.normalize().to_string()
}

async fn post_quote(router: Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/quote")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn create_item(producer_id: u32, weight_grams: u64, unit_price: &str, quantity: u32) -> Value {
    json!({
        "producer_id": producer_id,
        "weight_grams": weight_grams,
        "unit_price": unit_price,
        "quantity": quantity
    })
}

fn create_request(postal_code: &str, method: &str, items: Vec<Value>) -> Value {
    json!({
        "destination_postal_code": postal_code,
        "delivery_method": method,
        "items": items,
        "additional_charges": []
    })
}

fn assert_total(result: &Value, expected: &str) {
    let actual = result["total"].as_str().unwrap();
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected total {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// Scenario Tests
// =============================================================================

/// Single producer, zone 1, weight in the first tier, no extras.
#[tokio::test]
async fn test_single_producer_base_rate() {
    let router = create_router_for_test();
    let request = create_request(
        "10432",
        "home",
        vec![create_item(7, 1500, "10.00", 1)],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["zone_id"], 1);
    assert_eq!(body["per_producer"].as_array().unwrap().len(), 1);
    assert_eq!(
        normalize_decimal(body["per_producer"][0]["base_rate"].as_str().unwrap()),
        "3.5"
    );
    assert_eq!(body["per_producer"][0]["tier"], "t_2000");
    assert_total(&body, "3.50");
}

/// The same order above the producer's free-shipping threshold is free.
#[tokio::test]
async fn test_free_shipping_threshold_met() {
    let router = create_router_for_test();
    // Producer 1 waives Attica shipping at 50.00; subtotal is 55.00.
    let request = create_request(
        "10432",
        "home",
        vec![create_item(1, 1500, "55.00", 1)],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["per_producer"][0]["waived"], true);
    assert_total(&body, "0.00");
}

/// Below the threshold the full leg is charged.
#[tokio::test]
async fn test_free_shipping_threshold_not_met() {
    let router = create_router_for_test();
    let request = create_request(
        "10432",
        "home",
        vec![create_item(1, 1500, "49.99", 1)],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["per_producer"][0]["waived"], false);
    assert_total(&body, "3.50");
}

/// Two producers in zone 2 trigger the 10% discount at the 2-producer gate.
#[tokio::test]
async fn test_two_producer_discount_in_zone_two() {
    let router = create_router_for_test();
    // Producer 7 at the 4.00 zone rate, producer 12 at its 3.00 override.
    let request = create_request(
        "54622",
        "home",
        vec![
            create_item(7, 1000, "10.00", 1),
            create_item(12, 1000, "10.00", 1),
        ],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        normalize_decimal(body["subtotal_before_discount"].as_str().unwrap()),
        "7"
    );
    assert_eq!(
        normalize_decimal(body["discount"]["amount"].as_str().unwrap()),
        "0.7"
    );
    assert_eq!(body["discount"]["producer_count"], 2);
    assert_total(&body, "6.30");
}

/// Zone 1 requires three producers; two do not unlock the discount.
#[tokio::test]
async fn test_discount_gated_below_minimum() {
    let router = create_router_for_test();
    let request = create_request(
        "10432",
        "home",
        vec![
            create_item(2, 1000, "10.00", 1),
            create_item(7, 1000, "10.00", 1),
        ],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("discount").is_none());
    // Producer 2 override 2.80 + producer 7 zone rate 3.50.
    assert_total(&body, "6.30");
}

/// Exactly at the three-producer gate the discount applies.
#[tokio::test]
async fn test_discount_applies_at_minimum() {
    let router = create_router_for_test();
    let request = create_request(
        "10432",
        "home",
        vec![
            create_item(1, 1000, "10.00", 1),
            create_item(2, 1000, "10.00", 1),
            create_item(7, 1000, "10.00", 1),
        ],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    // 3.50 + 2.80 + 3.50 = 9.80, minus 10%.
    assert_eq!(
        normalize_decimal(body["discount"]["amount"].as_str().unwrap()),
        "0.98"
    );
    assert_total(&body, "8.82");
}

/// Weight past the heaviest tier adds a per-started-kilogram surcharge.
#[tokio::test]
async fn test_overweight_surcharge_rounds_up() {
    let router = create_router_for_test();
    // 10300g: heaviest tier ends at 10000g, 300g overflow bills one kg.
    let request = create_request(
        "10432",
        "home",
        vec![create_item(2, 10300, "10.00", 1)],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let leg = &body["per_producer"][0];
    assert_eq!(leg["tier"], "t_10000");
    assert_eq!(
        normalize_decimal(leg["overweight_surcharge"].as_str().unwrap()),
        "1.2"
    );
    // Base 5.50 + 1.20 overweight.
    assert_total(&body, "6.70");
}

/// A producer-scoped extra-weight rate overrides the zone rate.
#[tokio::test]
async fn test_producer_scoped_overweight_rate() {
    let router = create_router_for_test();
    let request = create_request(
        "10432",
        "home",
        vec![create_item(7, 10300, "10.00", 1)],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    // Producer 7's 1.00/kg instead of zone 1's 1.20/kg.
    assert_eq!(
        normalize_decimal(
            body["per_producer"][0]["overweight_surcharge"]
                .as_str()
                .unwrap()
        ),
        "1"
    );
    assert_total(&body, "6.50");
}

/// COD is charged even when every producer leg is waived.
#[tokio::test]
async fn test_cod_survives_fully_waived_order() {
    let router = create_router_for_test();
    let request = json!({
        "destination_postal_code": "10432",
        "delivery_method": "home",
        "items": [create_item(1, 1500, "55.00", 1)],
        "additional_charges": ["cod"]
    });

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["per_producer"][0]["waived"], true);
    assert_eq!(body["additional_charges"][0]["code"], "cod");
    assert_total(&body, "2.00");
}

/// Percentage charges are computed on the pre-waiver shipping subtotal.
#[tokio::test]
async fn test_percentage_charge_on_raw_subtotal() {
    let router = create_router_for_test();
    let request = json!({
        "destination_postal_code": "10432",
        "delivery_method": "home",
        "items": [create_item(7, 1500, "10.00", 1)],
        "additional_charges": ["insurance"]
    });

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    // 5% of the 3.50 leg.
    assert_eq!(
        normalize_decimal(body["additional_charges"][0]["amount"].as_str().unwrap()),
        "0.175"
    );
    // Total rounds only at the end: 3.50 + 0.175 = 3.675 -> 3.68.
    assert_total(&body, "3.68");
}

/// Volumetric weight can push a light item into a heavier tier.
#[tokio::test]
async fn test_volumetric_weight_moves_tier() {
    let router = create_router_for_test();
    let request = create_request(
        "10432",
        "home",
        vec![json!({
            "producer_id": 7,
            "weight_grams": 500,
            "unit_price": "10.00",
            "quantity": 1,
            "dimensions": { "length_cm": 50, "width_cm": 40, "height_cm": 10 }
        })],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let leg = &body["per_producer"][0];
    // 50*40*10 / 5000 = 4kg volumetric beats 500g real weight.
    assert_eq!(leg["chargeable_weight_grams"], 4000);
    assert_eq!(leg["tier"], "t_5000");
    assert_total(&body, "4.00");
}

// =============================================================================
// Error Cases
// =============================================================================

/// A postal code with no configured prefix cannot be quoted.
#[tokio::test]
async fn test_unknown_postal_code_rejected() {
    let router = create_router_for_test();
    let request = create_request(
        "99999",
        "home",
        vec![create_item(7, 1500, "10.00", 1)],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "ZONE_NOT_RESOLVED");
    // No partial quote alongside the error.
    assert!(body.get("per_producer").is_none());
}

/// A method the producer never enabled fails the whole quote.
#[tokio::test]
async fn test_method_not_enabled_by_producer() {
    let router = create_router_for_test();
    // Producer 5 only enabled home delivery.
    let request = create_request(
        "10432",
        "pickup",
        vec![create_item(5, 1500, "10.00", 1)],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "METHOD_NOT_AVAILABLE");
    assert!(body["details"].as_str().unwrap().contains("producer 5"));
}

/// A shipment heavier than the method's ceiling is rejected.
#[tokio::test]
async fn test_method_weight_ceiling_enforced() {
    let router = create_router_for_test();
    // Locker tops out at 10kg.
    let request = create_request(
        "10432",
        "locker",
        vec![create_item(1, 12000, "10.00", 1)],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "METHOD_NOT_AVAILABLE");
    assert!(body["details"].as_str().unwrap().contains("exceeds"));
}

/// Requesting COD with a method that cannot collect it is rejected.
#[tokio::test]
async fn test_cod_with_unsupported_method_rejected() {
    let router = create_router_for_test();
    let request = json!({
        "destination_postal_code": "10432",
        "delivery_method": "locker",
        "items": [create_item(1, 1500, "10.00", 1)],
        "additional_charges": ["cod"]
    });

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "METHOD_NOT_AVAILABLE");
    assert!(body["details"].as_str().unwrap().contains("cash on delivery"));
}

/// A (zone, tier, method) combination with no rate is a configuration gap.
#[tokio::test]
async fn test_missing_rate_rejected() {
    let router = create_router_for_test();
    // Zone 3 has no pickup rates; producer 7 does offer pickup.
    let request = create_request(
        "84100",
        "pickup",
        vec![create_item(7, 1500, "10.00", 1)],
    );

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "RATE_NOT_CONFIGURED");
}

/// An inactive additional charge cannot be requested.
#[tokio::test]
async fn test_inactive_charge_rejected() {
    let router = create_router_for_test();
    let request = json!({
        "destination_postal_code": "10432",
        "delivery_method": "home",
        "items": [create_item(7, 1500, "10.00", 1)],
        "additional_charges": ["giftwrap"]
    });

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CHARGE_NOT_CONFIGURED");
}

/// An empty shipment is invalid.
#[tokio::test]
async fn test_empty_shipment_rejected() {
    let router = create_router_for_test();
    let request = create_request("10432", "home", vec![]);

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SHIPMENT");
}

/// Missing required fields surface serde's message.
#[tokio::test]
async fn test_missing_field_rejected() {
    let router = create_router_for_test();
    let request = json!({
        "destination_postal_code": "10432",
        "items": []
    });

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("delivery_method"));
}

/// Syntactically broken JSON is rejected as malformed.
#[tokio::test]
async fn test_malformed_json_rejected() {
    let router = create_router_for_test();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/quote")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Snapshot Lifecycle
// =============================================================================

/// A refreshed snapshot serves new quotes; the old one is dead.
#[tokio::test]
async fn test_snapshot_replacement_serves_new_version() {
    let state = create_test_state();
    let router = create_router(state.clone());

    let held = state.snapshot();
    let next = ConfigLoader::load_with_version("./config/marketplace", 2).unwrap();
    state.replace_snapshot(next);

    assert!(held.is_stale());

    let request = create_request(
        "10432",
        "home",
        vec![create_item(7, 1500, "10.00", 1)],
    );
    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot_version"], 2);
}

/// The health endpoint reports the live snapshot generation.
#[tokio::test]
async fn test_health_reports_snapshot_version() {
    let router = create_router_for_test();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["snapshot_version"], 1);
}

// =============================================================================
// Output Contract
// =============================================================================

/// Two identical requests produce byte-identical quotes.
#[tokio::test]
async fn test_quote_is_deterministic() {
    let state = create_test_state();
    let request = json!({
        "destination_postal_code": "54622",
        "delivery_method": "home",
        "items": [
            create_item(7, 2500, "10.00", 2),
            create_item(12, 900, "15.00", 1)
        ],
        "additional_charges": ["cod"]
    });

    let (status_a, body_a) = post_quote(create_router(state.clone()), request.clone()).await;
    let (status_b, body_b) = post_quote(create_router(state), request).await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(body_a.to_string(), body_b.to_string());
}

/// total == round2(subtotal - discount + charges) on a full-featured order.
#[tokio::test]
async fn test_round_trip_invariant() {
    let router = create_router_for_test();
    let request = json!({
        "destination_postal_code": "54622",
        "delivery_method": "home",
        "items": [
            create_item(7, 10300, "10.00", 1),
            create_item(12, 900, "15.00", 1)
        ],
        "additional_charges": ["cod", "insurance"]
    });

    let (status, body) = post_quote(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let subtotal = Decimal::from_str(body["subtotal_before_discount"].as_str().unwrap()).unwrap();
    let discount = Decimal::from_str(body["discount"]["amount"].as_str().unwrap()).unwrap();
    let charges: Decimal = body["additional_charges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| Decimal::from_str(line["amount"].as_str().unwrap()).unwrap())
        .sum();
    let total = Decimal::from_str(body["total"].as_str().unwrap()).unwrap();

    let expected = (subtotal - discount + charges)
        .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    assert_eq!(total, expected);

    // The audit trace explains every step of the computation.
    let steps = body["audit_trace"]["steps"].as_array().unwrap();
    assert!(steps.iter().any(|s| s["rule_id"] == "zone_resolution"));
    assert!(steps.iter().any(|s| s["rule_id"] == "overweight_surcharge"));
    assert!(steps.iter().any(|s| s["rule_id"] == "multi_producer_discount"));
}
