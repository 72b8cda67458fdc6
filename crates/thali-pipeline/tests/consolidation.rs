//! End-to-end consolidation tests over raw observation batches

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use thali_domain::{FieldKind, FieldObservation, SourceKind};
use thali_pipeline::{Consolidator, PipelineConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn obs(
    entity_ref: &str,
    field: FieldKind,
    raw_value: serde_json::Value,
    source_kind: SourceKind,
    confidence: f64,
) -> FieldObservation {
    FieldObservation {
        entity_ref: entity_ref.to_string(),
        field,
        raw_value,
        source_kind,
        confidence,
        source_url: format!("https://example.in/{}", entity_ref),
        content_hash: format!("{}:{}", entity_ref, field),
        extracted_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        model_name: None,
        model_version: None,
    }
}

fn consolidator() -> Consolidator {
    Consolidator::new(PipelineConfig::default()).unwrap()
}

/// Scenario: a dashed landline-style phone is normalized into +91 form in
/// the canonical output
#[test]
fn test_phone_normalized_in_output() {
    init_tracing();
    let batch = vec![
        obs("e1", FieldKind::Name, json!("Mavalli Tiffin Room"), SourceKind::Osm, 0.9),
        obs("e1", FieldKind::Address, json!("14, Lalbagh Road, Bengaluru"), SourceKind::Osm, 0.9),
        obs("e1", FieldKind::Phone, json!("080-2222-0022"), SourceKind::Website, 0.9),
    ];

    let output = consolidator().consolidate(batch, now()).unwrap();
    assert_eq!(output.restaurants.len(), 1);
    assert_eq!(output.restaurants[0].phone.as_deref(), Some("+918022220022"));
    assert_eq!(output.restaurants[0].restaurant_id, "bengaluru-000001");
}

/// Two sources reporting the same restaurant merge into one canonical
/// record with a union source set
#[test]
fn test_duplicate_sources_merge() {
    init_tracing();
    let batch = vec![
        obs("osm:1", FieldKind::Name, json!("Mavalli Tiffin Room"), SourceKind::Osm, 0.85),
        obs("osm:1", FieldKind::Address, json!("Lalbagh Road, Bengaluru"), SourceKind::Osm, 0.85),
        obs("osm:1", FieldKind::Coordinates, json!({"lat": 12.9497, "lon": 77.5855}), SourceKind::Osm, 0.9),
        obs("osm:1", FieldKind::Phone, json!("+918022220022"), SourceKind::Osm, 0.8),
        obs("web:1", FieldKind::Name, json!("mavalli tiffin room"), SourceKind::Website, 0.9),
        obs("web:1", FieldKind::Coordinates, json!({"lat": 12.9499, "lon": 77.5857}), SourceKind::Website, 0.9),
        obs("web:1", FieldKind::Phone, json!("080-2222-0022"), SourceKind::Website, 0.95),
        obs("web:1", FieldKind::Address, json!("14, lalbagh road, bengaluru"), SourceKind::Website, 0.9),
    ];

    let output = consolidator().consolidate(batch, now()).unwrap();
    assert_eq!(output.restaurants.len(), 1);

    let restaurant = &output.restaurants[0];
    assert_eq!(restaurant.restaurant_id, "bengaluru-000001");
    assert_eq!(restaurant.canonical_name.as_deref(), Some("Mavalli Tiffin Room"));
    assert!(restaurant.metadata.source.contains(&SourceKind::Osm));
    assert!(restaurant.metadata.source.contains(&SourceKind::Website));

    let validation = output.validation("bengaluru-000001").unwrap();
    assert!(validation.is_valid);
    assert!(validation.quality_score > 0.5);
}

/// Scenario: dissimilar names 50 meters apart stay separate without an
/// exact signal, and a shared phone alone cannot bridge a name similarity
/// below the guard
#[test]
fn test_threshold_boundary_keeps_mtr_separate() {
    init_tracing();
    let base = vec![
        obs("a", FieldKind::Name, json!("MTR"), SourceKind::Osm, 0.9),
        obs("a", FieldKind::Coordinates, json!({"lat": 12.9497, "lon": 77.5855}), SourceKind::Osm, 0.9),
        obs("b", FieldKind::Name, json!("Mavalli Tiffin Room"), SourceKind::Website, 0.9),
        obs("b", FieldKind::Coordinates, json!({"lat": 12.9501, "lon": 77.5857}), SourceKind::Website, 0.9),
    ];

    let output = consolidator().consolidate(base.clone(), now()).unwrap();
    assert_eq!(output.restaurants.len(), 2);

    // Even a shared phone entry does not merge them: the names disagree too
    // strongly for the exact-signal path
    let mut with_phone = base;
    with_phone.push(obs("a", FieldKind::Phone, json!("+918022220022"), SourceKind::Osm, 0.9));
    with_phone.push(obs("b", FieldKind::Phone, json!("+918022220022"), SourceKind::Website, 0.9));

    let output = consolidator().consolidate(with_phone, now()).unwrap();
    assert_eq!(output.restaurants.len(), 2);
}

/// Scenario: a record with neither name nor coordinates is flagged for
/// manual review and retained, never silently dropped
#[test]
fn test_no_signal_record_flagged_for_manual_review() {
    init_tracing();
    let batch = vec![obs(
        "mystery",
        FieldKind::Address,
        json!("21, MG Road"),
        SourceKind::Pdf,
        0.7,
    )];

    let output = consolidator().consolidate(batch, now()).unwrap();
    assert_eq!(output.needs_manual_review, vec!["mystery".to_string()]);

    // Retained as an invalid restaurant, not dropped
    assert_eq!(output.restaurants.len(), 1);
    let restaurant = &output.restaurants[0];
    assert_eq!(restaurant.address_full.as_deref(), Some("21, Mg Road"));

    let validation = output.validation(&restaurant.restaurant_id).unwrap();
    assert!(!validation.is_valid);
    assert!(validation
        .overall_issues
        .iter()
        .any(|i| i.code == "missing_name"));
}

/// Scenario: three conflicting values for one field - the highest
/// confidence wins, the losers remain as not-selected provenance
#[test]
fn test_confidence_ordered_field_merge() {
    init_tracing();
    let batch = vec![
        obs("e1", FieldKind::Name, json!("Mavalli Tiffin Room"), SourceKind::Llm, 0.95),
        obs("e1", FieldKind::Name, json!("MTR Lalbagh"), SourceKind::Osm, 0.80),
        obs("e1", FieldKind::Name, json!("M T R"), SourceKind::Regex, 0.60),
        obs("e1", FieldKind::Address, json!("14, Lalbagh Road, Bengaluru"), SourceKind::Osm, 0.9),
    ];

    let output = consolidator().consolidate(batch, now()).unwrap();
    assert_eq!(output.restaurants.len(), 1);
    let restaurant = &output.restaurants[0];
    assert_eq!(restaurant.canonical_name.as_deref(), Some("Mavalli Tiffin Room"));

    let name_records: Vec<_> = output
        .provenance_for(&restaurant.restaurant_id)
        .filter(|p| p.field == FieldKind::Name)
        .collect();
    assert_eq!(name_records.len(), 3);
    assert_eq!(
        name_records.iter().filter(|p| p.selected).count(),
        1,
        "exactly one name should win"
    );
    let winner = name_records.iter().find(|p| p.selected).unwrap();
    assert_eq!(winner.confidence, 0.95);
    assert_eq!(winner.extraction_method, SourceKind::Llm);
}

/// Scenario: out-of-bounds latitude is fatal; the record is reported
/// invalid and never clusters with its would-be duplicate
#[test]
fn test_out_of_bounds_record_excluded_from_clustering() {
    init_tracing();
    let batch = vec![
        obs("good", FieldKind::Name, json!("Mavalli Tiffin Room"), SourceKind::Osm, 0.9),
        obs("good", FieldKind::Coordinates, json!({"lat": 12.9497, "lon": 77.5855}), SourceKind::Osm, 0.9),
        obs("good", FieldKind::Phone, json!("+918022220022"), SourceKind::Osm, 0.9),
        obs("bad", FieldKind::Name, json!("Mavalli Tiffin Room"), SourceKind::Website, 0.9),
        obs("bad", FieldKind::Coordinates, json!({"lat": 45.0, "lon": 77.5855}), SourceKind::Website, 0.9),
        obs("bad", FieldKind::Phone, json!("+918022220022"), SourceKind::Website, 0.9),
    ];

    let output = consolidator().consolidate(batch, now()).unwrap();
    assert_eq!(output.restaurants.len(), 2);

    let invalid: Vec<_> = output.validations.iter().filter(|v| !v.is_valid).collect();
    assert_eq!(invalid.len(), 1);
    assert!(invalid[0]
        .overall_issues
        .iter()
        .any(|i| i.code == "coordinates_out_of_bounds"));
}

/// Transitive clustering: A-B match on phone, B-C match on website, A-C
/// share nothing - all three still land in one cluster, in any input order
#[test]
fn test_clustering_transitivity_and_order_independence() {
    init_tracing();
    let batch = vec![
        obs("a", FieldKind::Name, json!("Mavalli Tiffin Room"), SourceKind::Osm, 0.9),
        obs("a", FieldKind::Address, json!("14, Lalbagh Road, Bengaluru"), SourceKind::Osm, 0.9),
        obs("a", FieldKind::Phone, json!("+918022220022"), SourceKind::Osm, 0.9),
        obs("b", FieldKind::Name, json!("Mavalli Tiffin Room"), SourceKind::Website, 0.9),
        obs("b", FieldKind::Address, json!("Lalbagh Road, Bengaluru"), SourceKind::Website, 0.9),
        obs("b", FieldKind::Phone, json!("080-2222-0022"), SourceKind::Website, 0.9),
        obs("b", FieldKind::Website, json!("https://www.mtrfoods.in"), SourceKind::Website, 0.9),
        obs("c", FieldKind::Name, json!("Mavalli Tiffin Room"), SourceKind::Llm, 0.9),
        obs("c", FieldKind::Address, json!("Lalbagh Rd, Bengaluru"), SourceKind::Llm, 0.9),
        obs("c", FieldKind::Website, json!("mtrfoods.in/contact"), SourceKind::Llm, 0.9),
    ];

    let forward = consolidator().consolidate(batch.clone(), now()).unwrap();
    assert_eq!(forward.restaurants.len(), 1);

    let mut reversed = batch;
    reversed.reverse();
    let backward = consolidator().consolidate(reversed, now()).unwrap();

    assert_eq!(forward.restaurants, backward.restaurants);
    assert_eq!(forward.validations, backward.validations);
    assert_eq!(forward.provenance, backward.provenance);
}

/// Provenance completeness: every populated field of a canonical restaurant
/// is backed by at least one selected provenance record carrying the
/// canonical value
#[test]
fn test_provenance_completeness() {
    init_tracing();
    let batch = vec![
        obs("e1", FieldKind::Name, json!("Karavalli"), SourceKind::Website, 0.9),
        obs("e1", FieldKind::Address, json!("66, Residency Road, Bengaluru"), SourceKind::Website, 0.9),
        obs("e1", FieldKind::Coordinates, json!({"lat": 12.9650, "lon": 77.6050}), SourceKind::Osm, 0.85),
        obs("e1", FieldKind::Phone, json!("+918066604545"), SourceKind::Llm, 0.95),
        obs("e1", FieldKind::Cuisines, json!(["coastal", "kerala"]), SourceKind::Llm, 0.9),
        obs("e1", FieldKind::Hours, json!({"monday": [{"open": "12:00", "close": "23:00"}]}), SourceKind::Website, 0.9),
    ];

    let output = consolidator().consolidate(batch, now()).unwrap();
    assert_eq!(output.restaurants.len(), 1);
    let restaurant = &output.restaurants[0];

    let checks: Vec<(FieldKind, serde_json::Value)> = vec![
        (FieldKind::Name, json!(restaurant.canonical_name)),
        (FieldKind::Address, json!(restaurant.address_full)),
        (FieldKind::Phone, json!(restaurant.phone)),
        (
            FieldKind::Coordinates,
            json!({"lat": restaurant.lat.unwrap(), "lon": restaurant.lon.unwrap()}),
        ),
        (FieldKind::Hours, serde_json::to_value(restaurant.hours.as_ref().unwrap()).unwrap()),
    ];
    for (field, canonical) in checks {
        assert!(
            output
                .provenance_for(&restaurant.restaurant_id)
                .any(|p| p.field == field && p.selected && p.value == canonical),
            "no selected provenance for {}",
            field
        );
    }

    // Every canonical cuisine appears in some selected cuisine contribution
    for cuisine in &restaurant.cuisines {
        let tag = json!(cuisine);
        assert!(output
            .provenance_for(&restaurant.restaurant_id)
            .filter(|p| p.field == FieldKind::Cuisines && p.selected)
            .any(|p| p.value.as_array().is_some_and(|a| a.contains(&tag))));
    }
}

/// Merge idempotence: re-consolidating a consolidated restaurant as a fresh
/// singleton reproduces the same field values
#[test]
fn test_merge_idempotence() {
    init_tracing();
    let batch = vec![
        obs("osm:1", FieldKind::Name, json!("the hotel SARAVANA bhavan"), SourceKind::Osm, 0.85),
        obs("osm:1", FieldKind::Address, json!("21,, Mount Road , Chennai"), SourceKind::Osm, 0.9),
        obs("web:1", FieldKind::Name, json!("Saravana Bhavan"), SourceKind::Website, 0.9),
        obs("web:1", FieldKind::Phone, json!("044-2345-6789"), SourceKind::Website, 0.9),
        obs("web:1", FieldKind::Address, json!("21, Mount Road, Chennai"), SourceKind::Website, 0.9),
        obs("web:1", FieldKind::Cuisines, json!(["south indian", "coffee"]), SourceKind::Llm, 0.9),
        obs("osm:1", FieldKind::Coordinates, json!({"lat": 13.0605, "lon": 80.2496}), SourceKind::Osm, 0.9),
        obs("web:1", FieldKind::Coordinates, json!({"lat": 13.0606, "lon": 80.2497}), SourceKind::Website, 0.9),
        obs("osm:1", FieldKind::Phone, json!("+914423456789"), SourceKind::Osm, 0.8),
    ];

    let first = consolidator().consolidate(batch, now()).unwrap();
    assert_eq!(first.restaurants.len(), 1);
    let restaurant = first.restaurants[0].clone();

    let mut replay = Vec::new();
    let push = |replay: &mut Vec<FieldObservation>, field, value| {
        replay.push(obs(&restaurant.restaurant_id, field, value, SourceKind::Website, 0.9));
    };
    push(&mut replay, FieldKind::Name, json!(restaurant.canonical_name));
    push(&mut replay, FieldKind::Address, json!(restaurant.address_full));
    push(&mut replay, FieldKind::Phone, json!(restaurant.phone));
    push(
        &mut replay,
        FieldKind::Coordinates,
        json!({"lat": restaurant.lat.unwrap(), "lon": restaurant.lon.unwrap()}),
    );
    push(&mut replay, FieldKind::Cuisines, json!(restaurant.cuisines));

    let second = consolidator().consolidate(replay, now()).unwrap();
    assert_eq!(second.restaurants.len(), 1);
    let replayed = &second.restaurants[0];

    assert_eq!(replayed.canonical_name, restaurant.canonical_name);
    assert_eq!(replayed.address_full, restaurant.address_full);
    assert_eq!(replayed.phone, restaurant.phone);
    assert_eq!(replayed.lat, restaurant.lat);
    assert_eq!(replayed.lon, restaurant.lon);
    assert_eq!(replayed.cuisines, restaurant.cuisines);
}

/// Unusable observations land in the rejected ledger with reasons; soft
/// failures surface as warnings on the record they belong to
#[test]
fn test_rejected_ledger_and_soft_failures() {
    init_tracing();
    let short_phone = obs("e1", FieldKind::Phone, json!("12345"), SourceKind::Regex, 0.5);
    let bad_confidence = obs("e1", FieldKind::Website, json!("https://example.in/menu"), SourceKind::Llm, 1.5);

    let batch = vec![
        obs("e1", FieldKind::Name, json!("Sharma Dhaba"), SourceKind::Osm, 0.9),
        obs("e1", FieldKind::Address, json!("NH-44, Murthal"), SourceKind::Osm, 0.9),
        obs("e1", FieldKind::Pincode, json!("5600"), SourceKind::Regex, 0.5),
        short_phone,
        bad_confidence,
    ];

    let output = consolidator().consolidate(batch, now()).unwrap();
    assert_eq!(output.restaurants.len(), 1);
    assert_eq!(output.rejected.len(), 3);
    assert!(output.rejected.iter().all(|r| !r.reason.is_empty()));

    // The malformed pincode left a warning on the surviving record
    let validation = &output.validations[0];
    assert!(validation.is_valid);
    assert!(validation
        .overall_issues
        .iter()
        .any(|i| i.code == "invalid_pincode"));
    assert!(output.restaurants[0].pincode.is_none());
}

/// City sequences are assigned per slug in deterministic order
#[test]
fn test_restaurant_id_city_sequences() {
    init_tracing();
    let mut batch = vec![
        obs("blr:1", FieldKind::Name, json!("Vidyarthi Bhavan"), SourceKind::Osm, 0.9),
        obs("blr:1", FieldKind::Address, json!("32, Gandhi Bazaar, Bengaluru"), SourceKind::Osm, 0.9),
        obs("che:1", FieldKind::Name, json!("Murugan Idli Shop"), SourceKind::Osm, 0.9),
        obs("che:1", FieldKind::Address, json!("77, GN Chetty Road, Chennai"), SourceKind::Osm, 0.9),
        obs("blr:2", FieldKind::Name, json!("Brahmin's Coffee Bar"), SourceKind::Osm, 0.9),
        obs("blr:2", FieldKind::Address, json!("Ranga Rao Road, Bangalore"), SourceKind::Osm, 0.9),
    ];
    // Later timestamps keep blr:2 second in the bengaluru sequence
    for o in batch.iter_mut().filter(|o| o.entity_ref == "blr:2") {
        o.extracted_at = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
    }

    let output = consolidator().consolidate(batch, now()).unwrap();
    let mut ids: Vec<&str> = output
        .restaurants
        .iter()
        .map(|r| r.restaurant_id.as_str())
        .collect();
    ids.sort_unstable();
    assert_eq!(
        ids,
        vec!["bengaluru-000001", "bengaluru-000002", "chennai-000001"]
    );
}
