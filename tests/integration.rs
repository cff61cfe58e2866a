//! End-to-end boundary scenarios driven through the public JSON dispatch
//! entry point, exercising Catalogue, Router, and Renderer together the
//! way the binary actually wires them.

use serde_json::{json, Value};

fn run(input: Value) -> Value {
    let output = transit_catalogue::dispatch::run(&input.to_string()).expect("well-formed input document");
    serde_json::from_str(&output).expect("well-formed output document")
}

#[test]
fn roundtrip_bus_stat_matches_the_worked_example() {
    let output = run(json!({
        "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 55.611087, "longitude": 37.20829,
             "road_distances": {"B": 3900}},
            {"type": "Stop", "name": "B", "latitude": 55.595884, "longitude": 37.209755,
             "road_distances": {"C": 9900}},
            {"type": "Stop", "name": "C", "latitude": 55.632761, "longitude": 37.333324,
             "road_distances": {"A": 100}},
            {"type": "Bus", "name": "297", "is_roundtrip": true, "stops": ["A", "B", "C", "A"]},
        ],
        "stat_requests": [{"id": 1, "type": "Bus", "name": "297"}],
    }));

    assert_eq!(output[0]["stop_count"], 4);
    assert_eq!(output[0]["unique_stop_count"], 3);
    assert_eq!(output[0]["route_length"], 13900);
    assert!(output[0]["curvature"].as_f64().unwrap() > 1.0);
}

#[test]
fn linear_route_expands_before_the_stat_is_computed() {
    let output = run(json!({
        "base_requests": [
            {"type": "Stop", "name": "X", "latitude": 0.0, "longitude": 0.0, "road_distances": {"Y": 1000}},
            {"type": "Stop", "name": "Y", "latitude": 0.0, "longitude": 1.0, "road_distances": {"Z": 1000}},
            {"type": "Stop", "name": "Z", "latitude": 0.0, "longitude": 2.0},
            {"type": "Bus", "name": "750", "is_roundtrip": false, "stops": ["X", "Y", "Z"]},
        ],
        "stat_requests": [{"id": 1, "type": "Bus", "name": "750"}],
    }));

    assert_eq!(output[0]["stop_count"], 5);
    assert_eq!(output[0]["unique_stop_count"], 3);
}

#[test]
fn full_document_answers_every_request_type_in_order() {
    let output = run(json!({
        "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 55.611087, "longitude": 37.20829,
             "road_distances": {"B": 3900}},
            {"type": "Stop", "name": "B", "latitude": 55.595884, "longitude": 37.209755,
             "road_distances": {"A": 3900}},
            {"type": "Bus", "name": "14", "is_roundtrip": true, "stops": ["A", "B", "A"]},
        ],
        "render_settings": {
            "width": 600.0, "height": 400.0, "padding": 50.0,
            "line_width": 14.0, "stop_radius": 5.0,
            "bus_label_font_size": 20, "bus_label_offset": [7.0, 15.0],
            "stop_label_font_size": 20, "stop_label_offset": [7.0, -3.0],
            "underlayer_color": [255, 255, 255, 0.85], "underlayer_width": 3.0,
            "color_palette": ["green", [255, 160, 0]],
        },
        "routing_settings": {"bus_velocity": 40.0, "bus_wait_time": 6},
        "stat_requests": [
            {"id": 1, "type": "Bus", "name": "14"},
            {"id": 2, "type": "Stop", "name": "A"},
            {"id": 3, "type": "Map"},
            {"id": 4, "type": "Route", "from": "A", "to": "B"},
            {"id": 5, "type": "Bus", "name": "nonexistent"},
        ],
    }));

    assert_eq!(output.as_array().unwrap().len(), 5);

    assert_eq!(output[0]["request_id"], 1);
    assert!(output[0].get("curvature").is_some());

    assert_eq!(output[1]["request_id"], 2);
    assert_eq!(output[1]["buses"], json!(["14"]));

    assert_eq!(output[2]["request_id"], 3);
    assert!(output[2]["map"].as_str().unwrap().contains("<polyline"));

    assert_eq!(output[3]["request_id"], 4);
    assert!(output[3]["total_time"].as_f64().unwrap() > 0.0);
    assert!(!output[3]["items"].as_array().unwrap().is_empty());

    assert_eq!(output[4]["request_id"], 5);
    assert_eq!(output[4]["error_message"], "not found");
}

#[test]
fn reordering_base_requests_does_not_change_the_answers() {
    let forward = run(json!({
        "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": {"B": 500}},
            {"type": "Stop", "name": "B", "latitude": 0.0, "longitude": 1.0},
            {"type": "Bus", "name": "1", "is_roundtrip": true, "stops": ["A", "B", "A"]},
        ],
        "stat_requests": [{"id": 1, "type": "Bus", "name": "1"}],
    }));
    let reordered = run(json!({
        "base_requests": [
            {"type": "Bus", "name": "1", "is_roundtrip": true, "stops": ["A", "B", "A"]},
            {"type": "Stop", "name": "B", "latitude": 0.0, "longitude": 1.0},
            {"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": {"B": 500}},
        ],
        "stat_requests": [{"id": 1, "type": "Bus", "name": "1"}],
    }));
    assert_eq!(forward, reordered);
}
