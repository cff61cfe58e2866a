//! The peripheral JSON request/response boundary: parses an input
//! document, drives the catalogue/router/renderer, and serializes the
//! answers. This is glue, not core content — it leans entirely on
//! `serde`/`serde_json` rather than a hand-rolled parser.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalogue::{AddBusOutcome, Catalogue, Coordinates};
use crate::renderer::{Color, MapRenderer, Point, RenderSettings};
use crate::router::{Router, Step};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("malformed input document: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct InputDocument {
    #[serde(default)]
    base_requests: Vec<BaseRequest>,
    render_settings: Option<RenderSettingsInput>,
    routing_settings: Option<RoutingSettingsInput>,
    #[serde(default)]
    stat_requests: Vec<StatRequest>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        road_distances: HashMap<String, u32>,
    },
    Bus {
        name: String,
        is_roundtrip: bool,
        stops: Vec<String>,
    },
}

#[derive(Deserialize)]
struct RoutingSettingsInput {
    bus_velocity: f64,
    bus_wait_time: f64,
}

/// Matches a named color, an `[r,g,b]` triple, or an `[r,g,b,a]` quadruple.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorInput {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

impl From<ColorInput> for Color {
    fn from(value: ColorInput) -> Self {
        match value {
            ColorInput::Named(name) => Color::Named(name),
            ColorInput::Rgb(r, g, b) => Color::Rgb(r, g, b),
            ColorInput::Rgba(r, g, b, a) => Color::Rgba(r, g, b, a),
        }
    }
}

#[derive(Deserialize)]
struct RenderSettingsInput {
    width: f64,
    height: f64,
    padding: f64,
    line_width: f64,
    stop_radius: f64,
    bus_label_font_size: u32,
    bus_label_offset: [f64; 2],
    stop_label_font_size: u32,
    stop_label_offset: [f64; 2],
    underlayer_color: ColorInput,
    underlayer_width: f64,
    color_palette: Vec<ColorInput>,
}

impl From<RenderSettingsInput> for RenderSettings {
    fn from(input: RenderSettingsInput) -> Self {
        RenderSettings {
            width: input.width,
            height: input.height,
            padding: input.padding,
            line_width: input.line_width,
            stop_radius: input.stop_radius,
            bus_label_font_size: input.bus_label_font_size,
            bus_label_offset: Point::new(input.bus_label_offset[0], input.bus_label_offset[1]),
            stop_label_font_size: input.stop_label_font_size,
            stop_label_offset: Point::new(input.stop_label_offset[0], input.stop_label_offset[1]),
            underlayer_color: input.underlayer_color.into(),
            underlayer_width: input.underlayer_width,
            color_palette: input.color_palette.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
struct StatRequest {
    id: i64,
    #[serde(flatten)]
    kind: StatKind,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum StatKind {
    Bus { name: String },
    Stop { name: String },
    Map,
    Route { from: String, to: String },
}

#[derive(Serialize)]
#[serde(untagged)]
enum StatResponse {
    Bus { request_id: i64, curvature: f64, route_length: u32, stop_count: u32, unique_stop_count: u32 },
    Stop { request_id: i64, buses: Vec<String> },
    Map { request_id: i64, map: String },
    Route { request_id: i64, total_time: f64, items: Vec<RouteItem> },
    Error { request_id: i64, error_message: String },
}

#[derive(Serialize)]
#[serde(untagged)]
enum RouteItem {
    Wait { stop_name: String, time: f64 },
    Bus { bus: String, span_count: u32, time: f64 },
}

/// For a linear (non-roundtrip) bus, mirror the declared stops minus the
/// final element: `[A,B,C] -> [A,B,C,B,A]`. Roundtrip buses are stored
/// exactly as declared.
fn expand_route(stops: &[String], is_roundtrip: bool) -> Vec<String> {
    if is_roundtrip || stops.len() < 2 {
        return stops.to_vec();
    }
    let mut expanded = stops.to_vec();
    expanded.extend(stops[..stops.len() - 1].iter().rev().cloned());
    expanded
}

fn build_catalogue(base_requests: &[BaseRequest]) -> Catalogue {
    let mut catalogue = Catalogue::new();

    // Canonical ingestion order: stops, then distances, then buses — a
    // distance or bus entry referencing a not-yet-inserted stop is
    // otherwise dropped silently, per spec.
    for request in base_requests {
        if let BaseRequest::Stop { name, latitude, longitude, .. } = request {
            catalogue.add_stop(name, Coordinates { latitude: *latitude, longitude: *longitude });
        }
    }
    for request in base_requests {
        if let BaseRequest::Stop { name, road_distances, .. } = request {
            for (to, meters) in road_distances {
                catalogue.add_distance(name, to, *meters);
            }
        }
    }
    for request in base_requests {
        if let BaseRequest::Bus { name, is_roundtrip, stops } = request {
            let expanded = expand_route(stops, *is_roundtrip);
            let refs: Vec<&str> = expanded.iter().map(String::as_str).collect();
            if catalogue.add_bus(name, &refs, *is_roundtrip) == AddBusOutcome::Rejected {
                log::warn!("bus {name} references an unknown stop; dropped");
            }
        }
    }

    log::info!("catalogue built: {} stops, {} buses", catalogue.num_stops(), catalogue.buses().count());
    catalogue
}

fn answer_request(catalogue: &Catalogue, router: Option<&Router>, render_settings: &RenderSettings, request: StatRequest) -> StatResponse {
    let request_id = request.id;
    match request.kind {
        StatKind::Bus { name } => match catalogue.get_bus_stat(&name) {
            Some(stat) => StatResponse::Bus {
                request_id,
                curvature: stat.curvature,
                route_length: stat.road_length_meters,
                stop_count: stat.stop_count as u32,
                unique_stop_count: stat.unique_stop_count as u32,
            },
            None => not_found(request_id),
        },
        StatKind::Stop { name } => match catalogue.get_buses_by_stop(&name) {
            Some(buses) => StatResponse::Stop { request_id, buses: buses.iter().cloned().collect() },
            None => not_found(request_id),
        },
        StatKind::Map => {
            let mut renderer = MapRenderer::new(catalogue, render_settings.clone());
            for (handle, bus) in catalogue.buses() {
                renderer.add_bus(&bus.name, handle);
                for &stop in &bus.route {
                    renderer.add_stop(&catalogue.stop(stop).name, stop);
                }
            }
            StatResponse::Map { request_id, map: renderer.render() }
        }
        StatKind::Route { from, to } => match router.and_then(|router| router.route(&from, &to)) {
            Some(itinerary) => StatResponse::Route {
                request_id,
                total_time: itinerary.total_time,
                items: itinerary
                    .steps
                    .into_iter()
                    .map(|step| match step {
                        Step::Wait { stop_name, minutes } => RouteItem::Wait { stop_name, time: minutes },
                        Step::Bus { bus_name, span_count, minutes } => RouteItem::Bus { bus: bus_name, span_count, time: minutes },
                    })
                    .collect(),
            },
            None => not_found(request_id),
        },
    }
}

fn not_found(request_id: i64) -> StatResponse {
    StatResponse::Error { request_id, error_message: "not found".to_owned() }
}

/// Parses `input` as a single JSON input document, builds the engine, and
/// returns the serialized output document.
pub fn run(input: &str) -> Result<String, DispatchError> {
    let document: InputDocument = serde_json::from_str(input)?;

    let catalogue = build_catalogue(&document.base_requests);

    let router = document.routing_settings.as_ref().map(|settings| Router::new(&catalogue, settings.bus_velocity, settings.bus_wait_time));

    let render_settings: RenderSettings = document.render_settings.map(Into::into).unwrap_or_default();

    let responses: Vec<StatResponse> =
        document.stat_requests.into_iter().map(|request| answer_request(&catalogue, router.as_ref(), &render_settings, request)).collect();

    Ok(serde_json::to_string(&responses)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_route_expands_with_mirrored_stops() {
        assert_eq!(expand_route(&["X".into(), "Y".into(), "Z".into()], false), vec!["X", "Y", "Z", "Y", "X"]);
    }

    #[test]
    fn roundtrip_route_is_stored_verbatim() {
        assert_eq!(expand_route(&["A".into(), "B".into(), "C".into(), "A".into()], true), vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn route_from_a_stop_to_itself_is_instant() {
        let input = serde_json::json!({
            "base_requests": [
                {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0, "road_distances": {}},
            ],
            "routing_settings": {"bus_velocity": 40.0, "bus_wait_time": 6},
            "stat_requests": [{"id": 1, "type": "Route", "from": "A", "to": "A"}],
        });
        let output: serde_json::Value = serde_json::from_str(&run(&input.to_string()).unwrap()).unwrap();
        assert_eq!(output[0]["total_time"], 0.0);
        assert_eq!(output[0]["items"], serde_json::json!([]));
    }

    #[test]
    fn route_from_unknown_stop_is_not_found() {
        let input = serde_json::json!({
            "base_requests": [],
            "stat_requests": [{"id": 7, "type": "Route", "from": "nowhere", "to": "nowhere"}],
        });
        let output: serde_json::Value = serde_json::from_str(&run(&input.to_string()).unwrap()).unwrap();
        assert_eq!(output[0]["error_message"], "not found");
        assert_eq!(output[0]["request_id"], 7);
    }

    #[test]
    fn stop_with_no_buses_is_an_empty_list_not_an_error() {
        let input = serde_json::json!({
            "base_requests": [
                {"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0},
            ],
            "stat_requests": [{"id": 1, "type": "Stop", "name": "A"}],
        });
        let output: serde_json::Value = serde_json::from_str(&run(&input.to_string()).unwrap()).unwrap();
        assert_eq!(output[0]["buses"], serde_json::json!([]));
        assert!(output[0].get("error_message").is_none());
    }

    #[test]
    fn map_for_an_empty_network_is_just_the_svg_framing() {
        let input = serde_json::json!({
            "base_requests": [],
            "render_settings": {
                "width": 600.0, "height": 400.0, "padding": 50.0,
                "line_width": 14.0, "stop_radius": 5.0,
                "bus_label_font_size": 20, "bus_label_offset": [7.0, 15.0],
                "stop_label_font_size": 20, "stop_label_offset": [7.0, -3.0],
                "underlayer_color": [255, 255, 255, 0.85], "underlayer_width": 3.0,
                "color_palette": ["green", [255, 160, 0]],
            },
            "stat_requests": [{"id": 1, "type": "Map"}],
        });
        let output: serde_json::Value = serde_json::from_str(&run(&input.to_string()).unwrap()).unwrap();
        let map = output[0]["map"].as_str().unwrap();
        assert!(map.starts_with("<?xml"));
        assert!(!map.contains("<circle"));
        assert!(!map.contains("<polyline"));
    }

    #[test]
    fn bus_referencing_a_missing_stop_is_dropped_but_does_not_abort_ingestion() {
        let input = serde_json::json!({
            "base_requests": [
                {"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0},
                {"type": "Bus", "name": "1", "is_roundtrip": true, "stops": ["A", "B"]},
            ],
            "stat_requests": [{"id": 1, "type": "Bus", "name": "1"}],
        });
        let output: serde_json::Value = serde_json::from_str(&run(&input.to_string()).unwrap()).unwrap();
        assert_eq!(output[0]["error_message"], "not found");
    }
}
