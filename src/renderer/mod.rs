//! Projects the catalogue's geography onto a viewport and emits a
//! deterministic SVG document: routes, then bus labels, then stop
//! markers, then stop labels, each layer in ascending name order.

pub mod projector;
pub mod svg;

use std::collections::BTreeMap;

use crate::catalogue::{BusHandle, Catalogue, StopHandle};
pub use projector::Point;
use projector::Projector;
pub use svg::Color;
use svg::{Circle, Document, Polyline, Text};

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,

    pub line_width: f64,
    pub stop_radius: f64,

    pub bus_label_font_size: u32,
    pub bus_label_offset: Point,

    pub stop_label_font_size: u32,
    pub stop_label_offset: Point,

    pub underlayer_color: Color,
    pub underlayer_width: f64,

    pub color_palette: Vec<Color>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            padding: 0.0,
            line_width: 1.0,
            stop_radius: 1.0,
            bus_label_font_size: 10,
            bus_label_offset: Point::new(0.0, 0.0),
            stop_label_font_size: 10,
            stop_label_offset: Point::new(0.0, 0.0),
            underlayer_color: Color::None,
            underlayer_width: 0.0,
            color_palette: Vec::new(),
        }
    }
}

pub struct MapRenderer<'c> {
    catalogue: &'c Catalogue,
    settings: RenderSettings,
    buses: BTreeMap<String, BusHandle>,
    stops: BTreeMap<String, StopHandle>,
}

impl<'c> MapRenderer<'c> {
    pub fn new(catalogue: &'c Catalogue, settings: RenderSettings) -> Self {
        Self { catalogue, settings, buses: BTreeMap::new(), stops: BTreeMap::new() }
    }

    /// Idempotent on `name`.
    pub fn add_bus(&mut self, name: &str, bus: BusHandle) {
        self.buses.entry(name.to_owned()).or_insert(bus);
    }

    /// Idempotent on `name`.
    pub fn add_stop(&mut self, name: &str, stop: StopHandle) {
        self.stops.entry(name.to_owned()).or_insert(stop);
    }

    pub fn render(&self) -> String {
        let all_coords = self
            .buses
            .values()
            .flat_map(|&bus| self.catalogue.bus(bus).route.iter().map(|&stop| self.catalogue.stop(stop).coords));
        let projector = Projector::new(all_coords, self.settings.width, self.settings.height, self.settings.padding);

        let mut doc = Document::new();
        self.render_routes(&mut doc, &projector);
        self.render_bus_labels(&mut doc, &projector);
        self.render_stops(&mut doc, &projector);
        self.render_stop_labels(&mut doc, &projector);
        doc.render()
    }

    fn palette_color(&self, index: usize) -> Color {
        if self.settings.color_palette.is_empty() {
            Color::None
        } else {
            self.settings.color_palette[index % self.settings.color_palette.len()].clone()
        }
    }

    fn render_routes(&self, doc: &mut Document, projector: &Projector) {
        for (index, &bus) in self.buses.values().enumerate() {
            let mut line = Polyline::new().fill(Color::None).stroke(self.palette_color(index)).stroke_width(self.settings.line_width).round_caps_and_joins();
            for &stop in &self.catalogue.bus(bus).route {
                line = line.add_point(projector.project(self.catalogue.stop(stop).coords));
            }
            doc.add(line);
        }
    }

    fn render_bus_labels(&self, doc: &mut Document, projector: &Projector) {
        for (index, &bus) in self.buses.values().enumerate() {
            let bus_data = self.catalogue.bus(bus);
            let color = self.palette_color(index);

            let first_stop = bus_data.route[0];
            self.add_two_layer_label(
                doc,
                projector.project(self.catalogue.stop(first_stop).coords),
                self.settings.bus_label_offset,
                self.settings.bus_label_font_size,
                &bus_data.name,
                color.clone(),
                true,
            );

            let midpoint = bus_data.route[bus_data.route.len() / 2];
            if !bus_data.is_roundtrip && midpoint != first_stop {
                self.add_two_layer_label(
                    doc,
                    projector.project(self.catalogue.stop(midpoint).coords),
                    self.settings.bus_label_offset,
                    self.settings.bus_label_font_size,
                    &bus_data.name,
                    color,
                    true,
                );
            }
        }
    }

    fn render_stops(&self, doc: &mut Document, projector: &Projector) {
        for &stop in self.stops.values() {
            let point = projector.project(self.catalogue.stop(stop).coords);
            doc.add(Circle::new(point, self.settings.stop_radius).fill(Color::Named("white".to_owned())));
        }
    }

    fn render_stop_labels(&self, doc: &mut Document, projector: &Projector) {
        for (name, &stop) in &self.stops {
            let point = projector.project(self.catalogue.stop(stop).coords);
            self.add_two_layer_label(doc, point, self.settings.stop_label_offset, self.settings.stop_label_font_size, name, Color::Named("black".to_owned()), false);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_two_layer_label(&self, doc: &mut Document, position: Point, offset: Point, font_size: u32, data: &str, fill: Color, bold: bool) {
        let mut underlayer = Text::new(position, offset, font_size, data)
            .font_family("Verdana")
            .fill(self.settings.underlayer_color.clone())
            .stroke(self.settings.underlayer_color.clone())
            .stroke_width(self.settings.underlayer_width)
            .round_caps_and_joins();
        let mut foreground = Text::new(position, offset, font_size, data).font_family("Verdana").fill(fill);
        if bold {
            underlayer = underlayer.font_weight("bold");
            foreground = foreground.font_weight("bold");
        }
        doc.add(underlayer);
        doc.add(foreground);
    }
}
