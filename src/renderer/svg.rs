//! A small, from-scratch SVG object model: just enough of `<circle>`,
//! `<polyline>` and `<text>` to answer a Map query. No attribute is ever
//! re-escaped because no attribute carries user-supplied text; only a
//! text element's body is escaped.

use std::fmt::Write as _;

use crate::renderer::projector::Point;

/// A fill/stroke color. Renders as `"none"` when absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    None,
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

impl Color {
    fn write(&self, out: &mut String) {
        match self {
            Color::None => out.push_str("none"),
            Color::Named(name) => out.push_str(name),
            Color::Rgb(r, g, b) => {
                let _ = write!(out, "rgb({r},{g},{b})");
            }
            Color::Rgba(r, g, b, a) => {
                let _ = write!(out, "rgba({r},{g},{b},{a})");
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Round,
}

impl LineCap {
    fn as_str(self) -> &'static str {
        match self {
            LineCap::Round => "round",
        }
    }
}

impl LineJoin {
    fn as_str(self) -> &'static str {
        match self {
            LineJoin::Round => "round",
        }
    }
}

/// Stroke/fill attributes shared by every shape, mirroring the
/// fluent-setter pattern of a typical path-props mixin.
#[derive(Debug, Clone, Default)]
struct PathProps {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: Option<f64>,
    line_cap: Option<LineCap>,
    line_join: Option<LineJoin>,
}

impl PathProps {
    fn render_attrs(&self, out: &mut String) {
        if let Some(fill) = &self.fill {
            out.push_str(" fill=\"");
            fill.write(out);
            out.push('"');
        }
        if let Some(stroke) = &self.stroke {
            out.push_str(" stroke=\"");
            stroke.write(out);
            out.push('"');
        }
        if let Some(width) = self.stroke_width {
            let _ = write!(out, " stroke-width=\"{width}\"");
        }
        if let Some(cap) = self.line_cap {
            let _ = write!(out, " stroke-linecap=\"{}\"", cap.as_str());
        }
        if let Some(join) = self.line_join {
            let _ = write!(out, " stroke-linejoin=\"{}\"", join.as_str());
        }
    }
}

pub struct Circle {
    center: Point,
    radius: f64,
    props: PathProps,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius, props: PathProps::default() }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.props.fill = Some(color);
        self
    }

    fn render(&self, out: &mut String) {
        let _ = write!(out, "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"", self.center.x, self.center.y, self.radius);
        self.props.render_attrs(out);
        out.push_str("/>");
    }
}

pub struct Polyline {
    points: Vec<Point>,
    props: PathProps,
}

impl Polyline {
    pub fn new() -> Self {
        Self { points: Vec::new(), props: PathProps::default() }
    }

    pub fn add_point(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.props.fill = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.props.stroke = Some(color);
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.props.stroke_width = Some(width);
        self
    }

    pub fn round_caps_and_joins(mut self) -> Self {
        self.props.line_cap = Some(LineCap::Round);
        self.props.line_join = Some(LineJoin::Round);
        self
    }

    fn render(&self, out: &mut String) {
        out.push_str("<polyline points=\"");
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{},{}", point.x, point.y);
        }
        out.push('"');
        self.props.render_attrs(out);
        out.push_str("/>");
    }
}

impl Default for Polyline {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Text {
    position: Point,
    offset: Point,
    font_size: u32,
    font_family: Option<String>,
    font_weight: Option<String>,
    data: String,
    props: PathProps,
}

impl Text {
    pub fn new(position: Point, offset: Point, font_size: u32, data: impl Into<String>) -> Self {
        Self { position, offset, font_size, font_family: None, font_weight: None, data: data.into(), props: PathProps::default() }
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn font_weight(mut self, weight: impl Into<String>) -> Self {
        self.font_weight = Some(weight.into());
        self
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.props.fill = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.props.stroke = Some(color);
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.props.stroke_width = Some(width);
        self
    }

    pub fn round_caps_and_joins(mut self) -> Self {
        self.props.line_cap = Some(LineCap::Round);
        self.props.line_join = Some(LineJoin::Round);
        self
    }

    fn render(&self, out: &mut String) {
        let _ = write!(
            out,
            "<text x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\"",
            self.position.x, self.position.y, self.offset.x, self.offset.y, self.font_size
        );
        if let Some(family) = &self.font_family {
            let _ = write!(out, " font-family=\"{family}\"");
        }
        if let Some(weight) = &self.font_weight {
            let _ = write!(out, " font-weight=\"{weight}\"");
        }
        self.props.render_attrs(out);
        out.push('>');
        escape_text(&self.data, out);
        out.push_str("</text>");
    }
}

pub enum Object {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
}

impl Object {
    fn render(&self, out: &mut String) {
        match self {
            Object::Circle(circle) => circle.render(out),
            Object::Polyline(polyline) => polyline.render(out),
            Object::Text(text) => text.render(out),
        }
    }
}

impl From<Circle> for Object {
    fn from(circle: Circle) -> Self {
        Object::Circle(circle)
    }
}

impl From<Polyline> for Object {
    fn from(polyline: Polyline) -> Self {
        Object::Polyline(polyline)
    }
}

impl From<Text> for Object {
    fn from(text: Text) -> Self {
        Object::Text(text)
    }
}

#[derive(Default)]
pub struct Document {
    objects: Vec<Object>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: impl Into<Object>) {
        self.objects.push(object.into());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");
        for object in &self.objects {
            object.render(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}

fn escape_text(data: &str, out: &mut String) {
    for ch in data.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }
}
