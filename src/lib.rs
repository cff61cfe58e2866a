pub mod catalogue;
pub mod geo;

pub use catalogue::{Bus, Catalogue, Coordinates, Stop};

pub mod router;

pub use router::{Itinerary, Router, Step};

pub mod renderer;

pub use renderer::{MapRenderer, RenderSettings};

pub mod dispatch;
