//! Append-only storage for stops and buses.
//!
//! Stops and buses live in arena vectors and are never removed or moved;
//! everything else (name lookups, the stop->buses index, the distance
//! table) holds small integer handles into those arenas, so references
//! stay valid for the catalogue's lifetime even as more stops/buses are
//! appended.

use std::collections::{BTreeSet, HashMap};

use crate::geo;

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Handle to a [`Stop`] stored in a [`Catalogue`]. Stable for the
/// catalogue's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StopHandle(u32);

/// Handle to a [`Bus`] stored in a [`Catalogue`]. Stable for the
/// catalogue's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusHandle(u32);

impl StopHandle {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl BusHandle {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub struct Stop {
    pub name: String,
    pub coords: Coordinates,
}

#[derive(Debug)]
pub struct Bus {
    pub name: String,
    /// The expanded route: for a linear bus this is already mirrored
    /// (`A,B,C,B,A`), for a roundtrip it is stored exactly as declared.
    pub route: Vec<StopHandle>,
    pub is_roundtrip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStopOutcome {
    Inserted(StopHandle),
    AlreadyExists(StopHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddBusOutcome {
    Inserted(BusHandle),
    AlreadyExists(BusHandle),
    /// A referenced stop was missing from the catalogue; the bus was not
    /// created.
    Rejected,
}

/// Aggregate statistics for a single bus, as answered by [`Catalogue::get_bus_stat`].
#[derive(Debug, Clone, PartialEq)]
pub struct BusStat {
    pub unique_stop_count: usize,
    pub stop_count: usize,
    pub road_length_meters: u32,
    pub curvature: f64,
}

#[derive(Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_index: HashMap<String, StopHandle>,
    bus_index: HashMap<String, BusHandle>,
    // Ordered by bus name, indexed by StopHandle.
    stop_buses: Vec<BTreeSet<String>>,
    distances: HashMap<(StopHandle, StopHandle), u32>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(&mut self, name: &str, coords: Coordinates) -> AddStopOutcome {
        if let Some(&handle) = self.stop_index.get(name) {
            return AddStopOutcome::AlreadyExists(handle);
        }
        let handle = StopHandle(self.stops.len() as u32);
        self.stops.push(Stop { name: name.to_owned(), coords });
        self.stop_buses.push(BTreeSet::new());
        self.stop_index.insert(name.to_owned(), handle);
        AddStopOutcome::Inserted(handle)
    }

    /// `route` must already be the expanded route (linear buses mirrored
    /// by the caller). Rejected if any stop is unknown or the name is
    /// already taken by another bus.
    pub fn add_bus(&mut self, name: &str, route: &[&str], is_roundtrip: bool) -> AddBusOutcome {
        if let Some(&handle) = self.bus_index.get(name) {
            return AddBusOutcome::AlreadyExists(handle);
        }

        let mut resolved = Vec::with_capacity(route.len());
        for &stop_name in route {
            match self.stop_index.get(stop_name) {
                Some(&handle) => resolved.push(handle),
                None => return AddBusOutcome::Rejected,
            }
        }

        let handle = BusHandle(self.buses.len() as u32);
        self.buses.push(Bus { name: name.to_owned(), route: resolved.clone(), is_roundtrip });
        self.bus_index.insert(name.to_owned(), handle);
        for stop in resolved {
            self.stop_buses[stop.index()].insert(name.to_owned());
        }
        AddBusOutcome::Inserted(handle)
    }

    /// Overwrites any existing value for `(from, to)`. Unknown stop names
    /// are silently ignored.
    pub fn add_distance(&mut self, from: &str, to: &str, meters: u32) {
        let (Some(&from), Some(&to)) = (self.stop_index.get(from), self.stop_index.get(to)) else {
            return;
        };
        self.distances.insert((from, to), meters);
    }

    pub fn find_stop(&self, name: &str) -> Option<StopHandle> {
        self.stop_index.get(name).copied()
    }

    pub fn find_bus(&self, name: &str) -> Option<BusHandle> {
        self.bus_index.get(name).copied()
    }

    pub fn stop(&self, handle: StopHandle) -> &Stop {
        &self.stops[handle.index()]
    }

    pub fn bus(&self, handle: BusHandle) -> &Bus {
        &self.buses[handle.index()]
    }

    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn stops(&self) -> impl Iterator<Item = (StopHandle, &Stop)> {
        self.stops.iter().enumerate().map(|(i, stop)| (StopHandle(i as u32), stop))
    }

    pub fn buses(&self) -> impl Iterator<Item = (BusHandle, &Bus)> {
        self.buses.iter().enumerate().map(|(i, bus)| (BusHandle(i as u32), bus))
    }

    /// Returns the explicit `(from, to)` entry if present, otherwise the
    /// `(to, from)` entry. Panics if neither direction has an entry: every
    /// pair of adjacent stops on a bus route must have a declared distance,
    /// so this can only be reached from malformed input that the catalogue
    /// does not validate at ingestion time.
    pub fn get_distance(&self, from: StopHandle, to: StopHandle) -> u32 {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
            .unwrap_or_else(|| {
                panic!(
                    "no declared distance between {:?} and {:?}",
                    self.stops[from.index()].name,
                    self.stops[to.index()].name
                )
            })
    }

    /// Ordered (by bus name) set of buses serving `name`, or `None` if the
    /// stop is unknown. A known stop with no buses returns `Some` of an
    /// empty set.
    pub fn get_buses_by_stop(&self, name: &str) -> Option<&BTreeSet<String>> {
        let handle = self.find_stop(name)?;
        Some(&self.stop_buses[handle.index()])
    }

    pub fn get_bus_stat(&self, name: &str) -> Option<BusStat> {
        let handle = self.find_bus(name)?;
        let bus = self.bus(handle);

        let unique_stop_count = bus.route.iter().collect::<std::collections::HashSet<_>>().len();
        let stop_count = bus.route.len();

        let mut road_length_meters: u32 = 0;
        let mut geodesic_length = 0.0;
        for pair in bus.route.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            road_length_meters += self.get_distance(a, b);
            geodesic_length += geo::distance(self.stop(a).coords, self.stop(b).coords);
        }

        let curvature = if geo::is_zero(geodesic_length) { 0.0 } else { road_length_meters as f64 / geodesic_length };

        Some(BusStat { unique_stop_count, stop_count, road_length_meters, curvature })
    }
}
