//! Time-weighted directed graph over a [`Catalogue`] and a Dijkstra-based
//! shortest-path solver that decodes the edge list into a typed itinerary.
//!
//! Every stop expands to two vertices (arrival `2k`, departure `2k+1`)
//! joined by a wait edge. Ride edges run departure -> arrival and never
//! merge the wait weight into themselves, which is what lets itinerary
//! decoding tell a wait from a ride apart.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::catalogue::{BusHandle, Catalogue, StopHandle};

pub type VertexId = u32;
type EdgeId = usize;

#[derive(Debug, Clone, Copy)]
enum EdgeKind {
    Wait { stop: StopHandle },
    Ride { bus: BusHandle, span: u32 },
}

#[derive(Debug, Clone, Copy)]
struct EdgeData {
    to: VertexId,
    weight: f64,
    kind: EdgeKind,
}

/// A single leg of a [`route`](Router::route) result.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Wait { stop_name: String, minutes: f64 },
    Bus { bus_name: String, span_count: u32, minutes: f64 },
}

/// The result of a successful [`Router::route`] query.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub total_time: f64,
    pub steps: Vec<Step>,
}

// Per-source shortest-path table, precomputed once at construction.
struct SourceTable {
    dist: Vec<f64>,
    prev_edge: Vec<Option<EdgeId>>,
    prev_vertex: Vec<Option<VertexId>>,
}

pub struct Router<'c> {
    catalogue: &'c Catalogue,
    adjacency: Vec<Vec<EdgeId>>,
    edges: Vec<EdgeData>,
    sources: Vec<SourceTable>,
}

// Min-heap entry ordered by ascending cost (BinaryHeap is a max-heap, so
// ordering is reversed).
#[derive(PartialEq)]
struct HeapEntry {
    cost: f64,
    vertex: VertexId,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'c> Router<'c> {
    /// Builds the graph and precomputes the shortest-path table for every
    /// vertex. `bus_velocity_kmh` and `bus_wait_time_minutes` parameterize
    /// edge weights; `catalogue` must already be fully populated.
    pub fn new(catalogue: &'c Catalogue, bus_velocity_kmh: f64, bus_wait_time_minutes: f64) -> Self {
        let num_vertices = 2 * catalogue.num_stops();
        let mut adjacency = vec![Vec::new(); num_vertices];
        let mut edges = Vec::new();

        let mut push_edge = |adjacency: &mut Vec<Vec<EdgeId>>, edges: &mut Vec<EdgeData>, from: VertexId, data: EdgeData| {
            let id = edges.len();
            edges.push(data);
            adjacency[from as usize].push(id);
        };

        for (stop, _) in catalogue.stops() {
            let arrival = arrival_vertex(stop);
            let departure = departure_vertex(stop);
            push_edge(
                &mut adjacency,
                &mut edges,
                arrival,
                EdgeData { to: departure, weight: bus_wait_time_minutes, kind: EdgeKind::Wait { stop } },
            );
        }

        for (bus, bus_data) in catalogue.buses() {
            let route = &bus_data.route;
            let num_stops = route.len();
            if num_stops < 2 {
                continue;
            }

            let mut leg_minutes = vec![0.0; num_stops];
            for i in 1..num_stops {
                let meters = catalogue.get_distance(route[i - 1], route[i]);
                leg_minutes[i] = meters as f64 / 1000.0 * 60.0 / bus_velocity_kmh;
            }

            for l in 0..num_stops - 1 {
                let mut accumulated = 0.0;
                for r in (l + 1)..num_stops {
                    accumulated += leg_minutes[r];
                    push_edge(
                        &mut adjacency,
                        &mut edges,
                        departure_vertex(route[l]),
                        EdgeData {
                            to: arrival_vertex(route[r]),
                            weight: accumulated,
                            kind: EdgeKind::Ride { bus, span: (r - l) as u32 },
                        },
                    );
                }
            }
        }

        let sources = (0..num_vertices as VertexId)
            .map(|source| dijkstra_from(source, num_vertices, &adjacency, &edges))
            .collect();

        log::info!(
            "router graph built: {} vertices, {} edges over {} stops and {} buses",
            num_vertices,
            edges.len(),
            catalogue.num_stops(),
            catalogue.buses().count()
        );

        Self { catalogue, adjacency, edges, sources }
    }

    /// Fastest itinerary from `from_stop_name` to `to_stop_name`, including
    /// the initial wait at the origin stop but not a trailing wait at the
    /// destination. `None` if either name is unknown or the destination is
    /// unreachable.
    pub fn route(&self, from_stop_name: &str, to_stop_name: &str) -> Option<Itinerary> {
        let from = self.catalogue.find_stop(from_stop_name)?;
        let to = self.catalogue.find_stop(to_stop_name)?;

        let source = arrival_vertex(from);
        let target = arrival_vertex(to);

        if source == target {
            return Some(Itinerary { total_time: 0.0, steps: Vec::new() });
        }

        let table = &self.sources[source as usize];
        if table.dist[target as usize].is_infinite() {
            return None;
        }

        let mut edge_chain = Vec::new();
        let mut current = target;
        while current != source {
            let edge_id = table.prev_edge[current as usize]?;
            edge_chain.push(edge_id);
            current = table.prev_vertex[current as usize]?;
        }
        edge_chain.reverse();

        let steps = edge_chain
            .into_iter()
            .map(|edge_id| {
                let edge = &self.edges[edge_id];
                match edge.kind {
                    EdgeKind::Wait { stop } => {
                        Step::Wait { stop_name: self.catalogue.stop(stop).name.clone(), minutes: edge.weight }
                    }
                    EdgeKind::Ride { bus, span } => {
                        Step::Bus { bus_name: self.catalogue.bus(bus).name.clone(), span_count: span, minutes: edge.weight }
                    }
                }
            })
            .collect();

        Some(Itinerary { total_time: table.dist[target as usize], steps })
    }
}

pub(crate) fn arrival_vertex(stop: StopHandle) -> VertexId {
    2 * stop.index() as VertexId
}

pub(crate) fn departure_vertex(stop: StopHandle) -> VertexId {
    2 * stop.index() as VertexId + 1
}

fn dijkstra_from(source: VertexId, num_vertices: usize, adjacency: &[Vec<EdgeId>], edges: &[EdgeData]) -> SourceTable {
    let mut dist = vec![f64::INFINITY; num_vertices];
    let mut prev_edge = vec![None; num_vertices];
    let mut prev_vertex = vec![None; num_vertices];
    let mut heap = BinaryHeap::new();

    dist[source as usize] = 0.0;
    heap.push(HeapEntry { cost: 0.0, vertex: source });

    while let Some(HeapEntry { cost, vertex }) = heap.pop() {
        if cost > dist[vertex as usize] {
            continue;
        }
        for &edge_id in &adjacency[vertex as usize] {
            let edge = &edges[edge_id];
            let next_cost = cost + edge.weight;
            if next_cost < dist[edge.to as usize] {
                dist[edge.to as usize] = next_cost;
                prev_edge[edge.to as usize] = Some(edge_id);
                prev_vertex[edge.to as usize] = Some(vertex);
                heap.push(HeapEntry { cost: next_cost, vertex: edge.to });
            }
        }
    }

    SourceTable { dist, prev_edge, prev_vertex }
}
