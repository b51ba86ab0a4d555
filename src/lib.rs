//! Multi-modal journey planning over a Minecraft Transit Railway map
//! snapshot: load stations and routes, build a frequency-aware weighted
//! graph under a filter set, search it, and format the winning path into
//! a rider-legible itinerary.

pub mod error;
pub mod config;
pub mod map;
pub mod frequency;
pub mod geometry;
pub mod names;
pub mod filter;
pub mod graph;
pub mod router;
pub mod itinerary;
pub mod cache;
pub mod request;
pub mod utils;

pub use error::{CancellationToken, RouteError, RouteResult};
pub use config::Config;
pub use map::{MapStore, Mode, Route, RouteId, Station, StationId};
pub use frequency::FrequencyStore;
pub use names::{IdentityScriptConverter, NameResolver, ScriptConverter};
pub use filter::{FilterSet, RouteType};
pub use graph::{EdgeLabel, EdgeWeight, GraphBuilder, OriginalDurations, TransitGraph};
pub use router::{PathEdge, Router, ShortestPath};
pub use itinerary::{Itinerary, ItineraryFormatter, Leg, LegOption};
pub use cache::GraphCache;
pub use request::{RoutingEngine, RoutingRequest};
