//! Points-to analysis over the alias IL.

pub mod andersen;
pub mod constraint_graph;
pub mod constraints;
pub mod edge;
pub mod environment;
pub mod location;

pub use self::andersen::{andersen, Options, OptionsBuilder, Solution, Solver};
pub use self::edge::{propagate, Edge};
pub use self::environment::{init_env, Environment, PointsToSet};
pub use self::location::{AbstractLocation, LocationAllocator, Storage};
