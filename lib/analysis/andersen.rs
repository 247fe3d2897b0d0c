//! Andersen-style, flow-insensitive points-to analysis.
//!
//! The analysis solves a system of subset constraints to a fixed point:
//!
//! 1. Every `Alloca` seeds the environment with a fresh abstract location.
//! 2. Every `Move` gives one static edge, which never changes.
//! 3. Rounds repeat until a whole round changes nothing. Each round
//!    propagates along the known edges, derives the edges for every `Store`
//!    against the current environment and evaluates them, then does the same
//!    for every `Load`, and propagates the load edges once more.
//!
//! Points-to sets only grow, and every set is bounded by the finite set of
//! abstract locations, so the rounds always terminate. A round cap can still
//! be set in `Options`, for callers who want a hard bound.
//!
//! Use `andersen` for the final `Environment`, or drive a `Solver` one round at
//! a time to observe the environment as it converges.

use crate::analysis::constraint_graph::ConstraintGraph;
use crate::analysis::constraints;
use crate::analysis::edge::{self, Edge};
use crate::analysis::environment::{init_env, Environment};
use crate::analysis::location::{LocationAllocator, Storage};
use crate::il;
use crate::Error;
use rustc_hash::FxHashSet;
use std::default;

/// Options which change the behavior of the solver.
#[derive(Clone, Debug)]
pub struct Options {
    max_rounds: Option<usize>,
    keep_dynamic_edges: bool,
}

impl Options {
    /// Create a new set of Options with the default settings.
    pub fn new() -> Options {
        Options::default()
    }

    /// The most rounds which may change the environment, if there is a limit.
    ///
    /// The round which confirms the fixed point changes nothing, and is never
    /// counted. With a limit of `n`, a program needing more than `n` changing
    /// rounds fails with `Error::RoundLimitExceeded`.
    pub fn max_rounds(&self) -> Option<usize> {
        self.max_rounds
    }

    pub fn set_max_rounds(&mut self, max_rounds: Option<usize>) {
        self.max_rounds = max_rounds;
    }

    /// Whether all edges derived from stores and loads in one round are
    /// propagated again at the start of the next round.
    ///
    /// When false, only the previous round's load edges are propagated again.
    /// The fixed point is the same either way.
    pub fn keep_dynamic_edges(&self) -> bool {
        self.keep_dynamic_edges
    }

    pub fn set_keep_dynamic_edges(&mut self, keep_dynamic_edges: bool) {
        self.keep_dynamic_edges = keep_dynamic_edges;
    }
}

impl default::Default for Options {
    fn default() -> Options {
        Options {
            max_rounds: None,
            keep_dynamic_edges: true,
        }
    }
}

/// Create your options with the builder pattern.
///
/// For more details on the options, see `andersen::Options`
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    pub fn new() -> OptionsBuilder {
        OptionsBuilder {
            options: Options::default(),
        }
    }

    /// Limit the number of changing rounds. By default there is no limit.
    pub fn max_rounds(mut self, max_rounds: usize) -> OptionsBuilder {
        self.options.max_rounds = Some(max_rounds);
        self
    }

    /// Set the, "Keep dynamic edges," option. By default this is true.
    pub fn keep_dynamic_edges(mut self, keep_dynamic_edges: bool) -> OptionsBuilder {
        self.options.keep_dynamic_edges = keep_dynamic_edges;
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}

impl default::Default for OptionsBuilder {
    fn default() -> OptionsBuilder {
        OptionsBuilder::new()
    }
}

/// Solves points-to constraints for one program.
///
/// Every `Solver` has its own abstract location counter, so two solvers over
/// the same instructions always produce the same environment.
pub struct Solver<'p> {
    options: Options,
    environment: Environment,
    static_edges: Vec<Edge>,
    store_edges: Vec<Edge>,
    load_edges: Vec<Edge>,
    stores: Vec<&'p il::Instruction>,
    loads: Vec<&'p il::Instruction>,
    locations: usize,
    rounds: usize,
    fixed_point: bool,
}

impl<'p> Solver<'p> {
    /// Initialize the environment and the static edges for `instructions`.
    pub fn new(instructions: &'p [il::Instruction], options: Options) -> Solver<'p> {
        let mut allocator = LocationAllocator::new();
        let environment = init_env(instructions, &mut allocator);

        let mut seen = FxHashSet::default();
        let static_edges: Vec<Edge> = instructions
            .iter()
            .filter_map(|instruction| match *instruction {
                il::Instruction::Move { ref dst, ref src } => Some(Edge::new(
                    Storage::variable(dst.as_str()),
                    Storage::variable(src.as_str()),
                )),
                _ => None,
            })
            .filter(|edge| seen.insert(edge.clone()))
            .collect();

        let stores: Vec<&il::Instruction> = instructions.iter().filter(|i| i.is_store()).collect();
        let loads: Vec<&il::Instruction> = instructions.iter().filter(|i| i.is_load()).collect();

        debug!(
            "andersen: {} instructions, {} locations, {} static edges, {} stores, {} loads",
            instructions.len(),
            allocator.allocated(),
            static_edges.len(),
            stores.len(),
            loads.len()
        );

        Solver {
            options,
            environment,
            static_edges,
            store_edges: Vec::new(),
            load_edges: Vec::new(),
            stores,
            loads,
            locations: allocator.allocated(),
            rounds: 0,
            fixed_point: false,
        }
    }

    /// The environment as of the last round.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The number of rounds so far which changed the environment.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Returns `true` once a round has changed nothing.
    pub fn is_fixed_point(&self) -> bool {
        self.fixed_point
    }

    /// Run one round. Returns `true` if the environment changed.
    ///
    /// Once a round changes nothing, the fixed point is reached, and further
    /// calls do nothing and return `false`.
    pub fn round(&mut self) -> bool {
        if self.fixed_point {
            return false;
        }

        let size = self.environment.size();

        let survivors: &[Edge] = if self.options.keep_dynamic_edges {
            &self.store_edges
        } else {
            &[]
        };
        let mut changed = edge::propagate(
            self.static_edges
                .iter()
                .chain(survivors)
                .chain(self.load_edges.iter()),
            &mut self.environment,
        );

        let store_edges =
            constraints::store_edges(self.stores.iter().copied(), &mut self.environment);
        changed |= edge::propagate(&store_edges, &mut self.environment);

        let load_edges = constraints::load_edges(self.loads.iter().copied(), &mut self.environment);
        changed |= edge::propagate(&load_edges, &mut self.environment);
        changed |= edge::propagate(&load_edges, &mut self.environment);

        // every reported change is growth, and every growth is reported
        debug_assert_eq!(changed, self.environment.size() > size);

        trace!(
            "andersen: round {}, {} store edges, {} load edges, changed={}",
            self.rounds + 1,
            store_edges.len(),
            load_edges.len(),
            changed
        );

        self.store_edges = store_edges;
        self.load_edges = load_edges;

        if changed {
            self.rounds += 1;
        } else {
            self.fixed_point = true;
        }
        changed
    }

    /// Run rounds until the fixed point.
    pub fn run(mut self) -> Result<Solution, Error> {
        while self.round() {
            if let Some(max_rounds) = self.options.max_rounds {
                if self.rounds > max_rounds {
                    return Err(Error::RoundLimitExceeded(max_rounds));
                }
            }
        }

        debug!(
            "andersen: fixed point after {} rounds, {} keys, {} points-to facts",
            self.rounds,
            self.environment.len(),
            self.environment.size()
        );

        Ok(Solution {
            environment: self.environment,
            rounds: self.rounds,
            locations: self.locations,
            static_edges: self.static_edges,
            store_edges: self.store_edges,
            load_edges: self.load_edges,
        })
    }
}

/// The result of solving a program to its fixed point.
#[derive(Clone, Debug)]
pub struct Solution {
    environment: Environment,
    rounds: usize,
    locations: usize,
    static_edges: Vec<Edge>,
    store_edges: Vec<Edge>,
    load_edges: Vec<Edge>,
}

impl Solution {
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_environment(self) -> Environment {
        self.environment
    }

    /// The number of rounds which changed the environment.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The number of abstract locations, one per `Alloca`.
    pub fn locations(&self) -> usize {
        self.locations
    }

    /// Edges from `Move` instructions.
    pub fn static_edges(&self) -> &[Edge] {
        &self.static_edges
    }

    /// Edges from `Store` and `Load` instructions, as derived from the final
    /// environment.
    pub fn dynamic_edges(&self) -> impl Iterator<Item = &Edge> {
        self.store_edges.iter().chain(self.load_edges.iter())
    }

    /// Every edge in the final constraint system.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.static_edges.iter().chain(self.dynamic_edges())
    }

    /// Build the final constraint graph.
    pub fn constraint_graph(&self) -> Result<ConstraintGraph, Error> {
        ConstraintGraph::new(&self.environment, self.edges())
    }
}

/// Compute the points-to sets for every name in `program`.
pub fn andersen(program: &il::Program) -> Result<Environment, Error> {
    Ok(andersen_with_options(program, Options::default())?.into_environment())
}

/// Solve `program` with the given options.
pub fn andersen_with_options(program: &il::Program, options: Options) -> Result<Solution, Error> {
    Solver::new(program.instructions(), options).run()
}
