//! Complex constraints from `Store` and `Load` instructions.
//!
//! A `Move` gives the same edge no matter what the analysis knows. A `Store`
//! or a `Load` goes through a dereference, so the edges it gives depend on the
//! current points-to set of the dereferenced name. These functions derive the
//! edges for the current environment. They do not evaluate them, and must be
//! called again whenever the environment changes.
//!
//! Instructions other than the kind a function handles are ignored, so the
//! whole program may be passed to either one.

use crate::analysis::edge::Edge;
use crate::analysis::environment::Environment;
use crate::analysis::location::Storage;
use crate::il;
use rustc_hash::FxHashSet;

/// Collects edges in the order they are derived, without duplicates or self
/// edges.
#[derive(Default)]
struct EdgeCollector {
    edges: Vec<Edge>,
    seen: FxHashSet<Edge>,
}

impl EdgeCollector {
    fn push(&mut self, edge: Edge) {
        if !edge.is_self_edge() && self.seen.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }
}

/// Derive the edges for every `*reference = src`.
///
/// For every location `l` that `reference` points to, this gives
/// `Alias(l) >= Alias(src)`. A `reference` missing from the environment is
/// materialized with an empty set, and gives no edges.
pub fn store_edges<'i, I>(stores: I, environment: &mut Environment) -> Vec<Edge>
where
    I: IntoIterator<Item = &'i il::Instruction>,
{
    let mut collector = EdgeCollector::default();
    for instruction in stores {
        if let il::Instruction::Store {
            ref reference,
            ref src,
        } = *instruction
        {
            let src = Storage::variable(src.as_str());
            let reference = Storage::variable(reference.as_str());
            for location in environment.materialize(&reference).iter() {
                collector.push(Edge::new(Storage::Location(*location), src.clone()));
            }
        }
    }
    collector.edges
}

/// Derive the edges for every `dst = *reference`.
///
/// For every location `l` that `reference` points to, this gives
/// `Alias(dst) >= Alias(l)`. A `reference` missing from the environment is
/// materialized with an empty set, and gives no edges.
pub fn load_edges<'i, I>(loads: I, environment: &mut Environment) -> Vec<Edge>
where
    I: IntoIterator<Item = &'i il::Instruction>,
{
    let mut collector = EdgeCollector::default();
    for instruction in loads {
        if let il::Instruction::Load {
            ref dst,
            ref reference,
        } = *instruction
        {
            let dst = Storage::variable(dst.as_str());
            let reference = Storage::variable(reference.as_str());
            for location in environment.materialize(&reference).iter() {
                collector.push(Edge::new(dst.clone(), Storage::Location(*location)));
            }
        }
    }
    collector.edges
}
