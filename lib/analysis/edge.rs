//! Subset constraints between points-to sets.
//!
//! An `Edge` with destination `dst` and source `src` states that the points-to
//! set of `dst` must always contain the points-to set of `src`. Evaluating an
//! edge copies the points-to set of `src` into `dst`. This is the only
//! operation which adds information to an `Environment` once it has been
//! initialized.

use crate::analysis::environment::Environment;
use crate::analysis::location::Storage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `Alias(dst) >= Alias(src)`
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Edge {
    dst: Storage,
    src: Storage,
}

impl Edge {
    pub fn new(dst: Storage, src: Storage) -> Edge {
        Edge { dst, src }
    }

    /// The storage whose points-to set must grow.
    pub fn dst(&self) -> &Storage {
        &self.dst
    }

    /// The storage whose points-to set is copied.
    pub fn src(&self) -> &Storage {
        &self.src
    }

    /// Returns `true` if this edge points from a storage to itself.
    pub fn is_self_edge(&self) -> bool {
        self.dst == self.src
    }

    /// Copy the points-to set of `src` into `dst`, returning `true` if the
    /// points-to set of `dst` changed.
    ///
    /// Evaluating the same edge twice, with no change to the environment in
    /// between, reports no change the second time.
    pub fn evaluate(&self, environment: &mut Environment) -> bool {
        environment.union(&self.dst, &self.src)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Alias({}) >= Alias({})", self.dst, self.src)
    }
}

/// Evaluate every edge once. Returns `true` if any evaluation changed the
/// environment.
pub fn propagate<'e, I>(edges: I, environment: &mut Environment) -> bool
where
    I: IntoIterator<Item = &'e Edge>,
{
    edges.into_iter().fold(false, |changed, edge| {
        let grew = edge.evaluate(environment);
        if grew {
            trace!("{} grew {} to {}", edge, edge.dst, environment.points_to(&edge.dst));
        }
        grew || changed
    })
}
