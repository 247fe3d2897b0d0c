//! Abstract locations, and the storage they live in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One allocation site's memory object.
///
/// Abstract locations are only created by a `LocationAllocator`, once per
/// `Alloca` instruction. They are numbered in the order the allocations appear
/// in the program, so the same program always yields the same locations.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct AbstractLocation {
    index: usize,
}

impl AbstractLocation {
    pub(crate) fn new(index: usize) -> AbstractLocation {
        AbstractLocation { index }
    }

    /// The allocation counter value this location was created with.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for AbstractLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ref_{}", self.index)
    }
}

/// Hands out fresh abstract locations for a single analysis run.
#[derive(Clone, Debug, Default)]
pub struct LocationAllocator {
    next_index: usize,
}

impl LocationAllocator {
    pub fn new() -> LocationAllocator {
        LocationAllocator { next_index: 0 }
    }

    /// Create a location never returned by this allocator before.
    pub fn fresh(&mut self) -> AbstractLocation {
        let location = AbstractLocation::new(self.next_index);
        self.next_index += 1;
        location
    }

    /// The number of locations allocated so far.
    pub fn allocated(&self) -> usize {
        self.next_index
    }
}

/// A key in the `Environment`.
///
/// Program variables and abstract locations are kept apart, so a program can
/// never name an abstract location, even by spelling out its display name.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Storage {
    Variable(String),
    Location(AbstractLocation),
}

impl Storage {
    pub fn variable<S>(name: S) -> Storage
    where
        S: Into<String>,
    {
        Storage::Variable(name.into())
    }

    pub fn location(location: AbstractLocation) -> Storage {
        Storage::Location(location)
    }

    /// Get the variable name, if this is a `Variable`.
    pub fn name(&self) -> Option<&str> {
        match *self {
            Storage::Variable(ref name) => Some(name.as_str()),
            Storage::Location(_) => None,
        }
    }

    /// Get the abstract location, if this is a `Location`.
    pub fn abstract_location(&self) -> Option<AbstractLocation> {
        match *self {
            Storage::Variable(_) => None,
            Storage::Location(location) => Some(location),
        }
    }
}

impl From<AbstractLocation> for Storage {
    fn from(location: AbstractLocation) -> Storage {
        Storage::Location(location)
    }
}

impl From<&str> for Storage {
    fn from(name: &str) -> Storage {
        Storage::Variable(name.to_string())
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Storage::Variable(ref name) => write!(f, "{}", name),
            Storage::Location(ref location) => write!(f, "{}", location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_is_sequential() {
        let mut allocator = LocationAllocator::new();
        let l0 = allocator.fresh();
        let l1 = allocator.fresh();
        assert_ne!(l0, l1);
        assert_eq!(l0.index(), 0);
        assert_eq!(l1.index(), 1);
        assert_eq!(allocator.allocated(), 2);
        assert_eq!(l1.to_string(), "ref_1");

        // a new allocator starts over
        assert_eq!(LocationAllocator::new().fresh(), l0);
    }

    #[test]
    fn variables_never_equal_locations() {
        let location = LocationAllocator::new().fresh();
        let variable = Storage::variable("ref_0");
        assert_eq!(variable.to_string(), Storage::from(location).to_string());
        assert_ne!(variable, Storage::from(location));
        assert_eq!(variable.name(), Some("ref_0"));
        assert_eq!(Storage::from(location).abstract_location(), Some(location));
    }
}
