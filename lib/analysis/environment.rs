//! Points-to sets, and the `Environment` which maps storage to them.
//!
//! Both form lattices ordered by set inclusion. The empty set is bottom, and a
//! storage key missing from an `Environment` is the same as a key mapped to
//! the empty set. Reads never fail. Writes materialize the key first.

use crate::analysis::location::{AbstractLocation, LocationAllocator, Storage};
use crate::il;
use crate::Error;
use std::cmp::{Ordering, PartialOrd};
use std::collections::{btree_map, btree_set, BTreeMap, BTreeSet};
use std::fmt;
use std::iter::FromIterator;

static EMPTY: PointsToSet = PointsToSet::new();

/// The set of abstract locations a storage may refer to.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct PointsToSet {
    locations: BTreeSet<AbstractLocation>,
}

impl PointsToSet {
    pub const fn new() -> PointsToSet {
        PointsToSet {
            locations: BTreeSet::new(),
        }
    }

    pub fn contains(&self, location: &AbstractLocation) -> bool {
        self.locations.contains(location)
    }

    /// Add a location, returning `true` if it was not already present.
    pub fn insert(&mut self, location: AbstractLocation) -> bool {
        self.locations.insert(location)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<AbstractLocation> {
        self.locations.iter()
    }

    pub fn locations(&self) -> &BTreeSet<AbstractLocation> {
        &self.locations
    }

    /// Copy every location in `other` into this set. Returns `true` if this
    /// set grew.
    pub fn union(&mut self, other: &PointsToSet) -> bool {
        let len = self.locations.len();
        self.locations.extend(other.locations.iter().copied());
        self.locations.len() != len
    }

    pub fn is_subset(&self, other: &PointsToSet) -> bool {
        self.locations.is_subset(&other.locations)
    }

    /// Returns `true` if the two sets share any location.
    pub fn intersects(&self, other: &PointsToSet) -> bool {
        !self.locations.is_disjoint(&other.locations)
    }
}

impl PartialOrd for PointsToSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.locations.len().cmp(&other.locations.len()) {
            Ordering::Equal => {
                if self.locations == other.locations {
                    Some(Ordering::Equal)
                } else {
                    None
                }
            }
            Ordering::Less => {
                if self.is_subset(other) {
                    Some(Ordering::Less)
                } else {
                    None
                }
            }
            Ordering::Greater => {
                if other.is_subset(self) {
                    Some(Ordering::Greater)
                } else {
                    None
                }
            }
        }
    }
}

impl FromIterator<AbstractLocation> for PointsToSet {
    fn from_iter<I: IntoIterator<Item = AbstractLocation>>(iter: I) -> PointsToSet {
        PointsToSet {
            locations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PointsToSet {
    type Item = &'a AbstractLocation;
    type IntoIter = btree_set::Iter<'a, AbstractLocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

impl fmt::Display for PointsToSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.locations
                .iter()
                .map(|location| location.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

/// A mapping from every `Storage` to its `PointsToSet`.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    points_to: BTreeMap<Storage, PointsToSet>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            points_to: BTreeMap::new(),
        }
    }

    /// Get the points-to set for a storage, if it has been materialized.
    pub fn get(&self, storage: &Storage) -> Option<&PointsToSet> {
        self.points_to.get(storage)
    }

    /// Get the points-to set for a storage. Unknown storage points to nothing.
    pub fn points_to(&self, storage: &Storage) -> &PointsToSet {
        self.points_to.get(storage).unwrap_or(&EMPTY)
    }

    /// Get the points-to set of a program variable by name.
    pub fn lookup(&self, name: &str) -> &PointsToSet {
        self.points_to(&Storage::variable(name))
    }

    /// Get the points-to set of an abstract location.
    pub fn location(&self, location: AbstractLocation) -> &PointsToSet {
        self.points_to(&Storage::Location(location))
    }

    pub fn contains(&self, storage: &Storage) -> bool {
        self.points_to.contains_key(storage)
    }

    /// Get a mutable points-to set for a storage, creating an empty one if the
    /// storage is not yet a key.
    pub fn materialize(&mut self, storage: &Storage) -> &mut PointsToSet {
        self.points_to.entry(storage.clone()).or_default()
    }

    /// Record that `storage` may point to `location`. Returns `true` if this
    /// is new information.
    pub fn insert(&mut self, storage: &Storage, location: AbstractLocation) -> bool {
        self.materialize(storage).insert(location)
    }

    /// Merge the points-to set of `src` into the points-to set of `dst`.
    ///
    /// Both keys are materialized. The members of `src` are copied, so the two
    /// sets stay independent afterwards. Returns `true` if `dst` grew.
    pub fn union(&mut self, dst: &Storage, src: &Storage) -> bool {
        let src_set = self.materialize(src).clone();
        self.materialize(dst).union(&src_set)
    }

    /// Returns `true` if the variables `a` and `b` may refer to the same
    /// abstract location.
    pub fn may_alias(&self, a: &str, b: &str) -> bool {
        self.lookup(a).intersects(self.lookup(b))
    }

    /// The number of materialized keys.
    pub fn len(&self) -> usize {
        self.points_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_to.is_empty()
    }

    /// The sum of the sizes of every points-to set.
    pub fn size(&self) -> usize {
        self.points_to.values().map(|set| set.len()).sum()
    }

    pub fn iter(&self) -> btree_map::Iter<Storage, PointsToSet> {
        self.points_to.iter()
    }

    /// Serialize this environment as a JSON object, from storage name to the
    /// sorted names of the locations it points to.
    pub fn to_json(&self) -> Result<String, Error> {
        let map: BTreeMap<String, Vec<String>> = self
            .points_to
            .iter()
            .map(|(storage, set)| {
                (
                    storage.to_string(),
                    set.iter().map(|location| location.to_string()).collect(),
                )
            })
            .collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }
}

/// Pointwise inclusion over every key present in either environment.
impl PartialOrd for Environment {
    fn partial_cmp(&self, other: &Environment) -> Option<Ordering> {
        let mut order = Ordering::Equal;
        for storage in self.points_to.keys().chain(other.points_to.keys()) {
            match self.points_to(storage).partial_cmp(other.points_to(storage))? {
                Ordering::Equal => {}
                ordering => {
                    if order == Ordering::Equal {
                        order = ordering;
                    } else if order != ordering {
                        return None;
                    }
                }
            }
        }
        Some(order)
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Some(Ordering::Equal) == self.partial_cmp(other)
    }
}

impl<'a> IntoIterator for &'a Environment {
    type Item = (&'a Storage, &'a PointsToSet);
    type IntoIter = btree_map::Iter<'a, Storage, PointsToSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.points_to.iter()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (storage, set) in &self.points_to {
            writeln!(f, "{} -> {}", storage, set)?;
        }
        Ok(())
    }
}

/// Create the initial environment from the `Alloca` instructions.
///
/// Every `Alloca` gets its own fresh location from `allocator`, even when it
/// allocates a name allocated before, and that location is materialized as a
/// key with an empty set. All other instructions are ignored.
pub fn init_env<'i, I>(instructions: I, allocator: &mut LocationAllocator) -> Environment
where
    I: IntoIterator<Item = &'i il::Instruction>,
{
    let mut environment = Environment::new();
    for instruction in instructions {
        if let il::Instruction::Alloca { ref name } = *instruction {
            let location = allocator.fresh();
            environment.insert(&Storage::variable(name.as_str()), location);
            environment.materialize(&Storage::Location(location));
        }
    }
    environment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations(n: usize) -> Vec<AbstractLocation> {
        let mut allocator = LocationAllocator::new();
        (0..n).map(|_| allocator.fresh()).collect()
    }

    #[test]
    fn init_env_allocations() {
        let instructions = vec![
            il::Instruction::alloca("v").unwrap(),
            il::Instruction::mov("w", "v").unwrap(),
            il::Instruction::alloca("v").unwrap(),
            il::Instruction::alloca("w").unwrap(),
        ];
        let mut allocator = LocationAllocator::new();
        let environment = init_env(&instructions, &mut allocator);
        let l = locations(3);

        assert_eq!(allocator.allocated(), 3);
        assert_eq!(
            environment.lookup("v"),
            &[l[0], l[1]].iter().copied().collect::<PointsToSet>()
        );
        assert_eq!(
            environment.lookup("w"),
            &Some(l[2]).into_iter().collect::<PointsToSet>()
        );
        for location in l {
            assert!(environment.contains(&location.into()));
            assert!(environment.location(location).is_empty());
        }
        // three locations, and two names
        assert_eq!(environment.len(), 5);
    }

    #[test]
    fn missing_keys_read_empty() {
        let environment = Environment::new();
        assert!(environment.lookup("nothing").is_empty());
        assert!(environment.get(&Storage::variable("nothing")).is_none());
        assert!(!environment.may_alias("a", "b"));
    }

    #[test]
    fn union_copies() {
        let l = locations(2);
        let a = Storage::variable("a");
        let b = Storage::variable("b");

        let mut environment = Environment::new();
        environment.insert(&a, l[0]);

        assert!(environment.union(&b, &a));
        assert!(!environment.union(&b, &a));
        assert_eq!(environment.points_to(&b), environment.points_to(&a));

        // growing one set must leave the other alone
        environment.insert(&a, l[1]);
        assert_eq!(environment.points_to(&a).len(), 2);
        assert_eq!(environment.points_to(&b).len(), 1);
        assert!(environment.may_alias("a", "b"));
    }

    #[test]
    fn union_materializes() {
        let mut environment = Environment::new();
        assert!(!environment.union(&Storage::variable("x"), &Storage::variable("y")));
        assert!(environment.contains(&Storage::variable("x")));
        assert!(environment.contains(&Storage::variable("y")));
    }

    #[test]
    fn points_to_set_order() {
        let l = locations(3);
        let s0: PointsToSet = vec![l[0]].into_iter().collect();
        let s01: PointsToSet = vec![l[0], l[1]].into_iter().collect();
        let s2: PointsToSet = vec![l[2]].into_iter().collect();

        assert!(PointsToSet::new() < s0);
        assert!(s0 < s01);
        assert!(s01 > s0);
        assert_eq!(s0.partial_cmp(&s2), None);
        assert_eq!(s01.partial_cmp(&s2), None);
        assert_eq!(s01.to_string(), "{ref_0, ref_1}");
    }

    #[test]
    fn environment_order() {
        let l = locations(2);
        let mut small = Environment::new();
        small.insert(&Storage::variable("a"), l[0]);

        let mut large = small.clone();
        large.insert(&Storage::variable("b"), l[1]);
        assert!(small < large);

        // a materialized empty key is the same as no key at all
        let mut materialized = small.clone();
        materialized.materialize(&Storage::variable("z"));
        assert_eq!(materialized, small);

        let mut other = Environment::new();
        other.insert(&Storage::variable("c"), l[1]);
        assert_eq!(small.partial_cmp(&other), None);
    }

    #[test]
    fn to_json() {
        let l = locations(1);
        let mut environment = Environment::new();
        environment.insert(&Storage::variable("p"), l[0]);
        environment.materialize(&l[0].into());
        let value: serde_json::Value =
            serde_json::from_str(&environment.to_json().unwrap()).unwrap();
        assert_eq!(value["p"][0], "ref_0");
        assert_eq!(value["ref_0"].as_array().unwrap().len(), 0);
    }
}
