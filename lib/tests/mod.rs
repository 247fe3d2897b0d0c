use crate::analysis::andersen::{self, Options, Solver};
use crate::analysis::{AbstractLocation, Environment, PointsToSet, Storage};
use crate::il;


fn solve(text: &str) -> Environment {
    let program: il::Program = text.parse().unwrap();
    andersen::andersen(&program).unwrap()
}

fn set(locations: &[usize]) -> PointsToSet {
    locations
        .iter()
        .map(|index| AbstractLocation::new(*index))
        .collect()
}

#[test]
fn empty_program() {
    let program = il::Program::new();
    let solution = andersen::andersen_with_options(&program, Options::default()).unwrap();
    assert!(solution.environment().is_empty());
    assert_eq!(solution.rounds(), 0);
}

#[test]
fn allocation_uniqueness() {
    let environment = solve("v = alloca\nv = alloca\nw = alloca\n");
    assert_eq!(environment.lookup("v"), &set(&[0, 1]));
    assert_eq!(environment.lookup("w"), &set(&[2]));
    assert!(!environment.may_alias("v", "w"));
}

#[test]
fn move_transitivity() {
    let environment = solve("a = alloca\nb = a\nc = b\n");
    assert!(environment.lookup("c").contains(&AbstractLocation::new(0)));

    // order does not matter in a flow-insensitive analysis
    let environment = solve("c = b\nb = a\na = alloca\n");
    assert!(environment.lookup("c").contains(&AbstractLocation::new(0)));
}

#[test]
fn move_cycle() {
    let environment = solve(
        "
        a = alloca
        b = alloca
        a = b
        b = a
        ",
    );
    assert_eq!(environment.lookup("a"), &set(&[0, 1]));
    assert_eq!(environment.lookup("b"), &set(&[0, 1]));
}

#[test]
fn store_load_round_trip() {
    let environment = solve(
        "
        p0 = alloca
        p1 = alloca
        *p0 = p1
        p2 = *p0
        ",
    );
    assert_eq!(environment.lookup("p2"), environment.lookup("p1"));
    assert_eq!(environment.lookup("p2"), &set(&[1]));
    assert!(environment.may_alias("p1", "p2"));
}

#[test]
fn unknown_names_point_nowhere() {
    let environment = solve("a = b\nc = *d\n*e = f\n");
    for name in ["a", "b", "c", "d", "e", "f", "never_mentioned"] {
        assert!(environment.lookup(name).is_empty(), "{}", name);
    }
}

#[test]
fn determinism() {
    let text = "
        x = alloca
        y = alloca
        *x = y
        z = *x
        *z = x
        w = z
        q = *w
        ";
    let program: il::Program = text.parse().unwrap();
    let first = andersen::andersen(&program).unwrap();
    let second = andersen::andersen(&program).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn monotonicity() {
    let program: il::Program = "
        a = alloca
        b = alloca
        c = alloca
        *a = b
        d = *a
        *d = c
        e = *b
        *e = a
        f = *c
        g = f
        "
    .parse()
    .unwrap();

    let mut solver = Solver::new(program.instructions(), Options::default());
    let mut history = vec![solver.environment().clone()];
    while solver.round() {
        history.push(solver.environment().clone());
    }
    history.push(solver.environment().clone());

    assert!(solver.rounds() > 1);
    for i in 0..history.len() {
        for j in i..history.len() {
            assert!(history[i] <= history[j], "round {} is not below round {}", i, j);
        }
    }

    // every name's set only grows
    let last = history.last().unwrap();
    for environment in &history {
        for (storage, points_to) in environment {
            assert!(points_to.is_subset(last.points_to(storage)), "{}", storage);
        }
    }
}

#[test]
fn idempotent_evaluation() {
    let mut environment = solve("a = alloca\n");
    let edge = crate::analysis::Edge::new(Storage::variable("b"), Storage::variable("a"));
    assert!(edge.evaluate(&mut environment));
    assert!(!edge.evaluate(&mut environment));
}

#[test]
fn independent_sets_after_merge() {
    // b receives a copy of a's set, and later growth of a must not leak into
    // names which never depend on a
    let environment = solve(
        "
        a = alloca
        b = a
        c = alloca
        a = c
        ",
    );
    assert_eq!(environment.lookup("a"), &set(&[0, 1]));
    assert_eq!(environment.lookup("b"), &set(&[0, 1]));
    assert_eq!(environment.lookup("c"), &set(&[1]));
}

#[test]
fn store_through_many_targets() {
    let environment = solve(
        "
        x = alloca
        y = alloca
        p = x
        p = y
        v = alloca
        *p = v
        r = *x
        s = *y
        ",
    );
    assert_eq!(environment.location(AbstractLocation::new(0)), &set(&[2]));
    assert_eq!(environment.location(AbstractLocation::new(1)), &set(&[2]));
    assert_eq!(environment.lookup("r"), &set(&[2]));
    assert_eq!(environment.lookup("s"), &set(&[2]));
}

#[test]
fn self_referential_store() {
    let environment = solve(
        "
        p = alloca
        *p = p
        q = *p
        r = *q
        ",
    );
    assert_eq!(environment.location(AbstractLocation::new(0)), &set(&[0]));
    assert_eq!(environment.lookup("q"), &set(&[0]));
    assert_eq!(environment.lookup("r"), &set(&[0]));
}
