use std::{cell::Cell, rc::Rc};

use super::*;
use crate::{
    ast::{Predicate, Role},
    domain::Domain,
};

fn roles(store: &mut RoleStore, names: &[&str]) -> Vec<Role> {
    names
        .iter()
        .map(|name| store.get_or_insert_named(name))
        .collect()
}

#[test]
fn unconstrained_group_yields_every_permutation() {
    let mut store = RoleStore::new();
    let abc = roles(&mut store, &["a", "b", "c", "d"]);
    let solver = Solver::new(
        store,
        vec![GroupSpec::new("g", Domain::range(1, 4).unwrap(), abc)],
    )
    .unwrap();

    let solutions = solver.solve().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(solutions.len(), 24);
    assert_eq!(solutions[0].permutation(0), Some(&[1, 2, 3, 4][..]));
    assert_eq!(solutions[23].permutation(0), Some(&[4, 3, 2, 1][..]));
}

#[test]
fn nested_groups_in_outer_first_order() {
    let mut store = RoleStore::new();
    let ab = roles(&mut store, &["a", "b"]);
    let xy = roles(&mut store, &["x", "y"]);
    let d = Domain::range(1, 2).unwrap();
    let solver = Solver::new(
        store,
        vec![GroupSpec::new("ab", d.clone(), ab), GroupSpec::new("xy", d, xy)],
    )
    .unwrap();

    let order = solver
        .solve()
        .map(|s| {
            let s = s.unwrap();
            (s.value_of("a").unwrap(), s.value_of("x").unwrap())
        })
        .collect::<Vec<_>>();
    assert_eq!(order, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
}

#[test]
fn predicates_prune_early() {
    let mut store = RoleStore::new();
    let ab = roles(&mut store, &["a", "b", "c"]);
    let xy = roles(&mut store, &["x", "y", "z"]);
    let d = Domain::range(1, 3).unwrap();
    let solver = Solver::new(
        store,
        vec![
            GroupSpec::new("abc", d.clone(), ab.clone()).when(Predicate::eq(ab[0], 3)),
            GroupSpec::new("xyz", d, xy.clone()).when(Predicate::eq(xy[2], ab[0])),
        ],
    )
    .unwrap();

    let mut search = solver.solve();
    let solutions = search.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
    // 2 outer permutations with a = 3, each with 2 inner permutations with z = 3
    assert_eq!(solutions.len(), 4);
    for s in &solutions {
        assert_eq!(s.value_of("a"), Some(3));
        assert_eq!(s.value_of("z"), Some(3));
    }

    let stats = search.stats();
    // inner groups are only enumerated below the two surviving outer branches
    assert_eq!(stats.candidates, 6 + 2 * 6);
    assert_eq!(stats.pruned, 4 + 2 * 4);
    assert_eq!(stats.solutions, 4);
    assert_eq!(stats.evaluations, stats.candidates);
}

#[test]
fn early_termination_does_no_extra_work() {
    let calls = Rc::new(Cell::new(0));
    let mut store = RoleStore::new();
    let abc = roles(&mut store, &["a", "b", "c", "d", "e"]);
    let counter = calls.clone();
    let solver = Solver::new(
        store,
        vec![
            GroupSpec::new("g", Domain::range(1, 5).unwrap(), abc.clone()).when(
                Predicate::custom("count", [abc[0]], move |_| {
                    counter.set(counter.get() + 1);
                    Ok(true)
                }),
            ),
        ],
    )
    .unwrap();

    let first_three = solver.solve().take(3).count();
    assert_eq!(first_three, 3);
    assert_eq!(calls.get(), 3);

    calls.set(0);
    assert_eq!(solver.solve().count(), 120);
    assert_eq!(calls.get(), 120);
}

#[test]
fn contradiction_yields_nothing() {
    let mut store = RoleStore::new();
    let ab = roles(&mut store, &["a", "b"]);
    let solver = Solver::new(
        store,
        vec![GroupSpec::new("ab", Domain::range(1, 2).unwrap(), ab.clone())
            .when(Predicate::eq(ab[0], ab[1]))],
    )
    .unwrap();

    let mut search = solver.solve();
    assert!(search.next().is_none());
    assert!(search.next().is_none());
    assert_eq!(search.step().unwrap(), Step::Done);
}

#[test]
fn predicate_errors_abort_the_search() {
    let mut store = RoleStore::new();
    let ab = roles(&mut store, &["a", "b"]);
    let a = ab[0];
    let solver = Solver::new(
        store,
        vec![GroupSpec::new("ab", Domain::range(1, 2).unwrap(), ab).when(
            Predicate::custom("picky", [a], move |b| {
                if b.value(a)? == 2 {
                    Err("two is not allowed".into())
                } else {
                    Ok(true)
                }
            }),
        )],
    )
    .unwrap();

    let mut search = solver.solve();
    assert!(search.next().unwrap().is_ok());
    match search.next() {
        Some(Err(SolveError::Predicate { predicate, source })) => {
            assert_eq!(predicate, "picky(a)");
            assert_eq!(source.to_string(), "two is not allowed");
        }
        other => panic!("expected predicate error, got {:?}", other),
    }
    assert!(search.next().is_none());
}

#[test]
fn step_reports_progress() {
    let mut store = RoleStore::new();
    let ab = roles(&mut store, &["a", "b"]);
    let solver = Solver::new(
        store,
        vec![GroupSpec::new("ab", Domain::range(1, 2).unwrap(), ab)],
    )
    .unwrap();

    let mut search = solver.solve();
    assert_eq!(search.step().unwrap(), Step::Yield);
    assert_eq!(search.get_solution().value_of("a"), Some(1));
    assert_eq!(search.step().unwrap(), Step::Yield);
    assert_eq!(search.get_solution().value_of("a"), Some(2));
    assert_eq!(search.step().unwrap(), Step::Done);
}

#[test]
fn validation_happens_up_front() {
    let d = Domain::range(1, 2).unwrap();

    let err = Solver::new(RoleStore::new(), vec![]).unwrap_err();
    assert_eq!(err, ConfigError::NoGroups);

    let mut store = RoleStore::new();
    let abc = roles(&mut store, &["a", "b", "c"]);
    let err = Solver::new(store, vec![GroupSpec::new("g", d.clone(), abc)]).unwrap_err();
    assert_eq!(
        err,
        ConfigError::ArityMismatch {
            group: "g".into(),
            roles: 3,
            domain: 2
        }
    );

    let mut store = RoleStore::new();
    let ab = roles(&mut store, &["a", "b"]);
    let err = Solver::new(
        store,
        vec![
            GroupSpec::new("g", d.clone(), ab.clone()),
            GroupSpec::new("h", d.clone(), vec![ab[1], ab[0]]),
        ],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ConfigError::DuplicateRole {
            role: "b".into(),
            first: "g".into(),
            second: "h".into()
        }
    );

    let mut store = RoleStore::new();
    let ab = roles(&mut store, &["a", "b"]);
    let xy = roles(&mut store, &["x", "y"]);
    let err = Solver::new(
        store,
        vec![
            GroupSpec::new("ab", d.clone(), ab.clone()).when(Predicate::eq(ab[0], xy[0])),
            GroupSpec::new("xy", d.clone(), xy),
        ],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnboundRole {
            predicate: "a = x".into(),
            group: "ab".into(),
            role: "x".into()
        }
    );

    let mut store = RoleStore::new();
    let ab = roles(&mut store, &["a", "b"]);
    let err = Solver::new(
        store,
        vec![GroupSpec::new("g", d.clone(), vec![ab[0], Role::from_ord(7)])],
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::UnknownRole { role: 7 });

    let mut store = RoleStore::new();
    let ab = roles(&mut store, &["a", "b"]);
    let xy = roles(&mut store, &["x", "y"]);
    let err = Solver::new(
        store,
        vec![GroupSpec::new("g", d.clone(), ab), GroupSpec::new("g", d, xy)],
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::DuplicateGroup { group: "g".into() });
}
