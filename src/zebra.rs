//! # The zebra puzzle
//!
//! There are five houses.
//! The Englishman lives in the red house.
//! The Spaniard owns the dog.
//! Coffee is drunk in the green house.
//! The Ukrainian drinks tea.
//! The green house is immediately to the right of the ivory house.
//! The Old Gold smoker owns snails.
//! Kools are smoked in the yellow house.
//! Milk is drunk in the middle house.
//! The Norwegian lives in the first house.
//! The man who smokes Chesterfields lives in the house next to the man with the fox.
//! Kools are smoked in the house next to the house where the horse is kept.
//! The Lucky Strike smoker drinks orange juice.
//! The Japanese smokes Parliaments.
//! The Norwegian lives next to the blue house.
//!
//! Now, who drinks water? Who owns the zebra?
//!
//! Two encodings are provided. [solver] registers every clue by hand at the depth where it is
//! checked, nesting the groups as nationality, color, pet, drink, smoke. [SOURCE] states the same
//! clues in the textual syntax with a different group order and leaves the placement to
//! [Puzzle](crate::Puzzle).
//!
//! ```
//! let solver = permsolve::zebra::solver().unwrap();
//! let solution = solver.solve().next().unwrap().unwrap();
//! let answer = permsolve::zebra::answer(&solution).unwrap();
//! assert_eq!(answer.water_drinker, "norwegian");
//! assert_eq!(answer.zebra_owner, "japanese");
//! ```

use crate::{
    ast::{GroupSpec, Predicate},
    domain::{Domain, DomainError},
    roles::RoleStore,
    solution::Solution,
    solver::{ConfigError, Solver},
    textual::{self, ParseError},
};

/// The puzzle in textual form.
pub const SOURCE: &str = include_str!("../testfiles/zebra.puz");

/// Errors while building either encoding.
#[derive(Debug, thiserror::Error)]
pub enum ZebraError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Build the solver with hand-placed clues.
pub fn solver() -> Result<Solver, ZebraError> {
    let five = Domain::range(1, 5)?;
    let mut r = RoleStore::new();
    let mut group = |names: [&str; 5]| names.map(|name| r.get_or_insert_named(name));

    let [english, spanish, norwegian, japanese, ukrainian] =
        group(["english", "spanish", "norwegian", "japanese", "ukrainian"]);
    let [red, green, yellow, blue, ivory] = group(["red", "green", "yellow", "blue", "ivory"]);
    let [dog, fox, zebra, horse, snails] = group(["dog", "fox", "zebra", "horse", "snails"]);
    let [coffee, milk, juice, water, tea] = group(["coffee", "milk", "juice", "water", "tea"]);
    let [oldgold, chesterfields, parliaments, kools, luckys] =
        group(["oldgold", "chesterfields", "parliaments", "kools", "luckys"]);

    let groups = vec![
        GroupSpec::new(
            "nationality",
            five.clone(),
            vec![english, spanish, norwegian, japanese, ukrainian],
        )
        .when(Predicate::eq(norwegian, 1)),
        GroupSpec::new("color", five.clone(), vec![red, green, yellow, blue, ivory])
            .when(Predicate::eq(english, red))
            .when(Predicate::ne(ivory, 5))
            .when(Predicate::eq(green, ivory.plus(1))),
        GroupSpec::new("pet", five.clone(), vec![dog, fox, zebra, horse, snails])
            .when(Predicate::eq(dog, spanish)),
        GroupSpec::new("drink", five.clone(), vec![coffee, milk, juice, water, tea])
            .when(Predicate::eq(milk, 3))
            .when(Predicate::eq(coffee, green))
            .when(Predicate::eq(tea, ukrainian)),
        GroupSpec::new(
            "smoke",
            five,
            vec![oldgold, chesterfields, parliaments, kools, luckys],
        )
        .when(Predicate::eq(oldgold, snails))
        .when(Predicate::eq(kools, yellow))
        .when(Predicate::next_to(chesterfields, fox))
        .when(Predicate::next_to(kools, horse))
        .when(Predicate::eq(luckys, juice))
        .when(Predicate::eq(japanese, parliaments))
        .when(Predicate::next_to(norwegian, blue)),
    ];

    Ok(Solver::new(r, groups)?)
}

/// Build the solver from [SOURCE], letting the builder place every clue.
pub fn solver_from_source() -> Result<Solver, ZebraError> {
    Ok(textual::parse_puzzle(SOURCE)?.solver()?)
}

/// The two questions the puzzle asks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZebraAnswer {
    pub water_drinker: String,
    pub zebra_owner: String,
}

/// Answer the puzzle's questions for a solution of either encoding.
pub fn answer(solution: &Solution) -> Option<ZebraAnswer> {
    let owner_of = |role: &str| {
        let house = solution.value_of(role)?;
        solution.role_at("nationality", house).map(str::to_owned)
    };
    Some(ZebraAnswer {
        water_drinker: owner_of("water")?,
        zebra_owner: owner_of("zebra")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Predicate, Puzzle};

    fn expected_houses(solution: &Solution) {
        for (role, house) in [
            ("norwegian", 1),
            ("ukrainian", 2),
            ("english", 3),
            ("spanish", 4),
            ("japanese", 5),
            ("yellow", 1),
            ("blue", 2),
            ("red", 3),
            ("ivory", 4),
            ("green", 5),
            ("water", 1),
            ("tea", 2),
            ("milk", 3),
            ("juice", 4),
            ("coffee", 5),
            ("kools", 1),
            ("chesterfields", 2),
            ("oldgold", 3),
            ("luckys", 4),
            ("parliaments", 5),
            ("fox", 1),
            ("horse", 2),
            ("snails", 3),
            ("dog", 4),
            ("zebra", 5),
        ] {
            assert_eq!(solution.value_of(role), Some(house), "{}", role);
        }
    }

    #[test]
    fn hand_placed_encoding() {
        let solver = solver().unwrap();
        let mut search = solver.solve();
        let solutions = search.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(solutions.len(), 1);

        let solution = &solutions[0];
        assert_eq!(solution.value_of("norwegian"), Some(1));
        assert_eq!(solution.value_of("water"), solution.value_of("norwegian"));
        assert_eq!(solution.value_of("zebra"), solution.value_of("japanese"));
        expected_houses(solution);

        assert_eq!(
            answer(solution),
            Some(ZebraAnswer {
                water_drinker: "norwegian".into(),
                zebra_owner: "japanese".into(),
            })
        );

        let stats = search.stats();
        assert_eq!(stats.solutions, 1);
        // far fewer candidates than the nominal 120^5
        assert!(stats.candidates < 10_000_000);
    }

    #[test]
    fn textual_encoding_agrees() {
        let solver = solver_from_source().unwrap();
        assert_eq!(
            solver.groups().iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
            vec!["color", "nationality", "drink", "smoke", "pet"]
        );
        let solutions = solver.solve().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(solutions.len(), 1);
        expected_houses(&solutions[0]);
        assert_eq!(
            answer(&solutions[0]).unwrap(),
            answer(&super::solver().unwrap().solve().next().unwrap().unwrap()).unwrap()
        );
    }

    #[test]
    fn table_lists_every_house() {
        let solver = solver().unwrap();
        let solution = solver.solve().next().unwrap().unwrap();
        let table = solution.to_string();
        let lines = table.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("nationality"));
        assert!(lines[1].starts_with("1  norwegian"));
        assert!(lines[1].contains("yellow"));
        assert!(lines[5].starts_with("5  japanese"));
        assert!(lines[5].ends_with("parliaments"));
    }

    #[test]
    fn contradiction_has_no_solution() {
        let mut p = crate::textual::TextualPuzzle::new();
        p.load_str(SOURCE).unwrap();
        p.load_str("zebra = 1.").unwrap();
        let solver = p.solver().unwrap();
        assert_eq!(solver.solve().count(), 0);
    }

    #[test]
    fn builder_encoding() {
        let mut p = Puzzle::new();
        let five = Domain::range(1, 5).unwrap();
        let [_english, spanish, norwegian, japanese, _ukrainian] = p
            .group(
                "nationality",
                five.clone(),
                ["english", "spanish", "norwegian", "japanese", "ukrainian"],
            )
            .unwrap();
        let [dog, _fox, zebra, _horse, _snails] = p
            .group("pet", five, ["dog", "fox", "zebra", "horse", "snails"])
            .unwrap();
        p.constrain(Predicate::eq(norwegian, 1))
            .constrain(Predicate::eq(spanish, dog))
            .constrain(Predicate::eq(japanese, zebra))
            .constrain(Predicate::one_of(japanese, [5]));
        let solver = p.solver().unwrap();
        // the other three nationalities and the other three pets each fill houses 2 to 4 freely
        assert_eq!(solver.solve().count(), 6 * 6);
    }
}
