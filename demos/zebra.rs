use std::time::Instant;

fn main() {
    tracing_subscriber::fmt::init();

    let repeats = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);

    let solver = permsolve::zebra::solver().unwrap();
    for _ in 0..repeats {
        let mut search = solver.solve();
        let before = Instant::now();
        let solutions = search.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
        let duration = before.elapsed();

        for solution in solutions.iter() {
            println!("{}", solution);
            match permsolve::zebra::answer(solution) {
                Some(answer) => println!(
                    "The {} drinks water, the {} owns the zebra.",
                    answer.water_drinker, answer.zebra_owner
                ),
                None => println!("<bug: incomplete solution>"),
            }
        }
        println!(
            "Took {:.3}s with {} solutions ({})",
            duration.as_secs_f64(),
            solutions.len(),
            search.stats()
        );
    }
}
