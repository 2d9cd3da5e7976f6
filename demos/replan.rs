use std::path::PathBuf;

use clap::Parser;
use dstar::{DStarPlanner, PlanOutcome, PlannerConfig};
use rand::Rng;
use rand_pcg::Pcg64;
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

mod movingai;

/// Plans every problem of a MovingAI scenario, drops an obstacle onto the path just ahead of the
/// start and replans.
#[derive(Parser)]
struct Options {
    path: PathBuf,
    /// Steps checked ahead of the agent on each replan
    #[clap(long, default_value_t = 5)]
    lookahead: usize,
    #[clap(long, default_value_t = 0)]
    seed: u64,
}

struct Report {
    optimal: f64,
    first: Option<f64>,
    second: Option<f64>,
    full_expansions: usize,
    repair_expansions: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opt = Options::parse();

    let scen = movingai::read_scenario(&opt.path).unwrap();
    let grid = movingai::read_cost_grid(&scen.map).unwrap();
    assert_eq!((scen.width, scen.height), (grid.width, grid.height));

    let config = PlannerConfig {
        lookahead: opt.lookahead,
        ..PlannerConfig::new(grid.width, grid.height)
    };

    let t1 = std::time::Instant::now();

    let reports: Vec<_> = scen
        .problems
        .par_iter()
        .enumerate()
        .map_init(
            || DStarPlanner::new(config.clone()).unwrap(),
            |planner, (i, problem)| {
                let mut rng = Pcg64::new(opt.seed as u128, i as u128 * 2 + 1);
                let mut costs = grid.costs.clone();

                let first = planner.plan(&costs, problem.start, problem.goal).unwrap();
                let full_expansions = planner.statistics().expanded_nodes();
                let first_cost = cost_of(&first);

                // somewhere inside the lookahead, never the start or the goal
                let path = first.path();
                let mut second = first.clone();
                if path.len() > 2 {
                    let reach = (config.lookahead + 1).min(path.len() - 1);
                    let cell = path[rng.gen_range(1..reach)];
                    costs[grid.index(cell)] = movingai::LETHAL;
                    second = planner.plan(&costs, problem.start, problem.goal).unwrap();
                }

                Report {
                    optimal: problem.optimal,
                    first: first_cost,
                    second: cost_of(&second),
                    full_expansions,
                    repair_expansions: planner.statistics().expanded_nodes(),
                }
            },
        )
        .collect();

    let t2 = std::time::Instant::now();

    for (i, report) in reports.iter().enumerate() {
        println!(
            "{i:>5} optimal {:>10.2} first {:>10} second {:>10} expanded {:>8} then {:>6}",
            report.optimal,
            display(report.first),
            display(report.second),
            report.full_expansions,
            report.repair_expansions,
        );
    }
    println!("{} problems in {:.2?}", reports.len(), t2 - t1);
}

fn cost_of(outcome: &PlanOutcome) -> Option<f64> {
    outcome.found().then(|| {
        outcome
            .path()
            .windows(2)
            .map(|w| ((w[0].0 - w[1].0) as f64).hypot((w[0].1 - w[1].1) as f64))
            .sum()
    })
}

fn display(cost: Option<f64>) -> String {
    match cost {
        Some(cost) => format!("{cost:.2}"),
        None => "-".to_string(),
    }
}
