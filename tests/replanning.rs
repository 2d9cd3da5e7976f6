use std::f64::consts::SQRT_2;

use assert_approx_eq::assert_approx_eq;
use dstar::grid::{octile_distance, Direction};
use dstar::{CellTag, DStarPlanner, PlanError, PlanOutcome, PlannerConfig};
use rand::Rng;
use rand_pcg::Pcg64;

const LETHAL: u8 = 255;

fn planner(width: i32, height: i32) -> DStarPlanner {
    DStarPlanner::new(PlannerConfig::new(width, height)).unwrap()
}

fn set(costs: &mut [u8], width: i32, (x, y): (i32, i32), cost: u8) {
    costs[(y * width + x) as usize] = cost;
}

fn path_cost(path: &[(i32, i32)]) -> f64 {
    path.windows(2)
        .map(|w| ((w[0].0 - w[1].0) as f64).hypot((w[0].1 - w[1].1) as f64))
        .sum()
}

fn assert_connected(path: &[(i32, i32)], from: (i32, i32), to: (i32, i32)) {
    assert_eq!(path.first(), Some(&from));
    assert_eq!(path.last(), Some(&to));
    for w in path.windows(2) {
        assert!(
            Direction::between(w[0], w[1]).is_some(),
            "{:?} -> {:?} is not a single step",
            w[0],
            w[1]
        );
    }
}

#[test]
fn open_grid_path_is_shortest() {
    let mut planner = planner(20, 15);
    let costs = vec![0; 300];
    let outcome = planner.plan(&costs, (2, 3), (17, 11)).unwrap();

    assert!(outcome.found());
    assert_connected(outcome.path(), (2, 3), (17, 11));
    assert_approx_eq!(path_cost(outcome.path()), octile_distance((2, 3), (17, 11)));
    assert!(planner.statistics().full_search());
}

#[test]
fn five_by_five_diagonal_then_detour() {
    let mut planner = planner(5, 5);
    let mut costs = vec![0; 25];

    let first = planner.plan(&costs, (0, 0), (4, 4)).unwrap().into_path();
    assert_eq!(first.len(), 5);
    assert_approx_eq!(path_cost(&first), 4.0 * SQRT_2);

    set(&mut costs, 5, (2, 2), LETHAL);
    let second = planner.plan(&costs, (0, 0), (4, 4)).unwrap();
    assert!(second.found());
    assert!(!second.path().contains(&(2, 2)));
    assert_connected(second.path(), (0, 0), (4, 4));
    assert!(!planner.statistics().full_search());
    assert!(planner.statistics().repairs() >= 1);
}

#[test]
fn solid_wall_means_no_path() {
    let mut planner = planner(9, 6);
    let mut costs = vec![0; 54];
    for y in 0..6 {
        set(&mut costs, 9, (4, y), LETHAL);
    }

    let outcome = planner.plan(&costs, (1, 2), (7, 4)).unwrap();
    assert_eq!(outcome, PlanOutcome::NoPath);
    assert!(!outcome.found());
    assert!(outcome.path().is_empty());
    assert_eq!(planner.goal(), None);
    assert!(planner.path().is_empty());
}

#[test]
fn opening_the_wall_searches_again() {
    let mut planner = planner(9, 6);
    let mut costs = vec![0; 54];
    for y in 0..6 {
        set(&mut costs, 9, (4, y), LETHAL);
    }
    assert!(!planner.plan(&costs, (1, 2), (7, 4)).unwrap().found());

    set(&mut costs, 9, (4, 0), 0);
    let outcome = planner.plan(&costs, (1, 2), (7, 4)).unwrap();
    assert!(planner.statistics().full_search());
    assert!(outcome.path().contains(&(4, 0)));
    assert_connected(outcome.path(), (1, 2), (7, 4));
}

#[test]
fn unchanged_grid_replans_without_expanding() {
    let mut planner = planner(30, 20);
    let mut costs = vec![0; 600];
    for y in 3..17 {
        set(&mut costs, 30, (12, y), LETHAL);
    }

    let first = planner.plan(&costs, (2, 10), (27, 9)).unwrap();
    let expanded = planner.expanded();
    let second = planner.plan(&costs, (2, 10), (27, 9)).unwrap();

    assert!(first.found());
    assert_eq!(first, second);
    assert!(!planner.statistics().full_search());
    assert_eq!(planner.statistics().expanded_nodes(), 0);
    assert_eq!(planner.statistics().repairs(), 0);
    assert_eq!(planner.expanded(), expanded);
}

#[test]
fn repair_is_local_to_the_obstacle() {
    let mut planner = planner(100, 100);
    let mut costs = vec![0; 10_000];

    let first = planner.plan(&costs, (60, 50), (5, 50)).unwrap();
    let full_expansions = planner.statistics().expanded_nodes();
    assert_eq!(first.path().len(), 56);
    assert!(first.path().iter().all(|&(_, y)| y == 50));

    // three steps ahead of the agent, inside the lookahead window
    set(&mut costs, 100, (57, 50), LETHAL);
    let second = planner.plan(&costs, (60, 50), (5, 50)).unwrap();
    let repair_expansions = planner.statistics().expanded_nodes();

    assert!(second.found());
    assert!(!second.path().contains(&(57, 50)));
    assert_connected(second.path(), (60, 50), (5, 50));
    assert!(repair_expansions > 0);
    assert!(
        repair_expansions * 10 < full_expansions,
        "repair expanded {repair_expansions} cells, full search {full_expansions}"
    );
}

/// 5x5 map, lethal except for two routes from (1, 2) to the goal at (4, 1):
///
/// ```text
/// #####
/// ####G
/// #OxLr
/// ##C#r
/// ###r#
/// ```
///
/// The first path is O x L G. `C` is a child of `L` next to both `O` and `x`, so when `L` becomes
/// lethal the repair moves `O` onto `C` while `C` still points at `L`.
fn two_route_map() -> Vec<u8> {
    let mut costs = vec![LETHAL; 25];
    for cell in [(4, 1), (3, 2), (2, 2), (1, 2), (2, 3), (4, 2), (4, 3), (3, 4)] {
        set(&mut costs, 5, cell, 0);
    }
    costs
}

#[test]
fn stale_children_of_new_obstacle_are_rerouted() {
    for lookahead in [2, 5] {
        let config = PlannerConfig {
            lookahead,
            ..PlannerConfig::new(5, 5)
        };
        let mut planner = DStarPlanner::new(config).unwrap();
        let mut costs = two_route_map();

        let first = planner.plan(&costs, (1, 2), (4, 1)).unwrap();
        assert_eq!(first.path(), &[(1, 2), (2, 2), (3, 2), (4, 1)]);

        set(&mut costs, 5, (3, 2), LETHAL);
        let second = planner.plan(&costs, (1, 2), (4, 1)).unwrap();
        assert_eq!(
            second.path(),
            &[(1, 2), (2, 3), (3, 4), (4, 3), (4, 2), (4, 1)],
            "lookahead {lookahead}"
        );
        assert!(!planner.statistics().full_search());
        assert_eq!(planner.statistics().repairs(), 2);
        assert_eq!(planner.goal(), Some((4, 1)));
    }
}

#[test]
fn repair_agrees_with_fresh_search_on_random_grids() {
    let (width, height) = (15, 12);
    let config = PlannerConfig {
        lookahead: 1000,
        ..PlannerConfig::new(width, height)
    };
    let mut rng = Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7ac28fa16a64abf96);

    let mut repaired = 0;
    for round in 0..400 {
        let mut costs: Vec<u8> = (0..width * height)
            .map(|_| if rng.gen_bool(0.2) { LETHAL } else { 0 })
            .collect();
        let start = (rng.gen_range(0..width), rng.gen_range(0..height));
        let goal = (rng.gen_range(0..width), rng.gen_range(0..height));
        set(&mut costs, width, start, 0);
        set(&mut costs, width, goal, 0);

        let mut planner = DStarPlanner::new(config.clone()).unwrap();
        let first = planner.plan(&costs, start, goal).unwrap().into_path();
        if first.len() < 3 {
            continue;
        }
        let blocked = first[rng.gen_range(1..first.len() - 1)];
        set(&mut costs, width, blocked, LETHAL);

        let second = planner.plan(&costs, start, goal).unwrap();
        let fresh = DStarPlanner::new(config.clone())
            .unwrap()
            .plan(&costs, start, goal)
            .unwrap();
        repaired += 1;

        assert_eq!(
            second.found(),
            fresh.found(),
            "round {round}: {start:?} -> {goal:?} with {blocked:?} blocked"
        );
        if second.found() {
            assert_connected(second.path(), start, goal);
            for &(x, y) in second.path() {
                assert_eq!(
                    costs[(y * width + x) as usize],
                    0,
                    "round {round}: path crosses lethal cell ({x}, {y})"
                );
            }
        }
    }
    assert!(repaired > 100);
}

#[test]
fn agent_resumes_from_nearest_path_cell() {
    let mut planner = planner(40, 10);
    let costs = vec![0; 400];
    let first = planner.plan(&costs, (2, 5), (35, 5)).unwrap().into_path();

    // on the path
    let resumed = planner.plan(&costs, first[4], (35, 5)).unwrap();
    assert_eq!(resumed.path(), &first[4..]);

    // drifted one row off the path
    let (x, y) = first[8];
    let resumed = planner.plan(&costs, (x, y + 1), (35, 5)).unwrap();
    assert_eq!(resumed.path(), &first[8..]);
    assert!(!planner.statistics().full_search());
}

#[test]
fn goal_change_resets_the_search() {
    let mut planner = planner(12, 12);
    let costs = vec![0; 144];
    planner.plan(&costs, (0, 0), (11, 11)).unwrap();
    assert!(planner.expanded().len() > 1);

    // a new goal that is also the start: only the goal itself is expanded after the reset
    let outcome = planner.plan(&costs, (3, 3), (3, 3)).unwrap();
    assert_eq!(outcome.path(), &[(3, 3)]);
    assert!(planner.statistics().full_search());
    assert_eq!(planner.expanded(), vec![(3, 3)]);
    assert_eq!(planner.goal(), Some((3, 3)));
}

#[test]
fn explicit_reset_returns_every_cell_to_new() {
    let mut planner = planner(8, 8);
    let costs = vec![0; 64];
    planner.plan(&costs, (0, 0), (7, 7)).unwrap();
    assert_eq!(planner.record((7, 7)).unwrap().tag, CellTag::Closed);

    planner.reset();
    for y in 0..8 {
        for x in 0..8 {
            let record = planner.record((x, y)).unwrap();
            assert_eq!(record.tag, CellTag::New);
            assert!(record.cost.is_infinite());
            assert!(record.key.is_infinite());
            assert_eq!(record.parent, None);
        }
    }
    assert!(planner.expanded().is_empty());
    assert_eq!(planner.goal(), None);
}

#[test]
fn parents_point_towards_the_goal() {
    let mut planner = planner(10, 10);
    let costs = vec![0; 100];
    planner.plan(&costs, (0, 9), (9, 0)).unwrap();

    assert_eq!(planner.record((9, 0)).unwrap().parent, None);
    for (x, y) in planner.expanded() {
        let record = planner.record((x, y)).unwrap();
        if let Some(parent) = record.parent {
            let parent = planner.record(((parent % 10) as i32, (parent / 10) as i32)).unwrap();
            assert!(parent.cost < record.cost);
        }
    }
}

#[test]
fn rejects_malformed_input() {
    let mut planner = planner(6, 4);
    let costs = vec![0; 24];

    assert!(matches!(
        planner.plan(&costs[..23], (0, 0), (5, 3)),
        Err(PlanError::CostGridLength {
            expected: 24,
            actual: 23
        })
    ));
    assert!(matches!(
        planner.plan(&costs, (6, 0), (5, 3)),
        Err(PlanError::OutOfBounds { x: 6, y: 0, .. })
    ));
    assert!(matches!(
        planner.plan(&costs, (0, 0), (0, -1)),
        Err(PlanError::OutOfBounds { x: 0, y: -1, .. })
    ));
    // rejected calls leave the planner untouched
    assert_eq!(planner.goal(), None);
    assert_eq!(planner.statistics().expanded_nodes(), 0);
    assert!(planner.plan(&costs, (0, 0), (5, 3)).unwrap().found());
}

#[test]
fn expansion_budget_is_reported() {
    let config = PlannerConfig {
        max_expansions: Some(10),
        ..PlannerConfig::new(50, 50)
    };
    let mut planner = DStarPlanner::new(config).unwrap();
    let costs = vec![0; 2500];

    let outcome = planner.plan(&costs, (0, 0), (49, 49)).unwrap();
    assert_eq!(outcome, PlanOutcome::BudgetExhausted);
    assert_eq!(planner.statistics().expanded_nodes(), 10);
    assert_eq!(planner.expanded().len(), 10);
    assert_eq!(planner.goal(), None);

    // the next call starts over rather than repairing a partial tree
    planner.plan(&costs, (0, 0), (49, 49)).unwrap();
    assert!(planner.statistics().full_search());
}

#[test]
fn lethal_threshold_uses_factor() {
    let config = PlannerConfig {
        lethal_cost: 200,
        factor: 0.5,
        ..PlannerConfig::new(5, 3)
    };
    let mut planner = DStarPlanner::new(config).unwrap();
    let mut costs = vec![0; 15];
    // 100 is exactly the threshold and stays traversable, 101 blocks
    for y in 0..3 {
        set(&mut costs, 5, (2, y), 100);
    }
    assert!(planner.plan(&costs, (0, 1), (4, 1)).unwrap().found());

    for y in 0..3 {
        set(&mut costs, 5, (2, y), 101);
    }
    planner.reset();
    assert!(!planner.plan(&costs, (0, 1), (4, 1)).unwrap().found());
}

#[test]
fn rejected_call_restarts_statistics() {
    let mut planner = planner(6, 6);
    let costs = vec![0; 36];
    planner.plan(&costs, (0, 0), (5, 5)).unwrap();
    assert!(planner.statistics().expanded_nodes() > 0);

    assert!(planner.plan(&costs, (0, 0), (9, 9)).is_err());
    assert_eq!(planner.statistics().expanded_nodes(), 0);
    assert_eq!(planner.statistics().generated_nodes(), 0);
    assert!(!planner.statistics().full_search());
    // the tree from the accepted call is still there
    assert_eq!(planner.goal(), Some((5, 5)));
}
