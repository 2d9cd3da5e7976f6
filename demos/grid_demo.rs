use dstar::{DStarPlanner, PlannerConfig};

const WIDTH: i32 = 12;
const HEIGHT: i32 = 8;

fn main() {
    let mut planner = DStarPlanner::new(PlannerConfig::new(WIDTH, HEIGHT)).unwrap();

    let mut costs = vec![0u8; (WIDTH * HEIGHT) as usize];
    for y in 0..6 {
        costs[(y * WIDTH + 6) as usize] = 255;
    }

    let start = (1, 1);
    let goal = (10, 1);

    let outcome = planner.plan(&costs, start, goal).unwrap();
    println!("initial search, {} cells expanded", planner.statistics().expanded_nodes());
    draw(&planner, &costs, outcome.path());

    // the agent takes two steps, then finds a new obstacle where it was about to go
    let position = outcome.path()[2];
    let blocked = outcome.path()[4];
    costs[(blocked.1 * WIDTH + blocked.0) as usize] = 255;

    let outcome = planner.plan(&costs, position, goal).unwrap();
    println!(
        "repaired from {position:?}, {} cells expanded",
        planner.statistics().expanded_nodes()
    );
    draw(&planner, &costs, outcome.path());
}

fn draw(planner: &DStarPlanner, costs: &[u8], path: &[(i32, i32)]) {
    let expanded = planner.expanded();
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let c = if path.first() == Some(&(x, y)) {
                'S'
            } else if path.last() == Some(&(x, y)) {
                'G'
            } else if path.contains(&(x, y)) {
                '*'
            } else if costs[(y * WIDTH + x) as usize] == 255 {
                '#'
            } else if expanded.contains(&(x, y)) {
                'o'
            } else {
                '.'
            };
            print!("{c}");
        }
        println!();
    }
    println!("{path:?}");
}
