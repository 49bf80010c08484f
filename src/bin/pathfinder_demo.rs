// Pathfinding visualizer demo
// Runs stepped and instant searches on a simulated clock and saves a plot.

use std::time::Duration;

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cyder_pathfinder::utils::Visualizer;
use cyder_pathfinder::{
    AnimationConfig, AnimationEvent, DriverMode, Grid, Heuristic, PathfindingResult, SearchConfig,
    SearchOutcome, Session,
};

const SHOW_ANIMATION: bool = false;
const BOARD: &str = "
    S.........
    ..........
    ..#######.
    ........#.
    ........#.
    ###.....#.
    ........#.
    .########.
    ..........
    .........E
";
const FRAME: Duration = Duration::from_millis(16);

fn run_stepped(session: &mut Session) -> PathfindingResult<()> {
    session.start_search(DriverMode::Stepped)?;

    let mut frames = 0;
    loop {
        frames += 1;
        let events = session.tick(FRAME);
        let finished = events.iter().find_map(|e| match e {
            AnimationEvent::Finished(outcome) => Some(outcome.clone()),
            _ => None,
        });
        if let Some(outcome) = finished {
            report(&outcome, session.search().expansions());
            break;
        }
        if frames % 20 == 0 {
            println!("{}", session.render_ascii());
        }
        if !session.driver().is_animating() {
            break;
        }
    }

    reveal_path(session);
    println!("{}", session.render_ascii());
    Ok(())
}

/// Tick playback until the last path cell is shown
fn reveal_path(session: &mut Session) {
    let len = session.search().path().map_or(0, |p| p.len());
    for _ in 1..len {
        session.tick(session.driver().config().playback_interval);
    }
}

fn report(outcome: &SearchOutcome, expansions: usize) {
    match outcome {
        SearchOutcome::PathFound(path) => info!(
            "path found: {} cells, cost {:.2}, {} expansions",
            path.len(),
            path.total_cost(),
            expansions
        ),
        SearchOutcome::PathNotFound => info!("no path after {} expansions", expansions),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("Pathfinding visualizer start!!");

    if let Err(e) = run() {
        error!("demo failed: {}", e);
    }

    println!("Pathfinding visualizer finish!!");
}

fn run() -> PathfindingResult<()> {
    std::fs::create_dir_all("img")?;
    let grid = Grid::from_ascii(BOARD)?;
    let animation = AnimationConfig::default()
        .with_step_interval(Duration::from_millis(16))
        .with_playback_interval(Duration::from_millis(16));

    // stepped, first-found, Manhattan
    let mut session = Session::with_grid(grid.clone(), SearchConfig::default(), animation)?;
    run_stepped(&mut session)?;

    // instant, optimal, Euclidean with diagonals
    let config = SearchConfig::default()
        .with_diagonal(true)
        .with_heuristic(Heuristic::Euclidean)
        .with_optimal(true);
    let mut session = Session::with_grid(grid, config, animation)?;
    for event in session.start_search(DriverMode::Instant)? {
        if let AnimationEvent::Finished(outcome) = event {
            report(&outcome, session.search().expansions());
        }
    }
    reveal_path(&mut session);

    // random board of the default size
    let mut random = Session::new(Default::default())?;
    let last = random.grid().size() as i32 - 1;
    random.set_start(0, 0)?;
    random.set_end(last, last)?;
    let mut rng = StdRng::seed_from_u64(42);
    random.randomize_walls(0.3, &mut rng)?;
    if let Some(SearchOutcome::PathFound(path)) = random
        .start_search(DriverMode::Instant)?
        .into_iter()
        .find_map(|e| match e {
            AnimationEvent::Finished(outcome) => Some(outcome),
            _ => None,
        })
    {
        info!("random board solved in {} moves", path.moves());
    }
    reveal_path(&mut random);

    save_plot(&session, "A* search (optimal, diagonal)", "img/pathfinder_result.png")?;
    save_plot(&random, "A* search (random walls)", "img/pathfinder_random.png")?;
    Ok(())
}

fn save_plot(session: &Session, title: &str, output_path: &str) -> PathfindingResult<()> {
    let mut vis = Visualizer::new();
    vis.set_title(title);
    vis.plot_session(session);
    match vis.save_png(output_path, 800, 800) {
        Ok(()) => println!("Plot saved to: {}", output_path),
        Err(e) => error!("{}", e),
    }
    if SHOW_ANIMATION {
        vis.show()?;
    }
    Ok(())
}
