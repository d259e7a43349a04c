mod common;

use common::{assert_walls_consistent, load_fixture};
use floodmaze::explorer::{ExploreError, Explorer};
use floodmaze::run_log::{Event, RunLog};
use floodmaze::save_state::SaveState;
use floodmaze::{Direction, FloodEngine, Mask, WallState};

#[test]
fn test_search_converges_on_reference_map() {
    let reference = load_fixture("reference_16.txt");
    let mut explorer = Explorer::new(reference).with_log(RunLog::new());

    let runs = explorer.search(20, 4096).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].steps, 110);
    assert_eq!(runs[1].steps, 76);
    assert_eq!(runs[1].target, explorer.map().start());
    assert_eq!(explorer.position(), explorer.map().start());

    // the closed field from the last check stays in the engine
    assert_eq!(explorer.engine().field().mask(), Mask::Closed);
    assert_eq!(explorer.engine().cost(explorer.map().start()), 76);
    assert_walls_consistent(explorer.map());

    let route = explorer.speed_run_route();
    assert_eq!(route.len(), 77);
    assert_eq!(route.first(), Some(&explorer.map().start()));
    assert_eq!(route.last(), Some(&explorer.map().goal()));

    let log = explorer.take_log().unwrap();
    let moves = log.events().iter().filter(|e| matches!(e.event, Event::Moved { .. })).count();
    assert_eq!(moves, 186);
    assert!(log.summary().contains("Speed run ready: true"));
}

#[test]
fn test_learned_walls_match_reference() {
    let reference = load_fixture("reference_16.txt");
    let mut explorer = Explorer::new(reference.clone());
    explorer.search(20, 4096).unwrap();

    let map = explorer.map();
    for cell in 0..map.cell_count() {
        for direction in Direction::ALL {
            let learned = map.wall(cell, direction);
            if learned != WallState::Unknown {
                assert_eq!(learned, reference.wall(cell, direction));
            }
        }
    }
    assert!(map.visited_count() < map.cell_count());
}

#[test]
fn test_speed_run_matches_reference_cost() {
    let reference = load_fixture("reference_16.txt");
    let mut full = FloodEngine::for_maze(&reference);
    full.flood(&reference, reference.goal(), Mask::Closed);

    let mut explorer = Explorer::new(reference.clone());
    explorer.search(20, 4096).unwrap();
    assert_eq!(explorer.engine().cost(explorer.map().start()), full.cost(reference.start()));
}

#[test]
fn test_run_limit() {
    let reference = load_fixture("reference_16.txt");
    let mut explorer = Explorer::new(reference);
    assert_eq!(explorer.search(0, 4096), Err(ExploreError::RunLimit(0)));
}

#[test]
fn test_learned_map_survives_snapshot() {
    let reference = load_fixture("small_4.txt");
    let mut explorer = Explorer::new(reference);
    explorer.search(10, 100).unwrap();

    let state = SaveState::from_maze(explorer.map());
    let restored = state.restore_maze().unwrap();
    assert_eq!(restored.wall_bytes(), explorer.map().wall_bytes());

    let mut engine = FloodEngine::for_maze(&restored);
    assert!(engine.speed_run_possible(&restored));
    assert_eq!(engine.cost(restored.start()), 2);
}
