use fogmap::{ExplorationGrid, GridBuilder, GridConfig, Point, SNAPSHOT_KEY};
use std::fs;

fn snapshot_path(dir: &std::path::Path) -> std::path::PathBuf {
    dir.join(format!("{SNAPSHOT_KEY}.json"))
}

/// Test 1: Explored cells survive a drop and reopen
#[test]
fn test_persist_and_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut grid = ExplorationGrid::open(dir.path()).expect("Failed to open grid");
    grid.reveal(&Point::new(5.0, 52.0));
    grid.reveal(&Point::new(5.001, 52.0));
    let len = grid.len();
    drop(grid);

    let grid = ExplorationGrid::open(dir.path()).expect("Failed to reopen grid");
    assert_eq!(grid.len(), len);
    assert!(grid.is_explored(&Point::new(5.0, 52.0)));
    assert!(grid.is_explored(&Point::new(5.001, 52.0)));
    assert!(!grid.is_explored(&Point::new(6.0, 53.0)));
}

/// Test 2: The chunk index is rebuilt on load; display queries work
/// immediately after reopen
#[test]
fn test_display_works_after_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut grid = ExplorationGrid::open(dir.path()).expect("Failed to open grid");
    for i in 0..10 {
        grid.reveal_with_min_move(&Point::new(5.0 + i as f64 * 0.001, 52.0), 0.0);
    }
    drop(grid);

    let grid = ExplorationGrid::open(dir.path()).expect("Failed to reopen grid");
    let (x, y) = fogmap::projection::project(&Point::new(5.005, 52.0));
    let viewport = fogmap::Rect::new((x - 2000.0, y - 2000.0), (x + 2000.0, y + 2000.0));
    let display = grid.display_cells(&viewport, 5.0, None);
    assert!(!display.cells.is_empty());
}

/// Test 3: A corrupted snapshot yields an empty grid, not an error
#[test]
fn test_corrupt_snapshot_fails_soft() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    fs::write(snapshot_path(dir.path()), b"{ definitely not json ]").unwrap();

    let grid = ExplorationGrid::open(dir.path()).expect("open must not fail on corrupt snapshot");
    assert!(grid.is_empty());
}

/// Test 4: A missing snapshot yields an empty grid
#[test]
fn test_missing_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let grid = ExplorationGrid::open(dir.path()).expect("Failed to open grid");
    assert!(grid.is_empty());
    assert_eq!(grid.chunk_count(), 0);
}

/// Test 5: The legacy unversioned array form is still readable
#[test]
fn test_legacy_snapshot_format() {
    let dir = tempfile::tempdir().unwrap();

    // Write cells in the pre-versioning layout: a bare JSON array of packed
    // keys, here (0,0), (0,1), and (1,0) packed as | x (32) | y (32) |
    let keys: Vec<i64> = vec![0, 1, 1 << 32];
    fs::write(
        snapshot_path(dir.path()),
        serde_json::to_vec(&keys).unwrap(),
    )
    .unwrap();

    let grid = ExplorationGrid::open(dir.path()).expect("Failed to open grid");
    assert_eq!(grid.len(), 3);
}

/// Test 6: After any new reveal, the snapshot on disk is rewritten in the
/// versioned format
#[test]
fn test_snapshot_upgraded_on_write() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(snapshot_path(dir.path()), b"[0, 1]").unwrap();

    let mut grid = ExplorationGrid::open(dir.path()).expect("Failed to open grid");
    assert_eq!(grid.len(), 2);
    grid.reveal(&Point::new(5.0, 52.0));

    let raw = fs::read(snapshot_path(dir.path())).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(value["version"], 1);
    // Legacy cells are carried forward alongside the new ones
    assert_eq!(value["cells"].as_array().unwrap().len(), grid.len());
}

/// Test 7: reset deletes the snapshot from disk
#[test]
fn test_reset_deletes_snapshot() {
    let dir = tempfile::tempdir().unwrap();

    let mut grid = ExplorationGrid::open(dir.path()).expect("Failed to open grid");
    grid.reveal(&Point::new(5.0, 52.0));
    assert!(snapshot_path(dir.path()).exists());

    grid.reset();
    assert!(!snapshot_path(dir.path()).exists());
    drop(grid);

    let grid = ExplorationGrid::open(dir.path()).expect("Failed to reopen grid");
    assert!(grid.is_empty());
}

/// Test 8: No reveal, no write: opening and querying leaves no file behind
#[test]
fn test_reads_do_not_write() {
    let dir = tempfile::tempdir().unwrap();

    let grid = ExplorationGrid::open(dir.path()).expect("Failed to open grid");
    let _ = grid.is_explored(&Point::new(5.0, 52.0));
    assert!(!snapshot_path(dir.path()).exists());
}

/// Test 9: Custom configuration persists state the same way
#[test]
fn test_persist_with_custom_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = GridConfig::default()
        .with_base_cell_meters(20.0)
        .with_chunk_size_cells(64);

    let mut grid = GridBuilder::new()
        .store_dir(dir.path())
        .config(config.clone())
        .build()
        .expect("Failed to build grid");
    grid.reveal(&Point::new(5.0, 52.0));
    let len = grid.len();
    drop(grid);

    let grid = GridBuilder::new()
        .store_dir(dir.path())
        .config(config)
        .build()
        .expect("Failed to rebuild grid");
    assert_eq!(grid.len(), len);
}
