//! Full run including the write stage, checked against the files on disk.

use oikumene_core::{
    metadata::GenerationMetadata,
    output::{COSTMAP_BIN_FILE, COSTMAP_PNG_FILE, METADATA_FILE, ROUTES_FILE, SYSTEMS_DIR},
    routes::Route,
    systems::StarSystem,
    GenError, GeneratorConfig, Pipeline, RunReport,
};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("oikumene-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The integration-test-seed scenario at the default galaxy geometry.
fn default_geometry_config(output: &PathBuf) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.galaxy.max_stars = Some(50);
    config.oikumene.target_count = 5;
    config.output = output.display().to_string();
    config
}

/// Same scenario on a small map.
fn scenario_config(output: &PathBuf) -> GeneratorConfig {
    let mut config = default_geometry_config(output);
    config.galaxy.size = [600.0, 600.0];
    config
}

async fn run_scenario(config: GeneratorConfig) -> RunReport {
    init_logging();
    Pipeline::new("integration-test-seed", config)
        .unwrap()
        .run()
        .await
        .expect("run succeeds")
}

#[tokio::test]
async fn integration_seed_writes_consistent_output() {
    let dir = scratch_dir("e2e");
    let report = run_scenario(scenario_config(&dir)).await;
    assert_output_matches_report(&dir, &report);
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn integration_seed_at_default_geometry() {
    let dir = scratch_dir("e2e-default");
    let report = run_scenario(default_geometry_config(&dir)).await;
    assert_eq!(report.metadata.config.galaxy.size, [4000.0, 4000.0]);
    assert_output_matches_report(&dir, &report);
    let _ = fs::remove_dir_all(&dir);
}

fn assert_output_matches_report(dir: &PathBuf, report: &RunReport) {
    let stats = &report.galaxy.stats;
    assert_eq!(stats.total_systems, report.galaxy.coordinates.len());
    assert!(stats.total_systems <= 50);
    assert!(stats.oikumene_systems <= 5);
    assert_eq!(report.galaxy.stage_timings.len(), 7);

    // One file per system, named by id.
    let system_files: Vec<_> = fs::read_dir(dir.join(SYSTEMS_DIR))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(system_files.len(), stats.total_systems);
    for system in &report.galaxy.systems {
        let path = dir.join(SYSTEMS_DIR).join(format!("{}.json", system.id));
        let on_disk: StarSystem = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(&on_disk, system);
    }

    // costmap.bin matches the header in metadata.json.
    let metadata: GenerationMetadata =
        serde_json::from_slice(&fs::read(dir.join(METADATA_FILE)).unwrap()).unwrap();
    let bin = fs::read(dir.join(COSTMAP_BIN_FILE)).unwrap();
    assert_eq!(bin.len(), metadata.cost_map.width * metadata.cost_map.height);
    assert_eq!(metadata.seed, "integration-test-seed");
    assert_eq!(&metadata.stats, stats);

    let png = fs::read(dir.join(COSTMAP_PNG_FILE)).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let routes: Vec<Route> = serde_json::from_slice(&fs::read(dir.join(ROUTES_FILE)).unwrap()).unwrap();
    assert_eq!(routes.len(), metadata.stats.oikumene_routes);
    assert_eq!(report.files_written, stats.total_systems + 4);
}

#[tokio::test]
async fn unwritable_output_fails_stage_seven() {
    let dir = scratch_dir("blocked");
    fs::create_dir_all(dir.parent().unwrap()).unwrap();
    // A regular file where the output directory should go.
    fs::write(&dir, b"not a directory").unwrap();
    init_logging();

    let err = Pipeline::new("blocked-output", scenario_config(&dir))
        .unwrap()
        .run()
        .await
        .unwrap_err();

    match &err {
        GenError::Stage { number, name, .. } => {
            assert_eq!(*number, 7);
            assert_eq!(*name, "Write output files");
        }
        other => panic!("expected stage failure, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);

    let _ = fs::remove_file(&dir);
}
