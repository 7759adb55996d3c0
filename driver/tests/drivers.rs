use clap::Parser;
use driver::cli::{Cli, Command, EvaluateArgs, ExploreArgs, PolicyKind};
use driver::explore::SAMPLE_INTERVAL;
use image::AnimationDecoder;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn evaluate_args(args: &[&str]) -> EvaluateArgs {
    let argv = ["driver", "evaluate"].iter().chain(args);
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Evaluate(args) => args,
        Command::Explore(_) => unreachable!(),
    }
}

fn explore_args(args: &[&str]) -> ExploreArgs {
    let argv = ["driver", "explore"].iter().chain(args);
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Explore(args) => args,
        Command::Evaluate(_) => unreachable!(),
    }
}

fn small_settings(dir: &Path) -> String {
    let path = dir.join("settings.json");
    fs::write(&path, r#"{"width": 16, "height": 12, "semantic_sensor": true}"#).unwrap();
    path.display().to_string()
}

fn scene_root(dir: &Path, navmesh: bool) -> String {
    let root = dir.join("scenes");
    let scene = root.join("00001-abc");
    fs::create_dir_all(&scene).unwrap();
    fs::create_dir_all(root.join("notascene")).unwrap();
    if navmesh {
        fs::write(scene.join("abc.basis.navmesh"), b"navmesh").unwrap();
    }
    root.display().to_string()
}

#[test]
fn defaults_follow_documented_values() {
    let args = evaluate_args(&[]);
    assert_eq!(args.split, "val_mini");
    assert_eq!(args.max_steps, 100);
    assert_eq!(args.max_episode_steps, 3);
    assert_eq!(args.policy, PolicyKind::Constant);
    assert!(args.dataset.is_none());
    assert_eq!(args.datasets_dir, Path::new("data/datasets/objectnav/hm3d/v2"));
    assert_eq!(args.scenes_dir, Path::new("data/scene_datasets/hm3d_v0.2"));

    let args = explore_args(&[]);
    assert_eq!(args.scenes, Path::new("data/train/"));
    assert_eq!(args.output, Path::new("outputs"));
    assert_eq!(args.max_frames, 200);
    assert!(args.display() && args.make_video());

    let args = explore_args(&["--no-display", "--no-make-video", "--max-frames", "7"]);
    assert!(!args.display() && !args.make_video());
    assert_eq!(args.max_frames, 7);
}

#[test]
fn unknown_policy_is_rejected() {
    assert!(Cli::try_parse_from(["driver", "evaluate", "--policy", "greedy"]).is_err());
}

fn write_split(root: &Path, split: &str, file_name: &str, episodes: usize) {
    let dir = root.join(split);
    fs::create_dir_all(&dir).unwrap();
    let body: Vec<String> = (0..episodes)
        .map(|i| {
            format!(
                r#"{{"episode_id": "{split}-{i}", "scene_id": "hm3d/{split}/00800-TEEsavR23oF/TEEsavR23oF.basis.glb",
                    "object_category": "chair", "start_position": [0.0, 0.0, 0.0], "goal_position": [3.0, 0.0, 3.0]}}"#
            )
        })
        .collect();
    fs::write(dir.join(file_name), format!(r#"{{"episodes": [{}]}}"#, body.join(","))).unwrap();
}

#[test]
fn evaluate_runs_generated_episodes() {
    let dir = tempdir().unwrap();
    let settings = small_settings(dir.path());
    let datasets = dir.path().join("datasets");
    let args = evaluate_args(&[
        "--split",
        "definitely_missing_split",
        "--datasets-dir",
        datasets.to_str().unwrap(),
        "--episodes",
        "2",
        "--seed",
        "1",
        "--settings",
        &settings,
    ]);
    let summary = driver::evaluate::run(&args).unwrap();

    assert_eq!(summary.episodes, 2);
    assert_eq!(summary.total_steps, 6);
    assert_eq!(summary.successes, 0);
    assert!((summary.mean_reward - (-1.02)).abs() < 1e-9);
}

#[test]
fn evaluate_reads_dataset_files_with_random_policy() {
    let dir = tempdir().unwrap();
    let settings = small_settings(dir.path());
    let dataset = dir.path().join("val_mini.json");
    fs::write(
        &dataset,
        r#"{"episodes": [
            {"episode_id": "0", "scene_id": "hm3d/val/00800-TEEsavR23oF/TEEsavR23oF.basis.glb",
             "object_category": "chair", "start_position": [0.0, 0.0, 0.0], "goal_position": [2.0, 0.0, 2.0]},
            {"episode_id": "1", "scene_id": "hm3d/val/00800-TEEsavR23oF/TEEsavR23oF.basis.glb",
             "object_category": "bed", "start_position": [1.0, 0.0, 0.0], "goal_position": [-2.0, 0.0, 1.0]}
        ]}"#,
    )
    .unwrap();
    let args = evaluate_args(&[
        "--dataset",
        dataset.to_str().unwrap(),
        "--policy",
        "random",
        "--max-steps",
        "2",
        "--max-episode-steps",
        "10",
        "--no-shuffle",
        "--settings",
        &settings,
    ]);
    let summary = driver::evaluate::run(&args).unwrap();
    assert_eq!(summary.episodes, 2);
    assert_eq!(summary.total_steps, 4);
    assert!((summary.max_reward - (-0.02)).abs() < 1e-9);
}

#[test]
fn evaluate_loads_the_split_dataset() {
    let dir = tempdir().unwrap();
    let settings = small_settings(dir.path());
    let datasets = dir.path().join("datasets");
    write_split(&datasets, "val_seen", "val_seen.json", 3);
    write_split(&datasets, "val_unseen", "val_unseen.json", 1);

    let run_split = |split: &str| {
        let args = evaluate_args(&[
            "--split",
            split,
            "--datasets-dir",
            datasets.to_str().unwrap(),
            "--episodes",
            "5",
            "--max-steps",
            "1",
            "--max-episode-steps",
            "10",
            "--settings",
            &settings,
        ]);
        driver::evaluate::run(&args).unwrap()
    };
    let seen = run_split("val_seen");
    assert_eq!(seen.episodes, 3);
    assert_eq!(seen.total_steps, 3);
    let unseen = run_split("val_unseen");
    assert_eq!(unseen.episodes, 1);
    assert_eq!(unseen.total_steps, 1);
}

#[test]
fn evaluate_rejects_compressed_split_dataset() {
    let dir = tempdir().unwrap();
    let datasets = dir.path().join("datasets");
    fs::create_dir_all(datasets.join("val_mini")).unwrap();
    fs::write(datasets.join("val_mini").join("val_mini.json.gz"), b"\x1f\x8b").unwrap();

    let args = evaluate_args(&["--datasets-dir", datasets.to_str().unwrap()]);
    let err = driver::evaluate::run(&args).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to load dataset"));
    assert!(message.contains("compressed dataset"));
}

#[test]
fn evaluate_reports_missing_dataset() {
    let args = evaluate_args(&["--dataset", "/nonexistent/val.json"]);
    let err = driver::evaluate::run(&args).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load dataset"));
}

#[test]
fn explore_saves_samples_map_and_video() {
    let dir = tempdir().unwrap();
    let settings = small_settings(dir.path());
    let scenes = scene_root(dir.path(), true);
    let output = dir.path().join("outputs");
    let args = explore_args(&[
        "--scenes",
        &scenes,
        "--output",
        output.to_str().unwrap(),
        "--max-frames",
        "21",
        "--settings",
        &settings,
    ]);

    let reports = driver::explore::run(&args).unwrap();
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.scene, "00001-abc");
    assert_eq!(report.frames, 21);
    assert_eq!(report.samples.len(), 21 / SAMPLE_INTERVAL + 1);
    for sample in &report.samples {
        assert!(sample.rgb.exists());
        assert!(sample.semantic.as_ref().is_some_and(|p| p.exists()));
        assert!(sample.depth.as_ref().is_some_and(|p| p.exists()));
    }
    assert!(output.join("00001-abc").join("00001-abc-20-rgb.png").exists());
    assert!(report.top_down_map.as_ref().is_some_and(|p| p.exists()));

    let video = report.video.clone().unwrap();
    assert_eq!(video, output.join("00001-abc.gif"));
    let file = fs::File::open(video).unwrap();
    let decoder = image::codecs::gif::GifDecoder::new(std::io::BufReader::new(file)).unwrap();
    assert_eq!(decoder.into_frames().count(), 3);
}

#[test]
fn explore_without_display_or_video_writes_nothing() {
    let dir = tempdir().unwrap();
    let settings = small_settings(dir.path());
    let scenes = scene_root(dir.path(), true);
    let output = dir.path().join("outputs");
    let args = explore_args(&[
        "--scenes",
        &scenes,
        "--output",
        output.to_str().unwrap(),
        "--max-frames",
        "5",
        "--no-display",
        "--no-make-video",
        "--settings",
        &settings,
    ]);

    let reports = driver::explore::run(&args).unwrap();
    assert_eq!(reports[0].frames, 5);
    assert!(reports[0].samples.is_empty());
    assert!(reports[0].video.is_none());
    assert!(!output.exists());
}

#[test]
fn explore_fails_fast_on_missing_navmesh() {
    let dir = tempdir().unwrap();
    let scenes = scene_root(dir.path(), false);
    let output = dir.path().join("outputs");
    let args = explore_args(&["--scenes", &scenes, "--output", output.to_str().unwrap(), "--max-frames", "3"]);
    let err = driver::explore::run(&args).unwrap_err();
    assert!(format!("{err:#}").contains("NavMesh could not be loaded"));
    assert!(!output.exists());
}
