use settings::{make_cfg, make_simple_cfg, SensorType, SettingsError, SimSettings, TaskConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn defaults_match_navigation_setup() {
    let s = SimSettings::default();
    assert_eq!((s.width, s.height), (512, 512));
    assert_eq!(s.sensor_height, 1.5);
    assert_eq!(s.seed, 2);
    assert!(!s.enable_physics);
    assert_eq!(s.action_space.forward, 0.25);
    assert_eq!(s.action_space.left, 30.0);
    assert_eq!(s.action_space.right, 30.0);
}

#[test]
fn partial_file_keeps_defaults() {
    let s = SimSettings::from_path("tests/data/low_res.json").unwrap();
    assert_eq!((s.width, s.height), (128, 96));
    assert!(s.semantic_sensor);
    assert_eq!(s.action_space.forward, 0.5);
    assert_eq!(s.action_space.left, 30.0);
    assert_eq!(s.sensor_height, 1.5);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(matches!(SimSettings::from_str(r#"{"width": 0}"#), Err(SettingsError::Invalid(_))));
    assert!(matches!(
        SimSettings::from_str(r#"{"sensor_height": -1.0}"#),
        Err(SettingsError::Invalid(_))
    ));
    assert!(matches!(
        SimSettings::from_str(r#"{"action_space": {"left": 0.0}}"#),
        Err(SettingsError::Invalid(_))
    ));
    assert!(matches!(SimSettings::from_str("{"), Err(SettingsError::Parse(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = SimSettings::from_path("tests/data/nope.json").unwrap_err();
    assert!(matches!(err, SettingsError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn full_config_follows_sensor_toggles() {
    let settings = SimSettings::for_scene("scene.glb");
    let cfg = make_cfg(&settings);
    assert_eq!(cfg.sim.scene_id, "scene.glb");
    let agent = cfg.agent(0).unwrap();
    let kinds: Vec<SensorType> = agent.sensor_specifications.iter().map(|s| s.sensor_type).collect();
    assert_eq!(kinds, [SensorType::Color, SensorType::Depth]);
    assert_eq!(agent.action_names(), ["move_forward", "turn_left", "turn_right"]);
    assert_eq!(agent.action_space["move_forward"].amount, 0.25);
}

#[test]
fn simple_config_has_one_color_sensor() {
    let settings = SimSettings { depth_sensor: true, semantic_sensor: true, ..SimSettings::for_scene("s.glb") };
    let cfg = make_simple_cfg(&settings);
    let agent = cfg.agent(0).unwrap();
    assert_eq!(agent.sensor_specifications.len(), 1);
    assert!(agent.sensor("color_sensor").is_some());
}

#[test]
fn task_config_paths_follow_split() {
    let task = TaskConfig::new("val_mini");
    assert_eq!(
        task.data_path,
        PathBuf::from("data/datasets/objectnav/hm3d/v2/val_mini/val_mini.json.gz")
    );
    assert_eq!(task.max_episode_steps, 3);
    assert!(task.shuffle);
    assert!(task.validate().is_ok());
    assert!(task.with_max_episode_steps(0).validate().is_err());
}

#[test]
fn split_dataset_is_found_under_the_datasets_dir() {
    let dir = tempdir().unwrap();
    let task = TaskConfig::new("val_seen").with_datasets_dir(dir.path());
    assert_eq!(task.data_path, dir.path().join("val_seen").join("val_seen.json.gz"));
    assert_eq!(task.existing_dataset(), None);

    fs::create_dir_all(dir.path().join("val_seen")).unwrap();
    fs::write(&task.data_path, b"gz").unwrap();
    assert_eq!(task.existing_dataset(), Some(task.data_path.clone()));

    let plain = dir.path().join("val_seen").join("val_seen.json");
    fs::write(&plain, b"{}").unwrap();
    assert_eq!(task.existing_dataset(), Some(plain));
}

#[test]
fn scene_ids_resolve_against_the_scenes_dir() {
    let task = TaskConfig::default();
    assert_eq!(
        task.scene_path("hm3d/val/00800-TEEsavR23oF/TEEsavR23oF.basis.glb"),
        PathBuf::from("data/scene_datasets/hm3d_v0.2/hm3d/val/00800-TEEsavR23oF/TEEsavR23oF.basis.glb")
    );
    let task = task.with_scenes_dir("/scenes");
    assert_eq!(task.scene_path("a/b.glb"), PathBuf::from("/scenes/a/b.glb"));
}
