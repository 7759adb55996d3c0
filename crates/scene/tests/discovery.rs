use scene::{scene_loader, NavMesh, SceneAssets, SceneError};
use std::fs;
use tempfile::tempdir;

#[test]
fn one_descriptor_per_prefixed_folder() {
    let root = tempdir().unwrap();
    for folder in ["00002-bbb", "00001-aaa", "00003-ccc"] {
        fs::create_dir(root.path().join(folder)).unwrap();
    }
    fs::write(root.path().join("README.txt"), "not a scene").unwrap();

    let scenes = scene_loader(root.path()).unwrap();
    let ids: Vec<&str> = scenes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["aaa", "bbb", "ccc"]);

    let first = &scenes[0];
    assert_eq!(first.folder, "00001-aaa");
    assert_eq!(first.glb, root.path().join("00001-aaa").join("aaa.glb"));
    assert_eq!(first.basis_glb, root.path().join("00001-aaa").join("aaa.basis.glb"));
    assert_eq!(first.navmesh, root.path().join("00001-aaa").join("aaa.basis.navmesh"));
}

#[test]
fn paths_are_derived_without_checking_files() {
    let root = tempdir().unwrap();
    fs::create_dir(root.path().join("00010-empty")).unwrap();
    let scenes = scene_loader(root.path()).unwrap();
    assert_eq!(scenes.len(), 1);
    assert!(!scenes[0].glb.exists());
}

#[test]
fn folders_without_id_are_skipped() {
    let root = tempdir().unwrap();
    fs::create_dir(root.path().join("scratch")).unwrap();
    fs::create_dir(root.path().join("trailing-")).unwrap();
    fs::create_dir(root.path().join("00004-ddd")).unwrap();
    let scenes = scene_loader(root.path()).unwrap();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].id, "ddd");
}

#[test]
fn id_is_second_dash_segment() {
    let assets = SceneAssets::from_folder("root".as_ref(), "00005-abc-extra").unwrap();
    assert_eq!(assets.id, "abc");
}

#[test]
fn missing_root_is_an_io_error() {
    let root = tempdir().unwrap();
    let err = scene_loader(root.path().join("missing")).unwrap_err();
    assert!(matches!(err, SceneError::Io { .. }));
}

#[test]
fn navmesh_load_fails_fast() {
    let root = tempdir().unwrap();
    let missing = root.path().join("x.basis.navmesh");
    assert!(matches!(NavMesh::load(&missing), Err(SceneError::AssetLoadFailure { .. })));

    let empty = root.path().join("empty.navmesh");
    fs::write(&empty, b"").unwrap();
    assert!(matches!(NavMesh::load(&empty), Err(SceneError::AssetLoadFailure { .. })));

    let good = root.path().join("good.navmesh");
    fs::write(&good, b"NAVM\x01").unwrap();
    let mesh = NavMesh::load(&good).unwrap();
    assert_eq!(mesh.len(), 5);
    assert_eq!(mesh.path(), good.as_path());
}
