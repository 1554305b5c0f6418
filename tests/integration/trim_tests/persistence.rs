use flyer_trim::components::VariableSpec;
use flyer_trim::{run_trim, ModelHandle, TrimBundle, Variant};
use tempfile::tempdir;

use crate::common::{level_request, CountingModel, RigidUav};

#[test]
fn test_trim_persisted_as_yaml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records").join("cruise.yaml");
    let request = level_request(Variant::RigidA).with_output(path.clone());

    let model = ModelHandle::new(CountingModel::new());
    let response = run_trim(&request, &model, &RigidUav::new(Variant::RigidA)).unwrap();

    assert_eq!(response.persisted_to.as_deref(), Some(path.as_path()));
    let contents = std::fs::read_to_string(&path).unwrap();
    let record: serde_yaml::Value = serde_yaml::from_str(&contents).unwrap();

    assert_eq!(record["name"].as_str(), Some("cruise"));
    assert!(record["id"].as_str().is_some());
    assert!(record["created_at"].as_str().is_some());
    assert_eq!(record["solution"]["diagnostics"]["converged"].as_bool(), Some(true));
    assert!(!record["normalized_target"].is_null());
    assert!(!record["problem"].is_null());
}

#[test]
fn test_trim_persisted_as_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cruise.json");
    let request = level_request(Variant::RigidA).with_output(path.clone());

    let model = ModelHandle::new(CountingModel::new());
    run_trim(&request, &model, &RigidUav::new(Variant::RigidA)).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let record: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(record["name"], "cruise");
    assert_eq!(record["solution"]["variant"], "Rigid-A");

    let components: Vec<VariableSpec> = record["problem"]["states"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|block| block["components"].as_array().unwrap().clone())
        .map(|component| serde_json::from_value(component).unwrap())
        .collect();
    assert!(components.iter().any(|spec| spec.lower == f64::NEG_INFINITY));
    assert!(components.iter().any(|spec| spec.upper == f64::INFINITY));
    assert!(components.iter().all(|spec| !spec.lower.is_nan() && !spec.upper.is_nan()));
}

#[test]
fn test_bundle_reloads_as_prior() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bundle.yaml");

    let model = ModelHandle::new(CountingModel::new());
    let response = run_trim(
        &level_request(Variant::RigidA),
        &model,
        &RigidUav::new(Variant::RigidA),
    )
    .unwrap();
    std::fs::write(&path, serde_yaml::to_string(&response.bundle).unwrap()).unwrap();

    let reloaded = TrimBundle::from_file(&path).unwrap();
    assert_eq!(reloaded, response.bundle);
}
