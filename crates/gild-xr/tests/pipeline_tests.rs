use std::path::{Path, PathBuf};

use gild_core::PatchConfig;
use gild_fs::{FileSystem, MemoryFileSystem};
use gild_patch::{PatchPipeline, PatchSource};
use gild_xr::default_capabilities;
use serde_yaml::Value;

const CLAIM: &str = r#"apiVersion: example.org/v1alpha1
kind: Database
metadata:
  name: orders
  namespace: team-a
spec:
  engine: postgres
"#;

const XRD: &str = r#"apiVersion: apiextensions.crossplane.io/v1
kind: CompositeResourceDefinition
metadata:
  name: xdatabases.example.org
spec:
  group: example.org
  versions:
    - name: v1alpha1
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                size:
                  type: string
                  default: small
"#;

fn fs() -> MemoryFileSystem {
    MemoryFileSystem::new()
        .with_file("/inputs/claim/claim.yaml", CLAIM)
        .unwrap()
        .with_file("/inputs/xrd/xrd.yaml", XRD)
        .unwrap()
}

fn read(fs: &dyn FileSystem, path: &Path) -> Value {
    serde_yaml::from_slice(&fs.read(path).unwrap()).unwrap()
}

#[test]
fn claim_converted_defaulted_and_wired_to_secret() {
    let fs = fs();
    let caps = default_capabilities();
    let pipeline = PatchPipeline::new(&fs, &caps, "/patched");
    let config = PatchConfig {
        xrd: Some(PathBuf::from("/inputs/xrd/xrd.yaml")),
        connection_secret: Some(true),
        ..Default::default()
    };

    let patched = pipeline.run(&PatchSource::Claim(PathBuf::from("/inputs/claim/claim.yaml")), &config).unwrap();
    assert_eq!(patched, PathBuf::from("/patched/patched-xr.yaml"));

    let converted = read(&fs, Path::new("/patched/xr.yaml"));
    assert_eq!(converted["kind"].as_str(), Some("XDatabase"));
    assert!(converted["spec"].get("size").is_none());

    let xr = read(&fs, &patched);
    assert_eq!(xr["spec"]["engine"].as_str(), Some("postgres"));
    assert_eq!(xr["spec"]["size"].as_str(), Some("small"));
    assert_eq!(xr["spec"]["writeConnectionSecretToRef"]["name"].as_str(), Some("orders-connection"));
    assert_eq!(xr["spec"]["writeConnectionSecretToRef"]["namespace"].as_str(), Some("crossplane-system"));
    assert_eq!(xr["spec"]["claimRef"]["namespace"].as_str(), Some("team-a"));
}

#[test]
fn xr_with_mismatched_xrd_fails_in_default_phase() {
    let fs = fs()
        .with_file("/inputs/xr/xr.yaml", "apiVersion: other.org/v1\nkind: XThing\nmetadata:\n  name: t\n")
        .unwrap();
    let caps = default_capabilities();
    let config = PatchConfig { xrd: Some(PathBuf::from("/inputs/xrd/xrd.yaml")), ..Default::default() };

    let err = PatchPipeline::new(&fs, &caps, "/patched")
        .run(&PatchSource::Xr(PathBuf::from("/inputs/xr/xr.yaml")), &config)
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("default: failed to apply XRD defaults: "), "{msg}");
    assert!(!fs.exists(Path::new("/patched/patched-xr.yaml")));
}

#[test]
fn disabled_secret_with_name_is_accepted_and_ignored() {
    let fs = fs();
    let caps = default_capabilities();
    let config = PatchConfig {
        connection_secret: Some(false),
        connection_secret_name: "ignored".into(),
        ..Default::default()
    };

    let patched = PatchPipeline::new(&fs, &caps, "/patched")
        .run(&PatchSource::Claim(PathBuf::from("/inputs/claim/claim.yaml")), &config)
        .unwrap();
    let xr = read(&fs, &patched);
    assert!(xr["spec"].get("writeConnectionSecretToRef").is_none());
}
