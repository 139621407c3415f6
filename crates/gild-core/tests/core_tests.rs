use std::path::PathBuf;

use gild_core::{AssertionKind, AssertionResult, AssertionSpec, PatchConfig, PatchConfigError, RenderOutputs, Status};

const UNSET_MSG: &str = "connection-secret must be set to true when using connection-secret-name or connection-secret-namespace";

fn patches(secret: Option<bool>, name: &str, namespace: &str) -> PatchConfig {
    PatchConfig {
        xrd: None,
        connection_secret: secret,
        connection_secret_name: name.to_string(),
        connection_secret_namespace: namespace.to_string(),
    }
}

#[test]
fn test_patch_config_validation_table() {
    let cases = [
        ("no connection secret fields", patches(None, "", ""), true),
        ("explicit true with name", patches(Some(true), "my-secret", ""), true),
        ("name without connection-secret", patches(None, "my-secret", ""), false),
        ("namespace without connection-secret", patches(None, "", "my-namespace"), false),
        ("both without connection-secret", patches(None, "my-secret", "my-namespace"), false),
        ("false with name", patches(Some(false), "my-secret", ""), true),
        ("false with namespace", patches(Some(false), "", "my-namespace"), true),
        ("false with both", patches(Some(false), "my-secret", "my-namespace"), true),
        ("true with both", patches(Some(true), "my-secret", "my-namespace"), true),
    ];

    for (name, cfg, ok) in cases {
        let res = cfg.validate();
        if ok {
            assert!(res.is_ok(), "{name}: expected valid, got {res:?}");
        } else {
            let err = res.unwrap_err();
            assert_eq!(err, PatchConfigError::ConnectionSecretUnset, "{name}");
            assert_eq!(err.to_string(), UNSET_MSG);
        }
    }
}

#[test]
fn test_has_connection_secret_only_when_true() {
    assert!(patches(Some(true), "", "").has_connection_secret());
    assert!(!patches(Some(false), "s", "ns").has_connection_secret());
    assert!(!patches(None, "", "").has_connection_secret());
}

#[test]
fn test_patch_config_is_empty() {
    assert!(PatchConfig::default().is_empty());
    assert!(!patches(Some(false), "", "").is_empty());
    let with_xrd = PatchConfig { xrd: Some(PathBuf::from("xrd.yaml")), ..PatchConfig::default() };
    assert!(!with_xrd.is_empty());
}

#[test]
fn test_patch_config_reads_kebab_case_keys() {
    let yaml = "xrd: xrd.yaml\nconnection-secret: true\nconnection-secret-name: db\nconnection-secret-namespace: infra\n";
    let cfg: PatchConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.xrd, Some(PathBuf::from("xrd.yaml")));
    assert_eq!(cfg.connection_secret, Some(true));
    assert_eq!(cfg.connection_secret_name, "db");
    assert_eq!(cfg.connection_secret_namespace, "infra");
}

#[test]
fn test_render_outputs_record() {
    let yaml = "render: /out/render.yaml\nrendered:\n  Pod/foo: /out/Pod_foo.yaml\n";
    let outputs: RenderOutputs = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(outputs.render, PathBuf::from("/out/render.yaml"));
    assert_eq!(outputs.rendered.get("Pod/foo"), Some(&PathBuf::from("/out/Pod_foo.yaml")));
}

#[test]
fn test_empty_selector_means_full_render() {
    let spec = AssertionSpec::new("full", "golden.yaml", AssertionKind::ByteExact).with_resource("");
    assert_eq!(spec.selector(), None);
    let spec = spec.with_resource("Pod/foo");
    assert_eq!(spec.selector(), Some("Pod/foo"));
}

#[test]
fn test_result_constructors() {
    assert_eq!(AssertionResult::pass("a", "files match").status, Status::Pass);
    assert_eq!(AssertionResult::fail("a", "diff").status, Status::Fail);
    let err = AssertionResult::error("a", "boom");
    assert_eq!(err.status, Status::Error);
    assert_eq!(err.message, "boom");
}
