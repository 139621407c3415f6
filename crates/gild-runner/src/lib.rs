pub mod config;
pub mod manifest;
pub mod render;
pub mod report;
pub mod runner;
pub mod staging;

pub use config::*;
pub use manifest::*;
pub use render::*;
pub use report::*;
pub use runner::*;
pub use staging::*;

#[cfg(test)]
mod fixture_tests {
    use super::*;
    use gild_fs::{FileSystem, OsFileSystem};
    use std::path::Path;

    fn basic() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/suites/basic")
    }

    #[test]
    fn basic_suite_passes_against_recorded_render() {
        let out = tempfile::tempdir().unwrap();
        let outputs = PrerenderedOutputs::load(&OsFileSystem, &basic().join("recorded/outputs.yaml")).unwrap();
        let runner = Runner::new(
            Box::new(OsFileSystem),
            Box::new(outputs),
            RunOptions { output_root: out.path().to_path_buf(), keep: true, colorize: false },
        );

        let report = runner.run_suite(&basic().join("suite.yaml")).unwrap();
        assert!(!report.failed(), "{}", format_report(&report));
        assert_eq!(report.counts(), (2, 0, 0));

        let patched = report.run_dir.join("bucket-with-secret/patched/patched-xr.yaml");
        let xr: serde_yaml::Value = serde_yaml::from_slice(&OsFileSystem.read(&patched).unwrap()).unwrap();
        assert_eq!(xr["spec"]["writeConnectionSecretToRef"]["name"].as_str(), Some("assets-creds"));
        assert_eq!(xr["spec"]["writeConnectionSecretToRef"]["namespace"].as_str(), Some("crossplane-system"));
    }
}
