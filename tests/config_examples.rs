//! ---
//! drc_section: "15-testing-qa-runbook"
//! drc_subsection: "integration-tests"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Validation of the shipped example configuration files."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use std::fs;
use std::path::Path;

use r_drc_common::config::{DrcConfig, Mode};

fn read(path: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let full = Path::new(manifest_dir).join("..").join(path);
    fs::read_to_string(&full)
        .unwrap_or_else(|err| panic!("failed to read {}: {}", full.display(), err))
}

#[test]
fn production_example_parses_and_validates() {
    let config: DrcConfig = read("configs/example.prod.toml")
        .parse()
        .expect("production example must validate");
    assert_eq!(config.mode, Mode::Production);
    assert_ne!(config.primary.name, config.standby.name);
    assert!(config
        .services
        .pool_endpoints
        .contains_key(&config.primary.region));
    assert!(config
        .services
        .pool_endpoints
        .contains_key(&config.standby.region));
}

#[test]
fn simulation_example_parses_and_validates() {
    let config: DrcConfig = read("configs/example.sim.toml")
        .parse()
        .expect("simulation example must validate");
    assert!(config.mode.is_simulation());
    assert!(!config.notification.channel.is_empty());
}
