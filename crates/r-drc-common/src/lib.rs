//! ---
//! drc_section: "01-core-functionality"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Shared primitives and utilities for the controller runtime."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
//! Core shared primitives for the R-DRC controller workspace.
//! This crate exposes configuration loading and logging bootstrap
//! utilities consumed across the workspace.

pub mod config;
pub mod logging;

pub use config::{
    DrcConfig, LoadedDrcConfig, LoggingConfig, MetricsConfig, Mode, NotificationConfig,
    PoolConfig, ServiceConfig, SimulationConfig,
};
pub use logging::{init_tracing, LogFormat};
