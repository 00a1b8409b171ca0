//! ---
//! drc_section: "11-simulation"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "In-memory capability doubles for simulation and tests."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
//! In-memory implementations of the three control-step capabilities.
//!
//! Simulation mode and the scenario tests run the real orchestrator against
//! these doubles instead of live infrastructure. Each double can inject a
//! transport failure to exercise the escalation path.

pub mod control;
pub mod notifier;
pub mod query;

pub use control::{Capacity, InMemoryPoolControl};
pub use notifier::RecordingNotifier;
pub use query::StaticPoolQuery;
