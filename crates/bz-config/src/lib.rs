//! Configuration and file management for bugzilla-operator
//!
//! This crate provides:
//! - Configuration file loading (TOML)
//! - Operator configuration (`OperatorConfig`): components, groups, releases,
//!   Slack channels and reporter schedules
//! - Transitive group expansion
//! - State and cache file paths

pub mod config_file;
pub mod groups;
pub mod operator_config;
pub mod paths;

pub use config_file::load_config_file;
pub use groups::expand_groups;
pub use operator_config::{
    BugzillaConfig, Component, OperatorConfig, ReleaseConfig, ReporterSchedule, SchedulesConfig,
    SlackConfig,
};
pub use paths::{cache_dir, state_file_path};
