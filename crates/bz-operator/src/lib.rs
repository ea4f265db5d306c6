//! Bugzilla triage operator
//!
//! Periodically searches Bugzilla, classifies the results against the triage,
//! blocker and escalation rules, and posts per-person and per-channel
//! notifications to Slack.
//!
//! The rule engine (`classify`, `escalation`, `per_person`, `watermark`) is
//! pure and synchronous; the reporters in `reporters` wire it to the
//! `BugzillaClient`, `ChannelClient` and `StateStore` seams held by a
//! `ControllerContext`.

pub mod bugutil;
pub mod classify;
pub mod context;
pub mod error;
pub mod escalation;
pub mod logger;
pub mod per_person;
pub mod query;
pub mod recorder;
pub mod report;
pub mod reporters;
pub mod rules;
pub mod scheduler;
pub mod slack;
pub mod store;
pub mod watermark;

pub use context::ControllerContext;
pub use error::SyncError;
