//! Scenario-based tests for kata-scaffold
//!
//! Every scenario runs against a `MockShell`, so no git, npm or tsc is needed.

mod helpers;

mod failure_handling;
mod lesson;
mod standalone;
