//! agentbench: benchmark orchestration for browser-automation agents.
//!
//! Drives an external coding agent through browser tasks, verifies the
//! resulting browser state over a correlated WebSocket protocol, persists
//! per-run metrics in SQLite, and mines recurring failures into prioritized
//! improvement tasks.
//!
//! Layered hexagonally: `domain` holds models and ports, `adapters` and
//! `infrastructure` implement the ports, `application` runs the scenario
//! state machine, `services` aggregate and analyze results, `scenarios` is
//! the static catalog, and `cli` is the outer surface.

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod scenarios;
pub mod services;
