//! # gordo-core
//!
//! The scanning engine: target resolution, the bounded connect scanner, the passive
//! packet correlator and the reconciliation of both into one report.
//!
//! * [`resolver`] turns user input into a [`Target`](gordo_common::network::target::Target).
//! * [`scanner`] runs one connect probe per port under a concurrency bound.
//! * [`capture`] watches traffic from the target and tallies post-handshake segments.
//! * [`report`] merges open ports and tallies into a [`ScanReport`](report::ScanReport).
//! * [`engine`] wires the above together in the right order.

pub mod capture;
pub mod engine;
pub mod report;
pub mod resolver;
pub mod scanner;
