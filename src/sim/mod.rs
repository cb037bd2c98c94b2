// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Simulation driver and snapshot delivery

mod driver;
mod sink;
mod snapshot;

pub use driver::{RunSummary, Simulation, StepReport};
pub use sink::{snapshot_channel, CollectingSink, Delivery, SnapshotSink};
pub use snapshot::Snapshot;
