// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Snapshot delivery with a bounded backlog
//!
//! Offers never block. When the consumer is behind and the backlog is full,
//! the offered snapshot is dropped and the simulation keeps going.

use super::Snapshot;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

/// Result of offering a snapshot to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Backlog full; the snapshot was discarded
    Dropped,
    /// The consumer is gone; the run should stop
    Closed,
}

/// Non-blocking consumer of snapshots
pub trait SnapshotSink {
    fn offer(&mut self, snapshot: Snapshot) -> Delivery;
}

impl SnapshotSink for SyncSender<Snapshot> {
    fn offer(&mut self, snapshot: Snapshot) -> Delivery {
        match self.try_send(snapshot) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(_)) => Delivery::Dropped,
            Err(TrySendError::Disconnected(_)) => Delivery::Closed,
        }
    }
}

/// Bounded snapshot channel holding at most `backlog` undelivered snapshots
pub fn snapshot_channel(backlog: usize) -> (SyncSender<Snapshot>, Receiver<Snapshot>) {
    sync_channel(backlog.max(1))
}

/// Keeps the first `limit` snapshots, then reports the sink closed
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    limit: usize,
    snapshots: Vec<Snapshot>,
}

impl CollectingSink {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            snapshots: Vec::with_capacity(limit),
        }
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }
}

impl SnapshotSink for CollectingSink {
    fn offer(&mut self, snapshot: Snapshot) -> Delivery {
        if self.snapshots.len() >= self.limit {
            return Delivery::Closed;
        }
        self.snapshots.push(snapshot);
        Delivery::Delivered
    }
}
