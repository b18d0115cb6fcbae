#![warn(missing_docs)]

//! # sk-snapshot – cluster-state snapshots for preemption analysis
//!
//! When the scheduler gives up on a pod and starts thinking about preemption, we capture every
//! node ("bin") and every pod placed on it ("item"), plus the pod that could not be placed, and
//! write them out as a fixed-schema CSV table for offline bin-packing and preemption tools.
//!
//! ## Pipeline overview
//! 1. Listing ([`view::ClusterViewProvider`]) – obtain the nodes and the pods assigned to them.
//! 2. Resource accounting ([`resources::compute_pod_resource_request`]) – the effective memory and
//!    CPU request of each pod, from its containers, init containers, and overhead.
//! 3. Building ([`builder::build_snapshot`]) – number the bins and items in traversal order and
//!    append the unschedulable pod with `where = 0`.
//! 4. Encoding ([`encoder::TabularEncoder`]) – render and persist the table.
//!
//! [`plugin::snapshot_cluster`] runs all four steps synchronously on the calling thread; the
//! [`plugin::OptimizedPreemption`] hook wraps it so that a failure is logged but never fails the
//! scheduling cycle.

pub mod builder;
pub mod config;
pub mod encoder;
pub mod model;
pub mod plugin;
pub mod resources;
pub mod view;

pub use builder::{
    build_snapshot,
    BuildOutcome,
    SnapshotBuilder,
};
pub use config::SnapshotConfig;
pub use encoder::{
    EncodeMode,
    TabularEncoder,
};
pub use model::{
    Bin,
    Item,
    Record,
    Snapshot,
};
pub use plugin::{
    snapshot_cluster,
    OptimizedPreemption,
    PostFilterStatus,
    SnapshotReport,
};
pub use view::{
    ClusterView,
    ClusterViewProvider,
    NodeInfo,
};

#[cfg(test)]
mod tests;
