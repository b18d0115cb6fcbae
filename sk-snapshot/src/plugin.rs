//! Entry point for the scheduler's post-filter hook: when a pod can't be placed, record what the
//! cluster looked like so that a preemption strategy can be evaluated offline.
use std::path::PathBuf;

use chrono::Utc;
use sk_core::prelude::*;

use crate::builder::build_snapshot;
use crate::config::SnapshotConfig;
use crate::encoder::TabularEncoder;
use crate::view::ClusterViewProvider;

/// Name the post-filter hook registers under.
pub const PLUGIN_NAME: &str = "OptimizedPreemption";

/// Where a snapshot went and how complete it is.
#[derive(Debug)]
pub struct SnapshotReport {
    /// The file the table was written to.
    pub path: PathBuf,
    /// Number of bin rows.
    pub bins: usize,
    /// Number of item rows, including the unschedulable pod.
    pub items: usize,

    /// The snapshot was still written, but without any nodes.
    pub listing_error: Option<anyhow::Error>,

    /// Nodes that were left out of the table, see [`crate::BuildOutcome::skipped_nodes`].
    pub skipped_nodes: Vec<String>,
}

/// List the cluster, build the snapshot, and write it to the configured destination.  Only a
/// failure to build or write the table is an error; see `SnapshotReport::listing_error`.
#[instrument(skip_all, fields(pod = %pod.namespaced_name()))]
pub fn snapshot_cluster<P: ClusterViewProvider + ?Sized>(
    provider: &P,
    pod: &corev1::Pod,
    config: &SnapshotConfig,
) -> anyhow::Result<SnapshotReport> {
    let outcome = build_snapshot(provider, pod)?;
    let path = config.destination_for(pod, Utc::now());

    TabularEncoder::new(config.encode_mode).write_to_path(outcome.snapshot.records(), &path)?;

    let report = SnapshotReport {
        path,
        bins: outcome.snapshot.bins().count(),
        items: outcome.snapshot.items().count(),
        listing_error: outcome.listing_error,
        skipped_nodes: outcome.skipped_nodes,
    };
    info!("wrote {} bins and {} items to {}", report.bins, report.items, report.path.display());
    Ok(report)
}

/// Outcome of the post-filter hook.  The pod stays unschedulable: nothing is nominated or
/// preempted here, the snapshot is only for offline analysis.
#[derive(Debug, PartialEq, Eq)]
pub struct PostFilterStatus {
    /// Always empty.
    pub nominated_node_name: Option<String>,

    /// Where the snapshot was written, if it was.
    pub snapshot_path: Option<PathBuf>,
}

impl PostFilterStatus {
    /// Unschedulable, no nomination.
    pub const fn unschedulable(snapshot_path: Option<PathBuf>) -> PostFilterStatus {
        PostFilterStatus { nominated_node_name: None, snapshot_path }
    }

    /// True unless a node was nominated for the pod, which this hook never does.
    pub const fn is_unschedulable(&self) -> bool {
        self.nominated_node_name.is_none()
    }
}

/// Post-filter hook that snapshots the cluster whenever a pod can't be placed.
pub struct OptimizedPreemption<P> {
    provider: P,
    config: SnapshotConfig,
}

impl<P: ClusterViewProvider> OptimizedPreemption<P> {
    /// Snapshots `provider`'s cluster view according to `config`.
    pub fn new(provider: P, config: SnapshotConfig) -> OptimizedPreemption<P> {
        OptimizedPreemption { provider, config }
    }

    /// Always [`PLUGIN_NAME`].
    pub const fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// The settings every snapshot is written with.
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Never fails: a snapshot that can't be written is logged and otherwise ignored, so it never
    /// holds up the scheduling cycle.
    pub fn post_filter(&self, pod: &corev1::Pod) -> PostFilterStatus {
        let snapshot_path = match snapshot_cluster(&self.provider, pod, &self.config) {
            Ok(report) => {
                if let Some(err) = &report.listing_error {
                    warn!("snapshot for {} is missing cluster nodes: {err:#}", pod.namespaced_name());
                }
                Some(report.path)
            },
            Err(err) => {
                error!("could not snapshot cluster for {}: {err:#}", pod.namespaced_name());
                None
            },
        };

        PostFilterStatus::unschedulable(snapshot_path)
    }
}
