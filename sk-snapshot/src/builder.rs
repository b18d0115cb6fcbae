//! Numbering of bins and items in cluster traversal order.
use sk_core::prelude::*;

use crate::model::{
    Bin,
    Item,
    Record,
    Snapshot,
    UNPLACED_BIN,
};
use crate::resources::{
    compute_pod_resource_request,
    Resources,
};
use crate::view::{
    ClusterViewProvider,
    NodeInfo,
};

// Kubernetes resolves pods with no PriorityClass (and no global default) to zero.
const DEFAULT_PRIORITY: i32 = 0;

/// Assigns bin and item indices in traversal order.  Bins are numbered from 1 so that
/// `UNPLACED_BIN` never collides with a real node.
#[derive(Debug)]
pub struct SnapshotBuilder {
    records: Vec<Record>,
    next_bin: usize,
    next_item: usize,
}

/// What [`build_snapshot`] produced, along with anything that was left out of it.
pub struct BuildOutcome {
    /// The recorded bins and items, ending with the unschedulable pod.
    pub snapshot: Snapshot,

    /// Set when the cluster view could not be listed; the snapshot then only holds the
    /// unschedulable pod.
    pub listing_error: Option<anyhow::Error>,

    /// Nodes left out because they (or one of their pods) could not be converted.
    pub skipped_nodes: Vec<String>,
}

impl SnapshotBuilder {
    /// An empty builder; the first bin added gets index 1 and the first item index 0.
    pub fn new() -> SnapshotBuilder {
        SnapshotBuilder { records: vec![], next_bin: 1, next_item: 0 }
    }

    /// Adds a bin for the node and one item per pod on it.  Nothing is recorded if any of the
    /// pods can't be converted.
    pub fn add_node(&mut self, info: &NodeInfo) -> EmptyResult {
        let bin_index = self.next_bin;
        let bin = build_bin(bin_index, &info.node).with_context(|| format!("node {}", info.node.name_any()))?;

        let mut items = Vec::with_capacity(info.pods.len());
        for (offset, pod) in info.pods.iter().enumerate() {
            let item =
                build_item(self.next_item + offset, bin_index, pod).with_context(|| format!("pod {}", pod.namespaced_name()))?;
            items.push(Record::Item(item));
        }

        debug!(bin = bin_index, pods = items.len(), "recorded node {}", info.node.name_any());
        self.next_bin += 1;
        self.next_item += items.len();
        self.records.push(Record::Bin(bin));
        self.records.extend(items);
        Ok(())
    }

    /// Appends the unschedulable pod as the last item, with `bin = 0`, and returns the records.
    pub fn finish(mut self, unschedulable: &corev1::Pod) -> anyhow::Result<Snapshot> {
        let item = build_item(self.next_item, UNPLACED_BIN, unschedulable)
            .with_context(|| format!("unschedulable pod {}", unschedulable.namespaced_name()))?;
        self.records.push(Record::Item(item));
        Ok(Snapshot::new(self.records))
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks the cluster view and records every bin and item, followed by the unschedulable pod.
/// Failing to list the cluster is not fatal: the error is handed back alongside a snapshot that
/// only contains the unschedulable pod.  A node that can't be converted is skipped whole, and the
/// remaining bins stay densely numbered.  Only an unschedulable pod that can't be converted fails
/// the build.
#[instrument(skip_all, fields(pod = %unschedulable.namespaced_name()))]
pub fn build_snapshot<P: ClusterViewProvider + ?Sized>(
    provider: &P,
    unschedulable: &corev1::Pod,
) -> anyhow::Result<BuildOutcome> {
    let mut builder = SnapshotBuilder::new();
    let mut skipped_nodes = vec![];
    let listing_error = match provider.list_nodes() {
        Ok(nodes) => {
            for info in &nodes {
                if let Err(err) = builder.add_node(info) {
                    warn!("leaving node {} out of the snapshot: {err:#}", info.node.name_any());
                    skipped_nodes.push(info.node.name_any());
                }
            }
            None
        },
        Err(err) => {
            warn!("could not list cluster nodes, snapshot will only contain the unschedulable pod: {err:#}");
            Some(err)
        },
    };

    let snapshot = builder.finish(unschedulable)?;
    Ok(BuildOutcome { snapshot, listing_error, skipped_nodes })
}

fn build_bin(index: usize, node: &corev1::Node) -> anyhow::Result<Bin> {
    let allocatable = match node.status.as_ref().and_then(|s| s.allocatable.as_ref()) {
        Some(list) => Resources::from_resource_list(list).context("invalid allocatable resources")?,
        None => Resources::default(),
    };

    Ok(Bin {
        index,
        memory: allocatable.memory,
        milli_cpu: allocatable.milli_cpu,
        labels: node.labels().iter().map(|(k, v)| format!("{k}={v}")).collect(),
    })
}

fn build_item(index: usize, bin: usize, pod: &corev1::Pod) -> anyhow::Result<Item> {
    let resources = compute_pod_resource_request(pod)?;
    let priority = pod.declared_priority().unwrap_or_else(|| {
        warn!("pod {} has no declared priority, using {DEFAULT_PRIORITY}", pod.namespaced_name());
        DEFAULT_PRIORITY
    });

    let affinity = pod.spec.as_ref().and_then(|s| s.affinity.as_ref());
    let preferred_affinity =
        affinity.and_then(|a| a.pod_affinity.as_ref()?.preferred_during_scheduling_ignored_during_execution.as_deref());
    let preferred_anti_affinity = affinity
        .and_then(|a| a.pod_anti_affinity.as_ref()?.preferred_during_scheduling_ignored_during_execution.as_deref());

    Ok(Item {
        index,
        memory: resources.memory,
        milli_cpu: resources.milli_cpu,
        bin,
        priority,
        affinity: match_label_values(preferred_affinity.unwrap_or_default()),
        anti_affinity: match_label_values(preferred_anti_affinity.unwrap_or_default()),
    })
}

// Only the values of each `matchLabels` entry are kept; downstream consumers of the table expect
// the keys to be dropped.
fn match_label_values(terms: &[corev1::WeightedPodAffinityTerm]) -> Vec<String> {
    terms
        .iter()
        .filter_map(|t| t.pod_affinity_term.label_selector.as_ref()?.match_labels.as_ref())
        .flat_map(|labels| labels.values().cloned())
        .collect()
}
