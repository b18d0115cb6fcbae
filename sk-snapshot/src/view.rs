//! The cluster as the scheduler currently sees it: nodes and the pods bound to them.
use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;
use sk_core::prelude::*;

/// A node together with the pods the scheduler currently considers placed on it.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
    /// Source of the bin's capacity and labels.
    pub node: corev1::Node,
    /// In the order they should be numbered.
    pub pods: Vec<corev1::Pod>,
}

impl NodeInfo {
    /// `pods` are taken to be running on `node` as given.
    pub fn new(node: corev1::Node, pods: Vec<corev1::Pod>) -> NodeInfo {
        NodeInfo { node, pods }
    }
}

/// Source of the "current nodes with their assigned pods" listing.  Listing may fail; callers
/// decide whether that is fatal.
pub trait ClusterViewProvider {
    /// Every node with its assigned pods, in traversal order.
    fn list_nodes(&self) -> anyhow::Result<Vec<NodeInfo>>;
}

impl<F> ClusterViewProvider for F
where
    F: Fn() -> anyhow::Result<Vec<NodeInfo>>,
{
    fn list_nodes(&self) -> anyhow::Result<Vec<NodeInfo>> {
        self()
    }
}

/// A fixed listing of nodes, e.g. loaded from a file.
#[derive(Clone, Debug, Default)]
pub struct ClusterView {
    nodes: Vec<NodeInfo>,
}

#[derive(Deserialize)]
struct ObjectList {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

impl ClusterView {
    /// A view that lists exactly `nodes`.
    pub fn new(nodes: Vec<NodeInfo>) -> ClusterView {
        ClusterView { nodes }
    }

    /// Groups `pods` under the node named by their `spec.nodeName`, keeping the order of both
    /// inputs.  Unbound pods, terminated pods and pods bound to a node we don't know about are left
    /// out.
    pub fn from_objects(nodes: Vec<corev1::Node>, pods: Vec<corev1::Pod>) -> ClusterView {
        let mut infos: Vec<_> = nodes.into_iter().map(|n| NodeInfo::new(n, vec![])).collect();
        let positions: HashMap<String, usize> =
            infos.iter().enumerate().map(|(i, info)| (info.node.name_any(), i)).collect();

        for pod in pods {
            if pod.is_terminated() {
                debug!("skipping terminated pod {}", pod.namespaced_name());
                continue;
            }

            let Some(node_name) = pod.bound_node_name() else {
                continue;
            };

            match positions.get(node_name) {
                Some(&i) => infos[i].pods.push(pod),
                None => debug!("pod {} is bound to unknown node {node_name}", pod.namespaced_name()),
            }
        }

        ClusterView { nodes: infos }
    }

    /// Reads a `List` document (YAML or JSON, e.g. `kubectl get nodes,pods -A -o yaml`); items
    /// that are neither nodes nor pods are ignored.
    pub fn from_list_reader<R: Read>(reader: R) -> anyhow::Result<ClusterView> {
        let list: ObjectList = serde_yaml::from_reader(reader).context("could not parse object list")?;

        let mut nodes = vec![];
        let mut pods = vec![];
        for item in list.items {
            match item.get("kind").and_then(serde_json::Value::as_str) {
                Some("Node") => nodes.push(serde_json::from_value(item).context("could not parse node")?),
                Some("Pod") => pods.push(serde_json::from_value(item).context("could not parse pod")?),
                kind => debug!("ignoring list item of kind {kind:?}"),
            }
        }

        info!("loaded {} nodes and {} pods", nodes.len(), pods.len());
        Ok(ClusterView::from_objects(nodes, pods))
    }

    /// The listed nodes, in traversal order.
    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }
}

impl ClusterViewProvider for ClusterView {
    fn list_nodes(&self) -> anyhow::Result<Vec<NodeInfo>> {
        Ok(self.nodes.clone())
    }
}
