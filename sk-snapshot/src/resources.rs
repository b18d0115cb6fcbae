//! Effective resource requests of a pod, computed the way the scheduler accounts for them.
use std::collections::BTreeMap;

use sk_core::k8s::{
    parse_quantity_milli_value,
    parse_quantity_value,
};
use sk_core::prelude::*;

/// Resource name for memory.
pub const MEMORY: &str = "memory";
/// Resource name for CPU.
pub const CPU: &str = "cpu";

err_impl! {
    /// Resource requests or capacities that can't be accounted for.
    ResourceError,

    /// Requests and capacities are never negative.
    #[error("negative resource quantity: {0}")]
    NegativeQuantity(String),
}

/// Memory in bytes and CPU in milli-cores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resources {
    /// Bytes.
    pub memory: i64,
    /// Milli-cores.
    pub milli_cpu: i64,
}

impl Resources {
    /// `memory` bytes and `milli_cpu` milli-cores.
    pub const fn new(memory: i64, milli_cpu: i64) -> Resources {
        Resources { memory, milli_cpu }
    }

    /// Reads the `memory` and `cpu` entries of a resource list; anything else is ignored and a
    /// missing entry counts as zero.
    pub fn from_resource_list(list: &BTreeMap<String, Quantity>) -> anyhow::Result<Resources> {
        let memory = match list.get(MEMORY) {
            Some(q) => non_negative(MEMORY, q, parse_quantity_value(q)?)?,
            None => 0,
        };
        let milli_cpu = match list.get(CPU) {
            Some(q) => non_negative(CPU, q, parse_quantity_milli_value(q)?)?,
            None => 0,
        };
        Ok(Resources { memory, milli_cpu })
    }

    /// Adds `other` to both dimensions, saturating at `i64::MAX`.
    pub fn add(&mut self, other: Resources) {
        self.memory = self.memory.saturating_add(other.memory);
        self.milli_cpu = self.milli_cpu.saturating_add(other.milli_cpu);
    }

    /// Raises each dimension to `other`'s if that is larger.
    pub fn set_max(&mut self, other: Resources) {
        self.memory = self.memory.max(other.memory);
        self.milli_cpu = self.milli_cpu.max(other.milli_cpu);
    }
}

fn non_negative(name: &str, q: &Quantity, value: i64) -> anyhow::Result<i64> {
    if value < 0 {
        return Err(ResourceError::negative_quantity(&format!("{name}={}", q.0)));
    }
    Ok(value)
}

/// `max(sum(containers), each init container) + overhead`, per dimension.  Init containers run
/// one at a time before the regular containers start, so only the largest of them matters.
pub fn aggregate(containers: &[Resources], init_containers: &[Resources], overhead: Option<Resources>) -> Resources {
    let mut result = Resources::default();
    for c in containers {
        result.add(*c);
    }

    for c in init_containers {
        result.set_max(*c);
    }

    if let Some(o) = overhead {
        result.add(o);
    }

    result
}

fn container_requests(container: &corev1::Container) -> anyhow::Result<Resources> {
    match container.resources.as_ref().and_then(|r| r.requests.as_ref()) {
        Some(requests) => Resources::from_resource_list(requests)
            .with_context(|| format!("invalid requests for container {}", container.name)),
        None => Ok(Resources::default()),
    }
}

/// The pod's effective request, see [`aggregate`].  A pod without a spec requests nothing; a
/// malformed or negative quantity anywhere in the pod is an error.
pub fn compute_pod_resource_request(pod: &corev1::Pod) -> anyhow::Result<Resources> {
    let Some(spec) = pod.spec.as_ref() else {
        return Ok(Resources::default());
    };

    let containers = spec.containers.iter().map(container_requests).collect::<anyhow::Result<Vec<_>>>()?;
    let init_containers = spec
        .init_containers
        .iter()
        .flatten()
        .map(container_requests)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let overhead = spec
        .overhead
        .as_ref()
        .map(Resources::from_resource_list)
        .transpose()
        .context("invalid pod overhead")?;

    Ok(aggregate(&containers, &init_containers, overhead))
}
