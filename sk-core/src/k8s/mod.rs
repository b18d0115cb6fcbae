mod pod_ext;
mod quantity;

#[cfg(feature = "testutils")]
pub mod testutils;

use kube::ResourceExt;

pub use self::quantity::{
    parse_quantity_milli_value,
    parse_quantity_value,
    QuantityError,
};

pub const POD_PHASE_SUCCEEDED: &str = "Succeeded";
pub const POD_PHASE_FAILED: &str = "Failed";

pub trait KubeResourceExt {
    /// `namespace/name`, or just `name` for cluster-scoped objects.
    fn namespaced_name(&self) -> String;
}

pub trait PodExt {
    /// `spec.nodeName`, if the pod has been bound.
    fn bound_node_name(&self) -> Option<&str>;
    fn declared_priority(&self) -> Option<i32>;
    /// Whether the pod has run to completion (`Succeeded` or `Failed`).
    fn is_terminated(&self) -> bool;
}

impl<T: kube::Resource> KubeResourceExt for T {
    fn namespaced_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{}/{}", ns, self.name_any()),
            None => self.name_any(),
        }
    }
}

#[cfg(test)]
mod tests;
