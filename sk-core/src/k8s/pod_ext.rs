use k8s_openapi::api::core::v1 as corev1;

use super::*;

impl PodExt for corev1::Pod {
    fn bound_node_name(&self) -> Option<&str> {
        self.spec.as_ref()?.node_name.as_deref().filter(|n| !n.is_empty())
    }

    fn declared_priority(&self) -> Option<i32> {
        self.spec.as_ref()?.priority
    }

    // The scheduler cache stops accounting for a pod once it has run to completion, so neither do
    // we.
    fn is_terminated(&self) -> bool {
        matches!(
            self.status.as_ref().and_then(|s| s.phase.as_deref()),
            Some(POD_PHASE_SUCCEEDED | POD_PHASE_FAILED)
        )
    }
}
