pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
pub use kube::ResourceExt;
pub use tracing::*;

pub use crate::errors::*;
pub use crate::k8s::{
    KubeResourceExt,
    PodExt,
};
