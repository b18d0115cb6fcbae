use std::collections::BTreeMap;

use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use rstest::*;

pub const TEST_NAMESPACE: &str = "test";
pub const TEST_POD_NAME: &str = "the-pod";

fn resource_list(memory: &str, cpu: &str) -> BTreeMap<String, Quantity> {
    BTreeMap::from([("memory".into(), Quantity(memory.into())), ("cpu".into(), Quantity(cpu.into()))])
}

pub fn test_container(name: &str, memory: &str, cpu: &str) -> corev1::Container {
    corev1::Container {
        name: name.into(),
        resources: Some(corev1::ResourceRequirements {
            requests: Some(resource_list(memory, cpu)),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn test_node_with(name: &str, memory: &str, cpu: &str, labels: &[(&str, &str)]) -> corev1::Node {
    corev1::Node {
        metadata: metav1::ObjectMeta {
            name: Some(name.into()),
            labels: (!labels.is_empty())
                .then(|| labels.iter().map(|(k, v)| ((*k).into(), (*v).into())).collect()),
            ..Default::default()
        },
        status: Some(corev1::NodeStatus {
            allocatable: Some(resource_list(memory, cpu)),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// A pod with a single container requesting `memory`/`cpu`, optionally bound to `node`.
pub fn test_pod_with(name: &str, memory: &str, cpu: &str, priority: Option<i32>, node: Option<&str>) -> corev1::Pod {
    corev1::Pod {
        metadata: metav1::ObjectMeta {
            namespace: Some(TEST_NAMESPACE.into()),
            name: Some(name.into()),
            ..Default::default()
        },
        spec: Some(corev1::PodSpec {
            containers: vec![test_container("main", memory, cpu)],
            node_name: node.map(Into::into),
            priority,
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn preferred_terms(match_labels: &[&[(&str, &str)]]) -> Vec<corev1::WeightedPodAffinityTerm> {
    match_labels
        .iter()
        .map(|labels| corev1::WeightedPodAffinityTerm {
            weight: 1,
            pod_affinity_term: corev1::PodAffinityTerm {
                label_selector: Some(metav1::LabelSelector {
                    match_labels: Some(labels.iter().map(|(k, v)| ((*k).into(), (*v).into())).collect()),
                    ..Default::default()
                }),
                topology_key: "kubernetes.io/hostname".into(),
                ..Default::default()
            },
        })
        .collect()
}

#[fixture]
pub fn test_pod() -> corev1::Pod {
    test_pod_with(TEST_POD_NAME, "50", "50m", Some(1), None)
}
