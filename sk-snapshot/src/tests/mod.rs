mod encoder_test;

use rstest::*;
use sk_core::k8s::testutils::*;
use sk_core::prelude::*;

use super::*;

const EXPECTED_TWO_NODE_TABLE: [&str; 5] = [
    "type,index,ram,cpu,label,where,priority,affinity,anti_affinity",
    r#"bin,1,1000,2000,"[""z=1""]",,,,"#,
    "pod,0,100,100,,1,5,[],[]",
    "bin,2,2000,4000,[],,,,",
    "pod,1,50,50,,0,1,[],[]",
];

// node-a (1000 bytes, 2 cores, z=1) runs one pod; node-b (2000 bytes, 4 cores) is empty.
#[fixture]
fn two_node_view() -> ClusterView {
    ClusterView::new(vec![
        NodeInfo::new(
            test_node_with("node-a", "1000", "2", &[("z", "1")]),
            vec![test_pod_with("pod-a", "100", "100m", Some(5), Some("node-a"))],
        ),
        NodeInfo::new(test_node_with("node-b", "2000", "4", &[]), vec![]),
    ])
}

#[fixture]
fn pending_pod() -> corev1::Pod {
    test_pod_with("pending", "50", "50m", Some(1), None)
}
