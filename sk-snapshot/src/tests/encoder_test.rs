use assertables::*;
use serde::ser::Error as _;
use serde::{
    Serialize,
    Serializer,
};
use tracing_test::traced_test;

use super::*;
use crate::encoder::*;

struct Unencodable;

impl Serialize for Unencodable {
    fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("not today"))
    }
}

fn bin(labels: &[&str]) -> Record {
    Record::Bin(Bin {
        index: 3,
        memory: 1 << 30,
        milli_cpu: 4000,
        labels: labels.iter().map(|l| l.to_string()).collect(),
    })
}

fn encode_to_string(records: &[Record]) -> String {
    let out = TabularEncoder::default().encode(records, vec![]).unwrap();
    String::from_utf8(out).unwrap()
}

#[rstest]
fn test_bin_row_labels() {
    let row = bin(&["env=prod", "zone=us"]).to_row(EncodeMode::DegradeToEmptyArray).unwrap();
    assert_eq!(row, ["bin", "3", "1073741824", "4000", r#"["env=prod","zone=us"]"#, "", "", "", ""]);
}

#[rstest]
fn test_bin_row_no_labels() {
    let row = bin(&[]).to_row(EncodeMode::Strict).unwrap();
    assert_eq!(row[4], "[]");
}

#[rstest]
fn test_item_row() {
    let item = Record::Item(Item {
        index: 7,
        memory: 100,
        milli_cpu: 250,
        bin: 2,
        priority: -10,
        affinity: vec!["web".into()],
        anti_affinity: vec![],
    });

    let row = item.to_row(EncodeMode::DegradeToEmptyArray).unwrap();
    assert_eq!(row, ["pod", "7", "100", "250", "", "2", "-10", r#"["web"]"#, "[]"]);
}

#[rstest]
#[traced_test]
fn test_encode_json_array_degrades() {
    let text = encode_json_array("affinity", &[Unencodable], EncodeMode::DegradeToEmptyArray).unwrap();
    assert_eq!(text, EMPTY_ARRAY);
    assert!(logs_contain("could not encode affinity column"));
}

#[rstest]
fn test_encode_json_array_strict() {
    let err = encode_json_array("affinity", &[Unencodable], EncodeMode::Strict).unwrap_err();
    assert!(matches!(err.downcast_ref::<EncodeError>(), Some(EncodeError::JsonArray(_))));
    assert_contains!(err.to_string(), "not today");
}

#[rstest]
#[case::degrade(EncodeMode::DegradeToEmptyArray)]
#[case::strict(EncodeMode::Strict)]
fn test_encode_json_array_empty(#[case] mode: EncodeMode) {
    assert_eq!(encode_json_array::<String>("label", &[], mode).unwrap(), "[]");
}

#[rstest]
fn test_encode_header_only() {
    assert_eq!(encode_to_string(&[]).lines().collect::<Vec<_>>(), vec![HEADER.join(",")]);
}

#[rstest]
fn test_encode_two_nodes(two_node_view: ClusterView, pending_pod: corev1::Pod) {
    let snapshot = build_snapshot(&two_node_view, &pending_pod).unwrap().snapshot;
    let out = encode_to_string(snapshot.records());
    assert_eq!(out.lines().collect::<Vec<_>>(), EXPECTED_TWO_NODE_TABLE);
}

#[rstest]
fn test_encode_label_column_reads_back_as_json() {
    let out = encode_to_string(&[bin(&["env=prod", "zone=us"])]);

    let mut reader = csv::Reader::from_reader(out.as_bytes());
    let rows: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][4], r#"["env=prod","zone=us"]"#);

    let labels: Vec<String> = serde_json::from_str(&rows[0][4]).unwrap();
    assert_eq!(labels, vec!["env=prod", "zone=us"]);
}

#[rstest]
fn test_write_to_path_is_idempotent(two_node_view: ClusterView, pending_pod: corev1::Pod) {
    let dir = tempfile::tempdir().unwrap();
    let (first, second) = (dir.path().join("first.csv"), dir.path().join("second.csv"));
    let snapshot = build_snapshot(&two_node_view, &pending_pod).unwrap().snapshot;
    let encoder = TabularEncoder::new(EncodeMode::DegradeToEmptyArray);

    encoder.write_to_path(snapshot.records(), &first).unwrap();
    encoder.write_to_path(snapshot.records(), &second).unwrap();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[rstest]
fn test_write_to_path_truncates_existing(two_node_view: ClusterView, pending_pod: corev1::Pod) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cluster.csv");
    std::fs::write(&path, "stale contents that are much longer than the header row\n".repeat(20)).unwrap();
    let snapshot = build_snapshot(&two_node_view, &pending_pod).unwrap().snapshot;

    TabularEncoder::default().write_to_path(snapshot.records(), &path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().collect::<Vec<_>>(), EXPECTED_TWO_NODE_TABLE);
}

#[rstest]
fn test_write_to_path_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does/not/exist.csv");

    let err = TabularEncoder::default().write_to_path(&[bin(&[])], &path).unwrap_err();
    assert_contains!(err.to_string(), "could not create");
}

// Accepts `remaining` bytes, then refuses everything.
#[derive(Debug)]
struct FailingSink {
    remaining: usize,
}

impl std::io::Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.remaining == 0 {
            return Err(std::io::Error::other("disk full"));
        }
        let n = buf.len().min(self.remaining);
        self.remaining -= n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[rstest]
#[case::nothing_written(0)]
#[case::partway_through_header(10)]
#[case::partway_through_rows(80)]
fn test_encode_sink_failure(two_node_view: ClusterView, pending_pod: corev1::Pod, #[case] remaining: usize) {
    let snapshot = build_snapshot(&two_node_view, &pending_pod).unwrap().snapshot;

    let err = TabularEncoder::default().encode(snapshot.records(), FailingSink { remaining }).unwrap_err();
    assert_contains!(format!("{err:#}"), "disk full");
}

#[rstest]
#[case::degrade(EncodeMode::DegradeToEmptyArray)]
#[case::strict(EncodeMode::Strict)]
fn test_encode_modes_agree_on_encodable_records(
    two_node_view: ClusterView,
    pending_pod: corev1::Pod,
    #[case] mode: EncodeMode,
) {
    let snapshot = build_snapshot(&two_node_view, &pending_pod).unwrap().snapshot;

    let out = TabularEncoder::new(mode).encode(snapshot.records(), vec![]).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().collect::<Vec<_>>(), EXPECTED_TWO_NODE_TABLE);
}

#[cfg(target_os = "linux")]
#[rstest]
fn test_write_to_path_write_failure(two_node_view: ClusterView, pending_pod: corev1::Pod) {
    // Every write to /dev/full fails with ENOSPC.
    let path = std::path::Path::new("/dev/full");
    if !path.exists() {
        return;
    }
    let snapshot = build_snapshot(&two_node_view, &pending_pod).unwrap().snapshot;

    let err = TabularEncoder::default().write_to_path(snapshot.records(), path).unwrap_err();
    assert_contains!(err.to_string(), "could not write snapshot to /dev/full");
}
