//! Where and how snapshots are written.
use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use sk_core::prelude::*;

use crate::encoder::EncodeMode;

/// Destination when nothing else is configured.
pub const DEFAULT_OUTPUT_PATH: &str = "/tmp/cluster.csv";

/// Snapshot settings, loadable from YAML (`outputPath`, `uniqueOutput`, `encodeMode`).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotConfig {
    /// Snapshot destination; with `unique_output` the directory and name stem to use.
    pub output_path: PathBuf,

    /// Give every snapshot its own file next to `output_path` instead of overwriting it, so that
    /// overlapping scheduling cycles don't clobber each other.
    pub unique_output: bool,

    /// How list columns that can't be encoded are handled.
    pub encode_mode: EncodeMode,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            output_path: DEFAULT_OUTPUT_PATH.into(),
            unique_output: false,
            encode_mode: EncodeMode::default(),
        }
    }
}

impl SnapshotConfig {
    /// Reads the settings from a YAML file; missing keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> anyhow::Result<SnapshotConfig> {
        let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
        serde_yaml::from_reader(file).with_context(|| format!("could not parse snapshot config {}", path.display()))
    }

    /// Where the snapshot for `pod` goes.  With `unique_output`, `/tmp/cluster.csv` becomes
    /// `/tmp/cluster-<namespace>-<name>-<unix millis>.csv`.
    pub fn destination_for(&self, pod: &corev1::Pod, now: DateTime<Utc>) -> PathBuf {
        if !self.unique_output {
            return self.output_path.clone();
        }

        let stem = self.output_path.file_stem().map_or("cluster".into(), |s| s.to_string_lossy());
        let mut file_name = format!(
            "{stem}-{}-{}-{}",
            pod.namespace().as_deref().unwrap_or("default"),
            pod.name_any(),
            now.timestamp_millis()
        );
        if let Some(ext) = self.output_path.extension() {
            file_name.push('.');
            file_name.push_str(&ext.to_string_lossy());
        }
        self.output_path.with_file_name(file_name)
    }
}
