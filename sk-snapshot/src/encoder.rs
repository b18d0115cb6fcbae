//! Renders snapshot records into the CSV table consumed by offline bin-packing tools.
//!
//! Every record becomes one row under a fixed nine-column header.  Columns that hold lists
//! (`label`, `affinity`, `anti_affinity`) contain a JSON array of strings; how a list that cannot
//! be turned into JSON is handled depends on the [`EncodeMode`].
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use sk_core::prelude::*;

use crate::model::{
    Bin,
    Item,
    Record,
};

/// Column names, in order.
pub const HEADER: [&str; 9] = ["type", "index", "ram", "cpu", "label", "where", "priority", "affinity", "anti_affinity"];
/// What an empty (or, when degrading, unencodable) list column holds.
pub const EMPTY_ARRAY: &str = "[]";

const BIN_TYPE: &str = "bin";
const ITEM_TYPE: &str = "pod";

err_impl! {
    /// Failures to render a record under [`EncodeMode::Strict`].
    EncodeError,

    /// A list column could not be turned into JSON.
    #[error("could not encode JSON array: {0}")]
    JsonArray(String),
}

/// What to do with a list column that can't be encoded as JSON.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EncodeMode {
    /// A list that fails to encode is written as `[]` and the row is kept.
    #[default]
    DegradeToEmptyArray,

    /// A list that fails to encode aborts the whole encode.
    Strict,
}

/// JSON text for `values`, or `[]` when there is nothing to encode.
pub fn encode_json_array<T: Serialize>(column: &str, values: &[T], mode: EncodeMode) -> anyhow::Result<String> {
    if values.is_empty() {
        return Ok(EMPTY_ARRAY.into());
    }

    match serde_json::to_string(values) {
        Ok(text) => Ok(text),
        Err(err) => match mode {
            EncodeMode::DegradeToEmptyArray => {
                warn!("could not encode {column} column, writing {EMPTY_ARRAY}: {err}");
                Ok(EMPTY_ARRAY.into())
            },
            EncodeMode::Strict => Err(EncodeError::json_array(&format!("{column}: {err}"))),
        },
    }
}

impl Bin {
    fn to_row(&self, mode: EncodeMode) -> anyhow::Result<[String; 9]> {
        Ok([
            BIN_TYPE.into(),
            self.index.to_string(),
            self.memory.to_string(),
            self.milli_cpu.to_string(),
            encode_json_array(HEADER[4], &self.labels, mode)?,
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ])
    }
}

impl Item {
    fn to_row(&self, mode: EncodeMode) -> anyhow::Result<[String; 9]> {
        Ok([
            ITEM_TYPE.into(),
            self.index.to_string(),
            self.memory.to_string(),
            self.milli_cpu.to_string(),
            String::new(),
            self.bin.to_string(),
            self.priority.to_string(),
            encode_json_array(HEADER[7], &self.affinity, mode)?,
            encode_json_array(HEADER[8], &self.anti_affinity, mode)?,
        ])
    }
}

impl Record {
    /// The nine column values for this record.
    pub fn to_row(&self, mode: EncodeMode) -> anyhow::Result<[String; 9]> {
        match self {
            Record::Bin(b) => b.to_row(mode),
            Record::Item(i) => i.to_row(mode),
        }
    }
}

/// Writes records as a CSV table under [`HEADER`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TabularEncoder {
    mode: EncodeMode,
}

impl TabularEncoder {
    /// An encoder that handles list columns according to `mode`.
    pub fn new(mode: EncodeMode) -> TabularEncoder {
        TabularEncoder { mode }
    }

    /// Writes the header and one row per record, flushes, and hands the sink back.
    pub fn encode<W: Write>(&self, records: &[Record], sink: W) -> anyhow::Result<W> {
        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(HEADER).context("could not write header")?;
        for record in records {
            writer.write_record(record.to_row(self.mode)?).context("could not write record")?;
        }
        writer.flush()?;

        writer
            .into_inner()
            .map_err(|err| anyhow!("could not flush snapshot: {}", err.error()))
    }

    /// Creates (or truncates) the file at `path` and writes the table into it.  The file is closed
    /// before returning, whether or not the write succeeded; on failure it may hold a partial
    /// table.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn write_to_path(&self, records: &[Record], path: &Path) -> EmptyResult {
        let file = File::create(path).with_context(|| format!("could not create {}", path.display()))?;
        self.encode(records, file)
            .with_context(|| format!("could not write snapshot to {}", path.display()))?;
        Ok(())
    }
}
