//! Local CSV files of sample or run records.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::{RunFeature, RunRecord, SampleFeature, SampleRecord};
use crate::error::Result;

/// Columns that only appear in run-level tables.
const RUN_MARKERS: [RunFeature; 4] = [
    RunFeature::AvgHrClean,
    RunFeature::RangeSd,
    RunFeature::Sqi,
    RunFeature::FinalAccurateHr,
];

/// A CSV table of either record kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordTable {
    /// One row per radar sample.
    Samples(Vec<SampleRecord>),
    /// One row per run.
    Runs(Vec<RunRecord>),
}

impl RecordTable {
    /// Read a CSV file, picking the record kind from its header.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_reader(std::fs::File::open(path)?)?;
        tracing::debug!(
            path = %path.display(),
            kind = table.kind(),
            rows = table.len(),
            "loaded table"
        );
        Ok(table)
    }

    /// Read CSV from any reader. The first row is the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let is_runs = RUN_MARKERS
            .iter()
            .any(|f| headers.iter().any(|h| h == f.column()));

        if is_runs {
            Ok(Self::Runs(deserialize_all(&mut reader, &headers)?))
        } else {
            Ok(Self::Samples(deserialize_all(&mut reader, &headers)?))
        }
    }

    /// `"runs"` or `"samples"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Samples(_) => "samples",
            Self::Runs(_) => "runs",
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Samples(s) => s.len(),
            Self::Runs(r) => r.len(),
        }
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every numeric column as `(name, values)`, in wire order.
    #[must_use]
    pub fn columns(&self) -> Vec<(&'static str, Vec<Option<f64>>)> {
        match self {
            Self::Samples(s) => SampleFeature::ALL
                .into_iter()
                .map(|f| (f.column(), f.column_of(s)))
                .collect(),
            Self::Runs(r) => RunFeature::ALL
                .into_iter()
                .map(|f| (f.column(), f.column_of(r)))
                .collect(),
        }
    }

    /// One column by name. Sample aliases such as `HeartRate_BPM` resolve.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        match self {
            Self::Samples(s) => name.parse::<SampleFeature>().ok().map(|f| f.column_of(s)),
            Self::Runs(r) => name.parse::<RunFeature>().ok().map(|f| f.column_of(r)),
        }
    }
}

fn deserialize_all<T: DeserializeOwned, R: Read>(
    reader: &mut csv::Reader<R>,
    headers: &csv::StringRecord,
) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        out.push(record.deserialize(Some(headers))?);
    }
    Ok(out)
}
