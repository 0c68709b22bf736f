//! JSON export of a single evaluation and CSV export of a sweep.
//!
//! Exports keep full decimal precision; only the text reports round.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use iit_core::{ScenarioParameters, ScenarioResult, SweepRow};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Document written by `evaluate --json-out`.
#[derive(Debug, Serialize)]
pub struct ScenarioExport<'a> {
    pub exported_at: DateTime<Local>,
    pub city: Option<&'a str>,
    pub parameters: &'a ScenarioParameters,
    pub result: &'a ScenarioResult,
}

impl<'a> ScenarioExport<'a> {
    pub fn new(
        city: Option<&'a str>,
        parameters: &'a ScenarioParameters,
        result: &'a ScenarioResult,
    ) -> Self {
        Self {
            exported_at: Local::now(),
            city,
            parameters,
            result,
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(
        &self,
        path: &Path,
    ) -> Result<(), ExportError> {
        let json = self.to_json()?;
        std::fs::write(path, json + "\n").map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote scenario export");
        Ok(())
    }
}

/// Writes sweep rows as CSV with a header named after [`SweepRow`]'s fields.
pub fn write_sweep_csv<W: Write>(
    writer: W,
    rows: &[SweepRow],
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_sweep_csv_file(
    path: &Path,
    rows: &[SweepRow],
) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_sweep_csv(BufWriter::new(file), rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote sweep export");
    Ok(())
}
