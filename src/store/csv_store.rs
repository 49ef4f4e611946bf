use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::transform::Sample;

pub const HEADER: [&str; 2] = ["mean_pressure", "apparent_permeability"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed sample table {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "unexpected header in {}: expected \"mean_pressure,apparent_permeability\", found \"{found}\"",
        .path.display()
    )]
    Header { path: PathBuf, found: String },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes the table to a sibling `.tmp` file and renames it into place, so a
/// reader never sees a half-written table.
pub fn write_samples(path: &Path, samples: &[Sample]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    let tmp_path = path.with_extension("csv.tmp");

    let result = (|| -> Result<(), StoreError> {
        let file = fs::File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(HEADER)
            .map_err(|e| StoreError::csv(&tmp_path, e))?;
        for sample in samples {
            writer
                .write_record([
                    sample.pressure.to_string(),
                    sample.apparent_permeability.to_string(),
                ])
                .map_err(|e| StoreError::csv(&tmp_path, e))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::io(&tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| StoreError::io(&tmp_path, e))?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|e| StoreError::io(path, e))?;
    tracing::debug!(path = %path.display(), rows = samples.len(), "wrote sample table");
    Ok(())
}

/// Reads a `mean_pressure,apparent_permeability` table. Values are not
/// validated here; the transform rejects non-positive pressures.
pub fn read_samples(path: &Path) -> Result<Vec<Sample>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| StoreError::csv(path, e))?
        .clone();
    if headers.len() != HEADER.len() || headers.iter().zip(HEADER).any(|(a, b)| a != b) {
        return Err(StoreError::Header {
            path: path.to_path_buf(),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let samples = reader
        .deserialize::<Sample>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::csv(path, e))?;

    tracing::debug!(path = %path.display(), rows = samples.len(), "read sample table");
    Ok(samples)
}
