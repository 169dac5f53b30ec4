//! CSV artifact IO.
//!
//! Writes are staged in a temporary file next to the destination and renamed into
//! place only after every file of a set has been encoded, so readers never see a
//! half-written artifact.

use crate::dataset::error::DatasetError;
use crate::dataset::schema::{DatasetKind, NULL_MARKER};
use log::{debug, info};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

/// Reads a CSV artifact with every column as strings and `NA` as null.
///
/// Only `NA` marks a missing value; an empty cell stays an empty string. Typing
/// happens when rows are converted back into records, so a malformed or blank cell
/// is reported with its row and column instead of silently becoming null.
pub async fn read_csv(path: &Path, kind: DatasetKind) -> Result<DataFrame, DatasetError> {
    if fs::metadata(path).await.is_err() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    let path_buf = path.to_path_buf();

    let df = task::spawn_blocking(move || {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|options| {
                options
                    .with_null_values(Some(NullValues::AllColumnsSingle(NULL_MARKER.into())))
                    .with_missing_is_null(false)
            })
            .try_into_reader_with_file_path(Some(path_buf.clone()))
            .map_err(|e| DatasetError::CsvRead(path_buf.clone(), e))?
            .finish()
            .map_err(|e| DatasetError::CsvRead(path_buf, e))
    })
    .await??;

    require_columns(&df, kind)?;
    debug!("Read {} {} rows from {:?}", df.height(), kind, path);
    Ok(df)
}

/// Fails with [`DatasetError::MissingColumns`] listing every absent column of `kind`.
pub fn require_columns(df: &DataFrame, kind: DatasetKind) -> Result<(), DatasetError> {
    let missing: Vec<String> = kind
        .column_names()
        .into_iter()
        .filter(|name| df.get_column_index(name).is_none())
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns(missing))
    }
}

/// Writes a single artifact atomically.
pub async fn write_csv(df: DataFrame, path: &Path) -> Result<(), DatasetError> {
    write_csv_set(vec![(df, path.to_path_buf())]).await
}

/// Writes several artifacts, publishing none of them unless all could be encoded.
pub async fn write_csv_set(artifacts: Vec<(DataFrame, PathBuf)>) -> Result<(), DatasetError> {
    for (_, path) in &artifacts {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| DatasetError::DirCreation(dir.to_path_buf(), e))?;
        }
    }

    let published = task::spawn_blocking(move || {
        let mut staged = Vec::with_capacity(artifacts.len());
        for (mut df, path) in artifacts {
            let temp = stage(&mut df, &path)?;
            staged.push((temp, path));
        }
        let mut published = Vec::with_capacity(staged.len());
        for (temp, path) in staged {
            temp.persist(&path)
                .map_err(|e| DatasetError::ArtifactPersist(path.clone(), e))?;
            published.push(path);
        }
        Ok::<Vec<PathBuf>, DatasetError>(published)
    })
    .await??;

    for path in published {
        info!("Wrote artifact {:?}", path);
    }
    Ok(())
}

fn stage(df: &mut DataFrame, path: &Path) -> Result<NamedTempFile, DatasetError> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| DatasetError::ArtifactWriteIo(path.to_path_buf(), e))?;
    CsvWriter::new(temp.as_file_mut())
        .include_header(true)
        .with_null_value(NULL_MARKER.to_string())
        .finish(df)
        .map_err(|e| DatasetError::ArtifactWritePolars(path.to_path_buf(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| DatasetError::ArtifactWriteIo(path.to_path_buf(), e))?;
    Ok(temp)
}
