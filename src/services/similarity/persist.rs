//! JSON persistence of a built index, so a restart does not have to rebuild
//! from the feature table.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use tempfile::NamedTempFile;

use super::SimilarityIndex;
use crate::{error::RecommendError, models::ItemId};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct PersistedIndexRef<'a> {
    version: u32,
    built_at: DateTime<Utc>,
    ids: &'a [ItemId],
    scores: &'a Array2<f64>,
}

#[derive(Deserialize)]
struct PersistedIndex {
    version: u32,
    built_at: DateTime<Utc>,
    ids: Vec<ItemId>,
    scores: Array2<f64>,
}

impl SimilarityIndex {
    /// Writes the index to `path`, replacing any previous blob.
    ///
    /// The blob goes to a uniquely named temp file in the target directory
    /// and is renamed into place, so readers never see a truncated index and
    /// concurrent saves never share a temp file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent,
            None => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(
                &mut writer,
                &PersistedIndexRef {
                    version: FORMAT_VERSION,
                    built_at: self.built_at,
                    ids: &self.ids,
                    scores: &self.scores,
                },
            )?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| e.error)?;

        tracing::info!(path = %path.display(), items = self.len(), "Persisted similarity index");
        Ok(())
    }

    /// Reads an index written by [`SimilarityIndex::save`].
    ///
    /// Any unreadable, malformed or inconsistent blob is a `DataError`.
    pub fn load(path: &Path) -> Result<Self, RecommendError> {
        let file = File::open(path).map_err(|e| {
            RecommendError::Data(format!("cannot open index {}: {}", path.display(), e))
        })?;

        let persisted: PersistedIndex = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                RecommendError::Data(format!("cannot parse index {}: {}", path.display(), e))
            })?;

        if persisted.version != FORMAT_VERSION {
            return Err(RecommendError::Data(format!(
                "index format version {} is not supported (expected {})",
                persisted.version, FORMAT_VERSION
            )));
        }

        let mut index = SimilarityIndex::from_scores(persisted.ids, persisted.scores)?;
        index.built_at = persisted.built_at;

        tracing::info!(
            path = %path.display(),
            items = index.len(),
            built_at = %index.built_at,
            "Loaded similarity index"
        );

        Ok(index)
    }
}
