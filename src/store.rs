// 🗄️ Merchant data file
//
// The whole dataset lives in one JSON array on disk (dados_comercios.json).
// Reads decode the full file; writes go to a temp file that is renamed into
// place so readers never see a half-written array.

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::generator::generate_batch;
use crate::models::Comercio;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("arquivo de dados não encontrado: {0}")]
    Missing(PathBuf),

    #[error("erro ao ler/gravar o arquivo {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("erro ao decodificar o JSON de {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("erro ao gerar JSON: {0}")]
    Encode(#[source] serde_json::Error),
}

/// JSON file holding every merchant record
#[derive(Debug, Clone)]
pub struct MerchantStore {
    path: PathBuf,
}

impl MerchantStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and decode the data file
    pub fn load(&self) -> Result<Vec<Comercio>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()))
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Same as `load`, but a missing file is an empty dataset
    pub fn load_or_empty(&self) -> Result<Vec<Comercio>, StoreError> {
        match self.load() {
            Err(StoreError::Missing(_)) => Ok(Vec::new()),
            other => other,
        }
    }

    /// Write all records (4-space indented) via temp file + rename
    pub fn save(&self, comercios: &[Comercio]) -> Result<(), StoreError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        comercios
            .serialize(&mut serializer)
            .map_err(StoreError::Encode)?;

        let tmp_path = self.tmp_path();
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        fs::write(&tmp_path, &buffer).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Create the data file with `count` records (ids 1..=count) if absent
    ///
    /// Returns true when a new file was written.
    pub fn ensure_seeded<R: Rng>(
        &self,
        count: usize,
        rng: &mut R,
        today: NaiveDate,
    ) -> Result<bool, StoreError> {
        if self.exists() {
            return Ok(false);
        }

        let comercios = generate_batch(1, count, rng, today);
        self.save(&comercios)?;
        Ok(true)
    }

    /// Append `count` generated records after the existing ones
    ///
    /// New ids continue at len + 1. Returns the total number of records.
    pub fn append_generated<R: Rng>(
        &self,
        count: usize,
        rng: &mut R,
        today: NaiveDate,
    ) -> Result<usize, StoreError> {
        let mut comercios = self.load_or_empty()?;
        let start_id = comercios.len() as u64 + 1;

        comercios.extend(generate_batch(start_id, count, rng, today));
        self.save(&comercios)?;

        Ok(comercios.len())
    }
}
