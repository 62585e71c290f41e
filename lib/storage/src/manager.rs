use crate::artifact::{describe_artifact, load_artifact, write_artifact, ArtifactDescription};
use bookrec_core::{Catalog, Error, Result, SimilarityMatrix};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CATALOG_FILE: &str = "books.json";
pub const MATRIX_FILE: &str = "similarity.bin";

/// On-disk catalog layout: plain titles, or records carrying a `title` field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogFile {
    Titles(Vec<String>),
    Records(Vec<TitleRecord>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleRecord {
    #[serde(alias = "Title")]
    pub title: String,
}

impl CatalogFile {
    pub fn into_titles(self) -> Vec<String> {
        match self {
            CatalogFile::Titles(titles) => titles,
            CatalogFile::Records(records) => records.into_iter().map(|r| r.title).collect(),
        }
    }
}

/// Everything the service needs, read from disk and cross-checked
#[derive(Debug)]
pub struct LoadedData {
    pub catalog: Catalog,
    pub matrix: SimilarityMatrix,
    pub artifacts: Vec<ArtifactDescription>,
}

/// Locates and loads the catalog and similarity matrix artifacts
#[derive(Debug, Clone)]
pub struct DataStore {
    catalog_path: PathBuf,
    matrix_path: PathBuf,
}

impl DataStore {
    /// Default file names inside `data_dir`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            catalog_path: data_dir.join(CATALOG_FILE),
            matrix_path: data_dir.join(MATRIX_FILE),
        }
    }

    pub fn with_paths<P: AsRef<Path>, Q: AsRef<Path>>(catalog_path: P, matrix_path: Q) -> Self {
        Self {
            catalog_path: catalog_path.as_ref().to_path_buf(),
            matrix_path: matrix_path.as_ref().to_path_buf(),
        }
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn matrix_path(&self) -> &Path {
        &self.matrix_path
    }

    pub fn load_catalog(&self) -> Result<(Catalog, ArtifactDescription)> {
        let (file, description): (CatalogFile, _) =
            load_artifact(&self.catalog_path).map_err(|e| {
                tracing::error!(
                    path = ?self.catalog_path,
                    error = %format!("{:#}", e),
                    "Failed to load catalog"
                );
                Error::Storage(format!("{:#}", e))
            })?;
        Ok((Catalog::new(file.into_titles()), description))
    }

    pub fn load_matrix(&self) -> Result<(SimilarityMatrix, ArtifactDescription)> {
        load_artifact(&self.matrix_path).map_err(|e| {
            tracing::error!(
                path = ?self.matrix_path,
                error = %format!("{:#}", e),
                "Failed to load similarity matrix"
            );
            Error::Storage(format!("{:#}", e))
        })
    }

    /// Load both artifacts and check they describe the same positions
    pub fn load(&self) -> Result<LoadedData> {
        let (catalog, catalog_desc) = self.load_catalog()?;
        tracing::info!(
            path = ?self.catalog_path,
            books = catalog.len(),
            size = catalog_desc.size,
            checksum = %catalog_desc.checksum,
            "Catalog loaded"
        );

        let (matrix, matrix_desc) = self.load_matrix()?;
        tracing::info!(
            path = ?self.matrix_path,
            dim = matrix.dim(),
            nnz = matrix.nnz(),
            size = matrix_desc.size,
            checksum = %matrix_desc.checksum,
            "Similarity matrix loaded"
        );

        if matrix.dim() != catalog.len() {
            tracing::error!(
                books = catalog.len(),
                dim = matrix.dim(),
                "Catalog and similarity matrix disagree"
            );
            return Err(Error::DimensionMismatch {
                catalog: catalog.len(),
                matrix: matrix.dim(),
            });
        }

        Ok(LoadedData {
            catalog,
            matrix,
            artifacts: vec![catalog_desc, matrix_desc],
        })
    }

    /// Write both artifacts atomically
    pub fn save(&self, catalog: &Catalog, matrix: &SimilarityMatrix) -> Result<Vec<ArtifactDescription>> {
        if matrix.dim() != catalog.len() {
            return Err(Error::DimensionMismatch {
                catalog: catalog.len(),
                matrix: matrix.dim(),
            });
        }

        let titles = CatalogFile::Titles(catalog.titles().to_vec());
        let catalog_desc = write_artifact(&self.catalog_path, &titles)
            .map_err(|e| Error::Storage(format!("{:#}", e)))?;
        let matrix_desc = write_artifact(&self.matrix_path, matrix)
            .map_err(|e| Error::Storage(format!("{:#}", e)))?;

        Ok(vec![catalog_desc, matrix_desc])
    }

    /// Describe both artifacts without decoding them
    pub fn describe(&self) -> Result<Vec<ArtifactDescription>> {
        [&self.catalog_path, &self.matrix_path]
            .into_iter()
            .map(|path| describe_artifact(path).map_err(|e| Error::Storage(format!("{:#}", e))))
            .collect()
    }
}
