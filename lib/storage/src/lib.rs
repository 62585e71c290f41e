pub mod artifact;
pub mod manager;

pub use artifact::{
    describe_artifact, load_artifact, read_artifact, write_artifact, ArtifactDescription,
    ArtifactFormat, Encoding,
};
pub use manager::{CatalogFile, DataStore, LoadedData, TitleRecord, CATALOG_FILE, MATRIX_FILE};
