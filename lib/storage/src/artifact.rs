// Artifact files: JSON or bincode, optionally gzip-compressed
use anyhow::{anyhow, Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Artifact description for logs and API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDescription {
    pub name: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    pub checksum: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Bincode,
}

/// Encoding and compression implied by a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactFormat {
    pub encoding: Encoding,
    pub gzip: bool,
}

impl ArtifactFormat {
    /// `books.json`, `similarity.bin`, `similarity.bin.gz`, ...
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Invalid artifact path: {:?}", path))?;

        let (stem, gzip) = match name.strip_suffix(".gz") {
            Some(stem) => (stem, true),
            None => (name, false),
        };

        let encoding = match stem.rsplit_once('.').map(|(_, ext)| ext) {
            Some("json") => Encoding::Json,
            Some("bin") | Some("bincode") => Encoding::Bincode,
            _ => return Err(anyhow!("Unsupported artifact format: {}", name)),
        };

        Ok(Self { encoding, gzip })
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let raw = match self.encoding {
            Encoding::Json => serde_json::to_vec(value)?,
            Encoding::Bincode => bincode::serialize(value)
                .map_err(|e| anyhow!("Serialization error: {}", e))?,
        };

        if !self.gzip {
            return Ok(raw);
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        Ok(encoder.finish()?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let mut inflated = Vec::new();
        let raw = if self.gzip {
            GzDecoder::new(bytes).read_to_end(&mut inflated)?;
            inflated.as_slice()
        } else {
            bytes
        };

        match self.encoding {
            Encoding::Json => Ok(serde_json::from_slice(raw)?),
            Encoding::Bincode => bincode::deserialize(raw)
                .map_err(|e| anyhow!("Deserialization error: {}", e)),
        }
    }
}

fn describe_bytes(path: &Path, bytes: &[u8]) -> ArtifactDescription {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(|t| DateTime::<Utc>::from(t).to_rfc3339());

    ArtifactDescription {
        name,
        size: bytes.len() as u64,
        modified,
        checksum: format!("{:x}", Sha256::digest(bytes)),
    }
}

/// Describe an artifact on disk without decoding it
pub fn describe_artifact(path: &Path) -> Result<ArtifactDescription> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(describe_bytes(path, &bytes))
}

/// Read and decode an artifact, returning its description alongside
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<(T, ArtifactDescription)> {
    let format = ArtifactFormat::from_path(path)?;
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let value = format
        .decode(&bytes)
        .with_context(|| format!("Failed to decode {:?}", path))?;
    Ok((value, describe_bytes(path, &bytes)))
}

pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    load_artifact(path).map(|(value, _)| value)
}

/// Encode and write an artifact atomically (temp file + rename)
pub fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<ArtifactDescription> {
    let format = ArtifactFormat::from_path(path)?;
    let bytes = format.encode(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| file.write_all(&bytes))
        .map_err(|e| anyhow!("Failed to write {:?}: {}", path, e))?;

    Ok(describe_bytes(path, &bytes))
}
