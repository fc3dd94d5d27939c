use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Short-lived, process-local handle to an assembled artifact.
///
/// Formatted as `blob:<uuid>`; resolve it through the
/// [`ArtifactStore`](crate::storage::artifact_store::ArtifactStore) that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub(crate) fn generate() -> Self {
        Self(format!("blob:{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive data about an assembled recording.
///
/// Serializable so a UI layer can forward it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub fragment_count: usize,
    pub checksum: String,
    pub duration_secs: f64,
    pub created_at: String,
}

/// The assembled recording: every buffered fragment concatenated in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub reference: ArtifactRef,
    pub metadata: ArtifactMetadata,
    bytes: Vec<u8>,
}

impl Artifact {
    pub(crate) fn new(
        bytes: Vec<u8>,
        media_type: &str,
        fragment_count: usize,
        duration_secs: f64,
    ) -> Self {
        let metadata = ArtifactMetadata {
            id: uuid::Uuid::new_v4().to_string(),
            media_type: media_type.to_string(),
            size_bytes: bytes.len() as u64,
            fragment_count,
            checksum: sha256_hex(&bytes),
            duration_secs,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        Self {
            reference: ArtifactRef::generate(),
            metadata,
            bytes,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.metadata.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
