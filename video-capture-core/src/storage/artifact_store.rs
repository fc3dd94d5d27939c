use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::artifact::{Artifact, ArtifactRef};

/// Process-local registry mapping artifact references to assembled bytes.
///
/// Cheap to clone; clones share the same registry. The recording session
/// only ever inserts. Releasing a reference is the consumer's job.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    artifacts: Arc<RwLock<HashMap<ArtifactRef, Arc<Artifact>>>>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, artifact: Artifact) -> ArtifactRef {
        let reference = artifact.reference.clone();
        self.artifacts
            .write()
            .insert(reference.clone(), Arc::new(artifact));
        reference
    }

    /// Look up the artifact behind `reference`, if it has not been revoked.
    pub fn resolve(&self, reference: &ArtifactRef) -> Option<Arc<Artifact>> {
        self.artifacts.read().get(reference).cloned()
    }

    /// Release `reference`. Returns `false` if it was unknown or already revoked.
    ///
    /// Outstanding `Arc<Artifact>` handles stay readable.
    pub fn revoke(&self, reference: &ArtifactRef) -> bool {
        self.artifacts.write().remove(reference).is_some()
    }

    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(bytes: &[u8]) -> Artifact {
        Artifact::new(bytes.to_vec(), "video/webm", 1, 0.0)
    }

    #[test]
    fn insert_then_resolve() {
        let store = ArtifactStore::new();
        let reference = store.insert(artifact(b"clip"));

        let resolved = store.resolve(&reference).unwrap();
        assert_eq!(resolved.bytes(), b"clip");
        assert_eq!(resolved.reference, reference);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn revoke_removes_reference_once() {
        let store = ArtifactStore::new();
        let reference = store.insert(artifact(b"clip"));
        let held = store.resolve(&reference).unwrap();

        assert!(store.revoke(&reference));
        assert!(!store.revoke(&reference));
        assert!(store.resolve(&reference).is_none());
        assert!(store.is_empty());
        assert_eq!(held.bytes(), b"clip");
    }

    #[test]
    fn clones_share_registry() {
        let store = ArtifactStore::new();
        let consumer = store.clone();
        let reference = store.insert(artifact(b"x"));

        assert!(consumer.resolve(&reference).is_some());
        assert!(consumer.revoke(&reference));
        assert!(store.resolve(&reference).is_none());
    }
}
