use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use anyhow::Context as _;

use crate::encode::sink::{CodecPair, EncodedMedia};
use crate::foundation::error::ReelResult;
use crate::foundation::fs::ensure_parent_dir;

/// Issues artifact handles and counts the live ones.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    next_id: AtomicU64,
    live: Arc<AtomicUsize>,
}

impl ArtifactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap encoded media in a new handle named after `file_name`.
    pub fn create(&self, media: EncodedMedia, file_name: impl Into<String>) -> ArtifactHandle {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live.fetch_add(1, Ordering::SeqCst);
        let codec = media.codec;
        ArtifactHandle {
            id: format!("artifact:{n}"),
            codec,
            bytes: media.assemble(),
            file_name: file_name.into(),
            live: Arc::clone(&self.live),
        }
    }

    /// Handles issued by this store that are still alive.
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// In-process handle to an encoded video. Dropping it releases the artifact.
#[derive(Debug)]
pub struct ArtifactHandle {
    id: String,
    codec: CodecPair,
    bytes: Vec<u8>,
    file_name: String,
    live: Arc<AtomicUsize>,
}

impl ArtifactHandle {
    /// Opaque handle id, `artifact:<n>`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Container bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the artifact holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Codec pair the artifact was encoded with.
    pub fn codec(&self) -> CodecPair {
        self.codec
    }

    /// MIME type with codec parameters.
    pub fn mime(&self) -> &'static str {
        self.codec.mime()
    }

    /// Suggested download file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Write the artifact under `dir` using the suggested file name.
    pub fn save(&self, dir: impl AsRef<Path>) -> ReelResult<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        ensure_parent_dir(&path)?;
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("failed to write artifact '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "artifact saved");
        Ok(path)
    }
}

impl Drop for ArtifactHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Output of a successful run.
#[derive(Debug)]
pub struct RenderResult {
    /// The encoded video.
    pub artifact: ArtifactHandle,
    /// Timeline duration in seconds.
    pub duration_secs: f64,
}

impl RenderResult {
    /// Human readable container/codec label.
    pub fn format_label(&self) -> &'static str {
        self.artifact.codec().label()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/artifact.rs"]
mod tests;
