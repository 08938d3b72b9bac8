use crate::converter::ConvertError;

/// Fatal errors of a sync run.
///
/// Unmatched blocks, stale patches and a failed roundtrip are ordinary
/// results, not errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("block count mismatch: original={original}, edited={edited}")]
    BlockCountMismatch { original: usize, edited: usize },
    #[error("forward conversion failed: {0}")]
    Convert(#[from] ConvertError),
}
