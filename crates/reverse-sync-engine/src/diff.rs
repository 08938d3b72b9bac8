//! Position-aligned block diff.

use serde::Serialize;

use crate::error::SyncError;
use crate::parsing::blocks::TextBlock;

/// A block whose content differs between the two document versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockChange {
    /// 0-based position in both block sequences.
    pub index: usize,
    pub old_block: TextBlock,
    pub new_block: TextBlock,
}

/// Compares two block sequences pairwise by index.
///
/// Only same-length sequences are supported; inserted, deleted or moved
/// blocks surface as [`SyncError::BlockCountMismatch`].
pub fn diff_blocks(
    original: &[TextBlock],
    edited: &[TextBlock],
) -> Result<Vec<BlockChange>, SyncError> {
    if original.len() != edited.len() {
        return Err(SyncError::BlockCountMismatch {
            original: original.len(),
            edited: edited.len(),
        });
    }

    Ok(original
        .iter()
        .zip(edited)
        .enumerate()
        .filter(|(_, (old, new))| old.content != new.content)
        .map(|(index, (old, new))| BlockChange {
            index,
            old_block: old.clone(),
            new_block: new.clone(),
        })
        .collect())
}
