//! Hot/cold partition of the media collection.

use crate::MediaItem;
use serde::{Deserialize, Serialize};

/// Partition of all media into kept (`hot`) and migrated (`cold`) tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierAssignment {
    /// Most recently uploaded items, kept in the content store
    pub hot: Vec<MediaItem>,
    /// Everything else, in processing order
    pub cold: Vec<MediaItem>,
}

impl TierAssignment {
    /// Number of items across both tiers.
    pub fn total(&self) -> usize {
        self.hot.len() + self.cold.len()
    }

    /// Bytes held by the hot tier.
    pub fn hot_bytes(&self) -> u64 {
        self.hot.iter().map(|item| *item.size_bytes()).sum()
    }

    /// Bytes held by the cold tier.
    pub fn cold_bytes(&self) -> u64 {
        self.cold.iter().map(|item| *item.size_bytes()).sum()
    }
}
