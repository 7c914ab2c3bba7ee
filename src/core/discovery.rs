//! Humanoid clip discovery
//!
//! Walks a folder of the asset store and yields the clips authored against
//! the humanoid rig. Everything else is skipped and counted.

use crate::adapters::assets::AssetDatabase;
use crate::domain::{AnimationClipRef, AssetPath, Result};

/// Counters for clips seen but not yielded by a discovery walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// Clip assets found in the folder, humanoid or not
    pub scanned: usize,

    /// Clips loaded but not authored as humanoid motion
    pub non_humanoid: usize,

    /// Clip assets that could not be enumerated or loaded
    pub unloadable: usize,
}

/// Finds humanoid clips through an [`AssetDatabase`]
pub struct ClipDiscovery<'a> {
    assets: &'a dyn AssetDatabase,
}

impl<'a> ClipDiscovery<'a> {
    pub fn new(assets: &'a dyn AssetDatabase) -> Self {
        Self { assets }
    }

    /// Lazily enumerates humanoid clips below `folder`, recursively
    ///
    /// Every call walks the folder again. Each humanoid clip is yielded
    /// exactly once; order follows the asset store.
    pub fn find_humanoid_clips(&self, folder: &AssetPath) -> HumanoidClips<'a> {
        tracing::debug!(folder = %folder, "Scanning for humanoid clips");
        HumanoidClips {
            assets: self.assets,
            inner: self.assets.find_clip_assets(folder),
            stats: DiscoveryStats::default(),
        }
    }

    /// Collects all humanoid clips below `folder` together with the skip counters
    pub fn collect(&self, folder: &AssetPath) -> (Vec<AnimationClipRef>, DiscoveryStats) {
        let mut walk = self.find_humanoid_clips(folder);
        let clips: Vec<_> = walk.by_ref().collect();
        (clips, walk.stats())
    }
}

/// Iterator over the humanoid clips of one discovery walk
pub struct HumanoidClips<'a> {
    assets: &'a dyn AssetDatabase,
    inner: Box<dyn Iterator<Item = Result<AssetPath>> + 'a>,
    stats: DiscoveryStats,
}

impl HumanoidClips<'_> {
    /// Counters accumulated so far
    pub fn stats(&self) -> DiscoveryStats {
        self.stats
    }
}

impl Iterator for HumanoidClips<'_> {
    type Item = AnimationClipRef;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.inner.next()? {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable clip entry");
                    self.stats.unloadable += 1;
                    continue;
                }
            };

            self.stats.scanned += 1;

            match self.assets.load_clip(&path) {
                Ok(clip) if clip.is_human_motion => return Some(clip),
                Ok(clip) => {
                    tracing::debug!(clip = %clip.path, "Skipping non-humanoid clip");
                    self.stats.non_humanoid += 1;
                }
                Err(e) => {
                    tracing::warn!(clip = %path, error = %e, "Skipping unloadable clip");
                    self.stats.unloadable += 1;
                }
            }
        }
    }
}
