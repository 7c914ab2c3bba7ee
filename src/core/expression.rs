//! Expression index construction
//!
//! Maps the blend shapes driven by the avatar's expression slots to VRM
//! expression keys, so the converter can tag facial curves.

use crate::domain::{AvatarDefinition, ExpressionIndex};

/// Builds an [`ExpressionIndex`] from an avatar description
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionIndexBuilder;

impl ExpressionIndexBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the index from the avatar's expression definitions
    ///
    /// Slots without a clip or without bindings are skipped. Only the first
    /// binding of a slot is used. A slot whose binding does not resolve to a
    /// blend shape is skipped with a warning; a blend shape already claimed by
    /// an earlier slot keeps its first mapping. The build never fails.
    pub fn build(&self, avatar: &AvatarDefinition) -> ExpressionIndex {
        let mut index = ExpressionIndex::new();

        for (position, definition) in avatar.expressions.iter().enumerate() {
            let Some(key) = definition.key() else {
                tracing::trace!(slot = position, preset = %definition.preset, "Expression slot has no clip");
                continue;
            };

            let Some(binding) = definition.first_binding() else {
                tracing::trace!(slot = position, key = %key, "Expression slot has no bindings");
                continue;
            };

            let blend_shape = match avatar.blend_shape_name(binding) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(
                        slot = position,
                        key = %key,
                        error = %e,
                        "Skipping unresolvable expression binding"
                    );
                    continue;
                }
            };

            if !index.insert(blend_shape, key.clone()) {
                tracing::debug!(
                    blend_shape = blend_shape,
                    key = %key,
                    existing = ?index.get(blend_shape),
                    "Blend shape already mapped, keeping first mapping"
                );
            }
        }

        tracing::info!(
            avatar = %avatar.name,
            mappings = index.len(),
            "Expression index built"
        );

        index
    }
}
