//! Scoped reference avatar

use crate::adapters::converter::VrmaConverter;
use crate::domain::{ConversionError, ReferenceRig};

/// Owns a reference avatar for one clip iteration
///
/// The avatar is handed back to the converter when the guard is dropped,
/// whichever way the iteration ends.
pub struct ScopedAvatar<'a, C: VrmaConverter> {
    converter: &'a C,
    avatar: Option<C::Avatar>,
}

impl<'a, C: VrmaConverter> ScopedAvatar<'a, C> {
    /// Creates a reference avatar for `rig`
    pub fn acquire(converter: &'a C, rig: &ReferenceRig) -> Result<Self, ConversionError> {
        let avatar = converter.create_reference_avatar(rig)?;
        Ok(Self {
            converter,
            avatar: Some(avatar),
        })
    }

    pub fn avatar(&self) -> &C::Avatar {
        match self.avatar.as_ref() {
            Some(avatar) => avatar,
            None => unreachable!("avatar is only taken when the guard drops"),
        }
    }
}

impl<C: VrmaConverter> Drop for ScopedAvatar<'_, C> {
    fn drop(&mut self) {
        if let Some(avatar) = self.avatar.take() {
            self.converter.destroy_reference_avatar(avatar);
        }
    }
}
