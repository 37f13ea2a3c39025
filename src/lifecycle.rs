//! Lifecycle guards for device mutations.
//!
//! A device that is `IN_USE` has its name and brand locked and cannot be
//! deleted. Its state can always change. Re-sending the current value of a
//! locked field is not a change, so it passes; the comparison is exact
//! (case-sensitive, untrimmed).
//!
//! The guards are pure: they never touch the store and never log. Callers run
//! [`validate_update`] first and only then [`apply_change_set`], which performs
//! no checks of its own.

use thiserror::Error;

use crate::models::{ChangeSet, Device, DeviceState};

/// Why a mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleViolation {
    #[error("Cannot update name of a device that is IN_USE")]
    NameLocked,

    #[error("Cannot update brand of a device that is IN_USE")]
    BrandLocked,

    #[error("Device with id {id} is currently in use and cannot be deleted")]
    DeleteInUse { id: i64 },
}

/// Check a change-set against the device's current state.
///
/// Name is checked before brand, so a request touching both on an `IN_USE`
/// device always reports [`LifecycleViolation::NameLocked`].
pub fn validate_update(current: &Device, changes: &ChangeSet) -> Result<(), LifecycleViolation> {
    if current.state != DeviceState::InUse {
        return Ok(());
    }
    if changes.name.as_ref().is_some_and(|name| *name != current.name) {
        return Err(LifecycleViolation::NameLocked);
    }
    if changes.brand.as_ref().is_some_and(|brand| *brand != current.brand) {
        return Err(LifecycleViolation::BrandLocked);
    }
    Ok(())
}

pub fn validate_delete(current: &Device) -> Result<(), LifecycleViolation> {
    if current.state == DeviceState::InUse {
        return Err(LifecycleViolation::DeleteInUse { id: current.id });
    }
    Ok(())
}

/// Overwrite every field present in the change-set. Absent fields, the id and
/// the creation time are left untouched.
pub fn apply_change_set(current: &mut Device, changes: &ChangeSet) {
    if let Some(name) = &changes.name {
        current.name.clone_from(name);
    }
    if let Some(brand) = &changes.brand {
        current.brand.clone_from(brand);
    }
    if let Some(state) = changes.state {
        current.state = state;
    }
}
