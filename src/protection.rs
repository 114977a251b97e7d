//! The protection/deletion lifecycle shared by every financial record.

use serde::{Deserialize, Serialize};

/// Two-flag lifecycle state: whether a record may be deleted, and whether it
/// has been permanently protected.
///
/// Protection is one-way. Once applied it forces `deletable` to false and no
/// later call, including `allow_deletion`, can make the record deletable
/// again. This mirrors bookkeeping law: a closed period never reopens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protection {
    deletable: bool,
    protected: bool,
}

impl Protection {
    pub fn deletable(&self) -> bool {
        self.deletable
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Marks the record deletable. Ineffective after protection has been
    /// applied; that is not an error.
    pub fn allow_deletion(&mut self) {
        if self.protected {
            return;
        }
        self.deletable = true;
    }

    pub fn disallow_deletion(&mut self) {
        self.deletable = false;
    }

    /// Applies permanent protection. Idempotent.
    pub fn apply_protection(&mut self) {
        self.protected = true;
        self.deletable = false;
    }
}

/// A record that can be permanently protected against deletion.
///
/// Aggregate implementations cascade `apply_protection` into every owned
/// collection and child record.
pub trait Protectable {
    fn is_protected(&self) -> bool;
    fn apply_protection(&mut self);
}

/// A record whose deletability can be toggled, until protection overrides it.
pub trait Deletable {
    fn deletable(&self) -> bool;
    fn allow_deletion(&mut self);
    fn disallow_deletion(&mut self);
}
