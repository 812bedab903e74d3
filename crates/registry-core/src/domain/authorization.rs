//! # Authorization Registry
//!
//! The set of identities permitted to register devices, plus the single
//! admin identity permitted to change that set (INVARIANT-6 is enforced one
//! level up, in [`RegistryState`], which gates every mutation here behind
//! `ensure_admin`).
//!
//! Profiles are never deleted: revocation flips `authorized` off but keeps
//! the profile, so a display name survives a revoke/re-authorize cycle.
//!
//! [`RegistryState`]: crate::domain::state::RegistryState

use crate::domain::entities::ManufacturerProfile;
use crate::domain::value_objects::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Manufacturer authorization state for one registry instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRegistry {
    /// The distinguished admin identity, fixed at construction.
    admin: Identity,
    /// Whether the admin may register devices without separate authorization.
    admin_may_register: bool,
    /// One profile per identity ever authorized.
    profiles: BTreeMap<Identity, ManufacturerProfile>,
    /// Monotone counter backing `ManufacturerProfile::sequence`.
    next_sequence: u64,
}

impl AuthorizationRegistry {
    /// Creates an empty registry under the given admin.
    ///
    /// The admin must be a real principal; the zero identity is reserved.
    #[must_use]
    pub fn new(admin: Identity, admin_may_register: bool) -> Self {
        debug_assert!(!admin.is_zero(), "admin must not be the zero identity");
        Self {
            admin,
            admin_may_register,
            profiles: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    /// The admin identity.
    #[must_use]
    pub fn admin(&self) -> Identity {
        self.admin
    }

    /// Whether the admin may register devices directly.
    #[must_use]
    pub fn admin_may_register(&self) -> bool {
        self.admin_may_register
    }

    /// True iff the identity is currently authorized.
    #[must_use]
    pub fn is_authorized(&self, identity: Identity) -> bool {
        self.profiles
            .get(&identity)
            .is_some_and(|p| p.authorized)
    }

    /// The single role check for device registration: authorized
    /// manufacturers always pass, the admin passes when the policy allows.
    #[must_use]
    pub fn may_register(&self, caller: Identity) -> bool {
        self.is_authorized(caller) || (self.admin_may_register && caller == self.admin)
    }

    /// Display name recorded for the identity; empty if none.
    #[must_use]
    pub fn display_name(&self, identity: Identity) -> &str {
        self.profiles
            .get(&identity)
            .map_or("", |p| p.name.as_str())
    }

    /// Marks an identity as authorized, keeping any existing display name.
    /// Returns true iff the identity was NOT authorized before the call.
    pub fn authorize(&mut self, identity: Identity) -> bool {
        self.authorize_named(identity, "")
    }

    /// Marks an identity as authorized with a display name. An empty `name`
    /// leaves any previously recorded name untouched.
    /// Returns true iff the identity was NOT authorized before the call.
    pub fn authorize_named(&mut self, identity: Identity, name: &str) -> bool {
        let sequence = self.next_sequence;
        let profile = self
            .profiles
            .entry(identity)
            .or_insert_with(|| ManufacturerProfile {
                name: String::new(),
                authorized: false,
                sequence,
            });
        if !name.is_empty() {
            profile.name = name.to_string();
        }
        if profile.authorized {
            return false;
        }
        profile.authorized = true;
        profile.sequence = sequence;
        self.next_sequence += 1;
        true
    }

    /// Clears an identity's authorization. The profile (and its name) stays.
    /// Returns true iff the identity WAS authorized before the call.
    pub fn revoke(&mut self, identity: Identity) -> bool {
        match self.profiles.get_mut(&identity) {
            Some(profile) if profile.authorized => {
                profile.authorized = false;
                true
            }
            _ => false,
        }
    }

    /// All currently authorized identities, in authorization order.
    /// An identity re-authorized after revocation appears at the end.
    #[must_use]
    pub fn list_authorized(&self) -> Vec<Identity> {
        let mut entries: Vec<(u64, Identity)> = self
            .profiles
            .iter()
            .filter(|(_, p)| p.authorized)
            .map(|(id, p)| (p.sequence, *id))
            .collect();
        entries.sort_unstable_by_key(|(sequence, _)| *sequence);
        entries.into_iter().map(|(_, id)| id).collect()
    }

    /// Number of currently authorized identities.
    #[must_use]
    pub fn authorized_count(&self) -> usize {
        self.profiles.values().filter(|p| p.authorized).count()
    }

    /// True iff the identity has ever been authorized (profiles are never
    /// deleted). Used for consistency checking.
    pub(crate) fn has_profile(&self, identity: Identity) -> bool {
        self.profiles.contains_key(&identity)
    }
}

// =============================================================================
// TESTS
// =============================================================================
