//! Privilege mode resolution.
//!
//! The privilege flags collapse into exactly one [`PrivilegeMode`]. Any
//! contradictory combination is rejected outright; nothing falls back to a
//! guess. Precedence, first match wins:
//!
//! 1. `fakeroot` gives [`PrivilegeMode::Fakeroot`] and requires a user namespace.
//! 2. `keep_privs` gives [`PrivilegeMode::KeepPrivileges`].
//! 3. Otherwise [`PrivilegeMode::DropAll`].

use crate::config::PrivilegeFlags;
use crate::error::ResolveError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeMode {
    #[default]
    DropAll,
    /// Root keeps its privileges inside the container.
    KeepPrivileges,
    /// uid 0 inside a user namespace, unprivileged on the host.
    Fakeroot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrivilegePolicy {
    mode: PrivilegeMode,
    allow_setuid: bool,
}

impl PrivilegePolicy {
    pub fn mode(&self) -> PrivilegeMode {
        self.mode
    }

    pub fn allow_setuid(&self) -> bool {
        self.allow_setuid
    }

    pub fn requires_user_namespace(&self) -> bool {
        self.mode == PrivilegeMode::Fakeroot
    }
}

pub fn resolve_privileges(flags: &PrivilegeFlags) -> Result<PrivilegePolicy, ResolveError> {
    if flags.fakeroot && flags.allow_setuid {
        return Err(conflict("fakeroot", "allow-setuid"));
    }
    if flags.fakeroot && flags.keep_privs {
        return Err(conflict("fakeroot", "keep-privs"));
    }
    // Only an explicit --no-privs contradicts --keep-privs; the default yields.
    if flags.keep_privs && flags.no_privs == Some(true) {
        return Err(conflict("keep-privs", "no-privs"));
    }

    let mode = if flags.fakeroot {
        PrivilegeMode::Fakeroot
    } else if flags.keep_privs {
        PrivilegeMode::KeepPrivileges
    } else {
        PrivilegeMode::DropAll
    };

    Ok(PrivilegePolicy {
        mode,
        allow_setuid: flags.allow_setuid,
    })
}

fn conflict(first: &'static str, second: &'static str) -> ResolveError {
    ResolveError::PrivilegeConflict { first, second }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(fakeroot: bool, keep_privs: bool, allow_setuid: bool) -> PrivilegeFlags {
        PrivilegeFlags {
            fakeroot,
            keep_privs,
            no_privs: None,
            allow_setuid,
        }
    }

    #[test]
    fn default_drops_everything() {
        let policy = resolve_privileges(&PrivilegeFlags::default()).unwrap();
        assert_eq!(policy.mode(), PrivilegeMode::DropAll);
        assert!(!policy.allow_setuid());
        assert!(!policy.requires_user_namespace());
    }

    #[test]
    fn fakeroot_requires_user_namespace() {
        let policy = resolve_privileges(&flags(true, false, false)).unwrap();
        assert_eq!(policy.mode(), PrivilegeMode::Fakeroot);
        assert!(policy.requires_user_namespace());
    }

    #[test]
    fn fakeroot_with_setuid_conflicts() {
        assert_eq!(
            resolve_privileges(&flags(true, false, true)),
            Err(ResolveError::PrivilegeConflict {
                first: "fakeroot",
                second: "allow-setuid"
            })
        );
    }

    #[test]
    fn fakeroot_with_keep_privs_conflicts() {
        assert_eq!(
            resolve_privileges(&flags(true, true, false)),
            Err(ResolveError::PrivilegeConflict {
                first: "fakeroot",
                second: "keep-privs"
            })
        );
    }

    #[test]
    fn every_fakeroot_contradiction_fails() {
        for keep_privs in [false, true] {
            for allow_setuid in [false, true] {
                let result = resolve_privileges(&flags(true, keep_privs, allow_setuid));
                assert_eq!(result.is_err(), keep_privs || allow_setuid);
            }
        }
    }

    #[test]
    fn keep_privs_carries_setuid() {
        let policy = resolve_privileges(&flags(false, true, true)).unwrap();
        assert_eq!(policy.mode(), PrivilegeMode::KeepPrivileges);
        assert!(policy.allow_setuid());
    }

    #[test]
    fn keep_privs_overrides_implicit_no_privs_only() {
        let mut explicit = flags(false, true, false);
        explicit.no_privs = Some(true);
        assert!(matches!(
            resolve_privileges(&explicit),
            Err(ResolveError::PrivilegeConflict { second: "no-privs", .. })
        ));

        explicit.no_privs = Some(false);
        assert_eq!(
            resolve_privileges(&explicit).unwrap().mode(),
            PrivilegeMode::KeepPrivileges
        );
    }

    #[test]
    fn disabling_no_privs_alone_still_drops() {
        let mut request = PrivilegeFlags::default();
        request.no_privs = Some(false);
        assert_eq!(resolve_privileges(&request).unwrap().mode(), PrivilegeMode::DropAll);
    }
}
