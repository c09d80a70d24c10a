//! Namespace selection.
//!
//! The mount namespace is always created by the execution engine and is not
//! represented here. Containment and other options may only add namespaces on
//! top of what was explicitly requested, never remove one.

use crate::config::NamespaceFlags;
use crate::error::ResolveError;
use serde::Serialize;

/// How far the container is isolated from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentLevel {
    #[default]
    None,
    /// Minimal /dev and empty /tmp and $HOME instead of host filesystems.
    FilesystemOnly,
    /// Filesystem containment plus private PID and IPC namespaces and a clean environment.
    Full,
}

impl ContainmentLevel {
    /// `contain_all` wins over `contain`.
    pub fn from_flags(contain: bool, contain_all: bool) -> Self {
        if contain_all {
            ContainmentLevel::Full
        } else if contain {
            ContainmentLevel::FilesystemOnly
        } else {
            ContainmentLevel::None
        }
    }

    pub fn forces_clean_env(&self) -> bool {
        *self == ContainmentLevel::Full
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NamespacePolicy {
    pub pid: bool,
    pub ipc: bool,
    pub net: bool,
    pub uts: bool,
    pub user: bool,
}

impl NamespacePolicy {
    /// Fakeroot maps uid 0 inside a user namespace.
    pub fn with_user_namespace(mut self) -> Self {
        self.user = true;
        self
    }

    /// A hostname can only be set inside a private UTS namespace.
    pub fn with_uts_namespace(mut self) -> Self {
        self.uts = true;
        self
    }

    /// Names of the namespaces to create, mount excluded.
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            (self.pid, "pid"),
            (self.ipc, "ipc"),
            (self.net, "net"),
            (self.uts, "uts"),
            (self.user, "user"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// Derive the namespace set from explicit flags and the containment level.
///
/// No combination of today's flags is contradictory, so this only fails if a
/// mutually exclusive namespace request is introduced.
pub fn resolve_namespaces(
    flags: &NamespaceFlags,
    containment: ContainmentLevel,
) -> Result<NamespacePolicy, ResolveError> {
    let mut policy = NamespacePolicy {
        pid: flags.pid,
        ipc: flags.ipc,
        net: flags.net,
        uts: flags.uts,
        user: flags.user,
    };

    if containment == ContainmentLevel::Full {
        policy.pid = true;
        policy.ipc = true;
    }

    Ok(policy)
}
