//! Kernel flag sets for the execution engine.
//!
//! These translate a resolved [`LaunchSpec`] into the `clone(2)`/`unshare(2)`
//! and `mount(2)` flags the engine applies. Nothing here touches the system.

use crate::bind::BindMountSpec;
use crate::launch::LaunchSpec;
use crate::namespace::NamespacePolicy;
use nix::mount::MsFlags;
use nix::sched::CloneFlags;

/// Namespaces to unshare. The mount namespace is always included.
pub fn clone_flags(namespaces: &NamespacePolicy) -> CloneFlags {
    let mut flags = CloneFlags::CLONE_NEWNS;

    if namespaces.pid {
        flags |= CloneFlags::CLONE_NEWPID;
    }
    if namespaces.net {
        flags |= CloneFlags::CLONE_NEWNET;
    }
    if namespaces.uts {
        flags |= CloneFlags::CLONE_NEWUTS;
    }
    if namespaces.ipc {
        flags |= CloneFlags::CLONE_NEWIPC;
    }
    if namespaces.user {
        flags |= CloneFlags::CLONE_NEWUSER;
    }

    flags
}

/// `mount(2)` calls for one bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindMountFlags {
    /// Initial recursive bind.
    pub bind: MsFlags,
    /// Second call for read-only binds; the kernel ignores `MS_RDONLY`
    /// on the initial `MS_BIND`.
    pub remount: Option<MsFlags>,
}

pub fn bind_mount_flags(bind: &BindMountSpec) -> BindMountFlags {
    let remount = bind
        .is_read_only()
        .then_some(MsFlags::MS_BIND | MsFlags::MS_REMOUNT | MsFlags::MS_RDONLY);

    BindMountFlags {
        bind: MsFlags::MS_BIND | MsFlags::MS_REC,
        remount,
    }
}

/// Mount flags for every bind in the spec, in mount order.
pub fn mount_plan(spec: &LaunchSpec) -> Vec<(&BindMountSpec, BindMountFlags)> {
    spec.binds()
        .iter()
        .map(|bind| (bind, bind_mount_flags(bind)))
        .collect()
}
