//! Launch specification assembly.
//!
//! [`assemble`] runs every resolver over one [`LaunchFlags`] snapshot and
//! either returns a complete [`LaunchSpec`] or the first error raised. A
//! partially resolved spec is never produced.

use crate::bind::{parse_binds, parse_home, BindMountSpec, HomeSpec};
use crate::capability::{resolve_capabilities, CapabilityDelta};
use crate::config::LaunchFlags;
use crate::error::ResolveError;
use crate::namespace::{resolve_namespaces, ContainmentLevel, NamespacePolicy};
use crate::privilege::{resolve_privileges, PrivilegePolicy};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Workdir used when a scratch directory is requested without `--workdir`.
pub const DEFAULT_SCRATCH_WORKDIR: &str = "/tmp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workdir {
    pub path: PathBuf,
    /// True when the path was filled in rather than requested.
    pub synthesized: bool,
}

/// Fully resolved description of how to start a container process.
///
/// Only [`assemble`] creates one; it is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchSpec {
    binds: Vec<BindMountSpec>,
    home: Option<HomeSpec>,
    overlay: Option<PathBuf>,
    scratch: Option<PathBuf>,
    workdir: Option<Workdir>,
    pwd: Option<PathBuf>,
    shell: Option<PathBuf>,
    hostname: Option<String>,
    boot: bool,
    clean_env: bool,
    nvidia: bool,
    namespaces: NamespacePolicy,
    privileges: PrivilegePolicy,
    capabilities: CapabilityDelta,
    containment: ContainmentLevel,
}

impl LaunchSpec {
    pub fn binds(&self) -> &[BindMountSpec] {
        &self.binds
    }

    pub fn home(&self) -> Option<&HomeSpec> {
        self.home.as_ref()
    }

    pub fn overlay(&self) -> Option<&Path> {
        self.overlay.as_deref()
    }

    pub fn scratch(&self) -> Option<&Path> {
        self.scratch.as_deref()
    }

    pub fn workdir(&self) -> Option<&Workdir> {
        self.workdir.as_ref()
    }

    pub fn pwd(&self) -> Option<&Path> {
        self.pwd.as_deref()
    }

    pub fn shell(&self) -> Option<&Path> {
        self.shell.as_deref()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn boot(&self) -> bool {
        self.boot
    }

    pub fn clean_env(&self) -> bool {
        self.clean_env
    }

    pub fn nvidia(&self) -> bool {
        self.nvidia
    }

    pub fn namespaces(&self) -> &NamespacePolicy {
        &self.namespaces
    }

    pub fn privileges(&self) -> &PrivilegePolicy {
        &self.privileges
    }

    pub fn capabilities(&self) -> &CapabilityDelta {
        &self.capabilities
    }

    pub fn containment(&self) -> ContainmentLevel {
        self.containment
    }
}

/// Resolve a flag snapshot into a launch spec.
pub fn assemble(flags: &LaunchFlags) -> Result<LaunchSpec, ResolveError> {
    let containment = ContainmentLevel::from_flags(flags.contain, flags.contain_all);

    let binds = parse_binds(&flags.binds)?;
    let home = non_empty(&flags.home).map(parse_home).transpose()?;
    let capabilities = resolve_capabilities(&flags.add_caps, &flags.drop_caps)?;
    let privileges = resolve_privileges(&flags.privileges)?;
    let mut namespaces = resolve_namespaces(&flags.namespaces, containment)?;

    let hostname = non_empty(&flags.hostname).map(str::to_string);
    if privileges.requires_user_namespace() {
        namespaces = namespaces.with_user_namespace();
    }
    if hostname.is_some() {
        namespaces = namespaces.with_uts_namespace();
    }

    let scratch = non_empty(&flags.scratch).map(PathBuf::from);
    let workdir = match (non_empty(&flags.workdir), &scratch) {
        (Some(path), _) => Some(Workdir {
            path: PathBuf::from(path),
            synthesized: false,
        }),
        (None, Some(_)) => Some(Workdir {
            path: PathBuf::from(DEFAULT_SCRATCH_WORKDIR),
            synthesized: true,
        }),
        (None, None) => None,
    };

    Ok(LaunchSpec {
        binds,
        home,
        overlay: non_empty(&flags.overlay).map(PathBuf::from),
        scratch,
        workdir,
        pwd: non_empty(&flags.pwd).map(PathBuf::from),
        shell: non_empty(&flags.shell).map(PathBuf::from),
        hostname,
        boot: flags.boot,
        clean_env: flags.clean_env || containment.forces_clean_env(),
        nvidia: flags.nvidia,
        namespaces,
        privileges,
        capabilities,
        containment,
    })
}

// An empty string from a config file means the option was not given.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
