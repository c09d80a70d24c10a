use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Typed flag values for one launch request.
///
/// Every option owns its own field; no two flags share storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchFlags {
    // Paths
    pub binds: Vec<String>,
    pub home: Option<String>,
    pub overlay: Option<String>,
    pub scratch: Option<String>,
    pub workdir: Option<String>,
    pub pwd: Option<String>,
    pub shell: Option<String>,
    pub hostname: Option<String>,

    // Behaviour toggles
    pub boot: bool,
    pub clean_env: bool,
    pub contain: bool,
    pub contain_all: bool,
    pub nvidia: bool,

    pub namespaces: NamespaceFlags,
    pub privileges: PrivilegeFlags,

    // Capability lists, comma separated entries allowed
    pub add_caps: Vec<String>,
    pub drop_caps: Vec<String>,
}

/// Explicitly requested namespaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceFlags {
    pub pid: bool,
    pub ipc: bool,
    pub net: bool,
    pub uts: bool,
    pub user: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivilegeFlags {
    pub fakeroot: bool,
    pub keep_privs: bool,
    /// `None` when the flag was left at its implicit default (drop).
    pub no_privs: Option<bool>,
    pub allow_setuid: bool,
}

impl LaunchFlags {
    /// Load flags from a JSON document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let flags = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(flags)
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Lists append, booleans OR, scalars are replaced when the override sets them.
    pub fn merged_with(mut self, overrides: LaunchFlags) -> Self {
        self.binds.extend(overrides.binds);
        self.add_caps.extend(overrides.add_caps);
        self.drop_caps.extend(overrides.drop_caps);

        replace_if_set(&mut self.home, overrides.home);
        replace_if_set(&mut self.overlay, overrides.overlay);
        replace_if_set(&mut self.scratch, overrides.scratch);
        replace_if_set(&mut self.workdir, overrides.workdir);
        replace_if_set(&mut self.pwd, overrides.pwd);
        replace_if_set(&mut self.shell, overrides.shell);
        replace_if_set(&mut self.hostname, overrides.hostname);

        self.boot |= overrides.boot;
        self.clean_env |= overrides.clean_env;
        self.contain |= overrides.contain;
        self.contain_all |= overrides.contain_all;
        self.nvidia |= overrides.nvidia;

        let ns = overrides.namespaces;
        self.namespaces.pid |= ns.pid;
        self.namespaces.ipc |= ns.ipc;
        self.namespaces.net |= ns.net;
        self.namespaces.uts |= ns.uts;
        self.namespaces.user |= ns.user;

        let privs = overrides.privileges;
        self.privileges.fakeroot |= privs.fakeroot;
        self.privileges.keep_privs |= privs.keep_privs;
        self.privileges.allow_setuid |= privs.allow_setuid;
        replace_if_set(&mut self.privileges.no_privs, privs.no_privs);

        self
    }
}

fn replace_if_set<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
