pub mod bind;
pub mod capability;
pub mod config;
#[cfg(target_os = "linux")]
pub mod engine;
pub mod error;
pub mod launch;
pub mod namespace;
pub mod privilege;

pub use bind::{BindAccess, BindMountSpec, HomeSpec};
pub use capability::CapabilityDelta;
pub use config::{LaunchFlags, NamespaceFlags, PrivilegeFlags};
pub use error::ResolveError;
pub use launch::{assemble, LaunchSpec, Workdir};
pub use namespace::{ContainmentLevel, NamespacePolicy};
pub use privilege::{PrivilegeMode, PrivilegePolicy};
