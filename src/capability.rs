use crate::error::ResolveError;
use serde::Serialize;
use std::collections::BTreeSet;

/// Capabilities to add to and drop from the container's default set.
///
/// `add` and `drop` are always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityDelta {
    add: BTreeSet<String>,
    drop: BTreeSet<String>,
}

impl CapabilityDelta {
    pub fn added(&self) -> &BTreeSet<String> {
        &self.add
    }

    pub fn dropped(&self) -> &BTreeSet<String> {
        &self.drop
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.drop.is_empty()
    }
}

/// Build a capability delta from add/drop name lists.
///
/// Names are not checked against the kernel's capability table, only for
/// contradiction between the two lists.
pub fn resolve_capabilities<S: AsRef<str>>(
    add: &[S],
    drop: &[S],
) -> Result<CapabilityDelta, ResolveError> {
    let add = normalize_all(add);
    let drop = normalize_all(drop);

    let conflicts: Vec<String> = add.intersection(&drop).cloned().collect();
    if !conflicts.is_empty() {
        return Err(ResolveError::CapabilityConflict { names: conflicts });
    }

    Ok(CapabilityDelta { add, drop })
}

fn normalize_all<S: AsRef<str>>(names: &[S]) -> BTreeSet<String> {
    names
        .iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .filter_map(normalize)
        .collect()
}

/// `chown`, `CAP_CHOWN` and ` cap_chown ` all become `CAP_CHOWN`.
fn normalize(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let upper = name.to_ascii_uppercase();
    if upper.starts_with("CAP_") {
        Some(upper)
    } else {
        Some(format!("CAP_{upper}"))
    }
}
