//! Bind-mount and home-directory spec parsing.
//!
//! A bind spec has the form `src[:dest[:opts]]`. `dest` defaults to `src` and
//! `opts` is `ro` or `rw` (the default). A single raw entry may carry several
//! comma separated specs; mount order follows input order.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindAccess {
    ReadOnly,
    #[default]
    ReadWrite,
}

impl BindAccess {
    fn from_opt(opt: &str) -> Option<Self> {
        match opt {
            "ro" => Some(BindAccess::ReadOnly),
            "rw" | "" => Some(BindAccess::ReadWrite),
            _ => None,
        }
    }

    pub fn as_opt(&self) -> &'static str {
        match self {
            BindAccess::ReadOnly => "ro",
            BindAccess::ReadWrite => "rw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindMountSpec {
    /// Path on the host.
    pub source: PathBuf,
    /// Path inside the container.
    pub dest: PathBuf,
    pub access: BindAccess,
}

impl BindMountSpec {
    pub fn is_read_only(&self) -> bool {
        self.access == BindAccess::ReadOnly
    }
}

impl fmt::Display for BindMountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.source.display(),
            self.dest.display(),
            self.access.as_opt()
        )
    }
}

/// Parse raw bind strings into mount records, preserving order.
pub fn parse_binds<S: AsRef<str>>(raw: &[S]) -> Result<Vec<BindMountSpec>, ResolveError> {
    raw.iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .map(str::trim)
        .filter(|spec| !spec.is_empty())
        .map(parse_bind)
        .collect()
}

/// Parse one `src[:dest[:opts]]` spec.
pub fn parse_bind(spec: &str) -> Result<BindMountSpec, ResolveError> {
    let malformed = |reason| ResolveError::MalformedBindSpec {
        spec: spec.to_string(),
        reason,
    };

    let fields: Vec<&str> = spec.split(':').collect();
    let (source, dest, opt) = match fields.as_slice() {
        [src] => (*src, *src, ""),
        [src, dest] => (*src, *dest, ""),
        [src, dest, opt] => (*src, *dest, *opt),
        _ => return Err(malformed("expected at most three ':' separated fields")),
    };

    if source.is_empty() {
        return Err(malformed("source path is empty"));
    }
    if dest.is_empty() {
        return Err(malformed("destination path is empty"));
    }
    let access =
        BindAccess::from_opt(opt).ok_or_else(|| malformed("options must be 'ro' or 'rw'"))?;

    Ok(BindMountSpec {
        source: PathBuf::from(source),
        dest: PathBuf::from(dest),
        access,
    })
}

/// Home directory as seen outside and inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSpec {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// Parse a `src[:dest]` home spec.
pub fn parse_home(spec: &str) -> Result<HomeSpec, ResolveError> {
    let malformed = |reason| ResolveError::MalformedHomeSpec {
        spec: spec.to_string(),
        reason,
    };

    let (source, dest) = match spec.split(':').collect::<Vec<_>>().as_slice() {
        [src] => (*src, *src),
        [src, dest] => (*src, *dest),
        _ => return Err(malformed("expected src or src:dest")),
    };
    if source.is_empty() || dest.is_empty() {
        return Err(malformed("empty path"));
    }

    Ok(HomeSpec {
        source: PathBuf::from(source),
        dest: PathBuf::from(dest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_only_defaults_dest_and_access() {
        let bind = parse_bind("/data").unwrap();
        assert_eq!(bind.source, PathBuf::from("/data"));
        assert_eq!(bind.dest, PathBuf::from("/data"));
        assert_eq!(bind.access, BindAccess::ReadWrite);
    }

    #[test]
    fn full_spec_read_only() {
        let bind = parse_bind("/data:/mnt/data:ro").unwrap();
        assert_eq!(bind.dest, PathBuf::from("/mnt/data"));
        assert!(bind.is_read_only());
    }

    #[test]
    fn empty_options_mean_read_write() {
        assert_eq!(parse_bind("/a:/b:").unwrap().access, BindAccess::ReadWrite);
    }

    #[test]
    fn rejects_unknown_option() {
        let err = parse_bind("/a:/b:nosuid").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MalformedBindSpec { ref spec, .. } if spec == "/a:/b:nosuid"
        ));
    }

    #[test]
    fn rejects_too_many_fields() {
        assert!(parse_bind("/a:/b:ro:rw").is_err());
    }

    #[test]
    fn rejects_empty_paths() {
        assert!(parse_bind(":/b").is_err());
        assert!(parse_bind("/a::ro").is_err());
    }

    #[test]
    fn comma_lists_keep_order() {
        let raw = vec!["/opt,/opt/nested:/opt/nested:ro".to_string(), "/srv".to_string()];
        let binds = parse_binds(&raw).unwrap();
        let dests: Vec<_> = binds.iter().map(|b| b.dest.clone()).collect();
        assert_eq!(
            dests,
            vec![
                PathBuf::from("/opt"),
                PathBuf::from("/opt/nested"),
                PathBuf::from("/srv")
            ]
        );
    }

    #[test]
    fn list_segments_are_trimmed() {
        let binds = parse_binds(&["/a, /b:/mnt/b:ro ,"]).unwrap();
        assert_eq!(binds.len(), 2);
        assert_eq!(binds[1].source, PathBuf::from("/b"));
        assert_eq!(binds[1].access, BindAccess::ReadOnly);
    }

    #[test]
    fn display_reparses_to_same_spec() {
        for raw in ["/data", "/data:/mnt", "/data:/mnt:ro", "/x:/y:"] {
            let bind = parse_bind(raw).unwrap();
            assert_eq!(parse_bind(&bind.to_string()).unwrap(), bind);
        }
    }

    #[test]
    fn home_spec_forms() {
        let home = parse_home("/home/alice").unwrap();
        assert_eq!(home.dest, PathBuf::from("/home/alice"));

        let home = parse_home("/home/alice:/root").unwrap();
        assert_eq!(home.source, PathBuf::from("/home/alice"));
        assert_eq!(home.dest, PathBuf::from("/root"));

        assert!(matches!(
            parse_home("/a:/b:/c"),
            Err(ResolveError::MalformedHomeSpec { .. })
        ));
        assert!(parse_home("/a:").is_err());
    }
}
