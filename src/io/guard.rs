//! Vault path containment
//!
//! Every path a caller hands us is resolved against the vault root and
//! rejected if it could read or write outside it. Checks, in order:
//!
//! 1. empty strings and null bytes are refused outright;
//! 2. the target is NFC-normalized, backslashes are treated as separators,
//!    and `.`/`..` are folded lexically;
//! 3. the result must sit under the vault root component-wise, which rules
//!    out `../` walks, absolute paths elsewhere and drive-letter or UNC
//!    prefixes;
//! 4. the resolved path may not exceed [`MAX_PATH_LENGTH`] characters;
//! 5. on disk, symlinks are resolved and the canonical target is checked
//!    against the canonical root. For paths that do not exist yet, the deepest
//!    existing ancestor is checked instead.
//!
//! [`resolve_lexical`] performs steps 1–4 only and never touches the
//! filesystem. It cannot see symlinks and is reserved for contexts without
//! filesystem access.

use crate::error::{KanbanError, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Longest resolved path accepted, in characters
pub const MAX_PATH_LENGTH: usize = 4096;

/// Resolver bound to a single vault root
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
    canonical_root: PathBuf,
}

impl PathGuard {
    /// Bind a guard to `vault_root`, which must be absolute and exist
    pub fn new<P: AsRef<Path>>(vault_root: P) -> Result<Self> {
        let root = check_root(vault_root.as_ref())?;
        let canonical_root = fs::canonicalize(&root).map_err(|e| {
            KanbanError::path_security(
                root.to_string_lossy(),
                format!("vault root does not exist: {}", e),
            )
        })?;

        Ok(Self {
            root,
            canonical_root,
        })
    }

    /// The vault root as given, lexically normalized
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The vault root with all symlinks resolved
    pub fn canonical_root(&self) -> &Path {
        &self.canonical_root
    }

    /// Resolve `target` to an absolute path inside the vault
    ///
    /// Existing paths come back fully canonicalized. Paths that do not exist
    /// yet come back normalized but with symlinks left in place.
    pub fn resolve(&self, target: &str) -> Result<PathBuf> {
        let candidate = contain(&self.root, target)?;

        if fs::symlink_metadata(&candidate).is_ok() {
            let canonical = fs::canonicalize(&candidate).map_err(|e| {
                reject(target, format!("cannot resolve symlinks: {}", e))
            })?;
            if !canonical.starts_with(&self.canonical_root) {
                return Err(reject(target, "resolves through a symlink to outside the vault"));
            }
            check_length(target, &canonical)?;
            debug!("Resolved {} -> {}", target, canonical.display());
            return Ok(canonical);
        }

        if let Some(ancestor) = candidate.ancestors().skip(1).find(|a| a.exists()) {
            let canonical = fs::canonicalize(ancestor).map_err(|e| {
                reject(target, format!("cannot resolve parent directory: {}", e))
            })?;
            if !canonical.starts_with(&self.canonical_root) {
                return Err(reject(
                    target,
                    "parent directory resolves through a symlink to outside the vault",
                ));
            }
        }

        debug!("Resolved {} -> {} (new)", target, candidate.display());
        Ok(candidate)
    }

    /// Vault-relative form of an absolute path produced by this guard
    pub fn relative<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        path.strip_prefix(&self.canonical_root)
            .or_else(|_| path.strip_prefix(&self.root))
            .ok()
    }
}

/// Resolve `target` against `vault_root`, following symlinks on disk
pub fn resolve<P: AsRef<Path>>(vault_root: P, target: &str) -> Result<PathBuf> {
    PathGuard::new(vault_root)?.resolve(target)
}

/// Filesystem-free containment check
///
/// Weaker than [`resolve`]: a symlink inside the vault pointing elsewhere
/// passes this check.
pub fn resolve_lexical<P: AsRef<Path>>(vault_root: P, target: &str) -> Result<PathBuf> {
    let root = check_root(vault_root.as_ref())?;
    contain(&root, target)
}

fn check_root(root: &Path) -> Result<PathBuf> {
    let display = root.to_string_lossy();
    if display.is_empty() {
        return Err(KanbanError::path_security("", "vault root is empty"));
    }
    if display.contains('\0') {
        return Err(KanbanError::path_security(
            display.replace('\0', "\\0"),
            "vault root contains a null byte",
        ));
    }
    if !root.is_absolute() {
        return Err(KanbanError::path_security(display, "vault root must be absolute"));
    }
    Ok(normalize(root))
}

/// Steps 1–4: the lexical half of resolution
fn contain(root: &Path, target: &str) -> Result<PathBuf> {
    if target.is_empty() {
        return Err(KanbanError::path_security("", "path is empty"));
    }
    if target.contains('\0') {
        return Err(reject(&target.replace('\0', "\\0"), "contains a null byte"));
    }

    let unified: String = target.nfc().collect::<String>().replace('\\', "/");
    let candidate = if Path::new(&unified).is_absolute() || has_foreign_prefix(&unified) {
        PathBuf::from(&unified)
    } else {
        root.join(&unified)
    };
    let candidate = normalize(&candidate);

    if !candidate.starts_with(root) {
        return Err(reject(target, "lies outside the vault"));
    }
    check_length(target, &candidate)?;

    Ok(candidate)
}

fn check_length(target: &str, path: &Path) -> Result<()> {
    let len = path.to_string_lossy().chars().count();
    if len > MAX_PATH_LENGTH {
        return Err(reject(
            target,
            format!("resolved path is {} characters (limit {})", len, MAX_PATH_LENGTH),
        ));
    }
    Ok(())
}

/// Drive-letter (`C:`) or UNC (`//server`) prefixes, whatever the host OS
fn has_foreign_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    let drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    drive || path.starts_with("//")
}

/// Fold `.` and `..` without consulting the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

fn reject(target: &str, reason: impl Into<String>) -> KanbanError {
    let err = KanbanError::path_security(target, reason);
    warn!("{}", err);
    err
}
