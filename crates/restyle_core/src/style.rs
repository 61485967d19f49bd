use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use crate::{
    config::ResourceConfig,
    error::{ResourceError, Result},
    types::StyleLocation,
};

/// Resolve the style for `file` using the default marker and style names.
pub fn resolve_style(file: &Path) -> Result<StyleLocation> {
    resolve_style_with(file, &ResourceConfig::default())
}

/// Walk from the directory containing `file` up to the filesystem root and
/// return the first marker file found, or the configured default style.
///
/// The file itself, and any directory between it and the nearest existing
/// ancestor, need not exist.
pub fn resolve_style_with(file: &Path, cfg: &ResourceConfig) -> Result<StyleLocation> {
    let start = start_dir(file)?;
    walk_ancestry(&start, cfg, None)
}

/// Per-directory memo of style resolutions, safe to share across threads.
///
/// Every directory visited during a walk is recorded, so sibling files and
/// files deeper in an already-walked tree resolve without a full walk. A
/// cached marker is checked again before it is returned, and the walk resumes
/// from that directory if it has been removed. A cached default is not: a
/// marker created after the first walk through a directory is only seen by a
/// fresh cache.
#[derive(Debug, Default)]
pub struct StyleCache {
    cfg: ResourceConfig,
    dirs: DashMap<PathBuf, StyleLocation>,
}

impl StyleCache {
    pub fn new(cfg: ResourceConfig) -> Self {
        StyleCache { cfg, dirs: DashMap::new() }
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.cfg
    }

    pub fn resolve(&self, file: &Path) -> Result<StyleLocation> {
        let start = start_dir(file)?;
        walk_ancestry(&start, &self.cfg, Some(&self.dirs))
    }

    /// Number of directories with a memoized result
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

fn start_dir(file: &Path) -> Result<PathBuf> {
    let abs = if file.is_absolute() {
        file.to_path_buf()
    } else {
        let cwd = env::current_dir().map_err(|e| ResourceError::access(".", e))?;
        cwd.join(file)
    };
    let abs = clean(abs);
    Ok(abs.parent().map(Path::to_path_buf).unwrap_or(abs))
}

fn walk_ancestry(
    start: &Path,
    cfg: &ResourceConfig,
    cache: Option<&DashMap<PathBuf, StyleLocation>>,
) -> Result<StyleLocation> {
    trace!("Resolving style starting from: {:?}", start);
    let mut visited: Vec<PathBuf> = Vec::new();
    let mut dir = start.to_path_buf();

    let resolved = loop {
        if let Some(hit) = cache.and_then(|c| c.get(&dir).map(|v| v.value().clone())) {
            let gone = matches!(&hit, StyleLocation::LocalFile { path } if !marker_present(path)?);
            if !gone {
                trace!("Style cache hit for {:?}", dir);
                break hit;
            }
            debug!("Cached style marker is gone: {}", hit);
        }

        let candidate = dir.join(&cfg.marker_name);
        trace!("Checking for style marker at: {:?}", candidate);
        if marker_present(&candidate)? {
            debug!("Found style marker: {}", candidate.display());
            visited.push(dir);
            break StyleLocation::LocalFile { path: candidate };
        }
        visited.push(dir.clone());

        // The root is its own parent; `parent()` reports that as None.
        match dir.parent() {
            Some(parent) if parent != dir => dir = parent.to_path_buf(),
            _ => {
                debug!("No style marker above {:?}, using '{}'", start, cfg.default_style);
                break StyleLocation::NamedDefault { name: cfg.default_style.clone() };
            }
        }
    };

    if let Some(cache) = cache {
        for dir in visited {
            cache.insert(dir, resolved.clone());
        }
    }
    Ok(resolved)
}

fn marker_present(candidate: &Path) -> Result<bool> {
    match fs::metadata(candidate) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(false)
        }
        Err(e) => Err(ResourceError::access(candidate, e)),
    }
}
