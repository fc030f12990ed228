//! File discovery for batch assessment.

use std::path::{Path, PathBuf};

use crate::error::{DocQualityError, Result};

/// Extensions of the document types the upload layer accepts.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "*.jpg", "*.jpeg", "*.png", "*.webp", "*.gif", "*.bmp", "*.tif", "*.tiff", "*.pdf", "*.doc",
    "*.docx",
];

/// Finds candidate documents under a directory.
///
/// Patterns are matched case-insensitively against file names and support
/// `*` and `?`.
pub struct FileDiscovery {
    /// Whether to scan recursively.
    recursive: bool,

    /// File name patterns, stored lowercase.
    patterns: Vec<String>,

    /// Maximum depth for recursive scanning (None = unlimited).
    max_depth: Option<usize>,

    /// Whether to follow symbolic links.
    follow_symlinks: bool,
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl FileDiscovery {
    /// Create a discovery for the default document extensions.
    pub fn new() -> Self {
        Self {
            recursive: false,
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            max_depth: None,
            follow_symlinks: false,
        }
    }

    /// Enable recursive scanning.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set maximum depth for recursive scanning.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Replace the file patterns.
    pub fn patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns.into_iter().map(|p| p.to_lowercase()).collect();
        self
    }

    /// Enable following symbolic links.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Discover matching files, sorted by path.
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(DocQualityError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {}", dir.display()),
            )));
        }

        let mut files = Vec::new();
        let mut pending = vec![(dir.to_path_buf(), 0usize)];

        while let Some((current, depth)) = pending.pop() {
            let entries = std::fs::read_dir(&current).map_err(|e| {
                DocQualityError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read directory {}: {}", current.display(), e),
                ))
            })?;

            for entry in entries {
                let path = entry?.path();
                let metadata = if self.follow_symlinks {
                    std::fs::metadata(&path)
                } else {
                    std::fs::symlink_metadata(&path)
                };
                let Ok(metadata) = metadata else {
                    log::debug!("Skipping unreadable entry {}", path.display());
                    continue;
                };

                if metadata.is_dir() {
                    let within_depth = self.max_depth.map_or(true, |max| depth < max);
                    if self.recursive && within_depth {
                        pending.push((path, depth + 1));
                    }
                } else if metadata.is_file() && self.matches(&path) {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.patterns
            .iter()
            .any(|pattern| wildcard_match(name.as_bytes(), pattern.as_bytes()))
    }
}

/// Iterative `*`/`?` matching with single-star backtracking.
fn wildcard_match(text: &[u8], pattern: &[u8]) -> bool {
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == b'?' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}
