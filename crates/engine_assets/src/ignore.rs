// crates/engine_assets/src/ignore.rs
//! `.assetignore` rules. The file sits next to the asset root, not inside it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{AssetError, AssetResult};

pub const IGNORE_FILE_NAME: &str = ".assetignore";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnorePattern {
    /// `*.tmp`
    Suffix(String),
    /// `drafts/*`
    Prefix(String),
    Exact(String),
}

impl IgnorePattern {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(if let Some(suffix) = line.strip_prefix('*') {
            IgnorePattern::Suffix(suffix.to_owned())
        } else if let Some(prefix) = line.strip_suffix('*') {
            IgnorePattern::Prefix(prefix.to_owned())
        } else {
            IgnorePattern::Exact(line.to_owned())
        })
    }

    pub fn matches(&self, resource: &str) -> bool {
        match self {
            IgnorePattern::Suffix(s) => resource.ends_with(s.as_str()),
            IgnorePattern::Prefix(p) => resource.starts_with(p.as_str()),
            IgnorePattern::Exact(e) => resource == e,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AssetIgnore {
    patterns: Vec<IgnorePattern>,
}

impl AssetIgnore {
    pub fn parse(text: &str) -> Self {
        Self {
            patterns: text.lines().filter_map(IgnorePattern::parse).collect(),
        }
    }

    pub fn path_for(root: &Path) -> PathBuf {
        match root.parent() {
            Some(parent) => parent.join(IGNORE_FILE_NAME),
            None => PathBuf::from(IGNORE_FILE_NAME),
        }
    }

    /// Reads the rules for `root`. No file means no rules.
    pub fn load_for(root: &Path) -> AssetResult<Self> {
        let path = Self::path_for(root);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(AssetError::Io { path, source }),
        }
    }

    /// `resource` is a root-relative, `/`-separated name.
    pub fn is_ignored(&self, resource: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(resource))
    }

    pub fn patterns(&self) -> &[IgnorePattern] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_kinds() {
        let rules = AssetIgnore::parse("*.tmp\ndrafts/*\n\nnotes.txt\r\n");
        assert_eq!(rules.patterns().len(), 3);

        assert!(rules.is_ignored("a/b/scratch.tmp"));
        assert!(rules.is_ignored("drafts/level.json"));
        assert!(rules.is_ignored("notes.txt"));

        assert!(!rules.is_ignored("docs/notes.txt"));
        assert!(!rules.is_ignored("tile.png"));
        assert!(!rules.is_ignored("old/drafts/x"));
    }

    #[test]
    fn lone_star_matches_everything() {
        assert!(AssetIgnore::parse("*").is_ignored("anything.png"));
    }

    #[test]
    fn file_lives_in_parent_of_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("resources");
        fs::create_dir(&root).unwrap();
        fs::write(dir.path().join(IGNORE_FILE_NAME), "*.psd\n").unwrap();

        let rules = AssetIgnore::load_for(&root).unwrap();
        assert!(rules.is_ignored("art/hero.psd"));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rules = AssetIgnore::load_for(&dir.path().join("resources")).unwrap();
        assert!(rules.is_empty());
    }
}
