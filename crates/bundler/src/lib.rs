// crates/bundler/src/lib.rs
//! Packs a resource folder into one compressed blob plus a Rust source file
//! that embeds it.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use engine_assets::{normalize_resource, AssetIgnore, Assets};
use engine_script::NativeLibraryCompiler;
use tracing::{debug, info, warn};

pub const SOURCE_FILE: &str = "assets.rs";
pub const PACK_FILE: &str = "assets.pak";

const SCRIPT_EXTENSIONS: [&str; 3] = ["so", "dll", "dylib"];
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Script,
    Image,
    Generic,
}

impl ResourceKind {
    /// Decided by extension alone, case-insensitively.
    pub fn classify(resource: &str) -> Self {
        let ext = Path::new(resource)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some(e) if SCRIPT_EXTENSIONS.contains(&e) => ResourceKind::Script,
            Some(e) if IMAGE_EXTENSIONS.contains(&e) => ResourceKind::Image,
            _ => ResourceKind::Generic,
        }
    }
}

/// Root-relative, `/`-separated names of every file under `root`, sorted.
/// Entries matched by `ignore` are skipped with a warning.
pub fn collect_resources(root: &Path, ignore: &AssetIgnore) -> Result<Vec<String>> {
    let mut resources = Vec::new();
    walk(root, root, ignore, &mut resources)?;
    Ok(resources)
}

fn walk(root: &Path, dir: &Path, ignore: &AssetIgnore, out: &mut Vec<String>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to list '{}'", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("failed to list '{}'", dir.display()))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(root, &path, ignore, out)?;
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("'{}' is outside the resource folder", path.display()))?;
        let resource = normalize_resource(&relative.to_string_lossy());
        if ignore.is_ignored(&resource) {
            warn!("ignoring resource '{resource}'");
            continue;
        }
        out.push(resource);
    }
    Ok(())
}

/// Loads every resource under `root` into a fresh store.
pub fn bundle(root: &Path) -> Result<Assets> {
    let ignore = AssetIgnore::load_for(root)?;
    let mut assets = Assets::new(root);

    for resource in collect_resources(root, &ignore)? {
        let kind = ResourceKind::classify(&resource);
        debug!(?kind, "bundling '{resource}'");
        match kind {
            ResourceKind::Script => assets
                .load_script(&resource, &NativeLibraryCompiler)
                .map(|_| ()),
            ResourceKind::Image => assets.load_image(&resource).map(|_| ()),
            ResourceKind::Generic => assets.load_generic(&resource).map(|_| ()),
        }
        .with_context(|| format!("failed to bundle '{resource}'"))?;
    }
    Ok(assets)
}

/// Rust source exposing `blob` as `ASSETS` and its length as `ASSETS_LEN`.
pub fn render_source(blob: &[u8]) -> String {
    let mut out = String::with_capacity(blob.len() * 6 + 128);
    let _ = writeln!(out, "pub static ASSETS: [u8; {}] = [", blob.len());
    for line in blob.chunks(16) {
        out.push_str("   ");
        for byte in line {
            let _ = write!(out, " 0x{byte:02X},");
        }
        out.push('\n');
    }
    out.push_str("];\n");
    let _ = writeln!(out, "pub const ASSETS_LEN: usize = {};", blob.len());
    out
}

/// Bundles `root` and writes both output files into `out_dir`.
pub fn run(root: &Path, out_dir: &Path) -> Result<usize> {
    let assets = bundle(root)?;
    let blob = assets.serialize()?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create '{}'", out_dir.display()))?;
    let source_path = out_dir.join(SOURCE_FILE);
    fs::write(&source_path, render_source(&blob))
        .with_context(|| format!("failed to write '{}'", source_path.display()))?;
    let pack_path = out_dir.join(PACK_FILE);
    fs::write(&pack_path, &blob)
        .with_context(|| format!("failed to write '{}'", pack_path.display()))?;

    info!(
        resources = assets.len(),
        bytes = blob.len(),
        "wrote {} and {}",
        source_path.display(),
        pack_path.display()
    );
    Ok(blob.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_extension() {
        assert_eq!(ResourceKind::classify("scripts/libdemo.so"), ResourceKind::Script);
        assert_eq!(ResourceKind::classify("demo.DLL"), ResourceKind::Script);
        assert_eq!(ResourceKind::classify("a/b.dylib"), ResourceKind::Script);
        assert_eq!(ResourceKind::classify("tiles/grass.png"), ResourceKind::Image);
        assert_eq!(ResourceKind::classify("photo.JPEG"), ResourceKind::Image);
        assert_eq!(ResourceKind::classify("old.bmp"), ResourceKind::Image);
        assert_eq!(ResourceKind::classify("level.txt"), ResourceKind::Generic);
        assert_eq!(ResourceKind::classify("Makefile"), ResourceKind::Generic);
        assert_eq!(ResourceKind::classify("png"), ResourceKind::Generic);
    }

    #[test]
    fn source_lists_every_byte() {
        let source = render_source(&[0x00, 0xAB, 0x7F]);
        assert!(source.starts_with("pub static ASSETS: [u8; 3] = [\n"));
        assert!(source.contains("0x00, 0xAB, 0x7F,"));
        assert!(source.ends_with("pub const ASSETS_LEN: usize = 3;\n"));
    }

    #[test]
    fn empty_blob_still_renders() {
        let source = render_source(&[]);
        assert!(source.contains("[u8; 0]"));
        assert!(source.contains("ASSETS_LEN: usize = 0;"));
    }
}
