// crates/engine_assets/src/store.rs
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{self, Reader, Writer};
use crate::compress;
use crate::error::{AssetError, AssetResult};
use crate::resource::{AssetKind, Generic, Image};

/// Turns script source into whatever the script runtime loads later.
pub trait ScriptCompiler {
    fn compile(
        &self,
        resource: &str,
        source: &[u8],
    ) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>>;
}

/// Resource names use `/` on every platform.
pub fn normalize_resource(name: &str) -> String {
    name.replace('\\', "/")
}

/// Every resource loaded so far, keyed by its root-relative name.
///
/// Indices are handed out densely in load order and never reused, so walking
/// any of the maps yields insertion order and a serialized package is
/// reproducible.
#[derive(Debug)]
pub struct Assets {
    root: PathBuf,
    next_index: usize,
    names: HashMap<String, usize>,
    by_index: BTreeMap<usize, String>,
    images: BTreeMap<usize, Image>,
    generics: BTreeMap<usize, Generic>,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        debug!(root = %root.display(), "creating new empty assets...");
        Self {
            root,
            next_index: 0,
            names: HashMap::new(),
            by_index: BTreeMap::new(),
            images: BTreeMap::new(),
            generics: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn index_of(&self, resource: &str) -> Option<usize> {
        self.names.get(&normalize_resource(resource)).copied()
    }

    pub fn image(&self, index: usize) -> Option<&Image> {
        self.images.get(&index)
    }

    pub fn generic(&self, index: usize) -> Option<&Generic> {
        self.generics.get(&index)
    }

    /// `(name, index)` pairs in index order.
    pub fn resources(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.by_index.iter().map(|(&i, name)| (name.as_str(), i))
    }

    // --- Loading ---

    pub fn load_image(&mut self, resource: &str) -> AssetResult<&Image> {
        let name = normalize_resource(resource);
        debug!("loading image resource '{name}'...");
        if let Some(index) = self.names.get(&name).copied() {
            return self.cached_image(&name, index);
        }

        let raw = self.read_resource(&name)?;
        let image = decode_image(&name, &raw)?;
        let index = self.register(name);
        Ok(self.images.entry(index).or_insert(image))
    }

    pub fn load_generic(&mut self, resource: &str) -> AssetResult<&Generic> {
        let name = normalize_resource(resource);
        debug!("loading generic resource '{name}'...");
        if let Some(index) = self.names.get(&name).copied() {
            return self.cached_generic(&name, index);
        }

        let raw = self.read_resource(&name)?;
        let index = self.register(name);
        Ok(self.generics.entry(index).or_insert(Generic::new(raw)))
    }

    /// Stores the compiler's output, not the source.
    pub fn load_script(
        &mut self,
        resource: &str,
        compiler: &dyn ScriptCompiler,
    ) -> AssetResult<&Generic> {
        let name = normalize_resource(resource);
        debug!("loading script resource '{name}'...");
        if let Some(index) = self.names.get(&name).copied() {
            return self.cached_generic(&name, index);
        }

        let source = self.read_resource(&name)?;
        let compiled = compiler
            .compile(&name, &source)
            .map_err(|source| AssetError::ScriptCompile {
                resource: name.clone(),
                source,
            })?;
        let index = self.register(name);
        Ok(self.generics.entry(index).or_insert(Generic::new(compiled)))
    }

    fn read_resource(&self, name: &str) -> AssetResult<Vec<u8>> {
        let path = self.root.join(name);
        fs::read(&path).map_err(|source| AssetError::Io { path, source })
    }

    fn register(&mut self, name: String) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        self.names.insert(name.clone(), index);
        self.by_index.insert(index, name);
        index
    }

    fn kind_at(&self, index: usize) -> Option<AssetKind> {
        if self.images.contains_key(&index) {
            Some(AssetKind::Image)
        } else if self.generics.contains_key(&index) {
            Some(AssetKind::Generic)
        } else {
            None
        }
    }

    fn cached_image(&self, name: &str, index: usize) -> AssetResult<&Image> {
        match self.kind_at(index) {
            Some(AssetKind::Image) => self
                .images
                .get(&index)
                .ok_or_else(|| AssetError::Released(name.to_owned())),
            Some(actual) => Err(AssetError::KindMismatch {
                resource: name.to_owned(),
                expected: AssetKind::Image,
                actual,
            }),
            None => Err(AssetError::Released(name.to_owned())),
        }
    }

    fn cached_generic(&self, name: &str, index: usize) -> AssetResult<&Generic> {
        match self.kind_at(index) {
            Some(AssetKind::Generic) => self
                .generics
                .get(&index)
                .ok_or_else(|| AssetError::Released(name.to_owned())),
            Some(actual) => Err(AssetError::KindMismatch {
                resource: name.to_owned(),
                expected: AssetKind::Generic,
                actual,
            }),
            None => Err(AssetError::Released(name.to_owned())),
        }
    }

    /// Drops pixel and byte payloads. Names and indices stay, so later loads
    /// of a known name report `Released` instead of re-reading the file.
    pub fn release_payloads(&mut self) {
        debug!(
            images = self.images.len(),
            generics = self.generics.len(),
            "releasing asset payloads"
        );
        self.images.clear();
        self.generics.clear();
    }

    // ==================================================================================
    // PACKAGE
    // ==================================================================================

    fn encoded_len(&self) -> usize {
        let word = codec::size_of_value::<usize>();
        // next_index + three counts
        let mut size = word * 4;
        for name in self.by_index.values() {
            size += codec::size_of_string(name) + word;
        }
        for image in self.images.values() {
            size += word + codec::size_of_image(image);
        }
        for generic in self.generics.values() {
            size += word + codec::size_of_bytes(generic.len());
        }
        size
    }

    pub fn serialize(&self) -> AssetResult<Vec<u8>> {
        debug!("serializing assets...");
        let mut data = vec![0u8; self.encoded_len()];
        let mut w = Writer::new(&mut data);

        w.write_value(self.next_index)?;
        w.write_value(self.by_index.len())?;
        for (&index, name) in &self.by_index {
            w.write_string(name)?;
            w.write_value(index)?;
        }
        w.write_value(self.images.len())?;
        for (&index, image) in &self.images {
            w.write_value(index)?;
            w.write_image(image)?;
        }
        w.write_value(self.generics.len())?;
        for (&index, generic) in &self.generics {
            w.write_value(index)?;
            w.write_bytes(generic.bytes())?;
        }
        debug_assert_eq!(w.remaining(), 0);

        compress::compress(&data)
    }

    /// Rebuilds a store from `serialize` output. `root` is only used for
    /// resources loaded afterwards.
    pub fn deserialize(root: impl Into<PathBuf>, blob: &[u8]) -> AssetResult<Self> {
        let root = root.into();
        debug!(root = %root.display(), "creating assets from binary data...");
        let data = compress::decompress(blob)?;
        let mut r = Reader::new(&data);

        let next_index: usize = r.read_value()?;
        let mut names = HashMap::new();
        let mut by_index = BTreeMap::new();
        let name_count: usize = r.read_value()?;
        for _ in 0..name_count {
            let name = r.read_string()?;
            let index: usize = r.read_value()?;
            names.insert(name.clone(), index);
            by_index.insert(index, name);
        }

        let mut images = BTreeMap::new();
        let image_count: usize = r.read_value()?;
        for _ in 0..image_count {
            let index: usize = r.read_value()?;
            images.insert(index, r.read_image()?);
        }

        let mut generics = BTreeMap::new();
        let generic_count: usize = r.read_value()?;
        for _ in 0..generic_count {
            let index: usize = r.read_value()?;
            generics.insert(index, Generic::new(r.read_bytes()?));
        }
        r.finish()?;

        Ok(Self {
            root,
            next_index,
            names,
            by_index,
            images,
            generics,
        })
    }

    pub fn from_pack_file(root: impl Into<PathBuf>, pack: &Path) -> AssetResult<Self> {
        let blob = fs::read(pack).map_err(|source| AssetError::Io {
            path: pack.to_path_buf(),
            source,
        })?;
        Self::deserialize(root, &blob)
    }
}

fn decode_image(name: &str, raw: &[u8]) -> AssetResult<Image> {
    let decoded = image::load_from_memory(raw).map_err(|source| AssetError::Decode {
        resource: name.to_owned(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let too_large = || AssetError::ImageTooLarge {
        resource: name.to_owned(),
        width,
        height,
    };
    let w = u16::try_from(width).map_err(|_| too_large())?;
    let h = u16::try_from(height).map_err(|_| too_large())?;
    Ok(Image::new(w, h, 4, rgba.into_raw()))
}
