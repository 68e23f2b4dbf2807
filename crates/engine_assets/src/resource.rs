// crates/engine_assets/src/resource.rs
use std::borrow::Cow;
use std::fmt;
use std::str::Utf8Error;

use engine_shared::TextureData;
use serde::de::DeserializeOwned;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Generic,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => f.write_str("an image"),
            AssetKind::Generic => f.write_str("a generic blob"),
        }
    }
}

/// Decoded pixels, row-major, `channels` bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u16,
    height: u16,
    channels: u8,
    data: Vec<u8>,
}

impl Image {
    /// `data` must hold exactly `width * height * channels` bytes.
    pub fn new(width: u16, height: u16, channels: u8, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * channels as usize
        );
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn texture_data(&self) -> TextureData<'_> {
        TextureData {
            width: self.width as u32,
            height: self.height as u32,
            channels: self.channels,
            pixels: &self.data,
        }
    }
}

/// Opaque bytes: text files, compiled scripts, anything not an image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Generic {
    data: Vec<u8>,
}

impl Generic {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.data)
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Parses the bytes as a JSON document.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_text_helpers() {
        let g = Generic::new(b"{\"speed\": 2}".to_vec());
        assert_eq!(g.as_str().unwrap(), "{\"speed\": 2}");
        assert_eq!(g.len(), 12);

        let bad = Generic::new(vec![0xff, b'a']);
        assert!(bad.as_str().is_err());
        assert_eq!(bad.to_string_lossy(), "\u{fffd}a");
    }

    #[test]
    fn generic_json_view() {
        let g = Generic::new(br#"{"speed": 2, "tiles": [1, 2]}"#.to_vec());
        let value: serde_json::Value = g.json().unwrap();
        assert_eq!(value["speed"], 2);
        assert_eq!(value["tiles"][1], 2);
        assert!(Generic::new(b"not json".to_vec()).json::<serde_json::Value>().is_err());
    }

    #[test]
    fn texture_data_borrows_pixels() {
        let img = Image::new(1, 2, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let tex = img.texture_data();
        assert_eq!((tex.width, tex.height, tex.channels), (1, 2, 4));
        assert_eq!(tex.pixels.len(), 8);
    }
}
