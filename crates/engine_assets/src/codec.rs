// crates/engine_assets/src/codec.rs
//! Fixed-layout binary encoding for the asset package.
//!
//! Everything is native byte order. Lengths are written as `usize`. Buffers
//! are sized up front with the `size_of_*` helpers; a write past the end or a
//! read past the end is an error, never a panic.

use std::mem;

use thiserror::Error;

use crate::resource::Image;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("write of {needed} bytes overflows buffer ({remaining} left)")]
    Overflow { needed: usize, remaining: usize },

    #[error("unexpected end of data: needed {needed} bytes, {remaining} left")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("string is not valid utf-8")]
    InvalidUtf8,

    #[error("{0} trailing bytes after the last record")]
    TrailingBytes(usize),
}

pub type CodecResult<T> = Result<T, CodecError>;

// --- Primitives ---

pub trait Primitive: Copy {
    const SIZE: usize;

    fn put(self, out: &mut [u8]);
    fn get(bytes: &[u8]) -> Self;
}

macro_rules! impl_primitive {
    ($($t:ty),* $(,)?) => {
        $(
            impl Primitive for $t {
                const SIZE: usize = mem::size_of::<$t>();

                fn put(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }

                fn get(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; mem::size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    <$t>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_primitive!(u8, u16, u32, u64, usize);

pub const fn size_of_value<T: Primitive>() -> usize {
    T::SIZE
}

pub fn size_of_string(value: &str) -> usize {
    size_of_bytes(value.len())
}

pub fn size_of_bytes(len: usize) -> usize {
    usize::SIZE + len
}

pub fn size_of_image(image: &Image) -> usize {
    u16::SIZE + u16::SIZE + u8::SIZE + pixel_len(image.width(), image.height(), image.channels())
}

fn pixel_len(width: u16, height: u16, channels: u8) -> usize {
    width as usize * height as usize * channels as usize
}

// ==================================================================================
// WRITER
// ==================================================================================

pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn advance(&mut self, needed: usize) -> CodecResult<&mut [u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(CodecError::Overflow { needed, remaining });
        }
        let start = self.pos;
        self.pos += needed;
        Ok(&mut self.buf[start..self.pos])
    }

    pub fn write_value<T: Primitive>(&mut self, value: T) -> CodecResult<()> {
        value.put(self.advance(T::SIZE)?);
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> CodecResult<()> {
        self.write_value(bytes.len())?;
        self.advance(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> CodecResult<()> {
        self.write_bytes(value.as_bytes())
    }

    pub fn write_image(&mut self, image: &Image) -> CodecResult<()> {
        self.write_value(image.width())?;
        self.write_value(image.height())?;
        self.write_value(image.channels())?;
        let data = image.data();
        self.advance(data.len())?.copy_from_slice(data);
        Ok(())
    }
}

// ==================================================================================
// READER
// ==================================================================================

pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(self) -> CodecResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }

    fn advance(&mut self, needed: usize) -> CodecResult<&'a [u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(CodecError::UnexpectedEof { needed, remaining });
        }
        let buf: &'a [u8] = self.buf;
        let start = self.pos;
        self.pos += needed;
        Ok(&buf[start..self.pos])
    }

    pub fn read_value<T: Primitive>(&mut self) -> CodecResult<T> {
        Ok(T::get(self.advance(T::SIZE)?))
    }

    pub fn read_bytes(&mut self) -> CodecResult<Vec<u8>> {
        let len: usize = self.read_value()?;
        Ok(self.advance(len)?.to_vec())
    }

    pub fn read_string(&mut self) -> CodecResult<String> {
        String::from_utf8(self.read_bytes()?).map_err(|_| CodecError::InvalidUtf8)
    }

    pub fn read_image(&mut self) -> CodecResult<Image> {
        let width: u16 = self.read_value()?;
        let height: u16 = self.read_value()?;
        let channels: u8 = self.read_value()?;
        let data = self.advance(pixel_len(width, height, channels))?.to_vec();
        Ok(Image::new(width, height, channels, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_layout_is_length_then_bytes() {
        let mut buf = vec![0u8; size_of_string("tile.png")];
        let mut w = Writer::new(&mut buf);
        w.write_string("tile.png").unwrap();
        assert_eq!(w.remaining(), 0);

        assert_eq!(&buf[..usize::SIZE], &8usize.to_ne_bytes());
        assert_eq!(&buf[usize::SIZE..], b"tile.png");
    }

    #[test]
    fn image_advances_exactly() {
        let img = Image::new(2, 3, 4, (0..24).collect());
        let mut buf = vec![0u8; size_of_image(&img) + 1];
        let mut w = Writer::new(&mut buf);
        w.write_image(&img).unwrap();
        assert_eq!(w.position(), 2 + 2 + 1 + 24);

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_image().unwrap(), img);
        assert_eq!(r.remaining(), 1);
        assert_eq!(r.finish(), Err(CodecError::TrailingBytes(1)));
    }

    #[test]
    fn mixed_values_read_back_in_order() {
        let size = size_of_value::<u64>() + size_of_value::<u8>() + size_of_bytes(3);
        let mut buf = vec![0u8; size];
        let mut w = Writer::new(&mut buf);
        w.write_value(0xdead_beef_u64).unwrap();
        w.write_value(7u8).unwrap();
        w.write_bytes(&[1, 2, 3]).unwrap();

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_value::<u64>().unwrap(), 0xdead_beef);
        assert_eq!(r.read_value::<u8>().unwrap(), 7);
        assert_eq!(r.read_bytes().unwrap(), vec![1, 2, 3]);
        r.finish().unwrap();
    }

    #[test]
    fn writing_past_the_end_fails() {
        let mut buf = [0u8; 3];
        let mut w = Writer::new(&mut buf);
        assert_eq!(
            w.write_value(1u32),
            Err(CodecError::Overflow {
                needed: 4,
                remaining: 3
            })
        );
        // Nothing was consumed by the failed write.
        assert_eq!(w.position(), 0);
    }

    #[test]
    fn truncated_length_prefix_is_eof() {
        let mut buf = vec![0u8; size_of_string("abc")];
        Writer::new(&mut buf).write_string("abc").unwrap();

        let mut r = Reader::new(&buf[..buf.len() - 1]);
        assert!(matches!(
            r.read_string(),
            Err(CodecError::UnexpectedEof { needed: 3, remaining: 2 })
        ));
    }

    #[test]
    fn huge_length_prefix_does_not_allocate() {
        let buf = usize::MAX.to_ne_bytes();
        let mut r = Reader::new(&buf);
        assert!(matches!(r.read_bytes(), Err(CodecError::UnexpectedEof { .. })));
    }

    #[test]
    fn invalid_utf8_rejected() {
        let mut buf = vec![0u8; size_of_bytes(2)];
        Writer::new(&mut buf).write_bytes(&[0xc3, 0x28]).unwrap();
        assert_eq!(Reader::new(&buf).read_string(), Err(CodecError::InvalidUtf8));
    }
}
