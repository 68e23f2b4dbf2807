// crates/engine_assets/src/compress.rs
//! `[u64 uncompressed length][u32 crc32 of the uncompressed bytes][brotli stream]`,
//! whole buffer at once.

use std::io::Cursor;

use crate::error::{AssetError, AssetResult};

const LEN_FIELD: usize = std::mem::size_of::<u64>();
const CRC_FIELD: usize = std::mem::size_of::<u32>();
pub const HEADER_LEN: usize = LEN_FIELD + CRC_FIELD;

const QUALITY: i32 = 11;
const WINDOW_BITS: i32 = 22;

pub fn compress(data: &[u8]) -> AssetResult<Vec<u8>> {
    let mut out = Vec::with_capacity(HEADER_LEN + data.len() / 2);
    out.extend_from_slice(&(data.len() as u64).to_ne_bytes());
    out.extend_from_slice(&crc32fast::hash(data).to_ne_bytes());
    brotli::BrotliCompress(
        &mut Cursor::new(data),
        &mut out,
        &brotli::enc::BrotliEncoderParams {
            quality: QUALITY,
            lgwin: WINDOW_BITS,
            ..Default::default()
        },
    )
    .map_err(AssetError::Compress)?;
    Ok(out)
}

pub fn decompress(blob: &[u8]) -> AssetResult<Vec<u8>> {
    if blob.len() < HEADER_LEN {
        return Err(AssetError::CorruptAsset(format!(
            "{} bytes is too short for the header",
            blob.len()
        )));
    }
    let (header, stream) = blob.split_at(HEADER_LEN);
    let mut len_raw = [0u8; LEN_FIELD];
    len_raw.copy_from_slice(&header[..LEN_FIELD]);
    let mut crc_raw = [0u8; CRC_FIELD];
    crc_raw.copy_from_slice(&header[LEN_FIELD..]);
    let expected = usize::try_from(u64::from_ne_bytes(len_raw))
        .map_err(|_| AssetError::CorruptAsset("length header exceeds address space".into()))?;
    let checksum = u32::from_ne_bytes(crc_raw);

    let mut out = Vec::new();
    out.try_reserve_exact(expected)
        .map_err(|_| AssetError::CorruptAsset(format!("cannot reserve {expected} bytes")))?;
    brotli::BrotliDecompress(&mut Cursor::new(stream), &mut out)
        .map_err(|e| AssetError::CorruptAsset(format!("decompression failed: {e}")))?;

    if out.len() != expected {
        return Err(AssetError::CorruptAsset(format!(
            "expected {expected} bytes, got {}",
            out.len()
        )));
    }
    let actual = crc32fast::hash(&out);
    if actual != checksum {
        return Err(AssetError::CorruptAsset(format!(
            "checksum mismatch: header says {checksum:08x}, payload hashes to {actual:08x}"
        )));
    }
    Ok(out)
}
