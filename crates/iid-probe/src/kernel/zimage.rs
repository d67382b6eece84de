//! ARM self-decompressing image

use super::banner_version;
use crate::limits::ProbeLimits;
use flate2::read::GzDecoder;
use std::io::Read;

const MAGIC_OFFSET: usize = 0x24;
const MAGIC: u32 = 0x016F_2818;
const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

pub(super) fn is_zimage(image: &[u8]) -> bool {
    image
        .get(MAGIC_OFFSET..MAGIC_OFFSET + 4)
        .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
        .map(u32::from_le_bytes)
        == Some(MAGIC)
}

/// Banner found in the first gzip payload that inflates to one
///
/// The decompressor stub is followed by the compressed kernel; where it
/// starts is not recorded, so every gzip header is tried in order.
pub(super) fn version(image: &[u8], limits: &ProbeLimits) -> Option<String> {
    gzip_offsets(image).find_map(|offset| {
        let payload = inflate(&image[offset..], limits.max_decompressed_bytes)?;
        tracing::trace!("inflated {} bytes at offset {:#x}", payload.len(), offset);
        banner_version(&payload)
    })
}

fn gzip_offsets(image: &[u8]) -> impl Iterator<Item = usize> + '_ {
    image
        .windows(GZIP_MAGIC.len())
        .enumerate()
        .filter(|(_, window)| *window == GZIP_MAGIC)
        .map(|(offset, _)| offset)
}

// Truncated or trailing-garbage streams still yield what inflated cleanly
fn inflate(stream: &[u8], limit: u64) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    match GzDecoder::new(stream).take(limit).read_to_end(&mut out) {
        Ok(_) => Some(out),
        Err(_) if !out.is_empty() => Some(out),
        Err(_) => None,
    }
}
