//! x86 boot protocol setup header

const HEADER_MAGIC_OFFSET: usize = 0x202;
const HEADER_MAGIC: &[u8] = b"HdrS";
const VERSION_POINTER_OFFSET: usize = 0x20E;
const SETUP_BASE: usize = 0x200;
const MAX_VERSION_STRING: usize = 256;

pub(super) fn is_bzimage(image: &[u8]) -> bool {
    image.get(HEADER_MAGIC_OFFSET..HEADER_MAGIC_OFFSET + HEADER_MAGIC.len()) == Some(HEADER_MAGIC)
}

/// First word of the string `kernel_version` points at
///
/// The pointer is relative to the end of the boot sector; zero means the
/// header does not carry one.
pub(super) fn version(image: &[u8]) -> Option<String> {
    let pointer: [u8; 2] = image
        .get(VERSION_POINTER_OFFSET..VERSION_POINTER_OFFSET + 2)?
        .try_into()
        .ok()?;
    let pointer = usize::from(u16::from_le_bytes(pointer));
    if pointer == 0 {
        return None;
    }

    let tail = image.get(pointer + SETUP_BASE..)?;
    let tail = &tail[..tail.len().min(MAX_VERSION_STRING)];
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8_lossy(&tail[..end])
        .split_whitespace()
        .next()
        .map(str::to_string)
}
