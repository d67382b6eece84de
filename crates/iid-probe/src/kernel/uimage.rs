//! U-Boot legacy image header

const MAGIC: [u8; 4] = [0x27, 0x05, 0x19, 0x56];
const NAME_OFFSET: usize = 32;
const NAME_LEN: usize = 32;

pub(super) fn is_uimage(image: &[u8]) -> bool {
    image.starts_with(&MAGIC)
}

/// Image name, without the `Linux-` prefix mkimage users conventionally add
pub(super) fn version(image: &[u8]) -> Option<String> {
    let name = image.get(NAME_OFFSET..NAME_OFFSET + NAME_LEN)?;
    let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
    let name = std::str::from_utf8(&name[..end]).ok()?.trim();
    let version = name.strip_prefix("Linux-").unwrap_or(name);
    (!version.is_empty()).then(|| version.to_string())
}
