//! Linux kernel image version probing
//!
//! Kernel images come in several containers. Each has its own place to
//! find the release string:
//!
//! | Format  | Detection                         | Version source                |
//! |---------|-----------------------------------|-------------------------------|
//! | uImage  | BE `0x27051956` at 0              | 32-byte image name at 32      |
//! | bzImage | `HdrS` at 0x202                   | `kernel_version` setup field  |
//! | zImage  | LE `0x016F2818` at 0x24           | banner in the gzip payload    |
//! | Image   | (anything else)                   | banner in the raw bytes       |
//!
//! Malformed images yield `None`; nothing here performs I/O.

mod bzimage;
mod uimage;
mod zimage;

use crate::limits::ProbeLimits;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::fmt;

static LINUX_BANNER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"Linux version (\S+)").ok());

/// Kernel image container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// U-Boot legacy image
    UImage,
    /// x86 boot protocol image
    BzImage,
    /// ARM self-decompressing image
    ZImage,
    /// Uncompressed image, or anything unrecognized
    Raw,
}

impl ImageFormat {
    /// Detect the container of `image`
    #[must_use]
    pub fn detect(image: &[u8]) -> Self {
        if uimage::is_uimage(image) {
            Self::UImage
        } else if bzimage::is_bzimage(image) {
            Self::BzImage
        } else if zimage::is_zimage(image) {
            Self::ZImage
        } else {
            Self::Raw
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UImage => "uImage",
            Self::BzImage => "bzImage",
            Self::ZImage => "zImage",
            Self::Raw => "Image",
        })
    }
}

/// Extract the kernel release from an image
///
/// Falls back to a banner search over the raw bytes when the container
/// specific lookup finds nothing.
#[must_use]
pub fn kernel_version(image: &[u8], limits: &ProbeLimits) -> Option<String> {
    let format = ImageFormat::detect(image);
    tracing::debug!("probing {} kernel image ({} bytes)", format, image.len());

    let found = match format {
        ImageFormat::UImage => uimage::version(image),
        ImageFormat::BzImage => bzimage::version(image),
        ImageFormat::ZImage => zimage::version(image, limits),
        ImageFormat::Raw => None,
    };
    found.or_else(|| banner_version(image))
}

/// Search for the `Linux version <release>` banner
pub(crate) fn banner_version(bytes: &[u8]) -> Option<String> {
    let regex = (*LINUX_BANNER).as_ref()?;
    let captures = regex.captures(bytes)?;
    let release = captures.get(1)?;
    Some(String::from_utf8_lossy(release.as_bytes()).into_owned())
}
