//! Testing utilities for IID workspace
//!
//! Shared fixtures: object builders, failing filesystems and synthetic
//! kernel images.

#![allow(missing_docs)]

use flate2::write::GzEncoder;
use flate2::Compression;
use iid_metadata::{Directive, PatternSpec, Sha256Digest, UpdateObject};
use iid_probe::{MemFs, TargetFs, TargetReader};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const ROOTFS: &str = "/dev/mmcblk0p2";
pub const BOOTLOADER: &str = "/dev/mtd0";
pub const KERNEL: &str = "/dev/mmcblk0p1";

pub fn sha256_hex(contents: &[u8]) -> String {
    Sha256Digest::compute(contents).to_string()
}

pub fn raw_object(target: &str) -> UpdateObject {
    UpdateObject::new("raw")
        .with_filename(format!("{}.img", target.rsplit('/').next().unwrap_or("image")))
        .with_target(target)
}

pub fn digest_object(target: &str, expected: &str) -> UpdateObject {
    raw_object(target).with_directive(Directive::digest(expected))
}

pub fn pattern_object(target: &str, version: &str, pattern: PatternSpec) -> UpdateObject {
    raw_object(target).with_directive(Directive::pattern(version, pattern))
}

pub fn device_fs(files: &[(&str, &[u8])]) -> MemFs {
    files
        .iter()
        .fold(MemFs::new(), |fs, (path, contents)| fs.with_file(*path, contents.to_vec()))
}

/// Filesystem whose opens fail with a fixed error kind
///
/// With no paths configured every open fails; otherwise only the listed
/// paths fail and the rest are served from `inner`.
#[derive(Debug, Clone)]
pub struct FailingFs {
    kind: io::ErrorKind,
    failing: HashSet<PathBuf>,
    inner: MemFs,
}

impl FailingFs {
    pub fn new(kind: io::ErrorKind) -> Self {
        Self {
            kind,
            failing: HashSet::new(),
            inner: MemFs::new(),
        }
    }

    pub fn permission_denied() -> Self {
        Self::new(io::ErrorKind::PermissionDenied)
    }

    #[must_use]
    pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_inner(mut self, inner: MemFs) -> Self {
        self.inner = inner;
        self
    }

    fn fails(&self, path: &Path) -> bool {
        self.failing.is_empty() || self.failing.contains(path)
    }
}

impl TargetFs for FailingFs {
    fn open(&self, path: &Path) -> io::Result<Box<dyn TargetReader + '_>> {
        if self.fails(path) {
            return Err(io::Error::new(
                self.kind,
                format!("{}: injected failure", path.display()),
            ));
        }
        self.inner.open(path)
    }
}

pub fn linux_banner(release: &str) -> Vec<u8> {
    format!("Linux version {release} (builder@ci) (gcc 12.2.0) #1 SMP PREEMPT\n").into_bytes()
}

/// Legacy U-Boot image whose name carries the release
pub fn uimage(release: &str) -> Vec<u8> {
    let mut image = vec![0u8; 64];
    image[..4].copy_from_slice(&[0x27, 0x05, 0x19, 0x56]);
    let name = format!("Linux-{release}");
    let len = name.len().min(32);
    image[32..32 + len].copy_from_slice(&name.as_bytes()[..len]);
    image.extend_from_slice(&[0xEE; 256]);
    image
}

/// x86 boot image with a `kernel_version` setup field
pub fn bzimage(release: &str) -> Vec<u8> {
    const POINTER: u16 = 0x300;
    let mut image = vec![0u8; 0x1000];
    image[0x202..0x206].copy_from_slice(b"HdrS");
    image[0x20E..0x210].copy_from_slice(&POINTER.to_le_bytes());
    let text = format!("{release} (builder@ci) #1 SMP\0");
    let at = usize::from(POINTER) + 0x200;
    image[at..at + text.len()].copy_from_slice(text.as_bytes());
    image
}

/// ARM zImage with a gzip-compressed kernel carrying the banner
pub fn zimage(release: &str) -> Vec<u8> {
    let mut kernel = vec![0u8; 512];
    kernel.extend_from_slice(&linux_banner(release));
    kernel.extend_from_slice(&[0u8; 512]);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&kernel).unwrap();
    let payload = encoder.finish().unwrap();

    let mut image = vec![0u8; 0x200];
    image[0x24..0x28].copy_from_slice(&0x016F_2818u32.to_le_bytes());
    image.extend_from_slice(&payload);
    image
}

/// Uncompressed arm64 `Image`
pub fn raw_kernel(release: &str) -> Vec<u8> {
    let mut image = vec![0u8; 0x400];
    image.extend_from_slice(&linux_banner(release));
    image
}

pub fn uboot_binary(version: &str) -> Vec<u8> {
    let mut binary = vec![0xFFu8; 256];
    binary.extend_from_slice(format!("U-Boot {version} (Jan 01 2024 - 00:00:00 +0000)").as_bytes());
    binary.extend_from_slice(&[0x00; 256]);
    binary
}

/// Contents whose digest `PACKAGE` declares for `rootfs.img`
pub const ROOTFS_V1: &[u8] = b"rootfs-v1";

/// Package metadata with one installation set per slot
pub const PACKAGE: &str = r#"{
    "product": "0123456789",
    "version": "1.2",
    "supported-hardware": ["board-a", "board-b"],
    "objects": [
        [
            {
                "mode": "raw",
                "filename": "rootfs.img",
                "target": "/dev/mmcblk0p2",
                "sha256sum": "57d05f6c47684a90191e1d1dd30e3348d9499c7af2d6f84f2150958550bc3c60",
                "size": 9,
                "install-if-different": "sha256sum"
            },
            {
                "mode": "flash",
                "filename": "u-boot.bin",
                "target": "/dev/mtd0",
                "sha256sum": "aa",
                "install-if-different": { "version": "2024.01", "pattern": "u-boot" }
            },
            {
                "mode": "copy",
                "filename": "app.conf",
                "target": "/etc/app.conf",
                "install-if-different": "aa"
            }
        ],
        [
            {
                "mode": "raw",
                "filename": "rootfs.img",
                "target": "/dev/mmcblk0p3",
                "sha256sum": "57d05f6c47684a90191e1d1dd30e3348d9499c7af2d6f84f2150958550bc3c60"
            }
        ]
    ]
}"#;
