//! Version extraction from installed targets
//!
//! A [`Matcher`] is a [`PatternSpec`] that passed validation. Constructing
//! one is the validity check; extraction is only available on a `Matcher`,
//! so an invalid spec can never reach the scan.

use crate::fs::{TargetFs, TargetReader};
use crate::kernel;
use crate::limits::ProbeLimits;
use iid_metadata::{CustomPattern, KnownPattern, PatternSpec};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Match rule for U-Boot and U-Boot SPL version strings
pub const UBOOT_PATTERN: &str = r"U-Boot(?: SPL)? (\S+) \(.*\)";

static UBOOT: Lazy<Option<Regex>> = Lazy::new(|| compile(UBOOT_PATTERN));

/// Region of a target to scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanWindow {
    /// First byte scanned
    pub seek: u64,
    /// Bytes scanned, `None` for "to the end"
    pub length: Option<u64>,
}

impl ScanWindow {
    /// First `length` bytes of the target
    #[inline]
    #[must_use]
    pub const fn head(length: u64) -> Self {
        Self {
            seek: 0,
            length: Some(length),
        }
    }

    fn from_custom(pattern: &CustomPattern) -> Self {
        Self {
            seek: pattern.seek,
            length: (pattern.buffer_size > 0).then_some(pattern.buffer_size),
        }
    }

    fn read(&self, reader: &mut dyn TargetReader) -> io::Result<Vec<u8>> {
        reader.seek(SeekFrom::Start(self.seek))?;
        let mut buf = Vec::new();
        match self.length {
            Some(length) => reader.take(length).read_to_end(&mut buf)?,
            None => reader.read_to_end(&mut buf)?,
        };
        Ok(buf)
    }
}

#[derive(Debug, Clone)]
enum Strategy {
    Scan { regex: Regex, window: ScanWindow },
    UBoot { regex: Regex },
    LinuxKernel,
}

/// Validated version extractor
#[derive(Debug, Clone)]
pub struct Matcher {
    strategy: Strategy,
    limits: ProbeLimits,
}

impl Matcher {
    /// Validate a pattern spec
    ///
    /// Returns `None` when a custom rule is empty, does not compile, or does
    /// not have exactly one capture group. Built-in patterns are always valid.
    #[must_use]
    pub fn new(spec: &PatternSpec) -> Option<Self> {
        let strategy = match spec {
            PatternSpec::Known(KnownPattern::LinuxKernel) => Strategy::LinuxKernel,
            PatternSpec::Known(KnownPattern::UBoot) => Strategy::UBoot {
                regex: (*UBOOT).clone()?,
            },
            PatternSpec::Custom(custom) => Strategy::Scan {
                regex: compile(&custom.regexp)?,
                window: ScanWindow::from_custom(custom),
            },
        };
        Some(Self {
            strategy,
            limits: ProbeLimits::default(),
        })
    }

    /// Check whether a spec is usable
    #[inline]
    #[must_use]
    pub fn is_valid(spec: &PatternSpec) -> bool {
        Self::new(spec).is_some()
    }

    /// Apply probe limits
    #[inline]
    #[must_use]
    pub fn with_limits(mut self, limits: ProbeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Extract the installed version from a target
    ///
    /// Returns the text of the first match's capture group, or an empty
    /// string when nothing matches inside the scanned region. Built-in
    /// patterns read at most [`ProbeLimits::max_scan_bytes`] of the target.
    ///
    /// # Errors
    /// Returns error if the target cannot be opened, sought or read
    pub fn capture(&self, fs: &dyn TargetFs, path: &Path) -> io::Result<String> {
        let mut reader = fs.open(path)?;
        let captured = match &self.strategy {
            Strategy::Scan { regex, window } => {
                let region = window.read(&mut *reader)?;
                tracing::trace!(
                    "scanning {} bytes of {} from offset {}",
                    region.len(),
                    path.display(),
                    window.seek
                );
                first_capture(regex, &region)
            }
            Strategy::UBoot { regex } => {
                let region = self.head(&mut *reader, path)?;
                first_capture(regex, &region)
            }
            Strategy::LinuxKernel => {
                let image = self.head(&mut *reader, path)?;
                kernel::kernel_version(&image, &self.limits)
            }
        };
        Ok(captured.unwrap_or_default())
    }

    fn head(&self, reader: &mut dyn TargetReader, path: &Path) -> io::Result<Vec<u8>> {
        let limit = self.limits.max_scan_bytes;
        let head = ScanWindow::head(limit).read(reader)?;
        if head.len() as u64 == limit {
            tracing::debug!("read of {} stopped at {} bytes", path.display(), limit);
        }
        Ok(head)
    }
}

fn compile(regexp: &str) -> Option<Regex> {
    if regexp.is_empty() {
        return None;
    }
    let regex = Regex::new(regexp).ok()?;
    // Group 0 is the whole match
    (regex.captures_len() == 2).then_some(regex)
}

fn first_capture(regex: &Regex, haystack: &[u8]) -> Option<String> {
    let captures = regex.captures(haystack)?;
    let group = captures.get(1)?;
    Some(String::from_utf8_lossy(group.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemFs;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn custom(regexp: &str) -> PatternSpec {
        PatternSpec::regexp(regexp)
    }

    fn capture(spec: &PatternSpec, contents: &[u8]) -> String {
        let fs = MemFs::new().with_file("/target", contents.to_vec());
        Matcher::new(spec)
            .unwrap()
            .capture(&fs, Path::new("/target"))
            .unwrap()
    }

    #[test]
    fn validity_requires_exactly_one_group() {
        assert!(Matcher::is_valid(&custom("version=([0-9.]+)")));
        assert!(Matcher::is_valid(&custom("(?P<v>\\d+)")));
        assert!(!Matcher::is_valid(&custom("version=[0-9.]+")));
        assert!(!Matcher::is_valid(&custom("(a)(b)")));
        assert!(!Matcher::is_valid(&custom("(unclosed")));
        assert!(!Matcher::is_valid(&custom("")));
    }

    #[test]
    fn non_capturing_groups_do_not_count() {
        assert!(Matcher::is_valid(&custom("(?:v|version)=(\\S+)")));
    }

    #[test]
    fn known_patterns_are_valid() {
        assert!(Matcher::is_valid(&PatternSpec::Known(KnownPattern::UBoot)));
        assert!(Matcher::is_valid(&PatternSpec::Known(
            KnownPattern::LinuxKernel
        )));
    }

    #[test]
    fn captures_first_match() {
        let spec = custom("version=([0-9.]+)");
        let contents = b"name=app\nversion=2.0.0\nversion=3.0.0\n";
        assert_eq!(capture(&spec, contents), "2.0.0");
    }

    #[test]
    fn no_match_is_empty() {
        assert_eq!(capture(&custom("version=([0-9.]+)"), b"nothing here"), "");
    }

    #[test]
    fn seek_skips_leading_bytes() {
        let spec = PatternSpec::Custom(CustomPattern::new("v([0-9]+)").with_seek(4));
        assert_eq!(capture(&spec, b"v111v222"), "222");
    }

    #[test]
    fn buffer_size_bounds_scan() {
        let bounded =
            PatternSpec::Custom(CustomPattern::new("v([0-9]+)").with_buffer_size(4));
        assert_eq!(capture(&bounded, b"....v222"), "");

        let window = PatternSpec::Custom(
            CustomPattern::new("v([0-9]+)")
                .with_seek(4)
                .with_buffer_size(3),
        );
        // Only "v22" is inside the window
        assert_eq!(capture(&window, b"....v222"), "22");
    }

    #[test]
    fn seek_past_end_is_empty() {
        let spec = PatternSpec::Custom(CustomPattern::new("(.)").with_seek(1000));
        assert_eq!(capture(&spec, b"short"), "");
    }

    #[test]
    fn binary_targets_are_scanned() {
        let mut contents = vec![0xFFu8, 0x00, 0xFE];
        contents.extend_from_slice(b"U-Boot 2020.01-rc5 (Jan 01 2020 - 00:00:00 +0000)");
        contents.extend_from_slice(&[0x00, 0xC3]);
        assert_eq!(
            capture(&PatternSpec::Known(KnownPattern::UBoot), &contents),
            "2020.01-rc5"
        );
    }

    #[test]
    fn uboot_spl_variant() {
        let contents = b"\x00U-Boot SPL 2019.04 (Apr 10 2019 - 10:00:00)\x00";
        assert_eq!(
            capture(&PatternSpec::Known(KnownPattern::UBoot), contents),
            "2019.04"
        );
    }

    #[test]
    fn linux_kernel_pattern_reads_image() {
        let contents = b"\x00\x00Linux version 6.6.7 (root@build) #1\x00";
        assert_eq!(
            capture(&PatternSpec::Known(KnownPattern::LinuxKernel), contents),
            "6.6.7"
        );
    }

    /// Zero-filled target that counts the bytes it serves
    #[derive(Debug, Default)]
    struct LargeFs {
        len: u64,
        served: AtomicU64,
    }

    struct LargeReader<'a> {
        fs: &'a LargeFs,
        pos: u64,
    }

    impl Read for LargeReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let left = self.fs.len.saturating_sub(self.pos);
            let n = buf.len().min(usize::try_from(left).unwrap_or(usize::MAX));
            buf[..n].fill(0);
            self.pos += n as u64;
            self.fs.served.fetch_add(n as u64, Ordering::Relaxed);
            Ok(n)
        }
    }

    impl Seek for LargeReader<'_> {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            if let SeekFrom::Start(offset) = pos {
                self.pos = offset;
            }
            Ok(self.pos)
        }
    }

    impl TargetFs for LargeFs {
        fn open(&self, _: &Path) -> io::Result<Box<dyn TargetReader + '_>> {
            Ok(Box::new(LargeReader { fs: self, pos: 0 }))
        }
    }

    #[test]
    fn builtin_patterns_stop_at_scan_limit() {
        let limits = ProbeLimits::new().with_max_scan_bytes(64 * 1024);
        for known in [KnownPattern::LinuxKernel, KnownPattern::UBoot] {
            let fs = LargeFs {
                len: 16 * 1024 * 1024,
                ..LargeFs::default()
            };
            let matcher = Matcher::new(&PatternSpec::Known(known))
                .unwrap()
                .with_limits(limits);

            assert_eq!(matcher.capture(&fs, Path::new("/dev/mmcblk0")).unwrap(), "");
            assert_eq!(fs.served.load(Ordering::Relaxed), 64 * 1024, "{known:?}");
        }
    }

    #[test]
    fn version_beyond_scan_limit_is_not_found() {
        let mut contents = vec![0u8; 8192];
        contents.extend_from_slice(b"U-Boot 2024.01 (Jan 01 2024 - 00:00:00 +0000)");
        let fs = MemFs::new().with_file("/dev/mtd0", contents);
        let uboot = Matcher::new(&PatternSpec::Known(KnownPattern::UBoot)).unwrap();

        let bounded = uboot.clone().with_limits(ProbeLimits::new().with_max_scan_bytes(4096));
        assert_eq!(bounded.capture(&fs, Path::new("/dev/mtd0")).unwrap(), "");
        assert_eq!(uboot.capture(&fs, Path::new("/dev/mtd0")).unwrap(), "2024.01");
    }

    #[test]
    fn missing_target_is_io_error() {
        let matcher = Matcher::new(&custom("(x)")).unwrap();
        let err = matcher
            .capture(&MemFs::new(), Path::new("/absent"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
