use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iid_metadata::{KnownPattern, PatternSpec};
use iid_probe::{compute_digest, Matcher, MemFs};
use std::path::Path;

const TARGET_SIZE: usize = 4 * 1024 * 1024;

fn target() -> MemFs {
    let mut contents = vec![0x5Au8; TARGET_SIZE];
    let banner = b"U-Boot 2023.04 (Apr 03 2023 - 12:00:00 +0000)";
    let at = TARGET_SIZE - 1024;
    contents[at..at + banner.len()].copy_from_slice(banner);
    MemFs::new().with_file("/dev/mtd0", contents)
}

fn digest_bench(c: &mut Criterion) {
    let fs = target();
    c.bench_function("digest-4MiB", |b| {
        b.iter(|| compute_digest(black_box(&fs), Path::new("/dev/mtd0")));
    });
}

fn scan_bench(c: &mut Criterion) {
    let fs = target();
    let uboot = Matcher::new(&PatternSpec::Known(KnownPattern::UBoot));
    let custom = Matcher::new(&PatternSpec::regexp(r"U-Boot (\S+)"));

    c.bench_function("scan-uboot-4MiB", |b| {
        b.iter(|| {
            uboot
                .as_ref()
                .map(|m| m.capture(black_box(&fs), Path::new("/dev/mtd0")))
        });
    });
    c.bench_function("scan-custom-4MiB", |b| {
        b.iter(|| {
            custom
                .as_ref()
                .map(|m| m.capture(black_box(&fs), Path::new("/dev/mtd0")))
        });
    });
}

criterion_group!(benches, digest_bench, scan_bench);
criterion_main!(benches);
