use criterion::{Criterion, criterion_group, criterion_main};
use hid_uclogic_protocol::{
    CapabilityBuffer, REPORT_SIZE, ReportFamily, ReportRewriter, RewriteState,
    parse_capabilities, synthesize,
};

const STYLUS: [u8; REPORT_SIZE] = [
    0x08, 0x81, 0xe0, 0x03, 0x8b, 0x0d, 0xff, 0x1f, 0x00, 0x00, 0x00, 0x00,
];
const PAD: [u8; REPORT_SIZE] = [
    0x08, 0xe0, 0x01, 0x01, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
const DIAL: [u8; REPORT_SIZE] = [
    0x08, 0xf1, 0x01, 0x02, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

fn benchmark_rewrite(c: &mut Criterion) {
    let rewriter = ReportRewriter::new(ReportFamily::Primary);

    for (name, raw) in [("stylus", STYLUS), ("pad", PAD), ("dial", DIAL)] {
        c.bench_function(&format!("rewrite_into {name}"), |b| {
            let mut state = RewriteState::new();
            let mut out = [0u8; REPORT_SIZE];
            b.iter(|| {
                let result = rewriter.rewrite_into(
                    std::hint::black_box(&raw),
                    &mut state,
                    &mut out,
                );
                std::hint::black_box((result, out));
            });
        });
    }

    c.bench_function("rewrite_into touch strip", |b| {
        let mut state = RewriteState::new();
        let mut out = [0u8; REPORT_SIZE];
        let mut touch = [0x08, 0xf0, 0x01, 0x01, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
        let mut position = 1u8;
        b.iter(|| {
            position = position % 7 + 1;
            touch[5] = position;
            let result = rewriter.rewrite_into(std::hint::black_box(&touch), &mut state, &mut out);
            std::hint::black_box((result, out));
        });
    });

    c.bench_function("rewrite foreign id", |b| {
        let mut state = RewriteState::new();
        let mut raw = STYLUS;
        raw[0] = 0x01;
        b.iter(|| std::hint::black_box(rewriter.rewrite(std::hint::black_box(&raw), &mut state)));
    });
}

fn benchmark_classification(c: &mut Criterion) {
    let buf = CapabilityBuffer::from_hex_str("120070c600067c00ff1fc8000d0d00000000");

    c.bench_function("parse_capabilities", |b| {
        b.iter(|| {
            if let Ok(buf) = &buf {
                std::hint::black_box(parse_capabilities(std::hint::black_box(buf)).ok());
            }
        });
    });

    c.bench_function("synthesize extended", |b| {
        let caps = buf.as_ref().ok().and_then(|buf| parse_capabilities(buf).ok());
        b.iter(|| {
            if let Some(caps) = &caps {
                std::hint::black_box(synthesize(std::hint::black_box(caps)));
            }
        });
    });
}

criterion_group!(benches, benchmark_rewrite, benchmark_classification);
criterion_main!(benches);
