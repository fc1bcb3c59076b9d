//! Fuzzes the report rewrite engine over arbitrary report streams.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_uclogic_rewrite
#![no_main]
use hid_uclogic_protocol::{
    REPORT_SIZE, ReportFamily, ReportRewriter, RewriteState, VendorReport,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes.
    let Some((&selector, reports)) = data.split_first() else {
        return;
    };
    let family = if selector & 1 == 0 {
        ReportFamily::Primary
    } else {
        ReportFamily::Secondary
    };

    let rewriter = ReportRewriter::new(family);
    let mut state = RewriteState::new();
    for chunk in reports.chunks_exact(REPORT_SIZE) {
        let mut raw = [0u8; REPORT_SIZE];
        raw.copy_from_slice(chunk);

        let _ = VendorReport::decode(&raw, family);
        let mut out = [0xAAu8; REPORT_SIZE];
        match rewriter.rewrite_into(&raw, &mut state, &mut out) {
            // A forwarded report always carries one of the normalized ids.
            Ok(()) => assert!(matches!(out[0], 0x08 | 0x03 | 0xF0)),
            // A dropped report leaves the output alone.
            Err(_) => assert_eq!(out, [0xAAu8; REPORT_SIZE]),
        }
    }
});
