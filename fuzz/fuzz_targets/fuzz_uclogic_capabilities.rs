//! Fuzzes capability string parsing, classification and descriptor synthesis.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_uclogic_capabilities
#![no_main]
use hid_uclogic_protocol::{
    CAPABILITY_BUFFER_LEN, CapabilityBuffer, DeviceProperties, VENDOR_INTERFACE_SIGNATURE,
    classify, parse_capabilities, synthesize,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes.
    let mut raw = [0u8; CAPABILITY_BUFFER_LEN];
    let len = data.len().min(CAPABILITY_BUFFER_LEN);
    raw[..len].copy_from_slice(&data[..len]);
    let buf = CapabilityBuffer::new(raw);

    if let Ok(caps) = parse_capabilities(&buf) {
        let desc = synthesize(&caps);
        assert!(!desc.is_empty());
        let _ = caps.physical_max_x();
        let _ = caps.physical_max_y();
    }

    // Classification against the vendor signature and against whatever
    // trails the capability bytes.
    let props = DeviceProperties {
        firmware_id: Some("GM001_T207_210524".to_owned()),
        legacy_pad_mode: false,
        capabilities: buf,
    };
    let _ = classify(&props, &VENDOR_INTERFACE_SIGNATURE);
    let _ = classify(&props, data.get(len..).unwrap_or_default());
});
