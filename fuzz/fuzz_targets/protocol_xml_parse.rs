//! Fuzz target for protocol XML parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the protocol XML parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use panink::ir::io_protocol_xml::from_protocol_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_protocol_slice(data);
});
