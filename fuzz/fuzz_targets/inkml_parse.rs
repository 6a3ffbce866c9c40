//! Fuzz target for InkML parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the InkML parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use panink::ir::io_inkml::from_inkml_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_inkml_slice(data);
});
