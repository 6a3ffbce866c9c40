//! Fuzz target for Neo Notes archive parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the Neo Notes archive parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use panink::ir::io_neonotes::from_neonotes_archive_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_neonotes_archive_slice(data);
});
