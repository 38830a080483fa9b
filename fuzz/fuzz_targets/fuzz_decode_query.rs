#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz query decoding with arbitrary bytes
    // This should never panic and never leave padding or terminators
    let query = lineq::server::decode_query(data);
    assert!(!query.ends_with('\n'));
    assert!(!query.ends_with('\r'));
    assert!(!query.starts_with('\0'));
    assert!(!query.ends_with('\0'));
});
