#![no_main]

use libfuzzer_sys::fuzz_target;
use cvepost_advisory::CveFeed;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = CveFeed::from_json(text);
    }
});
