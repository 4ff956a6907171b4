#![no_main]

use libfuzzer_sys::fuzz_target;
use cvepost_notify::DigestFormatter;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let formatter = DigestFormatter::new(
            7.0,
            vec!["AV:N".to_owned()],
            vec![text.to_owned()],
            "[CVE]".to_owned(),
        );
        let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let _ = formatter.render(&[], today);
    }
});
