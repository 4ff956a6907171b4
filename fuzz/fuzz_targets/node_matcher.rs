#![no_main]

use libfuzzer_sys::fuzz_target;
use cvepost_advisory::{CveFeed, record_matches};

// 임의 JSON에서 파싱된 설정 트리에 대해 평가기가 패닉 없이 종료하는지 확인
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(feed) = CveFeed::from_json(text) {
            for item in &feed.items {
                let _ = record_matches(item, "acme:widget");
                let _ = record_matches(item, "");
            }
        }
    }
});
