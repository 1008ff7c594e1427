#![no_main]
use libfuzzer_sys::fuzz_target;

use lzo::block::{decompress, LzoStatus};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic; any status is acceptable.
    let mut dst = Vec::new();
    let (status, n) = decompress(data, 0, data.len(), &mut dst, 0);
    if status == LzoStatus::Ok {
        assert_eq!(n, dst.len());
    }

    // Same stream decoded after a prefix: back-references may reach into it.
    if data.len() > 1 {
        let split = data[0] as usize % data.len();
        let mut dst = vec![0xaa; 64];
        let _ = decompress(data, split, data.len() - split, &mut dst, 64);
        assert!(dst.len() >= 64);
    }
});
