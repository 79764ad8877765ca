#![no_main]

use libfuzzer_sys::fuzz_target;
use multipush::MultipartParser;

fuzz_target!(|data: &[u8]| {
    // Whole-buffer write, then the same input split into two chunks at every
    // offset: the consumed counts must agree and nothing may panic.
    let mut parser = MultipartParser::with_boundary("X-BOUNDARY", ()).expect("boundary");
    let consumed = parser.write(data);
    assert!(consumed <= data.len());
    let _ = parser.end();

    for split in 0..data.len().min(64) {
        let (head, tail) = data.split_at(split);
        let mut parser = MultipartParser::with_boundary("X-BOUNDARY", ()).expect("boundary");
        let mut split_consumed = parser.write(head);
        if split_consumed == head.len() {
            split_consumed += parser.write(tail);
        }
        assert_eq!(split_consumed, consumed);
        let _ = parser.end();
    }
});
