#![no_main]

use libfuzzer_sys::fuzz_target;

use milli_h1::{ParseState, RequestParser, MAX_HEADER_COUNT};

fuzz_target!(|data: &[u8]| {
    // First byte picks the delivery chunk size; the rest is the wire input.
    let (seed, input) = match data.split_first() {
        Some((s, rest)) => (*s, rest),
        None => return,
    };
    let chunk = 1 + (seed as usize % 64);

    // Feeding arbitrary bytes through arbitrary partitions must never
    // panic, and the observable state must stay within its invariants.
    let mut chunked: RequestParser<1024> = RequestParser::new();
    let mut offset = 0;
    while offset < input.len() {
        let window = chunked.recv_window(chunk);
        if window.is_empty() {
            break;
        }
        let n = window.len().min(input.len() - offset);
        window[..n].copy_from_slice(&input[offset..offset + n]);
        chunked.ingest(n);
        offset += n;

        assert!(chunked.len() <= chunked.capacity());
        assert!(chunked.header_count() <= MAX_HEADER_COUNT);
        assert!(chunked.buffer_fragment().len() <= chunked.len());
        for (name, value) in chunked.headers() {
            assert!(milli_h1::is_header_name_valid(name));
            assert!(milli_h1::is_header_value_valid(value));
        }
    }
    chunked.ingest(0);
    assert!(!chunked.is_active());

    // The parsed head must not depend on the partition: replay in one shot
    // and compare everything up to the header terminator.
    let mut oneshot: RequestParser<1024> = RequestParser::new();
    let window = oneshot.recv_window(input.len());
    let n = window.len().min(input.len());
    window[..n].copy_from_slice(&input[..n]);
    oneshot.ingest(n);
    oneshot.ingest(0);

    if chunked.state() == ParseState::Done {
        assert_eq!(oneshot.state(), ParseState::Done);
        assert_eq!(oneshot.method(), chunked.method());
        assert_eq!(oneshot.uri(), chunked.uri());
        assert!(oneshot.headers().eq(chunked.headers()));
    }
});
