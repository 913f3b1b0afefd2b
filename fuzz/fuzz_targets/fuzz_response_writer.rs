#![no_main]

use libfuzzer_sys::fuzz_target;

use milli_h1::{ComposeError, ResponseWriter, WriteState};

fuzz_target!(|data: &[u8]| {
    let (seed, rest) = match data.split_first() {
        Some((s, rest)) => (*s, rest),
        None => return,
    };
    let window = 1 + (seed as usize % 32);

    // Split the remainder into alternating header names and values and
    // compose until capacity runs out. Nothing here may panic, and every
    // accepted byte must come back out exactly once, in order.
    let mut w: ResponseWriter<512> = ResponseWriter::new();
    let code = 100 + (seed as u16 % 500);
    let mut expected = Vec::new();

    let reason = &rest[..rest.len().min(24)];
    w.add_status(code, reason).unwrap();
    expected.extend_from_slice(b"HTTP/1.1 ");
    expected.extend_from_slice(&milli_h1::StatusCode(code).as_digits());
    expected.push(b' ');
    expected.extend_from_slice(reason);
    expected.extend_from_slice(b"\r\n");

    for pair in rest.chunks(16) {
        let mid = pair.len() / 2;
        let (name, value) = pair.split_at(mid);
        if name.is_empty() {
            continue;
        }
        match w.add_header(name, value) {
            Ok(()) => {
                expected.extend_from_slice(name);
                expected.extend_from_slice(b": ");
                expected.extend_from_slice(value);
                expected.extend_from_slice(b"\r\n");
            }
            Err(ComposeError::InsufficientCapacity) => break,
            Err(ComposeError::BadState) => unreachable!(),
        }
        assert!(w.len() + 2 <= w.capacity(), "terminator reserve violated");
    }

    w.end_headers().unwrap();
    expected.extend_from_slice(b"\r\n");
    assert!(w.len() <= w.capacity());

    let mut out = Vec::new();
    loop {
        let chunk = w.send_window(window);
        if chunk.is_empty() {
            break;
        }
        let n = chunk.len();
        out.extend_from_slice(chunk);
        w.mark_read(n);
    }
    assert_eq!(w.state(), WriteState::Done);
    assert_eq!(out, expected);
});
