//! Parse an HTTP/1.1 request head from stdin and dump what the parser saw:
//!
//!   printf 'GET /x HTTP/1.1\r\nHost: a\r\n\r\nbody' | \
//!       cargo run --example parse_dump --features std

use std::io::Read;

use milli_h1::{ParseState, RequestParser};

fn main() {
    let mut stdin = std::io::stdin().lock();
    let mut parser: RequestParser<4096> = RequestParser::new();

    while parser.is_active() {
        let window = parser.recv_window(256);
        if window.is_empty() {
            break;
        }
        let n = stdin.read(window).expect("stdin read failed");
        parser.ingest(n);
        if n == 0 {
            break;
        }
    }

    println!("state:    {:?}", parser.state());
    if parser.state() != ParseState::Done {
        std::process::exit(1);
    }
    println!("method:   {}", String::from_utf8_lossy(parser.method()));
    println!("uri:      {}", String::from_utf8_lossy(parser.uri()));
    println!("headers:  {}", parser.header_count());
    for (name, value) in parser.headers() {
        println!(
            "  {}: {}",
            String::from_utf8_lossy(name),
            String::from_utf8_lossy(value),
        );
    }
    println!(
        "fragment: {:?} ({} bytes)",
        String::from_utf8_lossy(parser.buffer_fragment()),
        parser.buffer_fragment().len(),
    );
}
