//! Minimal HTTP/1.1 server demo.
//!
//! Serves a small text page to each connection, driving both sans-io
//! engines through their chunk-handoff loops over a blocking TCP socket:
//!
//!   cargo run --example http1_server --features std
//!
//! Then from another terminal:
//!
//!   curl http://127.0.0.1:8080/

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use milli_h1::{Method, ParseState, RequestParser, ResponseWriter, StatusCode};

fn main() {
    let listener = TcpListener::bind("127.0.0.1:8080").expect("failed to bind TCP on :8080");
    println!("[init] listening on 127.0.0.1:8080");

    loop {
        let (mut stream, client_addr) = match listener.accept() {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("[conn] accept error: {e}");
                continue;
            }
        };
        println!("[conn] accepted connection from {client_addr}");
        if let Err(e) = handle(&mut stream) {
            eprintln!("[conn] error: {e}");
        }
    }
}

fn handle(stream: &mut TcpStream) -> std::io::Result<()> {
    let mut parser: RequestParser<2048> = RequestParser::new();

    // Receive loop: borrow the parser's writable window, read the socket
    // into it, commit what arrived.
    while parser.is_active() {
        let window = parser.recv_window(512);
        if window.is_empty() {
            // Head larger than the buffer; give up on this connection.
            break;
        }
        let n = stream.read(window)?;
        parser.ingest(n);
        if n == 0 {
            break;
        }
    }

    let mut writer: ResponseWriter<1024> = ResponseWriter::new();
    let body: &[u8] = match parser.state() {
        ParseState::Done => {
            println!(
                "[h1] {} {}",
                String::from_utf8_lossy(parser.method()),
                String::from_utf8_lossy(parser.uri()),
            );
            for (name, value) in parser.headers() {
                println!(
                    "[h1]   {}: {}",
                    String::from_utf8_lossy(name),
                    String::from_utf8_lossy(value),
                );
            }

            // Serve any read-only method; everything else gets a 405.
            match Method::from_bytes(parser.method()) {
                Some(m) if m.is_safe() => {
                    println!("[h1] serving {} request", m.as_str());
                    writer.add_status_code(StatusCode::OK).unwrap();
                    writer.add_header(b"content-type", b"text/plain").unwrap();
                    writer.add_header(b"content-length", b"22").unwrap();
                    if m == Method::HEAD {
                        b""
                    } else {
                        b"hello from milli-h1!\r\n"
                    }
                }
                _ => {
                    writer.add_status_code(StatusCode::METHOD_NOT_ALLOWED).unwrap();
                    writer.add_header(b"allow", b"GET, HEAD, OPTIONS, TRACE").unwrap();
                    writer.add_header(b"content-length", b"0").unwrap();
                    b""
                }
            }
        }
        _ => {
            println!("[h1] rejecting malformed request");
            writer.add_status_code(StatusCode::BAD_REQUEST).unwrap();
            writer.add_header(b"content-length", b"0").unwrap();
            writer.add_header(b"connection", b"close").unwrap();
            b""
        }
    };
    writer.end_headers().unwrap();

    // Transmit loop: borrow the next composed chunk, write it out, commit
    // what the socket took.
    loop {
        let chunk = writer.send_window(256);
        if chunk.is_empty() {
            break;
        }
        let n = stream.write(chunk)?;
        writer.mark_read(n);
    }
    stream.write_all(body)?;
    Ok(())
}
