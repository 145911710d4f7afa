//! Minimal one-shot HTTP server for client tests.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Canned reply: status line code and JSON body.
pub struct Reply {
    pub status: u16,
    pub body: &'static str,
}

pub fn ok(body: &'static str) -> Reply {
    Reply { status: 200, body }
}

/// Serve `replies` in order, one connection each. Returns the base URL and a
/// handle yielding the raw request heads that were received.
pub fn serve(replies: Vec<Reply>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for reply in replies {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            seen.push(head);
            let reason = if reply.status == 200 { "OK" } else { "Error" };
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reason,
                reply.body.len(),
                reply.body
            )
            .unwrap();
            stream.flush().unwrap();
        }
        seen
    });
    (base, handle)
}
