//! Plain-text line protocol: one command per line, over TCP or any buffered reader.
//!
//! `N <order_id> <instrument> <price> <quantity> B|S` submits a limit order;
//! `C <order_id>` cancels one. Blank lines are skipped. A malformed line is a
//! read error and terminates the connection after being reported.

use crate::engine::Engine;
use crate::io::{InputSource, ReadResult};
use crate::types::{Command, OrderId, Side};
use log::warn;
use std::io::BufRead;
use std::sync::Arc;

/// Parse one protocol line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(tag) = parts.next() else {
        return Ok(None);
    };
    let command = match tag {
        "N" => {
            let order_id = parse_field(&mut parts, "order id")?;
            let instrument = next_field(&mut parts, "instrument")?.to_string();
            let price = parse_field(&mut parts, "price")?;
            let quantity = parse_field(&mut parts, "quantity")?;
            let side = match next_field(&mut parts, "side")? {
                "B" => Side::Buy,
                "S" => Side::Sell,
                other => return Err(format!("bad side: {}", other)),
            };
            Command::New {
                order_id: OrderId(order_id),
                instrument,
                price,
                quantity,
                side,
            }
        }
        "C" => Command::Cancel {
            order_id: OrderId(parse_field(&mut parts, "order id")?),
        },
        other => return Err(format!("unknown command tag: {}", other)),
    };
    if parts.next().is_some() {
        return Err("trailing fields".into());
    }
    Ok(Some(command))
}

fn next_field<'a>(parts: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<&'a str, String> {
    parts.next().ok_or_else(|| format!("missing {}", what))
}

fn parse_field<'a, T: std::str::FromStr>(
    parts: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<T, String> {
    next_field(parts, what)?
        .parse()
        .map_err(|_| format!("bad {}", what))
}

/// Command source over a buffered reader, one command per line.
pub struct LineSource<R> {
    reader: R,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead + Send> InputSource for LineSource<R> {
    fn read_command(&mut self) -> ReadResult {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return ReadResult::EndOfFile,
                Ok(_) => match parse_line(&line) {
                    Ok(Some(command)) => return ReadResult::Command(command),
                    Ok(None) => continue,
                    Err(e) => return ReadResult::Error(e),
                },
                Err(e) => return ReadResult::Error(e.to_string()),
            }
        }
    }
}

/// Accept loop: hand each incoming connection to the engine as a detached worker.
pub fn run_line_acceptor(listener: std::net::TcpListener, engine: Arc<Engine>) {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                engine.accept(LineSource::new(std::io::BufReader::new(stream)));
            }
            Err(e) => warn!("accept failed: {}", e),
        }
    }
}
