//! Character source for the tokenizer
//!
//! [`CharStream`] delivers one input byte at a time, tracks the 0-based
//! position of the byte it last delivered, and supports a one-step hold: after
//! [`CharStream::hold`] the next call to [`CharStream::next`] re-delivers the
//! same symbol without reading further input or moving the position.

use super::token::SourceLocation;
use log::warn;
use std::io::{BufReader, Bytes, Read};

pub struct CharStream<R: Read> {
    bytes: Bytes<BufReader<R>>,
    symbol: Option<u8>,
    hold: bool,
    exhausted: bool,
    position: SourceLocation,
    next: SourceLocation,
    line_lengths: Vec<usize>,
}

impl<R: Read> CharStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            symbol: None,
            hold: false,
            exhausted: false,
            position: SourceLocation::default(),
            next: SourceLocation::default(),
            line_lengths: Vec::new(),
        }
    }

    /// Deliver the next symbol; `None` marks the end of input and is returned on
    /// every call once the input is exhausted.
    pub fn next(&mut self) -> Option<u8> {
        if self.hold {
            self.hold = false;
            return self.symbol;
        }
        self.symbol = self.read();
        if let Some(byte) = self.symbol {
            self.advance_position(byte);
        }
        self.symbol
    }

    /// Re-deliver the current symbol on the next call to [`CharStream::next`].
    pub fn hold(&mut self) {
        self.hold = true;
    }

    /// Position of the most recently delivered symbol.
    pub fn position(&self) -> SourceLocation {
        self.position
    }

    /// Column counts of every finished row, line feed included.
    pub fn line_lengths(&self) -> &[usize] {
        &self.line_lengths
    }

    fn read(&mut self) -> Option<u8> {
        if self.exhausted {
            return None;
        }
        match self.bytes.next() {
            Some(Ok(byte)) => Some(byte),
            Some(Err(err)) => {
                warn!("read failed at {}, treating as end of input: {err}", self.next);
                self.exhausted = true;
                None
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }

    fn advance_position(&mut self, byte: u8) {
        self.position = self.next;
        if byte == b'\n' {
            self.line_lengths.push(self.next.col + 1);
            self.next = SourceLocation::new(self.next.row + 1, 0);
        } else {
            self.next.col += 1;
        }
    }
}
