use std::cmp::min;
use std::io::{Error, Read};

use log::trace;
use thiserror::Error;

use crate::filter::source::CharSource;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("skip count can't be negative: {0}")]
    NegativeSkip(i64),
    #[error(transparent)]
    Io(#[from] Error),
}

/**
 * Filter for removing comments from Scheme source code.
 *
 * Strips `;` line comments and `#| ... |#` block comments. Block comments do
 * not nest and collapse to a single space at their closing delimiter. New
 * lines are always kept, so the filtered text has the same line count.
 */
pub struct CommentsRemover<S> {
    source: S,
    // Character read past a bare '#'.
    pending: Option<char>,
    block_comment: bool,
    exhausted: bool,
    // UTF-8 bytes of the last character not yet consumed by `Read`.
    encoded: [u8; 4],
    encoded_pos: usize,
    encoded_len: usize,
    // Source error held back by `Read` until the bytes before it are returned.
    error: Option<Error>,
}

impl<S: CharSource> CommentsRemover<S> {
    pub fn new(source: S) -> CommentsRemover<S> {
        CommentsRemover {
            source,
            pending: None,
            block_comment: false,
            exhausted: false,
            encoded: [0; 4],
            encoded_pos: 0,
            encoded_len: 0,
            error: None,
        }
    }

    fn pull(&mut self) -> Result<Option<char>, Error> {
        if let Some(c) = self.pending.take() {
            return Ok(Some(c));
        }
        if self.exhausted {
            return Ok(None);
        }
        let c = self.source.next_char()?;
        if c.is_none() {
            self.exhausted = true;
        }
        Ok(c)
    }

    /// Returns the next filtered character, or `None` at end of stream.
    pub fn next_char(&mut self) -> Result<Option<char>, Error> {
        if self.block_comment {
            return self.scan_block_comment();
        }
        match self.pull()? {
            Some('#') => match self.pull()? {
                Some('|') => {
                    trace!("block comment opened");
                    self.block_comment = true;
                    self.scan_block_comment()
                }
                next => {
                    self.pending = next;
                    Ok(Some('#'))
                }
            },
            Some(';') => self.scan_line_comment(),
            c => Ok(c),
        }
    }

    fn scan_line_comment(&mut self) -> Result<Option<char>, Error> {
        loop {
            match self.pull()? {
                c @ (Some('\n') | None) => return Ok(c),
                Some(_) => {}
            }
        }
    }

    // The character after a '|' is never itself taken as the start of "|#".
    fn scan_block_comment(&mut self) -> Result<Option<char>, Error> {
        loop {
            let mut c = self.pull()?;
            if c == Some('|') {
                c = self.pull()?;
                if c == Some('#') {
                    trace!("block comment closed");
                    self.block_comment = false;
                    return Ok(Some(' '));
                }
            }
            if let Some('\n') | None = c {
                return Ok(c);
            }
        }
    }

    /**
     * Fills `buf` with filtered characters.
     *
     * Returns `None` only if the stream was already at its end, otherwise the
     * number of characters written, which may be less than `buf.len()`.
     */
    pub fn read_into(&mut self, buf: &mut [char]) -> Result<Option<usize>, Error> {
        if buf.is_empty() {
            return Ok(Some(0));
        }
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.next_char()? {
                Some(c) => {
                    *slot = c;
                    count += 1;
                }
                None if count == 0 => return Ok(None),
                None => break,
            }
        }
        Ok(Some(count))
    }

    /// Discards up to `n` filtered characters and returns how many were skipped.
    pub fn skip(&mut self, n: i64) -> Result<u64, FilterError> {
        if n < 0 {
            return Err(FilterError::NegativeSkip(n));
        }
        let mut skipped = 0;
        while skipped < n as u64 {
            if self.next_char()?.is_none() {
                break;
            }
            skipped += 1;
        }
        Ok(skipped)
    }
}

impl<S: CharSource> Iterator for CommentsRemover<S> {
    type Item = Result<char, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_char().transpose()
    }
}

impl<S: CharSource> Read for CommentsRemover<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let mut offset = 0;
        while offset < buf.len() {
            if self.encoded_pos == self.encoded_len {
                match self.next_char() {
                    Ok(Some(c)) => {
                        self.encoded_len = c.encode_utf8(&mut self.encoded).len();
                        self.encoded_pos = 0;
                    }
                    Ok(None) => break,
                    Err(e) if offset == 0 => return Err(e),
                    Err(e) => {
                        self.error = Some(e);
                        break;
                    }
                }
            }
            let size = min(buf.len() - offset, self.encoded_len - self.encoded_pos);
            buf[offset..offset + size]
                .copy_from_slice(&self.encoded[self.encoded_pos..self.encoded_pos + size]);
            self.encoded_pos += size;
            offset += size;
        }
        Ok(offset)
    }
}
