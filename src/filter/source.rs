use std::io::{Error, ErrorKind, Read};
use std::str::Chars;

/// Anything that can yield the next character or signal end of stream.
pub trait CharSource {
    fn next_char(&mut self) -> Result<Option<char>, Error>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> Result<Option<char>, Error> {
        (**self).next_char()
    }
}

impl CharSource for Chars<'_> {
    fn next_char(&mut self) -> Result<Option<char>, Error> {
        Ok(self.next())
    }
}

/**
 * Decodes UTF-8 text from a byte stream one character at a time.
 *
 * Malformed sequences decode to U+FFFD; only errors of the underlying reader
 * are reported. Reads byte-by-byte, so wrap unbuffered readers in `BufReader`.
 */
pub struct Utf8Reader<R> {
    r: R,
    // Byte that ended a malformed sequence, decoded on the next call.
    pending: Option<u8>,
}

impl<R: Read> Utf8Reader<R> {
    pub fn new(r: R) -> Utf8Reader<R> {
        Utf8Reader { r, pending: None }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        if let Some(b) = self.pending.take() {
            return Ok(Some(b));
        }
        let mut byte = [0; 1];
        loop {
            match self.r.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

fn sequence_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

impl<R: Read> CharSource for Utf8Reader<R> {
    fn next_char(&mut self) -> Result<Option<char>, Error> {
        let lead = match self.read_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let width = match sequence_width(lead) {
            Some(1) => return Ok(Some(lead as char)),
            Some(width) => width,
            None => return Ok(Some(char::REPLACEMENT_CHARACTER)),
        };

        let mut seq = [lead, 0, 0, 0];
        for slot in seq.iter_mut().take(width).skip(1) {
            match self.read_byte()? {
                Some(b @ 0x80..=0xBF) => *slot = b,
                Some(b) => {
                    self.pending = Some(b);
                    return Ok(Some(char::REPLACEMENT_CHARACTER));
                }
                None => return Ok(Some(char::REPLACEMENT_CHARACTER)),
            }
        }
        // Overlong forms and surrogates pass the checks above.
        Ok(Some(match std::str::from_utf8(&seq[..width]) {
            Ok(decoded) => decoded.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER),
            Err(_) => char::REPLACEMENT_CHARACTER,
        }))
    }
}

#[cfg(test)]
mod test {
    use super::{CharSource, Utf8Reader};
    use std::io::{Cursor, Error, ErrorKind, Read};

    fn drain<S: CharSource>(mut source: S) -> String {
        let mut result = String::new();
        while let Some(c) = source.next_char().unwrap() {
            result.push(c);
        }
        result
    }

    #[test]
    fn test_utf8_multibyte() {
        let text = "(define λ \"привет\") ; 🦀\n";
        assert_eq!(drain(Utf8Reader::new(Cursor::new(text.as_bytes()))), text);
    }

    #[test]
    fn test_utf8_empty() {
        let mut source = Utf8Reader::new(Cursor::new(Vec::new()));
        assert_eq!(source.next_char().unwrap(), None);
        assert_eq!(source.next_char().unwrap(), None);
    }

    fn drain_bytes(bytes: &[u8]) -> String {
        drain(Utf8Reader::new(Cursor::new(bytes)))
    }

    #[test]
    fn test_utf8_invalid_lead() {
        assert_eq!(drain_bytes(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
        assert_eq!(drain_bytes(&[0x80, 0xC0]), "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn test_utf8_bad_continuation() {
        assert_eq!(drain_bytes(&[0xC3, b'(']), "\u{FFFD}(");
        assert_eq!(drain_bytes(b"caf\xe9\")\n"), "caf\u{FFFD}\")\n");
    }

    #[test]
    fn test_utf8_truncated() {
        assert_eq!(drain_bytes(&[b'x', 0xE2, 0x82]), "x\u{FFFD}");
    }

    #[test]
    fn test_utf8_surrogate() {
        assert_eq!(drain_bytes(&[0xED, 0xA0, 0x80, b'!']), "\u{FFFD}!");
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(Error::new(ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_utf8_reader_error_propagates() {
        let mut source = Utf8Reader::new(BrokenReader);
        assert_eq!(source.next_char().unwrap_err().kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_chars_by_reference() {
        let mut chars = "ab".chars();
        assert_eq!((&mut chars).next_char().unwrap(), Some('a'));
        assert_eq!(drain(chars), "b");
    }
}
