//! Reader based input is turned into a stream of `char`s before lexing. The byte decoding is
//! delegated to `chisel-decoders`, with the [Encoding] selecting which decoder to use.
//! (Currently only ASCII and UTF-8 are supported).
//!
//! The decoders end their iteration on the first byte they can't decode, which is
//! indistinguishable from the end of the input. So the bytes are read and checked against the
//! [Encoding] up front, and only input which is known to decode cleanly is handed to them.
use chisel_decoders::{ascii::AsciiDecoder, utf8::Utf8Decoder};
use std::io::BufRead;

use crate::errors::JsonOutcome;
use crate::lexer_error;

/// Enumeration of different supported encoding types
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
}

impl Default for Encoding {
    #[cfg(feature = "default_utf8_encoding")]
    fn default() -> Self {
        Self::Utf8
    }

    #[cfg(not(feature = "default_utf8_encoding"))]
    fn default() -> Self {
        Self::Ascii
    }
}

/// Read the whole of `reader`, failing with a lexical error if the read fails or if any of the
/// bytes aren't valid for `encoding`. Positions are one-based character offsets.
pub(crate) fn read_input<Buffer: BufRead>(
    reader: &mut Buffer,
    encoding: Encoding,
) -> JsonOutcome<Vec<u8>> {
    let mut bytes = vec![];
    if let Err(err) = reader.read_to_end(&mut bytes) {
        let position = String::from_utf8_lossy(&bytes).chars().count() + 1;
        return lexer_error!(position, format!("failed to read input: {}", err));
    }
    match encoding {
        Encoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(index) => lexer_error!(
                index + 1,
                format!("invalid ASCII byte 0x{:02x}", bytes[index])
            ),
            None => Ok(bytes),
        },
        Encoding::Utf8 => match std::str::from_utf8(&bytes).err() {
            None => Ok(bytes),
            Some(err) => {
                let valid = &bytes[..err.valid_up_to()];
                let position = String::from_utf8_lossy(valid).chars().count() + 1;
                lexer_error!(
                    position,
                    format!("invalid UTF-8 byte 0x{:02x}", bytes[err.valid_up_to()])
                )
            }
        },
    }
}

/// Create a `char` iterator over the contents of `reader`, decoded according to `encoding`
pub(crate) fn chars_from_reader<'a, Buffer: BufRead>(
    reader: &'a mut Buffer,
    encoding: Encoding,
) -> Box<dyn Iterator<Item = char> + 'a> {
    match encoding {
        Encoding::Ascii => Box::new(AsciiDecoder::new(reader)),
        Encoding::Utf8 => Box::new(Utf8Decoder::new(reader)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, BufReader, Read};

    use super::{chars_from_reader, read_input, Encoding};
    use crate::errors::ErrorKind;
    use crate::{assert_json_error, reader_from_bytes};

    /// A reader which hands out some bytes and then fails
    struct Failing<'a>(&'a [u8]);

    impl Read for Failing<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            let n = self.0.read(buf)?;
            Ok(n)
        }
    }

    #[test]
    fn utf8_input_should_decode_to_chars() {
        let mut reader = reader_from_bytes!("{\"snow\":\"\u{2603}\"}");
        let decoded: String = chars_from_reader(&mut reader, Encoding::Utf8).collect();
        assert_eq!(decoded, "{\"snow\":\"\u{2603}\"}");
    }

    #[test]
    fn ascii_input_should_decode_to_chars() {
        let mut reader = reader_from_bytes!("[1, 2, 3]");
        let decoded: String = chars_from_reader(&mut reader, Encoding::Ascii).collect();
        assert_eq!(decoded, "[1, 2, 3]");
    }

    #[test]
    fn invalid_utf8_should_be_reported_where_it_occurs() {
        let mut reader = BufReader::new(&b"[\"\xe2\x98\x83\", \xff 1]"[..]);
        let outcome = read_input(&mut reader, Encoding::Utf8);
        assert_json_error!(outcome, "$", "at position 7: invalid UTF-8 byte 0xff");
    }

    #[test]
    fn non_ascii_bytes_should_be_rejected_under_ascii() {
        let mut reader = reader_from_bytes!("[1,2]\u{e9} garbage");
        let outcome = read_input(&mut reader, Encoding::Ascii);
        assert_json_error!(outcome, "$", "at position 6: invalid ASCII byte 0xc3");
    }

    #[test]
    fn read_failures_should_be_lexical_errors() {
        let mut reader = BufReader::new(Failing(b"[1, 2"));
        let err = read_input(&mut reader, Encoding::Utf8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert!(err.location().is_root());
        assert!(err
            .reason()
            .ends_with("failed to read input: disk on fire"));
    }

    #[test]
    fn valid_input_should_be_read_in_full() {
        let mut reader = reader_from_bytes!("[1, 2] \u{2603}");
        let bytes = read_input(&mut reader, Encoding::Utf8).unwrap();
        assert_eq!(bytes, "[1, 2] \u{2603}".as_bytes());
    }
}
