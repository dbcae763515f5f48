//! Reader Factory

use std::io::{BufRead, BufReader, Read};

use super::stream::{EventReader, ReaderOptions};

/// Creates [`EventReader`]s bound to byte streams
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlInputFactory {
    options: ReaderOptions,
}

impl XmlInputFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory whose readers use the given options
    pub fn with_options(options: ReaderOptions) -> Self {
        XmlInputFactory { options }
    }

    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    /// Create a reader over a buffered stream. Passed as `&mut R`, the
    /// stream stays with the caller and keeps every byte the reader did not
    /// consume. The reader never closes it.
    pub fn create_event_reader<R: BufRead>(&self, stream: R) -> EventReader<R> {
        EventReader::new(stream)
    }

    /// Create a reader over an unbuffered stream, wrapped in a `BufReader`
    /// of the configured capacity. Unconsumed input stays in that
    /// `BufReader`, returned by [`EventReader::into_inner`].
    pub fn create_buffered_event_reader<R: Read>(&self, stream: R) -> EventReader<BufReader<R>> {
        EventReader::new(BufReader::with_capacity(self.options.buffer_capacity, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_create_reader_over_borrowed_stream() {
        let mut stream = Cursor::new(b"<a/>tail".to_vec());
        {
            let mut reader = XmlInputFactory::new().create_event_reader(&mut stream);
            assert!(reader.has_next().unwrap());
            assert!(reader.next_event().unwrap().is_start_element());
            assert!(reader.next_event().unwrap().is_end_element());
        }
        let mut rest = String::new();
        stream.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "tail");
    }

    #[test]
    fn test_buffered_reader_uses_configured_capacity() {
        let options = ReaderOptions::default().with_buffer_capacity(4);
        let factory = XmlInputFactory::with_options(options);
        assert_eq!(factory.options().buffer_capacity, 4);

        let mut reader = factory.create_buffered_event_reader(Cursor::new(b"<a>bc</a>".to_vec()));
        let events: Vec<_> = reader.by_ref().collect::<crate::Result<_>>().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(reader.into_inner().capacity(), 4);
    }
}
