use crate::domain::event::UiEvent;
use crate::error::{CheckoutError, Result};
use std::io::Read;

/// Reads a scripted sequence of UI events from a CSV source.
///
/// The script has an `event,value` header. Whitespace is trimmed and rows
/// without a value column are accepted.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes events, one per row. A malformed row yields an
    /// error without ending the stream.
    pub fn events(self) -> impl Iterator<Item = Result<UiEvent>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
