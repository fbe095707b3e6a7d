use crate::domain::request::InboundRequest;
use crate::error::Result;
use std::io::Read;

/// Reads an inbound request document from a JSON source.
///
/// Wraps any `Read` source (file, stdin, byte slice); missing optional
/// sub-documents deserialize to `None` rather than failing.
pub struct RequestReader<R: Read> {
    source: R,
}

impl<R: Read> RequestReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<InboundRequest> {
        Ok(serde_json::from_reader(self.source)?)
    }
}
