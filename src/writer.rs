//!`io::Write` adapter.
//!
//!Requires `std` feature.

extern crate alloc;

use alloc::vec::Vec;
use std::io::{self, Write};

use crate::stream::{DeflateStatus, DeflateStream, Flush, Outcome};

const DEFAULT_BUFFER_CAPACITY: usize = 4096;

///Streaming compressor which writes deflated data into the supplied writer.
///
///Output is staged through an internal buffer which is fully drained into the
///writer on every call, so the writer never observes partial engine state.
///
///## Usage
///
///```rust
///use zdeflate::DeflateWriter;
///use zdeflate::stream::Backend;
///
///let stream = Backend::zlib(Default::default()).expect("to create zlib stream");
///let mut writer = DeflateWriter::new(stream, Vec::new());
///writer.push(&[5; 5]).expect("to compress");
///let output = writer.finish().expect("to finish stream");
///assert!(output.len() > 0);
///```
pub struct DeflateWriter<W> {
    stream: DeflateStream,
    writer: W,
    buffer: Vec<u8>,
}

impl<W: Write> DeflateWriter<W> {
    ///Creates new instance
    pub fn new(stream: DeflateStream, writer: W) -> Self {
        Self {
            stream,
            writer,
            buffer: Vec::with_capacity(DEFAULT_BUFFER_CAPACITY),
        }
    }

    #[inline(always)]
    ///Returns reference to underlying stream
    pub fn stream(&self) -> &DeflateStream {
        &self.stream
    }

    #[inline(always)]
    ///Returns reference to underlying writer
    pub fn writer(&self) -> &W {
        &self.writer
    }

    #[inline(always)]
    ///Returns mutable reference to underlying writer
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    ///Pushes chunk to the stream, writing whatever the engine emits.
    ///
    ///Returns `io::Error` if underlying writer fails, note that in this case
    ///already compressed data is lost.
    pub fn push(&mut self, mut data: &[u8]) -> io::Result<()> {
        loop {
            let result = self.drain(data, Flush::None)?;
            match result.input_remain {
                0 => break Ok(()),
                _ => data = &data[data.len() - result.input_remain..],
            }
        }
    }

    ///Finishes the stream, flushing all pending output, and returns the writer.
    pub fn finish(mut self) -> io::Result<W> {
        loop {
            let result = self.drain(&[], Flush::Finish)?;
            if let Ok(DeflateStatus::Finished) = result.status {
                break;
            }
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn drain(&mut self, data: &[u8], flush: Flush) -> io::Result<Outcome> {
        debug_assert!(self.buffer.is_empty());
        let result = self.stream.deflate_vec(data, &mut self.buffer, flush);
        if !self.buffer.is_empty() {
            self.writer.write_all(&self.buffer)?;
            self.buffer.truncate(0);
        }
        match result.status {
            Ok(_) => Ok(result),
            Err(error) => {
                let description = self.stream.describe_error(error).unwrap_or("unknown deflate error");
                Err(io::Error::new(io::ErrorKind::Other, description))
            },
        }
    }
}
