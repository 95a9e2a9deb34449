//! Input decoding - codec detection and multi-frame LZ4
//!
//! Appending to a compressed log adds a new LZ4 frame or gzip member after
//! the existing ones, so decoders here read until the underlying input is
//! exhausted rather than stopping at the first end marker.

use std::io::{self, BufRead, Read};

use lz4_flex::frame::FrameDecoder;
use vaudit_config::Compression;

#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;

/// LZ4 frame magic number, little endian
const LZ4_MAGIC: [u8; 4] = [0x04, 0x22, 0x4d, 0x18];

/// gzip member magic
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Detect a codec from the leading bytes of an input
pub fn sniff(head: &[u8]) -> Compression {
    if head.starts_with(&LZ4_MAGIC) {
        Compression::Lz4
    } else if head.starts_with(&GZIP_MAGIC) {
        Compression::Gzip
    } else {
        Compression::None
    }
}

/// Decoder for a sequence of concatenated LZ4 frames
///
/// A fresh `FrameDecoder` is started on the same input whenever one frame
/// ends and more bytes remain.
pub struct Lz4Frames<R: BufRead> {
    decoder: Option<FrameDecoder<R>>,
}

impl<R: BufRead> Lz4Frames<R> {
    /// Decode frames from `inner`
    pub fn new(inner: R) -> Self {
        Self {
            decoder: Some(FrameDecoder::new(inner)),
        }
    }
}

impl<R: BufRead> Read for Lz4Frames<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let Some(decoder) = self.decoder.as_mut() else {
                return Ok(0);
            };

            let n = decoder.read(buf)?;
            if n > 0 || decoder.get_mut().fill_buf()?.is_empty() {
                return Ok(n);
            }

            // Each restart consumes at least a frame header or fails on it.
            let inner = self.decoder.take().map(FrameDecoder::into_inner);
            self.decoder = inner.map(FrameDecoder::new);
        }
    }
}
