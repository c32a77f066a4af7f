use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::Decoder;

/// Frame decoder that turns raw export bytes into UTF-8 chunks.
///
/// Built on `Encoding::new_decoder`, so a leading BOM is sniffed, removed and
/// allowed to override the configured charset (a UTF-16 export with a BOM is
/// read correctly even when UTF-8 was assumed). Malformed input is replaced
/// with U+FFFD rather than failing the read.
pub struct BomStrippingDecoder {
    decoder: encoding_rs::Decoder,
    /// set once the decoder has been flushed at end of input
    finished: bool,
}

impl BomStrippingDecoder {
    pub fn new(charset: &'static encoding_rs::Encoding) -> Self {
        Self {
            decoder: charset.new_decoder(),
            finished: false,
        }
    }

    fn drain(&mut self, src: &mut BytesMut, last: bool) -> BytesMut {
        let capacity = self
            .decoder
            .max_utf8_buffer_length(src.len())
            .unwrap_or_else(|| src.len() * 3 + 4);
        let mut out = vec![0u8; capacity];
        let (_result, read, written, _replaced) = self.decoder.decode_to_utf8(src, &mut out, last);
        src.advance(read);
        out.truncate(written);
        BytesMut::from(&out[..])
    }
}

impl Decoder for BomStrippingDecoder {
    type Item = BytesMut;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        // A chunk holding only the BOM or a partial code point yields an empty
        // frame; StreamReader skips those.
        Ok(Some(self.drain(src, false)))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // The decoder may still hold a partial sequence even with `buf` empty;
        // flushing it once turns that into U+FFFD.
        if self.finished {
            return Ok(None);
        }
        self.finished = true;
        let chunk = self.drain(buf, true);
        buf.clear();
        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}
