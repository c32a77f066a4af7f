use crate::{CleanError, CleanResult};
use async_compression::tokio::bufread::{GzipDecoder, ZstdDecoder};
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader};
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;

use crate::codec::BomStrippingDecoder;

/// Container format of an export, picked from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Plain,
    Gzip,
    Zstd,
}

impl Compression {
    pub fn from_name(name: &str) -> Self {
        if name.ends_with(".gz") {
            Compression::Gzip
        } else if name.ends_with(".zst") {
            Compression::Zstd
        } else {
            Compression::Plain
        }
    }

    /// Suffix to drop when naming the (always uncompressed) cleaned output.
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            Compression::Plain => None,
            Compression::Gzip => Some(".gz"),
            Compression::Zstd => Some(".zst"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceMeta {
    /// file name of the export, used for the compression guess and log lines
    pub name_hint: String,
    pub compression: Compression,
    /// Charset assumed when the file carries no BOM (defaults to UTF-8)
    pub charset: &'static encoding_rs::Encoding,
}

impl Default for SourceMeta {
    fn default() -> Self {
        Self {
            name_hint: String::new(),
            compression: Compression::Plain,
            charset: encoding_rs::UTF_8,
        }
    }
}

/// Wrap a raw byte source with decompression and BOM-aware UTF-8 decoding.
pub fn build_source_reader<R>(raw: R, meta: &SourceMeta) -> impl AsyncRead + Unpin + Send
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buf = BufReader::with_capacity(1 << 16, raw);
    let decompressed: Box<dyn AsyncRead + Unpin + Send> = match meta.compression {
        Compression::Gzip => Box::new(GzipDecoder::new(buf)),
        Compression::Zstd => Box::new(ZstdDecoder::new(buf)),
        Compression::Plain => Box::new(buf),
    };

    // Every export goes through the decoder, UTF-8 included, so the BOM is gone
    // before the CSV reader sees the header.
    let framed = FramedRead::new(decompressed, BomStrippingDecoder::new(meta.charset));
    StreamReader::new(framed)
}

/// Open a local export and build its reader. A path that cannot be opened,
/// or that is not a regular file, is reported as `NotFound` naming the path.
pub async fn reader_from_path(
    path: &Path,
    charset: &'static encoding_rs::Encoding,
) -> CleanResult<(impl AsyncRead + Unpin + Send, SourceMeta)> {
    let not_found = |source| CleanError::NotFound {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).await.map_err(not_found)?;
    let metadata = file.metadata().await.map_err(not_found)?;
    if metadata.is_dir() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "is a directory",
        )));
    }
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let meta = SourceMeta {
        compression: Compression::from_name(&name),
        name_hint: name,
        charset,
    };
    let reader = build_source_reader(file, &meta);
    Ok((reader, meta))
}
