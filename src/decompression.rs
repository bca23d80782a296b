use anyhow::{anyhow, Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{Chain, Cursor, Read};
use std::path::Path;

const GZIP_MAGIC: [u8; 3] = [0x1F, 0x8B, 0x08];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Zstd,
    Plain,
}

impl Compression {
    /// Detect the compression format from the first bytes of a stream
    pub fn detect(head: &[u8]) -> Self {
        if head.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else if head.starts_with(&ZSTD_MAGIC) {
            Compression::Zstd
        } else {
            Compression::Plain
        }
    }
}

/// Wrap a reader so gzip and zstd input is decompressed transparently.
///
/// The sniffed bytes are put back in front of the stream, so plain input is
/// passed through unchanged.
pub fn maybe_decompress<R: Read + Send + 'static>(
    mut reader: R,
) -> std::io::Result<Box<dyn Read + Send>> {
    let mut head = [0u8; 4];
    let mut n = 0;
    while n < head.len() {
        let read = reader.read(&mut head[n..])?;
        if read == 0 {
            break;
        }
        n += read;
    }

    let prefix = Cursor::new(head[..n].to_vec());
    let chained: Chain<Cursor<Vec<u8>>, R> = prefix.chain(reader);

    match Compression::detect(&head[..n]) {
        Compression::Gzip => Ok(Box::new(MultiGzDecoder::new(chained))),
        Compression::Zstd => Ok(Box::new(zstd::Decoder::new(chained)?)),
        Compression::Plain => Ok(Box::new(chained)),
    }
}

/// Open a file for reading, decompressing it if needed
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();

    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        if extension.eq_ignore_ascii_case("zip") {
            return Err(anyhow!(
                "ZIP archives are not supported, only gzip and zstd: extract {} first",
                path.display()
            ));
        }
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    maybe_decompress(file)
        .with_context(|| format!("Failed to detect compression of {}", path.display()))
}
