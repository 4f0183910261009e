//! Buffered, compression-aware I/O
//!
//! Inputs may be plain text, gzip or bzip2; the format is detected from the
//! file extension or the leading magic bytes. `-` reads stdin / writes stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file path and/or content
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    // BZ2 magic: "BZh"
    if bytes_read >= 3 && magic[0] == 0x42 && magic[1] == 0x5a && magic[2] == 0x68 {
        return Ok(CompressionFormat::Bzip2);
    }

    Ok(CompressionFormat::Plain)
}

/// True if `path` is the stdin/stdout placeholder
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Open a path for buffered line reading, decompressing as needed
pub fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        return Ok(Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            io::stdin(),
        )));
    }

    let format = detect_compression(path)?;
    let file = File::open(path)?;
    Ok(match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    })
}

/// Open a path (or stdout for `-` / None) for buffered writing
pub fn open_writer(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_stdio(p) => Ok(Box::new(BufWriter::with_capacity(
            DEFAULT_BUFFER_SIZE,
            File::create(p)?,
        ))),
        _ => Ok(Box::new(BufWriter::with_capacity(
            DEFAULT_BUFFER_SIZE,
            io::stdout(),
        ))),
    }
}

/// Byte line iterator that reuses one buffer across lines
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
            line_number: 0,
        }
    }

    /// Read the next line as bytes, without its line terminator,
    /// together with its 1-based line number
    pub fn next_line(&mut self) -> Option<io::Result<(usize, &[u8])>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok((self.line_number, &self.buffer)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::NamedTempFile;

    #[test]
    fn test_byte_line_iterator() -> io::Result<()> {
        let data: &[u8] = b"line1\r\nline2\n\nline3";
        let mut iter = ByteLineIterator::new(data);

        assert_eq!(iter.next_line().unwrap()?, (1, &b"line1"[..]));
        assert_eq!(iter.next_line().unwrap()?, (2, &b"line2"[..]));
        assert_eq!(iter.next_line().unwrap()?, (3, &b""[..]));
        assert_eq!(iter.next_line().unwrap()?, (4, &b"line3"[..]));
        assert!(iter.next_line().is_none());
        Ok(())
    }

    #[test]
    fn test_detect_plain() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "chr1\t1\t10")?;
        temp.flush()?;
        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Plain);
        Ok(())
    }

    #[test]
    fn test_detect_gzip_by_magic_and_read() -> io::Result<()> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hello\nworld\n")?;
        let compressed = encoder.finish()?;

        let mut temp = NamedTempFile::new()?;
        temp.write_all(&compressed)?;
        temp.flush()?;

        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Gzip);
        let lines: Vec<String> = open_reader(temp.path())?.lines().collect::<io::Result<_>>()?;
        assert_eq!(lines, vec!["hello", "world"]);
        Ok(())
    }

    #[test]
    fn test_detect_bzip2_by_magic_and_read() -> io::Result<()> {
        let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(b"a\nb\n")?;
        let compressed = encoder.finish()?;

        let mut temp = NamedTempFile::new()?;
        temp.write_all(&compressed)?;
        temp.flush()?;

        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Bzip2);
        let lines: Vec<String> = open_reader(temp.path())?.lines().collect::<io::Result<_>>()?;
        assert_eq!(lines, vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn test_is_stdio() {
        assert!(is_stdio(Path::new("-")));
        assert!(!is_stdio(Path::new("features.gff3")));
    }
}
