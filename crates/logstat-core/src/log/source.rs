use crate::{Error, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A line-oriented access log, transparently gunzipped when compressed.
pub struct LogSource {
    path: PathBuf,
    compressed: bool,
    reader: Box<dyn BufRead + Send>,
}

impl LogSource {
    /// Open a log file, sniffing the gzip magic bytes to decide whether to decompress
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening log source: {}", path.display());

        if !path.exists() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }

        let mut file = BufReader::new(File::open(path)?);
        let compressed = file.fill_buf()?.starts_with(&GZIP_MAGIC);

        let reader: Box<dyn BufRead + Send> = if compressed {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(file)
        };

        tracing::debug!(
            "Opened {} ({})",
            path.display(),
            if compressed { "gzip" } else { "plain text" }
        );

        Ok(Self {
            path: path.to_path_buf(),
            compressed,
            reader,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Iterate over lines without their terminators.
    ///
    /// Invalid UTF-8 is replaced rather than treated as an error; a failing
    /// decompressor or read yields `Err` and ends the iteration.
    pub fn lines(self) -> Lines {
        Lines {
            reader: self.reader,
            buf: Vec::new(),
            done: false,
        }
    }
}

pub struct Lines {
    reader: Box<dyn BufRead + Send>,
    buf: Vec<u8>,
    done: bool,
}

impl Iterator for Lines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
