//! Append-only corpus output

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes one tokenized sentence per line and tracks the bytes written
pub struct CorpusWriter<W: Write> {
    sink: W,
    bytes_written: u64,
    lines_written: u64,
}

impl CorpusWriter<BufWriter<File>> {
    /// Truncate-create the corpus file, creating parent directories
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CorpusWriter<W> {
    /// Wrap an empty sink
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            bytes_written: 0,
            lines_written: 0,
        }
    }

    /// Write the tokens joined by single spaces as one line.
    ///
    /// The line is flushed before returning.
    pub fn append<S: AsRef<str>>(&mut self, tokens: &[S]) -> io::Result<()> {
        let mut written = 0u64;
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                self.sink.write_all(b" ")?;
                written += 1;
            }
            let token = token.as_ref().as_bytes();
            self.sink.write_all(token)?;
            written += token.len() as u64;
        }
        self.sink.write_all(b"\n")?;
        self.sink.flush()?;

        self.bytes_written += written + 1;
        self.lines_written += 1;
        Ok(())
    }

    /// Bytes written so far in this run
    pub fn current_size_bytes(&self) -> u64 {
        self.bytes_written
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Flush and hand back the sink
    pub fn into_inner(mut self) -> io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_joins_with_spaces() {
        let mut writer = CorpusWriter::new(Vec::new());
        writer.append(&["hello", "corpus", "world"]).unwrap();
        writer.append(&[String::from("second")]).unwrap();

        assert_eq!(writer.lines_written(), 2);
        assert_eq!(writer.current_size_bytes(), 26);

        let out = writer.into_inner().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello corpus world\nsecond\n");
    }

    #[test]
    fn test_size_counts_utf8_bytes() {
        let mut writer = CorpusWriter::new(Vec::new());
        writer.append(&["東京", "é"]).unwrap();
        // 6 + 1 + 2 + newline
        assert_eq!(writer.current_size_bytes(), 10);
    }

    #[test]
    fn test_create_truncates_and_matches_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("en.txt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale content from a previous run\n").unwrap();

        let mut writer = CorpusWriter::create(&path).unwrap();
        writer.append(&["a", "b", "c"]).unwrap();

        // Flushed after every append, so the file is already complete
        assert_eq!(fs::read_to_string(&path).unwrap(), "a b c\n");
        assert_eq!(
            fs::metadata(&path).unwrap().len(),
            writer.current_size_bytes()
        );
    }

    #[test]
    fn test_create_makes_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/ja.txt");

        let writer = CorpusWriter::create(&path).unwrap();
        assert_eq!(writer.current_size_bytes(), 0);
        assert!(path.exists());
    }
}
