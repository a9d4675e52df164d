use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The presentation side of a submission: a loading indicator, a result
/// panel with three text lines, and a blocking alert.
///
/// Callbacks run with no client lock held and may read the latest result.
pub trait ResultView: Send + Sync {
    fn set_loading(&self, visible: bool);
    fn set_result_visible(&self, visible: bool);
    fn render(&self, stress_level: &str, confidence: &str, generated_at: &str);
    /// Must not return until the user has seen the message.
    fn alert(&self, message: &str);
}

/// Where a downloaded report ends up.
pub trait DownloadSink: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Saves reports into a directory.
///
/// The bytes go to a temporary file next to the destination which is
/// persisted under the final name; on any error the temporary is removed
/// when it drops, so a half-written report never appears.
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl DownloadSink for FileDownloadSink {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;

        let destination = self.dir.join(filename);
        staged.persist(&destination).map_err(|e| e.error)?;

        debug!("Saved {} bytes to {}", bytes.len(), destination.display());
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_writes_named_file() {
        let dir = tempdir().unwrap();
        let sink = FileDownloadSink::new(dir.path());

        let path = sink.save("stress_report.pdf", b"%PDF-1.4 test").unwrap();

        assert_eq!(path, dir.path().join("stress_report.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4 test");
    }

    #[test]
    fn test_save_leaves_no_temporaries() {
        let dir = tempdir().unwrap();
        let sink = FileDownloadSink::new(dir.path());

        sink.save("stress_report.pdf", b"first").unwrap();
        sink.save("stress_report.pdf", b"second").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(fs::read(dir.path().join("stress_report.pdf")).unwrap(), b"second");
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("reports").join("2024");
        let sink = FileDownloadSink::new(&nested);

        let path = sink.save("stress_report.pdf", b"pdf").unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}
