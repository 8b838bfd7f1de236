//! Output sink: the two-column `seed_domain, product_url` record stream
//! spec.md §6 names, with the header truncate-and-write-once/append-and-
//! flush-per-row discipline spec.md §5/§6 requires.
//!
//! Grounded on pack example `31e752d2_suryaaravind97-rust-mini-webcrawler`
//! (`csv::Writer` over a plain `std::fs::File`) for the crate choice; the
//! single-mutex-around-every-write discipline follows the teacher's general
//! `Arc<Mutex<_>>`-per-shared-resource style.

use std::fs::OpenOptions;
use std::path::Path;

use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to open output file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
}

/// Serialized two-column CSV sink. One instance is shared (via `Arc`) across
/// every seed's parser worker for the life of the process.
pub struct Output {
    writer: Mutex<csv::Writer<std::fs::File>>,
}

impl Output {
    /// Truncate (or create) `path` and write the header row once.
    pub fn new(path: &Path) -> Result<Self, OutputError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(["seed_domain", "product_url"])?;
        writer.flush()?;
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// Append one `(seed_domain, product_url)` row, flushing immediately so
    /// each record is durable before the next is appended.
    pub async fn write_row(&self, seed_domain: &str, product_url: &str) -> Result<(), OutputError> {
        let mut writer = self.writer.lock().await;
        writer.write_record([seed_domain, product_url])?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn temp_path(label: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("product-crawler-output-test-{label}.csv"));
        path
    }

    #[tokio::test]
    async fn writes_header_once_and_appends_rows() {
        let path = temp_path("header-once");
        let output = Output::new(&path).expect("create output");
        output
            .write_row("shop.test", "https://shop.test/p/1")
            .await
            .expect("write row 1");
        output
            .write_row("shop.test", "https://shop.test/p/2")
            .await
            .expect("write row 2");

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "seed_domain,product_url");
        assert_eq!(lines.len(), 3);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn reopening_truncates_and_rewrites_header() {
        let path = temp_path("truncate");
        {
            let output = Output::new(&path).expect("create output");
            output
                .write_row("shop.test", "https://shop.test/p/1")
                .await
                .expect("write row");
        }
        {
            let _output = Output::new(&path).expect("recreate output");
        }

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents.lines().count(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
