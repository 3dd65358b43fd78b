//! Serialized record sink
//!
//! Extraction happens on whichever worker fetched the page, but the
//! extraction stream is a single append-only byte stream. All records
//! funnel through one mpsc channel into a single writer task, so lines
//! never interleave.

use crate::extractor::ExtractionRecord;
use std::io::Write;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cloneable handle emitting records into the stream
#[derive(Clone)]
pub struct RecordSink {
    tx: mpsc::UnboundedSender<String>,
}

impl RecordSink {
    /// Creates a sink writing one record per line to the given writer
    ///
    /// The returned handle resolves once every sender is dropped and the
    /// stream is flushed.
    pub fn new(mut writer: Box<dyn Write + Send>) -> (Self, JoinHandle<std::io::Result<()>>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let task = tokio::task::spawn_blocking(move || {
            while let Some(line) = rx.blocking_recv() {
                writeln!(writer, "{}", line)?;
            }
            writer.flush()
        });

        (Self { tx }, task)
    }

    /// Creates a sink writing to stdout
    pub fn stdout() -> (Self, JoinHandle<std::io::Result<()>>) {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Emits one extraction record
    pub fn emit(&self, record: &ExtractionRecord) {
        // send only fails when the writer task is gone; the crawl is
        // shutting down at that point and the record is moot
        let _ = self.tx.send(record.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::RecordKind;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_records_become_lines() {
        let buf = SharedBuf(Arc::new(Mutex::new(Vec::new())));
        let (sink, task) = RecordSink::new(Box::new(buf.clone()));

        sink.emit(&ExtractionRecord {
            kind: RecordKind::Title,
            payload: "Hello World".to_string(),
            url: "https://a.example/p".to_string(),
        });
        sink.emit(&ExtractionRecord {
            kind: RecordKind::Lang,
            payload: "en".to_string(),
            url: "https://a.example/p".to_string(),
        });
        drop(sink);
        task.await.unwrap().unwrap();

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            written,
            "title Hello World https://a.example/p\nlang en https://a.example/p\n"
        );
    }

    #[tokio::test]
    async fn test_clones_share_one_stream() {
        let buf = SharedBuf(Arc::new(Mutex::new(Vec::new())));
        let (sink, task) = RecordSink::new(Box::new(buf.clone()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let sink = sink.clone();
            handles.push(tokio::spawn(async move {
                sink.emit(&ExtractionRecord {
                    kind: RecordKind::H2,
                    payload: format!("heading {}", i),
                    url: "https://a.example/p".to_string(),
                });
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        drop(sink);
        task.await.unwrap().unwrap();

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 8);
        for line in lines {
            assert!(line.starts_with("h2 heading "));
            assert!(line.ends_with(" https://a.example/p"));
        }
    }
}
