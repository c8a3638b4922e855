//! 該当グループの出力
//!
//! 出力先と件数は並行する巡回から共有されるため、書き込みは Mutex で直列化する。

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::catalogue::GroupRecord;
use crate::error::FilterError;

const SEPARATOR_WIDTH: usize = 75;

pub struct Reporter {
    out: Mutex<Box<dyn Write + Send>>,
    total: AtomicUsize,
}

impl Reporter {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            total: AtomicUsize::new(0),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.total.store(0, Ordering::SeqCst);
    }

    pub fn searching(&self, url: &str) -> Result<(), FilterError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "Searching: {}", url)?;
        Ok(())
    }

    /// 1件を1行のJSONで出力し、区切り線を付ける
    pub fn report(&self, record: &GroupRecord) -> Result<(), FilterError> {
        let line = serde_json::to_string(record)?;

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        self.total.fetch_add(1, Ordering::SeqCst);
        writeln!(out, "{}", line)?;
        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        Ok(())
    }

    pub fn summary(&self) -> Result<(), FilterError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", "*".repeat(SEPARATOR_WIDTH))?;
        writeln!(out, "Found total of {} results", self.total())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalogue::{normalize, RawRecord};

    /// テスト用の共有バッファ
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_report_and_summary() {
        let buffer = SharedBuffer::default();
        let reporter = Reporter::new(buffer.clone());

        let mut raw = RawRecord::new("https://example.com/g");
        raw.insert("Kod przedmiotu", "1000-ABC");
        reporter.report(&normalize(raw)).unwrap();
        reporter.summary().unwrap();

        let output = buffer.contents();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        let json: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(json["id"], "1000-ABC");
        assert_eq!(json["url"], "https://example.com/g");
        assert_eq!(json["type"], "unknown");
        assert_eq!(lines[1], "-".repeat(75));
        assert_eq!(lines[2], "*".repeat(75));
        assert_eq!(lines[3], "Found total of 1 results");
        assert_eq!(reporter.total(), 1);
    }

    #[test]
    fn test_reset_clears_total() {
        let reporter = Reporter::new(SharedBuffer::default());
        reporter.report(&normalize(RawRecord::new("u"))).unwrap();
        reporter.reset();

        assert_eq!(reporter.total(), 0);
    }

    #[test]
    fn test_searching_line() {
        let buffer = SharedBuffer::default();
        Reporter::new(buffer.clone()).searching("https://example.com").unwrap();

        assert_eq!(buffer.contents(), "Searching: https://example.com\n");
    }
}
