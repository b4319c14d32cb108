//! Routing tracing output through the refresh progress bar.
//!
//! While a refresh run draws its bar, log lines written straight to stderr
//! would tear it. Installing the bar here makes the tracing writer hand
//! complete lines to `ProgressBar::println`, which repaints the bar below
//! them.

use std::io::Write;
use std::sync::Mutex;

use indicatif::ProgressBar;

/// The bar of the refresh run in flight, if any.
static REFRESH_PROGRESS_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Install the bar log lines should be routed through.
pub fn set_refresh_progress_bar(bar: ProgressBar) {
    let mut guard = REFRESH_PROGRESS_BAR.lock().unwrap();
    *guard = Some(bar);
}

/// Stop routing once the run is over.
pub fn clear_refresh_progress_bar() {
    let mut guard = REFRESH_PROGRESS_BAR.lock().unwrap();
    *guard = None;
}

fn active_progress_bar() -> Option<ProgressBar> {
    let guard = REFRESH_PROGRESS_BAR.lock().unwrap();
    guard.clone()
}

fn emit_line(line: &str) -> std::io::Result<()> {
    if let Some(bar) = active_progress_bar() {
        bar.println(line);
    } else {
        let mut stderr = std::io::stderr();
        stderr.write_all(line.as_bytes())?;
        stderr.write_all(b"\n")?;
    }
    Ok(())
}

/// Line-buffered writer handing tracing output to [`emit_line`].
pub struct ProgressWriter {
    buffer: Vec<u8>,
}

impl ProgressWriter {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }
}

impl Default for ProgressWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            let text = String::from_utf8_lossy(&line);
            emit_line(text.trim_end_matches('\n'))?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.buffer.is_empty() {
            let text = String::from_utf8_lossy(&self.buffer);
            let trimmed = text.trim_end();
            if !trimmed.is_empty() {
                emit_line(trimmed)?;
            }
            self.buffer.clear();
        }
        Ok(())
    }
}

impl Drop for ProgressWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// `MakeWriter` for tracing-subscriber that hands out [`ProgressWriter`]s.
pub struct ProgressWriterFactory;

impl ProgressWriterFactory {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProgressWriterFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ProgressWriterFactory {
    type Writer = ProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ProgressWriter::new()
    }
}
