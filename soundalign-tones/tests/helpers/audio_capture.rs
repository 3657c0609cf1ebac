//! Output capture for integration tests
//!
//! Sinks that record what would go to the speakers instead of opening a
//! device, plus sinks that fail on open or on write.

use soundalign_tones::audio::{AudioFrameBuffer, OutputSink, SinkFactory};
use soundalign_tones::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Everything written to capture sinks built by one factory
#[derive(Default)]
pub struct Capture {
    buffers: Mutex<Vec<Vec<i16>>>,
    opens: AtomicUsize,
    closes: AtomicUsize,
}

impl Capture {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Interleaved samples of each written buffer, in write order
    pub fn buffers(&self) -> Vec<Vec<i16>> {
        self.buffers.lock().unwrap().clone()
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.lock().unwrap().len()
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Poll until at least `count` buffers were written
    pub fn wait_for_buffers(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.buffer_count() >= count {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        self.buffer_count() >= count
    }
}

/// Records every buffer; optionally fails the first `fail_writes` writes
/// across all sinks from the same factory
pub struct CaptureSink {
    capture: Arc<Capture>,
    write_failures_left: Arc<AtomicUsize>,
    open: bool,
}

impl OutputSink for CaptureSink {
    fn open(&mut self) -> Result<()> {
        self.capture.opens.fetch_add(1, Ordering::SeqCst);
        self.open = true;
        Ok(())
    }

    fn write(&mut self, buffer: &AudioFrameBuffer) -> Result<()> {
        let failing = self
            .write_failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            // Give callers time to queue more tones behind the failing one
            std::thread::sleep(Duration::from_millis(50));
            return Err(Error::StreamWriteFailure("injected write failure".to_string()));
        }
        self.capture
            .buffers
            .lock()
            .unwrap()
            .push(buffer.samples().collect());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.capture.closes.fetch_add(1, Ordering::SeqCst);
        self.open = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.open
    }
}

/// Factory of capturing sinks sharing one `Capture`
pub fn capture_factory(capture: &Arc<Capture>) -> SinkFactory {
    failing_write_factory(capture, 0)
}

/// Capturing sinks whose first `fail_writes` writes fail, killing the worker
pub fn failing_write_factory(capture: &Arc<Capture>, fail_writes: usize) -> SinkFactory {
    let capture = Arc::clone(capture);
    let write_failures_left = Arc::new(AtomicUsize::new(fail_writes));
    Arc::new(move || {
        Box::new(CaptureSink {
            capture: Arc::clone(&capture),
            write_failures_left: Arc::clone(&write_failures_left),
            open: false,
        }) as Box<dyn OutputSink>
    })
}

/// A device that never opens
pub struct UnavailableSink;

impl OutputSink for UnavailableSink {
    fn open(&mut self) -> Result<()> {
        Err(Error::DeviceUnavailable("no output device".to_string()))
    }

    fn write(&mut self, _buffer: &AudioFrameBuffer) -> Result<()> {
        Err(Error::StreamWriteFailure("not open".to_string()))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_active(&self) -> bool {
        false
    }
}

pub fn unavailable_factory() -> SinkFactory {
    Arc::new(|| Box::new(UnavailableSink) as Box<dyn OutputSink>)
}
