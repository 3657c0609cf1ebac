//! Output worker
//!
//! One dedicated thread per engine drains the playback queue into an
//! `OutputSink`. The sink is created, opened, written and closed entirely on
//! that thread.
//!
//! ```text
//! Stopped -> Starting -> Running -> Draining -> Stopped
//! ```
//!
//! A failed open leaves the worker Stopped. A failed write is logged and ends
//! the loop without retry; restarting is the liveness supervisor's job.

use crate::audio::sink::SinkFactory;
use crate::error::{Error, Result};
use crate::playback::queue::{PlaybackQueue, PopResult, QueueItem};
use crossbeam::channel::{bounded, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Timed pop so the loop can notice a stop flag without a sentinel
pub const POP_TIMEOUT: Duration = Duration::from_millis(200);

/// Longest we wait for the sink to report its open outcome
const OPEN_TIMEOUT: Duration = Duration::from_secs(5);

const JOIN_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Stopped,
    Starting,
    Running,
    Draining,
}

#[derive(Debug)]
struct WorkerStatus {
    state: WorkerState,
    stream_open: bool,
}

/// Handle to a running (or finished) output worker thread
pub struct OutputWorker {
    generation: u64,
    status: Arc<Mutex<WorkerStatus>>,
    stop_flag: Arc<AtomicBool>,
    buffers_written: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

fn lock(status: &Mutex<WorkerStatus>) -> MutexGuard<'_, WorkerStatus> {
    status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn set_state(status: &Mutex<WorkerStatus>, state: WorkerState, stream_open: bool) {
    let mut status = lock(status);
    status.state = state;
    status.stream_open = stream_open;
}

impl OutputWorker {
    /// Start a worker thread and wait for its stream to open.
    ///
    /// # Errors
    /// `DeviceUnavailable` if the sink fails to open (or does not report back
    /// in time); no thread is left running in that case.
    pub fn spawn(generation: u64, queue: PlaybackQueue, factory: SinkFactory) -> Result<Self> {
        let status = Arc::new(Mutex::new(WorkerStatus {
            state: WorkerState::Starting,
            stream_open: false,
        }));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let buffers_written = Arc::new(AtomicU64::new(0));
        let (opened_tx, opened_rx) = bounded::<Result<()>>(1);

        let thread_status = Arc::clone(&status);
        let thread_stop = Arc::clone(&stop_flag);
        let thread_written = Arc::clone(&buffers_written);

        let handle = thread::Builder::new()
            .name(format!("tone-output-{}", generation))
            .spawn(move || {
                let mut sink = factory();
                if let Err(e) = sink.open() {
                    set_state(&thread_status, WorkerState::Stopped, false);
                    let _ = opened_tx.send(Err(e));
                    return;
                }
                set_state(&thread_status, WorkerState::Running, true);
                let _ = opened_tx.send(Ok(()));
                info!("Output worker {} running", generation);

                loop {
                    if thread_stop.load(Ordering::SeqCst) {
                        debug!("Output worker {} stop flag set", generation);
                        break;
                    }

                    match queue.pop_timeout(POP_TIMEOUT) {
                        PopResult::Item(QueueItem::Frames(buffer)) => {
                            if let Err(e) = sink.write(&buffer) {
                                error!("Output worker {} write failed: {}", generation, e);
                                break;
                            }
                            thread_written.fetch_add(1, Ordering::Relaxed);
                        }
                        PopResult::Item(QueueItem::Stop { generation: target })
                            if target == generation =>
                        {
                            debug!("Output worker {} received stop", generation);
                            break;
                        }
                        PopResult::Item(QueueItem::Stop { generation: target }) => {
                            debug!("Ignoring stale stop for worker {}", target);
                        }
                        PopResult::Timeout => {}
                        PopResult::Disconnected => break,
                    }
                }

                set_state(&thread_status, WorkerState::Draining, true);
                if let Err(e) = sink.close() {
                    warn!("Output worker {} failed to close stream: {}", generation, e);
                }
                set_state(&thread_status, WorkerState::Stopped, false);
                info!(
                    "Output worker {} stopped after {} buffers",
                    generation,
                    thread_written.load(Ordering::Relaxed)
                );
            })?;

        match opened_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(())) => Ok(Self {
                generation,
                status,
                stop_flag,
                buffers_written,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(match e {
                    Error::DeviceUnavailable(msg) => Error::DeviceUnavailable(msg),
                    other => Error::DeviceUnavailable(other.to_string()),
                })
            }
            Err(RecvTimeoutError::Timeout) => {
                stop_flag.store(true, Ordering::SeqCst);
                Err(Error::DeviceUnavailable(format!(
                    "output stream did not open within {:?}",
                    OPEN_TIMEOUT
                )))
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = handle.join();
                Err(Error::DeviceUnavailable(
                    "output worker exited before opening the stream".to_string(),
                ))
            }
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> WorkerState {
        lock(&self.status).state
    }

    pub fn is_stream_open(&self) -> bool {
        lock(&self.status).stream_open
    }

    /// True while the thread has not exited
    pub fn is_alive(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn buffers_written(&self) -> u64 {
        self.buffers_written.load(Ordering::Relaxed)
    }

    /// Ask the worker to stop and wait up to `timeout` for it to exit.
    ///
    /// The sentinel goes through the queue, so buffers queued before it are
    /// still played. Returns false if the thread had to be detached.
    pub fn stop(&mut self, queue: &PlaybackQueue, timeout: Duration) -> bool {
        let Some(handle) = self.handle.take() else {
            return true;
        };

        if !handle.is_finished() {
            queue.request_stop(self.generation);
        }

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                // Fallback for a sentinel stuck behind a wedged write
                self.stop_flag.store(true, Ordering::SeqCst);
                warn!(
                    "Output worker {} did not stop within {:?}, detaching",
                    self.generation, timeout
                );
                return false;
            }
            thread::sleep(JOIN_POLL);
        }

        if handle.join().is_err() {
            error!("Output worker {} panicked", self.generation);
        }
        true
    }
}

impl Drop for OutputWorker {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}
