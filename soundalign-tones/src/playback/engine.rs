//! Tone engine
//!
//! Facade over the synthesis pipeline, the playback queue and the output
//! worker. Callers on any thread hand in progress updates; each one becomes
//! a rendered tone in the queue, and a single worker streams the queue to
//! the device.
//!
//! The engine never restarts its own worker. An external liveness check
//! (see [`spawn_liveness_supervisor`](crate::playback::spawn_liveness_supervisor))
//! calls [`ToneEngine::ensure_worker`] periodically.

use crate::audio::output::CpalSink;
use crate::audio::sink::{OutputSink, SinkFactory};
use crate::error::{Error, Result};
use crate::playback::queue::PlaybackQueue;
use crate::playback::tracker::{
    Announcement, AnnouncementPolicy, ProgressTracker, TrackedObjectId,
};
use crate::playback::worker::{OutputWorker, WorkerState};
use crate::synth::{render_progress_tone, SynthesisParameters};
use soundalign_common::Direction;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Bounded wait for the worker to exit on stop
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Key used to remember an indeterminate tone in `last_sounded`
const INDETERMINATE_KEY: f64 = -1.0;

/// What happened to the tone for one progress update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneOutcome {
    /// Rendered and queued
    Queued,
    /// Same percent as the last tone; nothing queued
    Unchanged,
    /// No running worker or rendering failed; caller should fall back
    Unavailable,
}

/// Result of [`ToneEngine::notify_progress`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOutcome {
    pub announcement: Option<Announcement>,
    pub tone: ToneOutcome,
}

/// Worker and queue snapshot, logged on restart and at shutdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    pub state: WorkerState,
    pub generation: u64,
    pub queued: usize,
    pub restarts: u64,
    pub enabled: bool,
    pub buffers_written: u64,
}

pub struct ToneEngine {
    /// Swapped whole on settings change
    params: RwLock<Arc<SynthesisParameters>>,
    queue: PlaybackQueue,
    worker: Mutex<Option<OutputWorker>>,
    factory: SinkFactory,
    generation: AtomicU64,
    enabled: AtomicBool,
    shutdown: AtomicBool,
    tracker: Mutex<ProgressTracker>,
    /// Percent of the last queued tone
    last_sounded: Mutex<Option<f64>>,
    restarts: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn determinate(percent: Option<f64>) -> Option<f64> {
    percent.filter(|p| p.is_finite() && *p >= 0.0)
}

impl ToneEngine {
    /// Engine writing to sinks built by `factory`. No worker runs until
    /// [`start`](Self::start).
    pub fn new(params: SynthesisParameters, factory: SinkFactory) -> Self {
        Self {
            params: RwLock::new(Arc::new(params)),
            queue: PlaybackQueue::new(),
            worker: Mutex::new(None),
            factory,
            generation: AtomicU64::new(0),
            enabled: AtomicBool::new(true),
            shutdown: AtomicBool::new(false),
            tracker: Mutex::new(ProgressTracker::default()),
            last_sounded: Mutex::new(None),
            restarts: AtomicU64::new(0),
        }
    }

    /// Engine on a cpal output device (None = system default)
    pub fn with_cpal(params: SynthesisParameters, device_name: Option<String>) -> Self {
        let factory: SinkFactory = Arc::new(move || {
            Box::new(CpalSink::new(device_name.clone())) as Box<dyn OutputSink>
        });
        Self::new(params, factory)
    }

    /// Start the output worker.
    ///
    /// # Errors
    /// `DeviceUnavailable` when the stream cannot be opened. The engine stays
    /// usable: progress calls report `Unavailable` until a later
    /// `ensure_worker` succeeds.
    pub fn start(&self) -> Result<()> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(Error::WorkerNotRunning);
        }
        self.ensure_worker().map(|_| ())
    }

    /// Start a worker if none is alive.
    ///
    /// Returns true when a new worker was started. Does nothing while the
    /// engine is disabled or shut down. Buffers already queued are kept and
    /// played by the new worker.
    pub fn ensure_worker(&self) -> Result<bool> {
        if self.shutdown.load(Ordering::SeqCst) || !self.enabled.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let mut worker = lock(&self.worker);
        if worker.as_ref().is_some_and(|w| w.is_alive()) {
            return Ok(false);
        }

        let restarting = worker.is_some();
        if restarting {
            warn!(
                "Output worker is dead, restarting ({} queued buffers kept)",
                self.queue.len()
            );
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        match OutputWorker::spawn(generation, self.queue.clone(), Arc::clone(&self.factory)) {
            Ok(new_worker) => {
                *worker = Some(new_worker);
                if restarting {
                    self.restarts.fetch_add(1, Ordering::Relaxed);
                }
                info!("Output worker {} started", generation);
                Ok(true)
            }
            Err(e) => {
                error!("Failed to start output worker: {}", e);
                *worker = None;
                Err(e)
            }
        }
    }

    pub fn is_worker_alive(&self) -> bool {
        lock(&self.worker).as_ref().is_some_and(|w| w.is_alive())
    }

    pub fn worker_state(&self) -> WorkerState {
        lock(&self.worker)
            .as_ref()
            .map_or(WorkerState::Stopped, |w| w.state())
    }

    /// Swap in new synthesis parameters.
    ///
    /// Tones already queued keep the old parameters; rendering in progress
    /// finishes with the snapshot it took.
    pub fn apply_settings(&self, params: SynthesisParameters) -> Result<()> {
        params.validate()?;
        debug!("Applying synthesis parameters: {:?}", params);
        let mut current = self
            .params
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Arc::new(params);
        Ok(())
    }

    pub fn apply_announcement_policy(&self, policy: AnnouncementPolicy) {
        lock(&self.tracker).set_policy(policy);
    }

    /// Current parameter snapshot
    pub fn parameters(&self) -> Arc<SynthesisParameters> {
        let current = self
            .params
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&current)
    }

    /// Render one progress tone and queue it.
    ///
    /// `None` or a negative percent is indeterminate: midpoint frequency,
    /// centred pan.
    ///
    /// # Errors
    /// `WorkerNotRunning` if no worker is alive, `InvalidParameter` if the
    /// tone cannot be rendered.
    pub fn play_progress_sound(&self, percent: Option<f64>, direction: Direction) -> Result<()> {
        if !self.is_worker_alive() {
            return Err(Error::WorkerNotRunning);
        }
        let params = self.parameters();
        let buffer = render_progress_tone(percent.map(|p| p as f32), direction, &params)?;
        self.queue.push(buffer);
        Ok(())
    }

    /// Feed the announcement debounce only
    pub fn track_progress(&self, object: TrackedObjectId, percent: f64) -> Option<Announcement> {
        lock(&self.tracker).observe(object, percent)
    }

    /// Handle one progress update from the host.
    ///
    /// Announcements are debounced; the tone is only gated by "percent
    /// differs from the last tone actually queued". Never fails: problems are
    /// logged and reported as `ToneOutcome::Unavailable`.
    pub fn notify_progress(
        &self,
        percent: Option<f64>,
        direction: Direction,
        object: TrackedObjectId,
    ) -> ProgressOutcome {
        let percent = determinate(percent);
        let announcement = percent.and_then(|p| self.track_progress(object, p));

        let key = percent.unwrap_or(INDETERMINATE_KEY);
        let mut last = lock(&self.last_sounded);
        if *last == Some(key) {
            return ProgressOutcome {
                announcement,
                tone: ToneOutcome::Unchanged,
            };
        }

        let tone = match self.play_progress_sound(percent, direction) {
            Ok(()) => {
                *last = Some(key);
                ToneOutcome::Queued
            }
            Err(e) => {
                debug!("Progress tone unavailable: {}", e);
                ToneOutcome::Unavailable
            }
        };

        ProgressOutcome { announcement, tone }
    }

    /// Drop every queued tone; the one playing finishes
    pub fn flush_queue(&self) -> usize {
        let dropped = self.queue.flush();
        if dropped > 0 {
            info!("Flushed {} queued tones", dropped);
        }
        dropped
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Enable or disable the engine. Disabled engines are not restarted by
    /// the liveness check.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        info!("Tone engine {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> EngineStatus {
        let worker = lock(&self.worker);
        EngineStatus {
            state: worker.as_ref().map_or(WorkerState::Stopped, |w| w.state()),
            generation: worker.as_ref().map_or(0, |w| w.generation()),
            queued: self.queue.len(),
            restarts: self.restarts.load(Ordering::Relaxed),
            enabled: self.is_enabled(),
            buffers_written: worker.as_ref().map_or(0, |w| w.buffers_written()),
        }
    }

    /// Stop the worker for good.
    ///
    /// Queued tones ahead of the stop sentinel still play. Returns false if
    /// the worker did not exit within `timeout` and was detached.
    pub fn stop(&self, timeout: Duration) -> bool {
        self.shutdown.store(true, Ordering::SeqCst);
        let Some(mut worker) = lock(&self.worker).take() else {
            return true;
        };
        let joined = worker.stop(&self.queue, timeout);
        info!("Tone engine stopped");
        joined
    }
}

impl Drop for ToneEngine {
    fn drop(&mut self) {
        if !self.is_shut_down() {
            self.stop(DEFAULT_STOP_TIMEOUT);
        }
    }
}
