//! Progress tone playback
//!
//! Queue, output worker, announcement debounce and the engine facade tying
//! them to the synthesis pipeline.

pub mod engine;
pub mod queue;
pub mod supervisor;
pub mod tracker;
pub mod worker;

pub use engine::{EngineStatus, ProgressOutcome, ToneEngine, ToneOutcome, DEFAULT_STOP_TIMEOUT};
pub use queue::PlaybackQueue;
pub use supervisor::{spawn_liveness_supervisor, DEFAULT_LIVENESS_INTERVAL};
pub use tracker::{Announcement, AnnouncementPolicy, ProgressTracker, TrackedObjectId};
pub use worker::{OutputWorker, WorkerState};
