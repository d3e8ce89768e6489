//! Core engine for Threshold - unlock state machine and orchestration.
//!
//! - [`Controller`] is the synchronous state machine. It takes time as an
//!   argument, owns every gesture detector and timer, and queues [`Effect`]s.
//! - [`present`] turns a controller [`Snapshot`] into a [`Scene`].
//! - [`Session`] drives a controller from a [`Clock`] and runs its effects
//!   on tokio tasks.
//! - [`ThresholdConfig`] loads `~/.threshold/config.toml`.

mod config;
mod controller;
mod picker;
mod presentation;
mod scheduler;
mod session;

pub use config::{
    ConfigError, ContentConfig, DeviceConfig, JudgeConfig, JudgeKind, OrientationSetting,
    ThresholdConfig, config_path, expand_env_vars,
};
pub use controller::{
    Controller, DEPTH_VIBRATION, Effect, EvaluationRequest, Rejected, Snapshot, UNLOCK_VIBRATION,
};
pub use picker::{ChallengePicker, FixedPicker, RandomPicker};
pub use presentation::{
    ChallengeView, DEPTH_ENTRY, FAIL_MESSAGE, LayerView, OverlayView, PASS_MESSAGE,
    QUESTION_ENTRY, SECRET_ENTRY, Scene, present,
};
pub use scheduler::Scheduler;
pub use session::{Clock, ManualClock, Session, SessionEvent, SystemClock};

pub use threshold_gestures;
pub use threshold_providers;
pub use threshold_types;
