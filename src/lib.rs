//! # RfJoystickLink
//!
//! One-way wireless joystick remote link.
//!
//! ## Architecture
//!
//! ```text
//! remote:   InputSampler ─▶ TransmitScheduler ─▶ FrameCodec ─▶ radio TX
//! receiver: radio RX ─▶ FrameAssembler ─▶ LinkReceiver ─▶ application
//!                                          (FrameCodec + LinkSupervisor)
//! ```
//!
//! Every component is a plain state machine driven by `tick`/`receive`
//! with an explicit `now_us`. No globals except the log ring, no
//! allocation, no blocking beyond the optional debounce re-read.

#![cfg_attr(not(test), no_std)]

pub mod assembler;
pub mod config;
pub mod frame;
pub mod hal;
pub mod input;
pub mod logging;
pub mod receiver;
pub mod sampler;
pub mod scheduler;
pub mod stats;
pub mod supervisor;
pub mod uart_logger;

pub use assembler::FrameAssembler;
pub use config::{ConfigError, Debounce, LinkConfig, SamplerConfig, SchedulerConfig, SupervisorConfig};
pub use frame::{DecodedFrame, Frame, FrameCodec, FrameError, FRAME_LEN};
pub use hal::AxisSource;
pub use input::{Axis, Button, InputState, Keys};
pub use logging::{LogLevel, LogStream, LINK_LOG};
pub use receiver::{LinkReceiver, Reception};
pub use sampler::{InputSampler, InputSource};
pub use scheduler::{TickReport, TransmitScheduler};
pub use stats::{RxStats, TxStats};
pub use supervisor::{LinkEvent, LinkState, LinkSupervisor};
