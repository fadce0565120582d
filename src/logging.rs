//! Non-blocking logging for the link loops.
//!
//! ```text
//! tick loop              LogStream             logger task
//! ─────────              ─────────             ───────────
//!
//! link_warn!() ───────▶ [L0][L1][L2] ───────▶ UART TX
//! non-blocking            lock-free            blocking ok
//! ```
//!
//! # Rules
//!
//! - The sampling/receive loops never block on logging
//! - `println!` and `ESP_LOGx` are not used by the library
//! - Messages are dropped (and counted) when the ring is full
//! - Messages above the stream's max level are skipped, not counted

use core::cell::UnsafeCell;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Maximum message length, longer messages are truncated.
pub const MAX_MSG_LEN: usize = 96;

/// Log ring size (number of entries, power of two).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds (caller's monotonic clock).
    pub timestamp_us: u64,
    pub level: LogLevel,
    /// Component that logged, e.g. `"tx"` or `"rx"`.
    pub target: &'static str,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        target: "",
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text. Truncation may split a UTF-8 sequence; the valid
    /// prefix is returned in that case.
    pub fn message(&self) -> &str {
        let bytes = &self.msg[..self.len as usize];
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// `[timestamp_us] LEVEL target: message`
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:10}] {} {}: {}",
            self.timestamp_us,
            self.level.as_str(),
            self.target,
            self.message()
        )
    }
}

/// One ring slot. `ready` is set by the producer once the entry is written
/// and cleared by the consumer once it has been copied out.
struct Slot {
    ready: AtomicBool,
    entry: UnsafeCell<LogEntry>,
}

const EMPTY_SLOT: Slot = Slot {
    ready: AtomicBool::new(false),
    entry: UnsafeCell::new(LogEntry::EMPTY),
};

/// Lock-free log stream (multiple producers, single consumer).
///
/// - Producers claim a slot with a compare-exchange on `write_idx`, only
///   when the ring has room
/// - Push never blocks (drops the message if full)
/// - Drain stops at a claimed slot whose entry is still being written
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    slots: [Slot; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
    max_level: AtomicU8,
}

// SAFETY: a slot is written only by the producer that claimed it and read
// only by the consumer after `ready` is observed.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create an empty stream that accepts everything up to `Info`.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            slots: [EMPTY_SLOT; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            max_level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Most verbose level that is still recorded.
    #[inline]
    pub fn max_level(&self) -> LogLevel {
        LogLevel::from_u8(self.max_level.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_max_level(&self, level: LogLevel) {
        self.max_level.store(level as u8, Ordering::Relaxed);
    }

    /// Check if `level` would be recorded. Lets macros skip formatting.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.max_level()
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if queued, `false` if filtered or dropped (ring full).
    #[inline]
    pub fn push(&self, timestamp_us: u64, level: LogLevel, target: &'static str, msg: &[u8]) -> bool {
        if !self.enabled(level) {
            return false;
        }

        let mut write = self.write_idx.load(Ordering::Relaxed);
        loop {
            let read = self.read_idx.load(Ordering::Acquire);
            if write.wrapping_sub(read) >= N as u32 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.write_idx.compare_exchange_weak(
                write,
                write.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => write = current,
            }
        }

        let slot = &self.slots[(write as usize) & Self::MASK];
        let len = msg.len().min(MAX_MSG_LEN);

        // SAFETY: the slot was claimed above and the consumer released it
        // (read_idx moved past it) before the claim could succeed.
        unsafe {
            let entry = &mut *slot.entry.get();
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.target = target;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);
        }
        slot.ready.store(true, Ordering::Release);

        true
    }

    /// Drain the next entry (logger task only).
    ///
    /// Returns `None` when empty or when the oldest claimed slot is still
    /// being written; the entry shows up on a later call.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let slot = &self.slots[(read as usize) & Self::MASK];
        if !slot.ready.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: single consumer, `ready` says the producer is done
        let entry = unsafe { *slot.entry.get() };
        slot.ready.store(false, Ordering::Relaxed);

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Count of messages dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() != 0
    }

    /// Number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Global stream shared by the scheduler, the receiver and the binaries.
pub static LINK_LOG: LogStream = LogStream::new();

/// Format a message into a buffer, truncating at the end.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = fmt::write(&mut writer, args);
    writer.pos
}

/// Truncating `fmt::Write` over a byte slice.
pub struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

impl fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Log into an explicit stream.
///
/// ```ignore
/// stream_log!(STREAM, LogLevel::Info, "rx", now_us, "link up after {} us", gap);
/// ```
#[macro_export]
macro_rules! stream_log {
    ($stream:expr, $level:expr, $target:expr, $timestamp:expr, $($arg:tt)*) => {{
        let level = $level;
        if $stream.enabled(level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $stream.push($timestamp, level, $target, &buf[..len]);
        }
    }};
}

/// Log into [`LINK_LOG`](crate::logging::LINK_LOG).
#[macro_export]
macro_rules! link_log {
    ($level:expr, $target:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::stream_log!($crate::logging::LINK_LOG, $level, $target, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! link_error {
    ($target:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Error, $target, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! link_warn {
    ($target:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Warn, $target, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! link_info {
    ($target:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Info, $target, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! link_debug {
    ($target:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Debug, $target, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! link_trace {
    ($target:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Trace, $target, $timestamp, $($arg)*)
    };
}
