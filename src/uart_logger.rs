//! UART log output.
//!
//! Drains [`LINK_LOG`](crate::logging::LINK_LOG) to a TX-only UART so the
//! radio UART stays dedicated to frames.
//!
//! ```text
//! ESP32 GPIO43 (TX) ──────▶ USB-UART RX
//!                             └─▶ PC serial monitor
//! ```

use crate::logging::{BufWriter, LogEntry};

#[cfg(target_os = "espidf")]
use crate::logging::LogStream;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Formatted line buffer size.
pub const LINE_LEN: usize = 160;

/// Dropped-message report interval.
pub const DROP_REPORT_INTERVAL_US: u64 = 10_000_000;

/// UART configuration for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            tx_pin: 43,
        }
    }
}

/// Format a log entry as one line: `[timestamp_us] LEVEL target: message\n`.
///
/// Returns the number of bytes written; output is truncated to `buf`.
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = BufWriter::new(buf);
    let _ = writeln!(writer, "{}", entry);
    writer.len()
}

/// Format the periodic dropped-messages warning.
pub fn format_dropped(dropped: u32, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = BufWriter::new(buf);
    let _ = writeln!(writer, "[WARN] log dropped: {}", dropped);
    writer.len()
}

/// Initialize UART1 TX-only for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Log drain task. Never returns.
#[cfg(target_os = "espidf")]
pub fn uart_logger_task(uart: &mut UartTxDriver<'_>, stream: &LogStream) -> ! {
    let mut line = [0u8; LINE_LEN];
    let mut last_dropped_report = 0u64;

    loop {
        let mut work_done = false;

        while let Some(entry) = stream.drain() {
            let len = format_log_entry(&entry, &mut line);
            let _ = uart.write(&line[..len]);
            work_done = true;
        }

        let now = crate::hal::esp::timestamp_us();
        if now.saturating_sub(last_dropped_report) > DROP_REPORT_INTERVAL_US {
            let dropped = stream.dropped();
            if dropped > 0 {
                let len = format_dropped(dropped, &mut line);
                let _ = uart.write(&line[..len]);
                stream.reset_dropped();
            }
            last_dropped_report = now;
        }

        if !work_done {
            esp_idf_svc::hal::delay::FreeRtos::delay_ms(10);
        }
    }
}
