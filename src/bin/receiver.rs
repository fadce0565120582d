//! RfJoystickLink receiver firmware.
//!
//! Reads the radio UART, decodes frames, reports input changes and
//! link up/down edges on the log UART.

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    receiver::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!(
        "{}: receiver firmware, build for target_os = \"espidf\" to run it",
        env!("VERSION_STRING")
    );
}

#[cfg(target_os = "espidf")]
mod receiver {
    use esp_idf_svc::hal::delay::TickType;
    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{self, UartRxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::{EspError, ESP_ERR_INVALID_ARG};

    use rf_joystick_link::hal::esp::timestamp_us;
    use rf_joystick_link::hal::BoardPins;
    use rf_joystick_link::uart_logger::{init_uart_logger, uart_logger_task, UartLoggerConfig};
    use rf_joystick_link::{
        link_error, link_info, FrameAssembler, LinkConfig, LinkReceiver, Reception, LINK_LOG,
    };

    /// Link supervision period.
    const POLL_INTERVAL_US: u64 = 500_000;

    /// Longest wait for radio bytes before supervising again.
    const READ_TIMEOUT_MS: u64 = 50;

    const LOG_TARGET: &str = "receiver";

    pub fn run() -> Result<(), EspError> {
        esp_idf_svc::sys::link_patches();

        let peripherals = Peripherals::take()?;
        let config = LinkConfig::default();
        let pins = BoardPins::default();

        let mut log_uart = init_uart_logger(
            peripherals.uart1,
            peripherals.pins.gpio43,
            &UartLoggerConfig::default(),
        )?;
        std::thread::Builder::new()
            .name("log-drain".into())
            .stack_size(4096)
            .spawn(move || uart_logger_task(&mut log_uart, &LINK_LOG))
            .map_err(|_| EspError::from_infallible::<ESP_ERR_INVALID_ARG>())?;

        link_info!(LOG_TARGET, timestamp_us(), "{}", env!("VERSION_STRING"));

        if let Err(e) = config.validate() {
            link_error!(LOG_TARGET, timestamp_us(), "invalid link config: {}", e);
            return Err(EspError::from_infallible::<ESP_ERR_INVALID_ARG>());
        }

        let radio_config = uart::config::Config::default().baudrate(Hertz(pins.radio.baud_rate));
        let radio = UartRxDriver::new(
            peripherals.uart2,
            // SAFETY: radio pin from the board map, not shared
            unsafe { AnyIOPin::new(pins.radio.rx_pin) },
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &radio_config,
        )?;

        let mut receiver = LinkReceiver::from_config(&config);
        let mut assembler = FrameAssembler::new(*receiver.codec());
        let timeout = TickType::new_millis(READ_TIMEOUT_MS).ticks();

        let mut bytes = [0u8; 32];
        let mut last_poll = 0u64;
        loop {
            let n = match radio.read(&mut bytes, timeout) {
                Ok(n) => n,
                Err(e) => {
                    link_error!(LOG_TARGET, timestamp_us(), "radio read failed: {}", e);
                    assembler.reset();
                    0
                }
            };

            for &byte in &bytes[..n] {
                let Some(candidate) = assembler.push(byte) else {
                    continue;
                };
                let now = timestamp_us();
                let reception = match candidate {
                    Ok(frame) => receiver.receive(&frame, now),
                    Err(e) => receiver.reject(e, now),
                };
                if let Reception::Input(state) = reception {
                    link_info!(LOG_TARGET, now, "input {}", state);
                }
            }

            let now = timestamp_us();
            if now.saturating_sub(last_poll) >= POLL_INTERVAL_US {
                receiver.poll(now);
                last_poll = now;
            }
        }
    }
}
