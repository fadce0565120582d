//! RfJoystickLink remote firmware.
//!
//! 1. Validate link configuration
//! 2. Start the UART log drain on its own thread
//! 3. Sample buttons/joystick and transmit on change or keepalive, forever

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    remote::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!(
        "{}: remote firmware, build for target_os = \"espidf\" to run it",
        env!("VERSION_STRING")
    );
}

#[cfg(target_os = "espidf")]
mod remote {
    use esp_idf_svc::hal::adc::attenuation::DB_12;
    use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
    use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
    use esp_idf_svc::hal::delay::{Ets, FreeRtos};
    use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver, Pull};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::{EspError, ESP_ERR_INVALID_ARG};

    use rf_joystick_link::hal::esp::{timestamp_us, EspAxis};
    use rf_joystick_link::hal::BoardPins;
    use rf_joystick_link::input::Button;
    use rf_joystick_link::uart_logger::{init_uart_logger, uart_logger_task, UartLoggerConfig};
    use rf_joystick_link::{
        link_error, link_info, FrameCodec, InputSampler, LinkConfig, TransmitScheduler, LINK_LOG,
    };

    /// Sampling tick period.
    const TICK_MS: u32 = 10;

    /// Report transmit counters every this many microseconds.
    const STATS_INTERVAL_US: u64 = 60_000_000;

    const LOG_TARGET: &str = "remote";

    pub fn run() -> Result<(), EspError> {
        esp_idf_svc::sys::link_patches();

        let peripherals = Peripherals::take()?;
        let config = LinkConfig::default();
        let pins = BoardPins::default();

        // Log drain first so startup errors reach the serial monitor
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

        // Buttons: active-low with internal pull-ups
        let mut buttons = Vec::with_capacity(Button::ALL.len());
        for button in Button::ALL {
            // SAFETY: pin numbers come from the board map and are not used elsewhere
            let pin = unsafe { AnyIOPin::new(pins.button(button)) };
            let mut driver = PinDriver::input(pin)?;
            driver.set_pull(Pull::Up)?;
            buttons.push(driver);
        }
        let buttons = match buttons.try_into() {
            Ok(buttons) => buttons,
            Err(_) => return Err(EspError::from_infallible::<ESP_ERR_INVALID_ARG>()),
        };

        // Joystick on ADC1 (GPIO1 = X, GPIO2 = Y)
        let adc = AdcDriver::new(peripherals.adc1)?;
        let adc_config = AdcChannelConfig {
            attenuation: DB_12,
            ..Default::default()
        };
        let x = EspAxis::new(AdcChannelDriver::new(&adc, peripherals.pins.gpio1, &adc_config)?);
        let y = EspAxis::new(AdcChannelDriver::new(&adc, peripherals.pins.gpio2, &adc_config)?);

        let mut sampler = InputSampler::new(buttons, x, y, Ets, config.sampler);

        // Radio module, TX only
        let radio_config = uart::config::Config::default().baudrate(Hertz(pins.radio.baud_rate));
        let radio = UartTxDriver::new(
            peripherals.uart2,
            // SAFETY: radio pin from the board map, not shared
            unsafe { AnyIOPin::new(pins.radio.tx_pin) },
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &radio_config,
        )?;

        let codec = FrameCodec::new(config.keepalive_preamble);
        let mut scheduler = TransmitScheduler::new(codec, radio, config.scheduler);

        link_info!(LOG_TARGET, timestamp_us(), "remote running, tick {} ms", TICK_MS);

        let mut last_stats = 0u64;
        loop {
            let now = timestamp_us();
            scheduler.tick(now, &mut sampler);

            if now.saturating_sub(last_stats) >= STATS_INTERVAL_US {
                let stats = scheduler.stats();
                link_info!(
                    LOG_TARGET,
                    now,
                    "sent status={} keepalive={} dropped={}",
                    stats.status_sent,
                    stats.keepalive_sent,
                    stats.dropped
                );
                last_stats = now;
            }

            FreeRtos::delay_ms(TICK_MS);
        }
    }
}
