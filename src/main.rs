//! Gardener Firmware — Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter    LogEventSink   SystemClock   StatusServer│
//! │  (Sensor+Actuator)  (EventSink)    (ClockPort)   (GET /)     │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │        IrrigationController (controller thread)      │    │
//! │  │  Schedule · PumpTiming · HistoryBuffer · LiveState   │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::atomic::AtomicBool;
use std::thread;

use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::EspSntp;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration as WifiCfg, EspWifi};
use log::{error, info, warn};

use gardener::adapters::hardware::HardwareAdapter;
use gardener::adapters::log_sink::LogEventSink;
use gardener::adapters::status::start_status_server;
use gardener::adapters::time::SystemClock;
use gardener::app::service::IrrigationController;
use gardener::config::IrrigationConfig;
use gardener::drivers::hw_init;
use gardener::drivers::pump::PumpDriver;
use gardener::pins;
use gardener::sensors::conductivity::ConductivityProbe;

/// Set to stop the controller loop after its current tick.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

const CONTROLLER_STACK_BYTES: usize = 16 * 1024;

fn load_config() -> IrrigationConfig {
    match option_env!("GARDENER_CONFIG") {
        Some(doc) => match IrrigationConfig::from_json(doc) {
            Ok(cfg) => {
                info!("Config loaded from GARDENER_CONFIG");
                cfg
            }
            Err(e) => {
                warn!("GARDENER_CONFIG rejected ({}), using defaults", e);
                IrrigationConfig::default()
            }
        },
        None => IrrigationConfig::default(),
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Gardener v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    hw_init::init_peripherals().context("peripheral init")?;

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();

    // ── 3. Network + wall clock ───────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sysloop)?;
    wifi.set_configuration(&WifiCfg::Client(ClientConfiguration {
        ssid: option_env!("WIFI_SSID")
            .unwrap_or_default()
            .try_into()
            .map_err(|_| anyhow::anyhow!("WIFI_SSID too long"))?,
        password: option_env!("WIFI_PASS")
            .unwrap_or_default()
            .try_into()
            .map_err(|_| anyhow::anyhow!("WIFI_PASS too long"))?,
        ..Default::default()
    }))?;
    wifi.start()?;
    wifi.connect()?;
    wifi.wait_netif_up()?;
    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("WiFi: connected, ip={}", ip_info.ip);

    // Keeps the wall clock in sync for the lifetime of main.
    let _sntp = EspSntp::new_default()?;

    // ── 4. Hardware adapter ───────────────────────────────────
    // Pump relay on GPIO 21, see `pins`.
    let pump_pin = PinDriver::output(peripherals.pins.gpio21)?;
    let pump = PumpDriver::new(pump_pin, config.pump_active_low)?;
    let probe = ConductivityProbe::new(pins::PROBE_ADC_CHANNEL);
    let hw = HardwareAdapter::new(probe, pump);

    // ── 5. Controller thread ──────────────────────────────────
    let mut controller = IrrigationController::new(&config, hw, SystemClock::new())?;
    let reader = controller.reader();

    let handle = thread::Builder::new()
        .name("controller".into())
        .stack_size(CONTROLLER_STACK_BYTES)
        .spawn(move || controller.run(&mut LogEventSink::new(), &SHUTDOWN))?;

    // ── 6. Status endpoint ────────────────────────────────────
    let _server = start_status_server(reader)?;

    // ── 7. Supervise ──────────────────────────────────────────
    match handle.join() {
        Ok(Ok(())) => info!("Controller stopped"),
        Ok(Err(e)) => error!("Controller halted: {}, restarting", e),
        Err(_) => error!("Controller thread panicked, restarting"),
    }
    esp_idf_svc::hal::reset::restart();
}
