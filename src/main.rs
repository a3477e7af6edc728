//! SmartCane Firmware — Main Entry Point
//!
//! Hexagonal architecture driven by a single cooperative tick loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogDisplay     LogEventSink  Esp32Time │
//! │  (Input+Sensor+Actuator)(DisplayPort)  (EventSink)   (TimePort)│
//! │  WifiAdapter            NetworkUplink                          │
//! │  (Connectivity)         (Local + Cloud telemetry)              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  FSM · Debounce · Arbiter · Pulse train                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (tick loop, upload timers, diagnostics)             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{error, info, warn};

use smartcane::adapters::display::LogDisplay;
use smartcane::adapters::hardware::HardwareAdapter;
use smartcane::adapters::http::HttpClient;
use smartcane::adapters::log_sink::LogEventSink;
use smartcane::adapters::time::Esp32TimeAdapter;
use smartcane::adapters::uplink::NetworkUplink;
use smartcane::adapters::wifi::WifiAdapter;
use smartcane::app::ports::ConnectivityPort;
use smartcane::app::uplink::UplinkDispatch;
use smartcane::config::{
    SystemConfig, CLOUD_API_KEY, CLOUD_BASE_URL, HTTP_TIMEOUT_MS, SERVER_URL, WIFI_PASSWORD,
    WIFI_SSID,
};
use smartcane::drivers::hw_init;
use smartcane::scheduler::Scheduler;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SmartCane v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate().context("build-time configuration")?;

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Degraded: readings fall back to no-echo and the cane keeps
        // reporting clear paths rather than halting.
        error!("HAL init failed: {} — continuing degraded", e);
    }

    // ── 4. WiFi station ───────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let driver = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    let mut wifi = WifiAdapter::new(driver);
    if let Err(e) = wifi.set_credentials(WIFI_SSID, WIFI_PASSWORD) {
        warn!("WiFi credentials rejected ({}), running offline", e);
    }

    // ── 5. Telemetry ──────────────────────────────────────────
    // Each sink gets its own stateless HTTP client.
    let uplink = || {
        NetworkUplink::new(
            HttpClient::new(HTTP_TIMEOUT_MS),
            SERVER_URL,
            CLOUD_BASE_URL,
            CLOUD_API_KEY,
            config.cloud_channel_id,
        )
    };
    let uplink = UplinkDispatch::new(uplink(), uplink());

    // ── 6. Adapters + scheduler ───────────────────────────────
    let hardware = HardwareAdapter::new(&config);
    let display = LogDisplay::new(&config);
    let clock = Esp32TimeAdapter::new();
    let sink = LogEventSink::new();

    let mut scheduler = Scheduler::new(config, hardware, display, wifi, uplink, clock, sink);
    scheduler.boot();

    info!("Entering control loop");
    loop {
        scheduler.tick();
    }
}
