//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                  |
//! |------------|---------------------|------------------------------|
//! | `hardware` | InputPort           | ESP32 GPIO (buttons)         |
//! |            | SensorPort          | Ultrasonic rangers, IR ADC   |
//! |            | ActuatorPort        | LEDC PWM (LED, buzzer), GPIO |
//! | `display`  | DisplayPort         | Serial log text screens      |
//! | `log_sink` | EventSink           | Serial log output            |
//! | `time`     | TimePort, DelayNs   | ESP32 system timer           |
//! | `wifi`     | ConnectivityPort    | ESP-IDF WiFi STA             |
//! | `uplink`   | LocalTelemetryPort  | Dashboard server (HTTP POST) |
//! |            | CloudTelemetryPort  | Cloud channel (HTTP GET)     |

pub mod display;
pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod time;
pub mod uplink;
pub mod wifi;
