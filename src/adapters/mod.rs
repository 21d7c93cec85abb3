//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements      | Connects to                      |
//! |-------------|-----------------|----------------------------------|
//! | `device_id` | (none)          | `/proc/device-tree/serial-number`|
//! | `gpio`      | OpenDrainLine   | `/dev/gpiochipN` line            |
//! | `hardware`  | SensorPort      | DHT22 / AM2301 via `gpio`        |
//! | `log_sink`  | EventSink       | `log` facade                     |
//! | `mqtt`      | PublishPort     | MQTT broker (rumqttc)            |
//! | `time`      | Clock, DelayNs  | `std::time` / `std::thread`      |

pub mod device_id;
pub mod gpio;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
