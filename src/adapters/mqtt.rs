//! MQTT publish adapter.
//!
//! Implements [`PublishPort`] on top of the rumqttc synchronous client.
//!
//! ## Connection lifecycle
//!
//! 1. [`MqttPublisher::connect`] polls the connection until the first
//!    CONNACK.  Any failure here is returned to the caller, which treats it
//!    as fatal.
//! 2. A named background thread then owns the [`Connection`] and keeps
//!    polling it.  rumqttc reconnects on the next poll after an error, so
//!    the thread only logs and paces retries.
//! 3. Dropping the publisher requests a clean disconnect; the driver
//!    thread exits once the request channel closes.
//!
//! Publishing never blocks: `try_publish` either queues the request or
//! fails immediately.

use core::time::Duration;
use std::thread;

use log::{debug, error, info, warn};
use rumqttc::{Client, ClientError, ConnectReturnCode, Connection, Event, MqttOptions, Packet};

use crate::app::ports::{PublishError, PublishPort};
use crate::config::{QoS, ReporterConfig};
use crate::error::CommsError;

/// Outgoing request queue depth.
const REQUEST_QUEUE_CAP: usize = 16;

/// Pause between polls after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Connected broker client.
pub struct MqttPublisher {
    client: Client,
    _driver: thread::JoinHandle<()>,
}

impl MqttPublisher {
    /// Connect as `client_id` with a clean session and wait for CONNACK.
    pub fn connect(config: &ReporterConfig, client_id: &str) -> Result<Self, CommsError> {
        let mut options = MqttOptions::new(client_id, config.broker_host.as_str(), config.broker_port);
        options
            .set_clean_session(true)
            .set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        info!(
            "Connecting to MQTT broker tcp://{}:{} as {}",
            config.broker_host, config.broker_port, client_id
        );

        let (client, mut connection) = Client::new(options, REQUEST_QUEUE_CAP);
        await_connack(&mut connection)?;
        info!("Connection to MQTT broker established");

        let driver = thread::Builder::new()
            .name("mqtt-connection".into())
            .spawn(move || drive(connection))
            .map_err(|e| {
                error!("cannot start MQTT connection thread: {}", e);
                CommsError::DriverSpawnFailed
            })?;

        Ok(Self {
            client,
            _driver: driver,
        })
    }
}

impl PublishPort for MqttPublisher {
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), PublishError> {
        self.client
            .try_publish(topic, mqtt_qos(qos), retain, payload.to_vec())
            .map_err(|e| match e {
                ClientError::TryRequest(_) => PublishError::QueueFull,
                ClientError::Request(_) => PublishError::Disconnected,
            })
    }
}

impl Drop for MqttPublisher {
    fn drop(&mut self) {
        if let Err(e) = self.client.try_disconnect() {
            debug!("MQTT disconnect request not queued: {}", e);
        }
    }
}

fn mqtt_qos(qos: QoS) -> rumqttc::QoS {
    match qos {
        QoS::AtMostOnce => rumqttc::QoS::AtMostOnce,
        QoS::AtLeastOnce => rumqttc::QoS::AtLeastOnce,
        QoS::ExactlyOnce => rumqttc::QoS::ExactlyOnce,
    }
}

/// Poll until the broker answers the initial CONNECT.
fn await_connack(connection: &mut Connection) -> Result<(), CommsError> {
    for event in connection.iter() {
        match event {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code == ConnectReturnCode::Success {
                    return Ok(());
                }
                error!("MQTT broker refused connection: {:?}", ack.code);
                return Err(CommsError::ConnectRefused);
            }
            Ok(other) => debug!("MQTT (connecting): {:?}", other),
            Err(e) => {
                error!("MQTT connect failed: {}", e);
                return Err(CommsError::ConnectFailed);
            }
        }
    }
    Err(CommsError::ConnectFailed)
}

/// Keep the connection alive for the lifetime of the client.
fn drive(mut connection: Connection) {
    for event in connection.iter() {
        match event {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!("MQTT reconnected ({:?})", ack.code);
            }
            Ok(other) => debug!("MQTT: {:?}", other),
            Err(e) => {
                warn!("MQTT connection error: {} (retrying)", e);
                thread::sleep(RECONNECT_DELAY);
            }
        }
    }
    debug!("MQTT connection driver exiting");
}
