//! GATT peripheral advertise/serve state machine
//!
//! Registers the fixed sensor/counter service table at construction,
//! advertises the sensor service, serves any number of connected centrals
//! and fans notify traffic out to all of them. Re-advertises after every
//! disconnect so the device stays discoverable.

use std::collections::HashSet;

use log::{debug, info, trace, warn};

use crate::adv::{advertising_payload, AdvError};
use crate::error::LinkError;
use crate::gap::ADVERTISE_INTERVAL_US;
use crate::gatt::types::{sensor_counter_services, NotifyChannel};
use crate::link::{ConnHandle, LinkEvent, LinkLayer};
use crate::uuid::SENSOR_SERVICE;

/// Error types specific to peripheral-side operations
#[derive(Debug, thiserror::Error)]
pub enum PeripheralError {
    /// The driver returned a handle table whose shape does not match the
    /// declared service table. A configuration fault, not a runtime
    /// condition.
    #[error("service registration returned a malformed handle table")]
    ServiceRegistration,

    #[error("advertising payload error: {0}")]
    Adv(#[from] AdvError),

    #[error("link layer error: {0}")]
    Link(#[from] LinkError),
}

/// Persistent callback fired on inbound writes to the control
/// characteristic.
pub type WriteCallback = Box<dyn FnMut(&[u8]) + Send + 'static>;

/// Local value-handles returned at registration time. Immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocalHandles {
    temperature: u16,
    humidity: u16,
    counter: u16,
    control: u16,
}

/// The peripheral half of a GATT session.
pub struct GattPeripheral<L: LinkLayer> {
    driver: L,
    handles: LocalHandles,
    connections: HashSet<ConnHandle>,
    payload: Vec<u8>,
    write_callback: Option<WriteCallback>,
}

impl<L: LinkLayer> GattPeripheral<L> {
    /// Register the sensor/counter services, build the advertising payload
    /// and start advertising.
    pub fn new(mut driver: L, name: &str) -> Result<Self, PeripheralError> {
        let defs = sensor_counter_services();
        let tables = driver.register_services(&defs)?;

        // The returned handle tuple must match the declared characteristic
        // order exactly.
        if tables.len() != defs.len()
            || tables
                .iter()
                .zip(&defs)
                .any(|(t, d)| t.len() != d.characteristics.len())
        {
            return Err(PeripheralError::ServiceRegistration);
        }
        let handles = LocalHandles {
            temperature: tables[0][0],
            humidity: tables[0][1],
            counter: tables[1][0],
            control: tables[1][1],
        };
        debug!("registered services, handles {:?}", handles);

        let payload = advertising_payload(name, &[SENSOR_SERVICE])?;

        let mut peripheral = Self {
            driver,
            handles,
            connections: HashSet::new(),
            payload,
            write_callback: None,
        };
        peripheral.advertise()?;
        Ok(peripheral)
    }

    /// Get a reference to the underlying driver
    pub fn driver(&self) -> &L {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut L {
        &mut self.driver
    }

    /// True iff at least one central is connected.
    pub fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }

    /// Install the persistent callback for control-characteristic writes.
    pub fn on_write(&mut self, callback: WriteCallback) {
        self.write_callback = Some(callback);
    }

    /// Notify every connected central on the given channel.
    ///
    /// Fire-and-forget per connection; individual failures are logged and
    /// skipped.
    pub fn send(&mut self, data: &[u8], channel: NotifyChannel) {
        let value_handle = match channel {
            NotifyChannel::Temperature => self.handles.temperature,
            NotifyChannel::Humidity => self.handles.humidity,
            NotifyChannel::Counter => self.handles.counter,
        };
        for conn in &self.connections {
            trace!("notify {:?} to {}: {}", channel, conn, hex::encode(data));
            if let Err(e) = self.driver.notify(*conn, value_handle, data) {
                warn!("notify to {} failed: {}", conn, e);
            }
        }
    }

    /// Feed one driver event into the peripheral.
    pub fn handle_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::CentralConnect { conn, addr, .. } => {
                info!("new connection {} from {}", conn, addr);
                self.connections.insert(conn);
            }

            LinkEvent::CentralDisconnect { conn, .. } => {
                info!("connection {} closed", conn);
                self.connections.remove(&conn);
                // Keep advertising so another central can connect.
                if let Err(e) = self.advertise() {
                    warn!("re-advertise failed: {}", e);
                }
            }

            LinkEvent::GattsWrite { conn, value_handle } => {
                if value_handle != self.handles.control {
                    debug!("ignoring write to non-control handle {}", value_handle);
                    return;
                }
                let value = match self.driver.read_characteristic(value_handle) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!("failed to read written value from {}: {}", conn, e);
                        return;
                    }
                };
                if let Some(callback) = self.write_callback.as_mut() {
                    callback(&value);
                }
            }

            // Central-role events; nothing for a peripheral to do.
            _ => {
                debug!("ignoring central-role event");
            }
        }
    }

    fn advertise(&mut self) -> Result<(), PeripheralError> {
        debug!("starting advertising");
        self.driver.advertise(ADVERTISE_INTERVAL_US, &self.payload)?;
        Ok(())
    }
}
