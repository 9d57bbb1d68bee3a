//! GATT central session state machine
//!
//! Drives the client side of the sensor/counter profile: scan for a
//! peripheral advertising the sensor service, connect, discover both
//! services and the four characteristics of interest, then exchange data.
//! All inbound traffic arrives through [`GattCentral::handle_event`], which
//! runs to completion per event and never propagates an error; anomalies
//! are absorbed into state.

use log::{debug, info, trace, warn};

use crate::adv::{decode_name, decode_services};
use crate::error::LinkError;
use crate::gap::{
    AddressType, BdAddr, SCAN_DURATION_MS, SCAN_INTERVAL_US, SCAN_WINDOW_US,
};
use crate::gatt::types::{CharacteristicHandles, NotifyChannel, ServiceRange};
use crate::link::{ConnHandle, LinkEvent, LinkLayer};
use crate::uuid::{COUNTER_SERVICE, SENSOR_SERVICE};

/// Error types specific to central-side operations
#[derive(Debug, thiserror::Error)]
pub enum CentralError {
    #[error("no target address available")]
    NoTarget,

    #[error("link layer error: {0}")]
    Link(#[from] LinkError),
}

/// Peer cached from a successful scan match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerIdentity {
    pub addr_type: AddressType,
    /// Owned copy; the driver's advertisement buffer is transient.
    pub addr: BdAddr,
    pub name: String,
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Scanning,
    Connecting,
    DiscoveringServices,
    DiscoveringCharacteristics(DiscoveryPhase),
    Ready,
}

/// Which service's characteristics are currently being discovered.
///
/// The two discovery calls must not overlap; the second is issued only on
/// the first one's completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryPhase {
    Sensor,
    Counter,
}

/// One-shot callback fired when a scan finishes; `None` means no match.
pub type ScanCallback = Box<dyn FnOnce(Option<&PeerIdentity>) + Send + 'static>;
/// One-shot callback fired when the session reaches readiness.
pub type ConnectCallback = Box<dyn FnOnce() + Send + 'static>;
/// Persistent callback for notified values, tagged with the channel the
/// fired value-handle maps to.
pub type NotifyCallback = Box<dyn FnMut(NotifyChannel, &[u8]) + Send + 'static>;

/// The central half of a GATT session.
pub struct GattCentral<L: LinkLayer> {
    driver: L,
    state: SessionState,

    /// Cached identity from a successful scan.
    peer: Option<PeerIdentity>,
    /// The address an in-flight connect was issued against.
    target: Option<(AddressType, BdAddr)>,
    conn: Option<ConnHandle>,

    sensor_range: Option<ServiceRange>,
    counter_range: Option<ServiceRange>,
    handles: CharacteristicHandles,

    /// One-shot slots, consumed on first invocation.
    scan_callback: Option<ScanCallback>,
    connect_callback: Option<ConnectCallback>,
    /// Persistent slot, overwritten by `on_notify`, cleared by reset.
    notify_callback: Option<NotifyCallback>,
}

impl<L: LinkLayer> GattCentral<L> {
    pub fn new(driver: L) -> Self {
        Self {
            driver,
            state: SessionState::Idle,
            peer: None,
            target: None,
            conn: None,
            sensor_range: None,
            counter_range: None,
            handles: CharacteristicHandles::default(),
            scan_callback: None,
            connect_callback: None,
            notify_callback: None,
        }
    }

    /// Get a reference to the underlying driver
    pub fn driver(&self) -> &L {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut L {
        &mut self.driver
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True iff the connection handle and all four characteristic handles
    /// are set. Readiness, not mere link-level connection.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some() && self.handles.is_complete()
    }

    /// Find a device advertising the sensor service.
    ///
    /// Clears any cached peer identity and starts a time-bounded scan; the
    /// callback fires once on the scan-done event.
    pub fn scan(&mut self, callback: ScanCallback) -> Result<(), CentralError> {
        self.peer = None;
        self.scan_callback = Some(callback);
        self.driver
            .scan(SCAN_DURATION_MS, SCAN_INTERVAL_US, SCAN_WINDOW_US)?;
        self.update_state(SessionState::Scanning);
        Ok(())
    }

    /// Connect to the given device, or to the cached scan result when the
    /// address arguments are omitted.
    pub fn connect(
        &mut self,
        addr_type: Option<AddressType>,
        addr: Option<BdAddr>,
        callback: ConnectCallback,
    ) -> Result<(), CentralError> {
        let cached = self.peer.as_ref();
        let addr_type = addr_type.or(cached.map(|p| p.addr_type));
        let addr = addr.or(cached.map(|p| p.addr));
        let (addr_type, addr) = match (addr_type, addr) {
            (Some(t), Some(a)) => (t, a),
            _ => return Err(CentralError::NoTarget),
        };

        self.connect_callback = Some(callback);
        self.target = Some((addr_type, addr));
        self.driver.connect(addr_type, addr)?;
        self.update_state(SessionState::Connecting);
        Ok(())
    }

    /// Disconnect from the current device.
    ///
    /// Resets locally at once; the later disconnect event for this handle
    /// finds the state already clear and is a no-op.
    pub fn disconnect(&mut self) -> Result<(), CentralError> {
        let Some(conn) = self.conn else {
            return Ok(());
        };
        let result = self.driver.disconnect(conn);
        self.reset();
        Ok(result?)
    }

    /// Write the control characteristic, with acknowledgment iff `reliable`.
    ///
    /// Dropped silently before readiness; callers poll `is_connected`.
    pub fn write(&mut self, value: &[u8], reliable: bool) -> Result<(), CentralError> {
        if !self.is_connected() {
            debug!("write dropped, session not ready");
            return Ok(());
        }
        let (Some(conn), Some(control)) = (self.conn, self.handles.control) else {
            return Ok(());
        };
        self.driver
            .write_characteristic(conn, control, value, reliable)?;
        Ok(())
    }

    /// Install the persistent callback for notified values.
    pub fn on_notify(&mut self, callback: NotifyCallback) {
        self.notify_callback = Some(callback);
    }

    /// Feed one driver event into the session.
    pub fn handle_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::ScanResult {
                addr_type,
                addr,
                kind,
                rssi,
                adv_data,
            } => {
                if self.state != SessionState::Scanning || self.peer.is_some() {
                    return;
                }
                if !kind.is_connectable() || !decode_services(&adv_data).contains(&SENSOR_SERVICE) {
                    return;
                }
                let name = decode_name(&adv_data).unwrap_or_else(|| "?".to_string());
                debug!("scan matched {} ({}), rssi {}", addr, name, rssi);
                self.peer = Some(PeerIdentity {
                    addr_type,
                    addr,
                    name,
                });
                if let Err(e) = self.driver.stop_scan() {
                    warn!("failed to stop scan: {}", e);
                }
            }

            LinkEvent::ScanDone => {
                if let Some(callback) = self.scan_callback.take() {
                    callback(self.peer.as_ref());
                }
                if self.state == SessionState::Scanning {
                    self.update_state(SessionState::Idle);
                }
            }

            LinkEvent::PeripheralConnect {
                conn,
                addr_type,
                addr,
            } => {
                if self.target != Some((addr_type, addr)) {
                    debug!("ignoring connect event for {}, not our target", addr);
                    return;
                }
                info!("connected to {} as {}", addr, conn);
                self.conn = Some(conn);
                self.update_state(SessionState::DiscoveringServices);
                if let Err(e) = self.driver.discover_services(conn) {
                    warn!("service discovery request failed: {}", e);
                }
            }

            LinkEvent::PeripheralDisconnect { conn, .. } => {
                // Already reset if we initiated the disconnect ourselves.
                if self.conn == Some(conn) {
                    info!("disconnected from {}", conn);
                    self.reset();
                }
            }

            LinkEvent::ServiceResult { conn, range, uuid } => {
                if self.conn != Some(conn) {
                    return;
                }
                debug!("service {} at {}..{}", uuid, range.start_handle, range.end_handle);
                if uuid == SENSOR_SERVICE && self.sensor_range.is_none() {
                    self.sensor_range = Some(range);
                } else if uuid == COUNTER_SERVICE && self.counter_range.is_none() {
                    self.counter_range = Some(range);
                }
            }

            LinkEvent::ServiceDone { conn } => {
                if self.conn != Some(conn) {
                    return;
                }
                let (phase, range) = if let Some(range) = self.sensor_range {
                    (DiscoveryPhase::Sensor, range)
                } else if let Some(range) = self.counter_range {
                    (DiscoveryPhase::Counter, range)
                } else {
                    warn!("service discovery found neither known service");
                    return;
                };
                self.update_state(SessionState::DiscoveringCharacteristics(phase));
                if let Err(e) = self.driver.discover_characteristics(conn, range) {
                    warn!("characteristic discovery request failed: {}", e);
                }
            }

            LinkEvent::CharacteristicResult {
                conn,
                value_handle,
                uuid,
                ..
            } => {
                if self.conn != Some(conn) {
                    return;
                }
                debug!("characteristic {} at value handle {}", uuid, value_handle);
                self.handles.record(&uuid, value_handle);
            }

            LinkEvent::CharacteristicDone { conn } => {
                if self.conn != Some(conn) {
                    return;
                }
                // One discovery operation at a time: the counter service is
                // queried only once the sensor query has completed.
                if self.state == SessionState::DiscoveringCharacteristics(DiscoveryPhase::Sensor) {
                    if let Some(range) = self.counter_range {
                        self.update_state(SessionState::DiscoveringCharacteristics(
                            DiscoveryPhase::Counter,
                        ));
                        if let Err(e) = self.driver.discover_characteristics(conn, range) {
                            warn!("characteristic discovery request failed: {}", e);
                        }
                        return;
                    }
                }
                if self.handles.is_complete() {
                    self.update_state(SessionState::Ready);
                    if let Some(callback) = self.connect_callback.take() {
                        callback();
                    }
                } else {
                    // Reported, not retried; the session stays non-ready.
                    warn!("discovery finished with missing characteristics: {:?}", self.handles);
                }
            }

            LinkEvent::WriteDone {
                conn,
                value_handle,
                status,
            } => {
                trace!("write to {} on {} done, status {}", value_handle, conn, status);
            }

            LinkEvent::Notify {
                conn,
                value_handle,
                value,
            } => {
                if self.conn != Some(conn) {
                    return;
                }
                let Some(channel) = self.handles.channel_of(value_handle) else {
                    return;
                };
                trace!("notify on {:?}: {}", channel, hex::encode(&value));
                if let Some(callback) = self.notify_callback.as_mut() {
                    callback(channel, &value);
                }
            }

            // Peripheral-role events; nothing for a central to do.
            LinkEvent::GattsWrite { .. }
            | LinkEvent::CentralConnect { .. }
            | LinkEvent::CentralDisconnect { .. } => {
                debug!("ignoring peripheral-role event");
            }
        }
    }

    /// Clear every transient field. Idempotent; runs on local disconnect
    /// and on the remote disconnect event. A fresh session starts in the
    /// same all-clear state.
    fn reset(&mut self) {
        self.peer = None;
        self.target = None;
        self.conn = None;
        self.sensor_range = None;
        self.counter_range = None;
        self.handles.clear();
        self.scan_callback = None;
        self.connect_callback = None;
        self.notify_callback = None;
        self.update_state(SessionState::Idle);
    }

    fn update_state(&mut self, state: SessionState) {
        if self.state != state {
            debug!("session state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}
