//! The client façade: one long-lived connection plus one-shot query
//! sockets.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};
use xplane_connect_protocol::{
    DEFAULT_XPLANE_PORT, PoseCommand, PoseSnapshot, ProtocolError, decode_rpos,
    decode_rref_records, encode_cmnd, encode_dref_write, encode_rpos_request, encode_rref_request,
    encode_vehs,
};

use crate::controls::ControlSurfaces;
use crate::error::{ClientError, Result};
use crate::listener::{ListenerHandle, MAX_DATAGRAM_SIZE};
use crate::registry::{DatarefRegistry, ObservedValue};

/// Pause the simulation.
pub const CMND_PAUSE_ON: &str = "sim/operation/pause_on";
/// Resume the simulation.
pub const CMND_PAUSE_OFF: &str = "sim/operation/pause_off";

/// Streaming rate requested for one-shot dataref and pose queries. High on
/// purpose: the first reply is taken and the stream cancelled immediately.
const ONE_SHOT_FREQ_HZ: i32 = 100;

/// Gap between the persistent slot range and slots used for one-shot
/// queries. Persistent slots are 1-based and contiguous, so anything past
/// `count + 1` cannot collide; the extra margin guards against a query
/// racing a re-subscribe that grows the table.
const ONE_SHOT_SLOT_OFFSET: i32 = 10;

/// Async UDP client for a running X-Plane instance.
///
/// Owns the long-lived connection socket, the subscription registry, and
/// the background listener that keeps [`current_values`](Self::current_values)
/// fresh. One-shot queries ([`get_dataref`](Self::get_dataref),
/// [`get_pose`](Self::get_pose)) use private ephemeral sockets so their
/// replies cannot be confused with subscription traffic.
///
/// ```rust,no_run
/// use xplane_connect_client::XPlaneClient;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let client = XPlaneClient::connect_default().await?;
/// client
///     .subscribe(&[("sim/flightmodel/position/y_agl", 10)])
///     .await?;
/// client.send_command("sim/operation/screenshot").await?;
/// # Ok(())
/// # }
/// ```
pub struct XPlaneClient {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
    registry: Arc<DatarefRegistry>,
    listener: AsyncMutex<Option<ListenerHandle>>,
    listener_error: Arc<Mutex<Option<ProtocolError>>>,
    query_timeout: Option<Duration>,
}

impl XPlaneClient {
    /// Bind a local ephemeral socket and point it at the simulator.
    ///
    /// # Errors
    /// [`ClientError::Transport`] if the socket cannot be created.
    pub async fn connect(peer: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        debug!("connected to X-Plane at {peer}");
        Ok(Self {
            socket: Arc::new(socket),
            peer,
            registry: Arc::new(DatarefRegistry::default()),
            listener: AsyncMutex::new(None),
            listener_error: Arc::new(Mutex::new(None)),
            query_timeout: None,
        })
    }

    /// Connect to the default simulator address, `127.0.0.1:49000`.
    ///
    /// # Errors
    /// [`ClientError::Transport`] if the socket cannot be created.
    pub async fn connect_default() -> Result<Self> {
        Self::connect(SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_XPLANE_PORT))).await
    }

    /// Bound the blocking receive of one-shot queries. Without this a
    /// query against a dead simulator blocks indefinitely, which is the
    /// default and mirrors the bare UDP semantics.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// The simulator address this client sends to.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Local address of the long-lived connection socket.
    ///
    /// # Errors
    /// [`ClientError::Transport`] if the OS cannot report the address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Replace all dataref subscriptions with `(dataref, frequency in Hz)`
    /// pairs and make sure the background listener is running.
    ///
    /// Slots are assigned as the 1-based position in the list, requests go
    /// out in list order, and the previous subscription table is dropped
    /// wholesale. Every identifier is validated before the first send, so
    /// an oversized dataref cannot leave a half-replaced table behind.
    ///
    /// # Errors
    /// [`ClientError::Encode`] for an oversized dataref,
    /// [`ClientError::Transport`] if a send fails.
    pub async fn subscribe<S: AsRef<str>>(&self, datarefs: &[(S, i32)]) -> Result<()> {
        let mut requests = Vec::with_capacity(datarefs.len());
        for (i, (dataref, freq_hz)) in datarefs.iter().enumerate() {
            let slot = i as i32 + 1;
            requests.push(encode_rref_request(dataref.as_ref(), slot, *freq_hz)?);
        }

        let names: Vec<String> = datarefs
            .iter()
            .map(|(dataref, _)| dataref.as_ref().to_owned())
            .collect();
        self.registry.replace(&names);

        for request in &requests {
            self.socket.send_to(request, self.peer).await?;
        }

        self.ensure_listener().await;
        Ok(())
    }

    /// Snapshot of the most recent value and observation time for every
    /// subscribed dataref. Entries are `None` until the first matching
    /// packet arrives.
    pub fn current_values(&self) -> std::collections::HashMap<String, ObservedValue> {
        self.registry.snapshot()
    }

    /// Take the first protocol error the listener has hit since the last
    /// call, if any. The listener keeps running after recording it.
    pub fn listener_error(&self) -> Option<ProtocolError> {
        self.listener_error.lock().take()
    }

    /// Fetch a single dataref value synchronously.
    ///
    /// Prefer [`subscribe`](Self::subscribe) for values read repeatedly;
    /// this opens a private socket, requests a 100 Hz stream on a slot
    /// outside the persistent range, takes the first reply, and cancels
    /// the stream again.
    ///
    /// # Errors
    /// [`ClientError::Protocol`] if the reply tag or slot does not match,
    /// [`ClientError::QueryTimeout`] if a timeout is configured and no
    /// reply arrives in time.
    pub async fn get_dataref(&self, dataref: &str) -> Result<f32> {
        let slot = self.registry.subscription_count() as i32 + ONE_SHOT_SLOT_OFFSET;
        let request = encode_rref_request(dataref, slot, ONE_SHOT_FREQ_HZ)?;

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.send_to(&request, self.peer).await?;

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        let len = self.recv_one(&socket, &mut buf).await?;
        let records = decode_rref_records(&buf[..len])?;
        let record = records
            .first()
            .copied()
            .ok_or(ProtocolError::Truncated { len })?;
        if record.slot != slot {
            return Err(ProtocolError::SlotMismatch {
                expected: slot,
                got: record.slot,
            }
            .into());
        }

        // Stop the stream the query implicitly created.
        let unsubscribe = encode_rref_request(dataref, slot, 0)?;
        socket.send_to(&unsubscribe, self.peer).await?;

        Ok(record.value)
    }

    /// Fetch the user aircraft's pose synchronously via the RPOS stream.
    ///
    /// # Errors
    /// [`ClientError::Protocol`] if the reply is not a well-formed RPOS
    /// packet, [`ClientError::QueryTimeout`] on a configured timeout.
    pub async fn get_pose(&self) -> Result<PoseSnapshot> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket
            .send_to(&encode_rpos_request(ONE_SHOT_FREQ_HZ as u32), self.peer)
            .await?;

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        let len = self.recv_one(&socket, &mut buf).await?;
        let pose = decode_rpos(&buf[..len])?;

        // Frequency 0 cancels the stream for this source address.
        socket.send_to(&encode_rpos_request(0), self.peer).await?;

        Ok(pose)
    }

    /// Write a dataref value, fire-and-forget. The wire format is single
    /// precision; anything wider is narrowed at this boundary.
    ///
    /// # Errors
    /// [`ClientError::Encode`] for an oversized dataref,
    /// [`ClientError::Transport`] if the send fails.
    pub async fn set_dataref(&self, dataref: &str, value: f32) -> Result<()> {
        let packet = encode_dref_write(dataref, value)?;
        self.socket.send_to(&packet, self.peer).await?;
        Ok(())
    }

    /// Trigger a zero-argument simulator command, fire-and-forget.
    ///
    /// # Errors
    /// [`ClientError::Encode`] for an oversized command,
    /// [`ClientError::Transport`] if the send fails.
    pub async fn send_command(&self, command: &str) -> Result<()> {
        let packet = encode_cmnd(command)?;
        self.socket.send_to(&packet, self.peer).await?;
        Ok(())
    }

    /// Place the user aircraft (index 0) at a pose.
    ///
    /// # Errors
    /// [`ClientError::Transport`] if a send fails.
    pub async fn set_pose(&self, pose: PoseCommand) -> Result<()> {
        self.set_pose_for(0, pose).await
    }

    /// Place any aircraft at a pose. This is the only way to move an
    /// aircraft in latitude/longitude; those datarefs are read-only.
    ///
    /// The identical VEHS packet is sent twice back-to-back: the simulator
    /// computes the first packet's elevation against the aircraft's
    /// pre-update location, and the second send corrects it.
    ///
    /// # Errors
    /// [`ClientError::Transport`] if a send fails.
    pub async fn set_pose_for(&self, aircraft: i32, pose: PoseCommand) -> Result<()> {
        let packet = encode_vehs(
            aircraft,
            pose.latitude_deg,
            pose.longitude_deg,
            pose.elevation_msl_m,
            pose.true_heading_deg,
            pose.pitch_deg,
            pose.roll_deg,
        );
        self.socket.send_to(&packet, self.peer).await?;
        self.socket.send_to(&packet, self.peer).await?;
        Ok(())
    }

    /// Apply a full set of basic controls as eight independent DREF
    /// writes. Every write is attempted even if an earlier one fails; the
    /// first error is returned afterwards.
    ///
    /// # Errors
    /// The first [`ClientError`] hit while encoding or sending.
    pub async fn set_controls(&self, controls: ControlSurfaces) -> Result<()> {
        let mut first_error = None;
        for (dataref, value) in controls.wire_writes() {
            if let Err(e) = self.set_dataref(dataref, value).await {
                warn!("control write to {dataref} failed: {e}");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Pause or resume the simulation.
    ///
    /// # Errors
    /// [`ClientError::Transport`] if the send fails.
    pub async fn set_paused(&self, paused: bool) -> Result<()> {
        self.send_command(if paused { CMND_PAUSE_ON } else { CMND_PAUSE_OFF })
            .await
    }

    /// Stop the background listener and wait for it to exit. Safe to call
    /// without an active subscription; the client stays usable for sends
    /// and one-shot queries afterwards.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.listener.lock().await.take() {
            handle.stop().await;
        }
    }

    async fn ensure_listener(&self) {
        let mut guard = self.listener.lock().await;
        let alive = guard.as_ref().is_some_and(ListenerHandle::is_running);
        if !alive {
            *guard = Some(ListenerHandle::spawn(
                Arc::clone(&self.socket),
                Arc::clone(&self.registry),
                Arc::clone(&self.listener_error),
            ));
        }
    }

    async fn recv_one(&self, socket: &UdpSocket, buf: &mut [u8]) -> Result<usize> {
        match self.query_timeout {
            Some(limit) => match tokio::time::timeout(limit, socket.recv_from(buf)).await {
                Ok(Ok((len, _src))) => Ok(len),
                Ok(Err(e)) => Err(e.into()),
                Err(_) => Err(ClientError::QueryTimeout(limit)),
            },
            None => {
                let (len, _src) = socket.recv_from(buf).await?;
                Ok(len)
            }
        }
    }
}

impl Drop for XPlaneClient {
    fn drop(&mut self) {
        // Cooperative shutdown needs an async context; abort covers the
        // case where the client is dropped without calling shutdown().
        if let Ok(mut guard) = self.listener.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}
