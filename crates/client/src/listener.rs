//! Background task that keeps the subscription registry current.
//!
//! The listener perpetually receives on the shared connection socket,
//! decodes inbound RREF data packets, and writes each record into the
//! registry. Datagrams with other tags are skipped without error, since
//! server-initiated streams set up elsewhere may arrive on the same port.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use xplane_connect_protocol::{ProtocolError, TAG_RREF, decode_rref_records, packet_tag};

use crate::registry::DatarefRegistry;

/// Upper bound on how long a shutdown request waits for the blocking
/// receive to notice the flag.
const RECV_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Generous upper bound on a simulator datagram.
pub(crate) const MAX_DATAGRAM_SIZE: usize = 16_384;

/// Handle to the spawned listener task. Shutdown is cooperative: the flag
/// is checked between receives, and receives are bounded so the task never
/// outlives a stop request by more than one poll interval.
pub(crate) struct ListenerHandle {
    running: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub(crate) fn spawn(
        socket: Arc<UdpSocket>,
        registry: Arc<DatarefRegistry>,
        last_error: Arc<Mutex<Option<ProtocolError>>>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let task = tokio::spawn(async move {
            info!("dataref listener started");
            let mut buf = [0u8; MAX_DATAGRAM_SIZE];

            while flag.load(Ordering::Acquire) {
                match tokio::time::timeout(RECV_POLL_INTERVAL, socket.recv_from(&mut buf)).await {
                    Ok(Ok((len, _src))) => {
                        let datagram = &buf[..len];
                        if packet_tag(datagram) != Some(TAG_RREF) {
                            debug!("skipping non-RREF datagram of {len} bytes");
                            continue;
                        }
                        if let Err(e) = process_rref(datagram, &registry) {
                            warn!("protocol error in dataref stream: {e}");
                            let mut slot = last_error.lock();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                        }
                    }
                    Ok(Err(e)) => warn!("UDP receive error: {e}"),
                    Err(_) => {} // timeout, re-check the shutdown flag
                }
            }
            info!("dataref listener stopped");
        });

        Self { running, task }
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signal shutdown and wait for the task to exit.
    pub(crate) async fn stop(self) {
        self.running.store(false, Ordering::Release);
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                warn!("dataref listener task failed on join: {e}");
            }
        }
    }

    /// Last-resort teardown from a non-async context.
    pub(crate) fn abort(&self) {
        self.running.store(false, Ordering::Release);
        self.task.abort();
    }
}

fn process_rref(datagram: &[u8], registry: &DatarefRegistry) -> Result<(), ProtocolError> {
    let records = decode_rref_records(datagram)?;
    // Timestamp at processing time, not receive time; the difference is
    // well below the subscription periods anyone asks for.
    let now = Instant::now();
    for record in records {
        registry.record(record.slot, record.value, now)?;
    }
    Ok(())
}
