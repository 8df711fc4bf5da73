use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::aggregator::Aggregator;
use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::transport::{Receive, Transmit, UdpEgress, UdpIngress};

/// Interval at which the flush timer re-checks the running flag while
/// waiting out a long period.
const FLUSH_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Relay service orchestrator.
///
/// Owns the shared [`Aggregator`] and runs the two concurrent activities
/// of the relay on dedicated threads:
///
/// - the **ingest loop**, blocking on the receiver and buffering each
///   datagram;
/// - the **flush loop**, draining a framed batch to the sender once per
///   flush period.
///
/// Both lock the aggregator only for the duration of a single ingest or
/// flush call — never across the blocking receive. Every failure on
/// either path is fatal: the first broken connection clears the running
/// flag, both loops wind down, and [`join`](Self::join) surfaces the
/// error. There are no retries anywhere.
pub struct Relay {
    aggregator: Arc<Mutex<Aggregator>>,
    running: Arc<AtomicBool>,
    config: RelayConfig,
    handles: Vec<JoinHandle<Result<()>>>,
}

impl Relay {
    /// Validate the configuration and construct a stopped relay.
    pub fn new(config: RelayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            aggregator: Arc::new(Mutex::new(Aggregator::new(config.clone()))),
            running: Arc::new(AtomicBool::new(false)),
            config,
            handles: Vec::new(),
        })
    }

    /// Bind the UDP transports and start the ingest and flush threads.
    pub fn start(&mut self) -> Result<()> {
        let receiver = UdpIngress::bind(self.config.bind_addr)?;
        let sender = UdpEgress::bind(self.config.remote_addr)?;
        self.start_with(Box::new(receiver), Box::new(sender))
    }

    /// Start the service over caller-provided transports.
    pub fn start_with(
        &mut self,
        receiver: Box<dyn Receive>,
        sender: Box<dyn Transmit>,
    ) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(RelayError::AlreadyRunning);
        }

        tracing::info!(
            bind = %self.config.bind_addr,
            remote = %self.config.remote_addr,
            period_ms = self.config.flush_period.as_millis() as u64,
            tlv = self.config.envelope.is_some(),
            "relay starting"
        );

        let aggregator = self.aggregator.clone();
        let running = self.running.clone();
        self.handles.push(thread::spawn(move || {
            ingest_loop(receiver, aggregator, running)
        }));

        let aggregator = self.aggregator.clone();
        let running = self.running.clone();
        let period = self.config.flush_period;
        self.handles.push(thread::spawn(move || {
            flush_loop(sender, aggregator, period, running)
        }));

        Ok(())
    }

    /// Request an orderly shutdown; both loops exit within one poll
    /// interval.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("relay stopping");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Wait for both loops to finish, returning the first fatal error.
    pub fn join(&mut self) -> Result<()> {
        let mut first_err = None;
        for handle in self.handles.drain(..) {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
                Err(_) => tracing::error!("relay thread panicked"),
            }
        }
        self.running.store(false, Ordering::SeqCst);
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run until a fatal transport failure: [`start`](Self::start) then
    /// [`join`](Self::join).
    pub fn run(&mut self) -> Result<()> {
        self.start()?;
        self.join()
    }

    /// Datagrams currently buffered in the aggregator.
    pub fn pending(&self) -> usize {
        self.aggregator.lock().pending()
    }
}

/// Blocking receive loop feeding the aggregator.
///
/// Read timeouts (`WouldBlock`/`TimedOut`) are the receiver's poll ticks
/// and are absorbed; everything else from the transport, and the
/// zero-length end-of-stream marker, terminates the loop.
fn ingest_loop(
    mut receiver: Box<dyn Receive>,
    aggregator: Arc<Mutex<Aggregator>>,
    running: Arc<AtomicBool>,
) -> Result<()> {
    while running.load(Ordering::SeqCst) {
        let datagram = match receiver.receive() {
            Ok(datagram) => datagram,
            Err(RelayError::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                continue;
            }
            Err(e) => {
                tracing::error!(error = %e, "ingest receive failed");
                running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        if let Err(e) = aggregator.lock().ingest(datagram) {
            tracing::error!(error = %e, "ingest path terminated");
            running.store(false, Ordering::SeqCst);
            return Err(e);
        }
    }
    tracing::debug!("ingest loop exited");
    Ok(())
}

/// Periodic flush loop.
///
/// Fires as close to every period as the sleep allows. Drift is
/// tolerated: a late tick reschedules from now, missed periods are not
/// replayed.
fn flush_loop(
    mut sender: Box<dyn Transmit>,
    aggregator: Arc<Mutex<Aggregator>>,
    period: Duration,
    running: Arc<AtomicBool>,
) -> Result<()> {
    let mut next_tick = Instant::now() + period;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now < next_tick {
            thread::sleep((next_tick - now).min(FLUSH_POLL_INTERVAL));
            continue;
        }
        next_tick = Instant::now() + period;

        if let Err(e) = aggregator.lock().flush(sender.as_mut()) {
            tracing::error!(error = %e, "flush path terminated");
            running.store(false, Ordering::SeqCst);
            return Err(e);
        }
    }
    tracing::debug!("flush loop exited");
    Ok(())
}
