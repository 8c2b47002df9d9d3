use crate::measure::{TickLagMeasurer, TickLagStats};
use crate::ring::Ring;
use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded, select, tick};
use parking_lot::{Mutex, RwLock};
use spdlog::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Background thread that advances a [`Ring`] once per granularity.
///
/// The thread lives until [`stop`](Self::stop) is called or the worker is dropped.
/// Stopping is one-shot: the first caller delivers the signal and joins the thread,
/// every later call returns immediately.
pub(crate) struct RotationWorker {
    name: &'static str,
    stop_tx: Mutex<Option<Sender<()>>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
    running: Arc<AtomicBool>,
    tick_lag: Option<Arc<Mutex<TickLagMeasurer>>>,
}

impl RotationWorker {
    pub fn spawn(
        name: &'static str,
        granularity: Duration,
        ring: Arc<RwLock<Ring>>,
        tick_stats: bool,
    ) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let running = Arc::new(AtomicBool::new(true));
        let tick_lag = tick_stats.then(|| Arc::new(Mutex::new(TickLagMeasurer::new())));

        let handle = {
            let running = running.clone();
            let tick_lag = tick_lag.clone();
            thread::Builder::new()
                .name(format!("{}-rotation", name))
                .spawn(move || {
                    debug!("[{}] rotation worker started, granularity={:?}", name, granularity);
                    run(granularity, &ring, &stop_rx, tick_lag.as_deref());
                    running.store(false, Ordering::Release);
                    if let Some(tick_lag) = tick_lag {
                        info!("[TickLag/{}]{}", name, tick_lag.lock().format_stats());
                    }
                    debug!("[{}] rotation worker stopped", name);
                })?
        };

        Ok(Self {
            name,
            stop_tx: Mutex::new(Some(stop_tx)),
            handle: Mutex::new(Some(handle)),
            running,
            tick_lag,
        })
    }

    pub fn stop(&self) {
        let Some(stop_tx) = self.stop_tx.lock().take() else {
            return;
        };
        // The worker may already be gone if it panicked; dropping the sender
        // disconnects the channel either way.
        let _ = stop_tx.try_send(());
        drop(stop_tx);

        let handle = self.handle.lock().take();
        if let Some(handle) = handle
            && handle.join().is_err()
        {
            self.running.store(false, Ordering::Release);
            error!("[{}] rotation worker panicked", self.name);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn tick_lag_stats(&self) -> Option<TickLagStats> {
        self.tick_lag.as_ref().map(|lag| lag.lock().get_stats())
    }
}

impl Drop for RotationWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    granularity: Duration,
    ring: &RwLock<Ring>,
    stop_rx: &Receiver<()>,
    tick_lag: Option<&Mutex<TickLagMeasurer>>,
) {
    let ticker = tick(granularity);
    loop {
        select! {
            recv(stop_rx) -> _ => return,
            recv(ticker) -> due => {
                // Stop wins over a tick that became ready at the same time
                if !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty)) {
                    return;
                }
                ring.write().rotate();
                if let (Some(tick_lag), Ok(due)) = (tick_lag, due) {
                    tick_lag
                        .lock()
                        .record(Instant::now().saturating_duration_since(due));
                }
            }
        }
    }
}
