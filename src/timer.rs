//! Per-channel auto-off countdowns.
//!
//! Each arming spawns a one-shot `tokio::time::sleep` task on the
//! scheduler's runtime. Expiry never touches hardware: the task queues the
//! channel on an mpsc channel drained by a single worker thread, which runs
//! the expiry action (the disable) off the timer context.
//!
//! Every `start`/`cancel` bumps the channel's generation. Queued expiries
//! carry the generation they were armed with and are dropped if it has moved
//! on, so a stale expiry cannot switch off a freshly re-armed channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::data_types::{CHANNEL_COUNT, Channel};

#[derive(Default)]
struct Slot {
    generation: u64,
    countdown: Option<JoinHandle<()>>,
}

struct ChannelTimer {
    slot: Mutex<Slot>,
    /// Expiries queued to the worker or running on it.
    pending: watch::Sender<usize>,
}

impl ChannelTimer {
    fn new() -> Self {
        Self {
            slot: Mutex::default(),
            pending: watch::channel(0).0,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Expired {
    channel: Channel,
    generation: u64,
}

type Timers = Arc<[ChannelTimer; CHANNEL_COUNT]>;

pub struct TimeoutScheduler {
    runtime: Runtime,
    timers: Timers,
    tx: Option<mpsc::UnboundedSender<Expired>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl TimeoutScheduler {
    /// Start the timer runtime and the worker. `on_expiry` runs on the worker
    /// thread and must not call back into [`TimeoutScheduler::cancel`].
    pub fn spawn<F>(on_expiry: F) -> std::io::Result<Self>
    where
        F: FnMut(Channel) + Send + 'static,
    {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("flashlight-timer")
            .enable_time()
            .build()?;
        let timers: Timers = Arc::new(std::array::from_fn(|_| ChannelTimer::new()));
        let (tx, mut rx) = mpsc::unbounded_channel::<Expired>();

        let worker_timers = Arc::clone(&timers);
        let mut on_expiry = on_expiry;
        let worker = thread::Builder::new()
            .name("flashlight-work".into())
            .spawn(move || {
                while let Some(expired) = rx.blocking_recv() {
                    let timer = &worker_timers[expired.channel.index()];
                    let live = timer.lock().generation == expired.generation;
                    if live {
                        info!("timeout work on {}", expired.channel);
                        on_expiry(expired.channel);
                    }
                    timer.pending.send_modify(|n| *n = n.saturating_sub(1));
                }
            })?;

        Ok(Self {
            runtime,
            timers,
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Arm `channel` to expire after `duration`, replacing any pending
    /// countdown. A zero duration only disarms.
    pub fn start(&self, channel: Channel, duration: Duration) {
        let mut slot = self.timers[channel.index()].lock();
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(old) = slot.countdown.take() {
            old.abort();
        }
        debug!("arm {} for {} ms", channel, duration.as_millis());
        if duration.is_zero() {
            return;
        }
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let timers = Arc::clone(&self.timers);
        let generation = slot.generation;
        slot.countdown = Some(self.runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            let pending = &timers[channel.index()].pending;
            pending.send_modify(|n| *n += 1);
            if tx.send(Expired { channel, generation }).is_err() {
                pending.send_modify(|n| *n -= 1);
            }
        }));
    }

    /// Disarm `channel` and wait until no expiry for it is queued or running.
    pub fn cancel(&self, channel: Channel) {
        let timer = &self.timers[channel.index()];
        let countdown = {
            let mut slot = timer.lock();
            slot.generation = slot.generation.wrapping_add(1);
            slot.countdown.take()
        };
        if let Some(countdown) = countdown {
            countdown.abort();
            // Cancelled or finished; either way it has stopped queueing.
            let _ = self.runtime.block_on(countdown);
        }
        self.drain(timer);
    }

    pub fn is_armed(&self, channel: Channel) -> bool {
        self.timers[channel.index()]
            .lock()
            .countdown
            .as_ref()
            .is_some_and(|countdown| !countdown.is_finished())
    }

    /// Wait for every queued expiry to finish. Armed countdowns keep running.
    pub fn flush(&self) {
        for timer in self.timers.iter() {
            self.drain(timer);
        }
    }

    fn drain(&self, timer: &ChannelTimer) {
        let mut pending = timer.pending.subscribe();
        let _ = self.runtime.block_on(pending.wait_for(|n| *n == 0));
    }
}

impl Drop for TimeoutScheduler {
    fn drop(&mut self) {
        for timer in self.timers.iter() {
            let countdown = timer.lock().countdown.take();
            if let Some(countdown) = countdown {
                countdown.abort();
                let _ = self.runtime.block_on(countdown);
            }
        }
        // The worker exits once every sender is gone.
        self.tx = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (TimeoutScheduler, Arc<[AtomicUsize; CHANNEL_COUNT]>) {
        let fired: Arc<[AtomicUsize; CHANNEL_COUNT]> = Arc::new(Default::default());
        let sink = Arc::clone(&fired);
        let scheduler = TimeoutScheduler::spawn(move |channel: Channel| {
            sink[channel.index()].fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        (scheduler, fired)
    }

    #[test]
    fn zero_duration_never_fires() {
        let (scheduler, fired) = counting();
        scheduler.start(Channel::Ch1, Duration::ZERO);
        assert!(!scheduler.is_armed(Channel::Ch1));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(fired[0].load(Ordering::SeqCst), 0);
    }

    #[test]
    fn armed_countdown_fires_exactly_once() {
        let (scheduler, fired) = counting();
        scheduler.start(Channel::Ch2, Duration::from_millis(20));
        assert!(scheduler.is_armed(Channel::Ch2));
        thread::sleep(Duration::from_millis(200));
        scheduler.flush();
        assert_eq!(fired[1].load(Ordering::SeqCst), 1);
        assert_eq!(fired[0].load(Ordering::SeqCst), 0);
        assert!(!scheduler.is_armed(Channel::Ch2));
    }

    #[test]
    fn cancel_before_expiry_suppresses_work() {
        let (scheduler, fired) = counting();
        scheduler.start(Channel::Ch1, Duration::from_millis(100));
        scheduler.cancel(Channel::Ch1);
        thread::sleep(Duration::from_millis(250));
        assert_eq!(fired[0].load(Ordering::SeqCst), 0);
    }

    #[test]
    fn restart_replaces_pending_countdown() {
        let (scheduler, fired) = counting();
        scheduler.start(Channel::Ch1, Duration::from_millis(40));
        scheduler.start(Channel::Ch1, Duration::from_millis(400));
        thread::sleep(Duration::from_millis(150));
        assert_eq!(fired[0].load(Ordering::SeqCst), 0);
        assert!(scheduler.is_armed(Channel::Ch1));
        scheduler.cancel(Channel::Ch1);
    }

    #[test]
    fn cancel_waits_for_running_expiry() {
        let done = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&done);
        let scheduler = TimeoutScheduler::spawn(move |_| {
            thread::sleep(Duration::from_millis(100));
            sink.store(1, Ordering::SeqCst);
        })
        .unwrap();
        scheduler.start(Channel::Ch1, Duration::from_millis(10));
        thread::sleep(Duration::from_millis(50));
        scheduler.cancel(Channel::Ch1);
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
