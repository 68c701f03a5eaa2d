//! Reference-counted flashlight device.
//!
//! [`Flashlight`] wires the channel controller to the timeout scheduler and
//! gates chip bring-up on a usage count: the chip is initialised when the
//! count goes 0→1 and shut down when it returns to 0.
//!
//! Locking: the controller (register port, shared enable byte, charge flag)
//! sits behind one mutex held for a whole operation, so an enable's
//! compute-and-write cannot interleave with a disable. The usage count has
//! its own mutex and may be taken before the controller lock, never after.
//! Countdown cancellation happens with the controller lock released, since
//! the expiry work takes it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::command::{Command, FlashArg};
use crate::config::Config;
use crate::controller::{ChannelController, ChargeCoordinator};
use crate::data_types::Channel;
use crate::driver::RegisterPort;
use crate::error::Error;
use crate::levels::{LEVEL_NUM, MAX_TORCH_LEVEL, current_ma};
use crate::registers::{HW_TIMEOUT_MS, addr};
use crate::timer::TimeoutScheduler;

type Shared<P, C> = Arc<Mutex<ChannelController<P, C>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Flashlight<P, C> {
    controller: Shared<P, C>,
    scheduler: TimeoutScheduler,
    use_count: Mutex<usize>,
}

impl<P, C> Flashlight<P, C>
where
    P: RegisterPort + Send + 'static,
    C: ChargeCoordinator + Send + 'static,
{
    /// Attach to the chip. Nothing is written until the first
    /// [`set_driver(true)`](Self::set_driver).
    pub fn new(port: P, coordinator: C, config: Config) -> Result<Self, Error<P::Error>> {
        let controller = Arc::new(Mutex::new(ChannelController::new(port, coordinator, &config)));
        let worker = Arc::clone(&controller);
        let scheduler = TimeoutScheduler::spawn(move |channel| {
            if lock(&worker).disable(channel).is_err() {
                warn!("timeout disable failed on {}", channel);
            }
        })
        .map_err(|_| Error::Unavailable)?;

        Ok(Self {
            controller,
            scheduler,
            use_count: Mutex::new(0),
        })
    }

    /// Attach after checking that the chip answers on the bus.
    pub fn probe(mut port: P, coordinator: C, config: Config) -> Result<Self, Error<P::Error>> {
        info!("probe start");
        port.read(addr::LED_CTRL1).map_err(|e| {
            warn!("chip did not answer");
            Error::Io(e)
        })?;
        let flashlight = Self::new(port, coordinator, config)?;
        info!("probe done");
        Ok(flashlight)
    }

    /// Take (`true`) or drop (`false`) a usage reference.
    pub fn set_driver(&self, activate: bool) -> Result<(), Error<P::Error>> {
        let mut count = lock(&self.use_count);
        if activate {
            let result = if *count == 0 {
                lock(&self.controller).chip_init()
            } else {
                Ok(())
            };
            *count += 1;
            info!("set driver: {}", *count);
            return result;
        }

        if *count == 0 {
            info!("unset driver: already 0");
            return Ok(());
        }
        *count -= 1;
        let mut result = Ok(());
        if *count == 0 {
            for channel in Channel::ALL {
                self.scheduler.cancel(channel);
            }
            let mut controller = lock(&self.controller);
            result = controller.chip_uninit();
            controller.release_high_current();
        }
        info!("unset driver: {}", *count);
        result
    }

    pub fn use_count(&self) -> usize {
        *lock(&self.use_count)
    }

    pub fn set_timeout(&self, channel: Channel, timeout_ms: u32) {
        lock(&self.controller).set_timeout_ms(channel, timeout_ms);
    }

    pub fn set_level(&self, channel: Channel, level: i32) -> Result<(), Error<P::Error>> {
        lock(&self.controller).set_level(channel, level)
    }

    /// On: arm the configured timeout, then enable. Off: disable, then wait
    /// out any pending timeout.
    pub fn set_on_off(&self, channel: Channel, on: bool) -> Result<(), Error<P::Error>> {
        if on {
            // An expiry already running from the previous arming must finish
            // before the channel is switched back on.
            self.scheduler.cancel(channel);
            let mut controller = lock(&self.controller);
            let timeout_ms = controller.state(channel).timeout_ms;
            self.scheduler
                .start(channel, Duration::from_millis(u64::from(timeout_ms)));
            controller.enable(channel)
        } else {
            let result = lock(&self.controller).disable(channel);
            self.scheduler.cancel(channel);
            result
        }
    }

    /// Run a typed command. Queries return their answer.
    pub fn execute(&self, command: Command) -> Result<Option<i32>, Error<P::Error>> {
        match command {
            Command::SetTimeout { channel, ms } => {
                info!("set timeout {}: {}", channel, ms);
                self.set_timeout(channel, ms);
                Ok(None)
            }
            Command::SetLevel { channel, level } => {
                info!("set level {}: {}", channel, level);
                self.set_level(channel, level).map(|()| None)
            }
            Command::SetOnOff { channel, on } => {
                info!("set on/off {}: {}", channel, on);
                self.set_on_off(channel, on).map(|()| None)
            }
            Command::GetLevelCount => Ok(Some(LEVEL_NUM as i32)),
            Command::GetMaxTorchLevel => Ok(Some(i32::from(MAX_TORCH_LEVEL))),
            Command::GetCurrentForLevel(level) => Ok(Some(i32::from(current_ma(level)))),
            Command::GetHardwareTimeoutMs => Ok(Some(HW_TIMEOUT_MS as i32)),
        }
    }

    /// Decode and run a raw request, writing any answer back into `arg`.
    pub fn ioctl(&self, code: u32, arg: &mut FlashArg) -> Result<(), Error<P::Error>> {
        let command = Command::decode(code, arg).inspect_err(|e| {
            warn!("rejected command {} on channel {}: {}", code, arg.channel, e.errno());
        })?;
        if let Some(value) = self.execute(command)? {
            arg.arg = value;
        }
        Ok(())
    }

    /// Fire `channel` at `level` for `duration_ms`, blocking the caller.
    /// Takes and drops its own usage reference; the channel is always
    /// switched off and the reference dropped, even if bring-up failed.
    pub fn strobe(&self, channel: Channel, level: i32, duration_ms: u32) -> Result<(), Error<P::Error>> {
        let activated = self.set_driver(true);
        self.scheduler.cancel(channel);
        let lit = activated.and_then(|()| {
            let mut controller = lock(&self.controller);
            controller.set_timeout_ms(channel, 0);
            controller
                .set_level(channel, level)
                .and_then(|()| controller.enable(channel))
        });
        if lit.is_ok() {
            thread::sleep(Duration::from_millis(u64::from(duration_ms)));
        }
        let off = lock(&self.controller).disable(channel);
        let released = self.set_driver(false);
        lit.and(off).and(released)
    }

    pub fn is_armed(&self, channel: Channel) -> bool {
        self.scheduler.is_armed(channel)
    }

    /// Look at controller state under the register lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&ChannelController<P, C>) -> R) -> R {
        f(&lock(&self.controller))
    }

    /// Detach: stop countdowns, switch both channels off, hand back the port
    /// and coordinator.
    pub fn remove(self) -> Result<(P, C), Error<P::Error>> {
        info!("remove start");
        let Self {
            controller,
            scheduler,
            ..
        } = self;
        for channel in Channel::ALL {
            scheduler.cancel(channel);
        }
        scheduler.flush();
        drop(scheduler);

        let controller = Arc::try_unwrap(controller).map_err(|_| Error::Unavailable)?;
        let mut controller = controller.into_inner().unwrap_or_else(PoisonError::into_inner);
        if controller.chip_uninit().is_err() {
            warn!("disable on remove failed");
        }
        info!("remove done");
        Ok(controller.free())
    }
}
