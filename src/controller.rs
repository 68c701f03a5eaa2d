//! Channel control for the two LED channels.
//!
//! Both channels share one enable register (LED_CTRL1). The controller keeps
//! the latched value of that register and updates it as set/clear operations:
//!
//! - enabling a channel clears that channel's bits and ORs in its torch or
//!   flash bits, on top of whatever the other channel has latched;
//! - disabling any channel writes the disable sentinel, silencing both.
//!
//! The latched value starts at the sentinel after `chip_init` and after every
//! disable, so channel 2 may be enabled without channel 1.

use crate::config::Config;
use crate::data_types::{CHANNEL_COUNT, Channel, ChannelState, LedMode};
use crate::driver::RegisterPort;
use crate::error::Error;
use crate::levels::{entry, is_torch, verify_level};
use crate::registers::{LedCtrl1Bits, addr};

/// External power subsystem that must know when flash current is drawn.
pub trait ChargeCoordinator {
    fn set_high_current_mode(&mut self, active: bool);
}

impl<F> ChargeCoordinator for F
where
    F: FnMut(bool),
{
    fn set_high_current_mode(&mut self, active: bool) {
        self(active)
    }
}

pub struct ChannelController<P, C> {
    port: P,
    coordinator: C,
    init_sequence: &'static [(u8, u8)],
    channels: [ChannelState; CHANNEL_COUNT],
    enable: LedCtrl1Bits,
    high_current: bool,
}

impl<P, C> ChannelController<P, C>
where
    P: RegisterPort,
    C: ChargeCoordinator,
{
    pub fn new(port: P, coordinator: C, config: &Config) -> Self {
        let mut channels = [ChannelState::default(); CHANNEL_COUNT];
        for (state, timeout_ms) in channels.iter_mut().zip(config.timeout_ms) {
            state.timeout_ms = timeout_ms;
        }
        Self {
            port,
            coordinator,
            init_sequence: config.init_sequence,
            channels,
            enable: LedCtrl1Bits::DISABLE,
            high_current: false,
        }
    }

    /// Clamp `level`, write it to the channel's torch or flash brightness
    /// register and remember it.
    pub fn set_level(&mut self, channel: Channel, level: i32) -> Result<(), Error<P::Error>> {
        let level = verify_level(level);
        let row = entry(level);
        let (reg, value) = match (channel, is_torch(level)) {
            (Channel::Ch1, true) => (addr::TLED1_TORCH_BR, row.torch),
            (Channel::Ch1, false) => (addr::TLED1_FLASH_BR, row.flash),
            (Channel::Ch2, true) => (addr::TLED2_TORCH_BR, row.torch),
            (Channel::Ch2, false) => (addr::TLED2_FLASH_BR, row.flash),
        };
        self.channels[channel.index()].level = Some(level);
        self.port.write(reg, value).map_err(Error::Io)
    }

    /// Switch a channel on at its current level.
    pub fn enable(&mut self, channel: Channel) -> Result<(), Error<P::Error>> {
        // An unset level drives the torch sub-register.
        let torch = self.channels[channel.index()].level.is_none_or(is_torch);
        let (bits, mode) = match (channel, torch) {
            (Channel::Ch1, true) => (LedCtrl1Bits::LED1_TORCH, LedMode::Torch),
            (Channel::Ch1, false) => (LedCtrl1Bits::LED1_FLASH, LedMode::Flash),
            (Channel::Ch2, true) => (LedCtrl1Bits::LED2_TORCH, LedMode::Torch),
            (Channel::Ch2, false) => (LedCtrl1Bits::LED2_FLASH, LedMode::Flash),
        };
        if mode == LedMode::Flash {
            self.assert_high_current();
        }

        let own = match channel {
            Channel::Ch1 => LedCtrl1Bits::LED1_ALL,
            Channel::Ch2 => LedCtrl1Bits::LED2_ALL,
        };
        self.enable.remove(own);
        self.enable.insert(LedCtrl1Bits::BASE | bits);
        self.channels[channel.index()].mode = mode;

        debug!("enable {} ctrl {:#x}", channel, self.enable.bits());
        self.port
            .write(addr::LED_CTRL1, self.enable.bits())
            .map_err(Error::Io)
    }

    /// Switch the whole enable register off and drop the high-current signal.
    pub fn disable(&mut self, channel: Channel) -> Result<(), Error<P::Error>> {
        self.enable = LedCtrl1Bits::DISABLE;
        for state in self.channels.iter_mut() {
            state.mode = LedMode::Off;
        }
        let written = self.port.write(addr::LED_CTRL1, LedCtrl1Bits::DISABLE.bits());
        info!("disable {}", channel);
        self.release_high_current();
        written.map_err(Error::Io)
    }

    /// Write chip defaults. Every write is attempted; the first failure is
    /// reported.
    pub fn chip_init(&mut self) -> Result<(), Error<P::Error>> {
        let mut result = Ok(());
        for &(reg, value) in self.init_sequence {
            if let Err(e) = self.port.write(reg, value) {
                if result.is_ok() {
                    result = Err(Error::Io(e));
                }
            }
        }
        self.enable = LedCtrl1Bits::DISABLE;
        for state in self.channels.iter_mut() {
            state.level = None;
            state.mode = LedMode::Off;
        }
        self.release_high_current();
        if result.is_err() {
            warn!("failed to init");
        }
        result
    }

    /// Disable both channels.
    pub fn chip_uninit(&mut self) -> Result<(), Error<P::Error>> {
        let first = self.disable(Channel::Ch1);
        let second = self.disable(Channel::Ch2);
        first.and(second)
    }

    /// Clear the high-current signal if it is set. Returns whether it was.
    pub fn release_high_current(&mut self) -> bool {
        if !self.high_current {
            return false;
        }
        self.coordinator.set_high_current_mode(false);
        self.high_current = false;
        info!("high-current mode released");
        true
    }

    fn assert_high_current(&mut self) {
        if self.high_current {
            return;
        }
        self.coordinator.set_high_current_mode(true);
        self.high_current = true;
        info!("high-current mode asserted");
    }

    pub fn set_timeout_ms(&mut self, channel: Channel, timeout_ms: u32) {
        self.channels[channel.index()].timeout_ms = timeout_ms;
    }

    pub fn state(&self, channel: Channel) -> &ChannelState {
        &self.channels[channel.index()]
    }

    /// Latched value of the shared enable register.
    pub fn enable_bits(&self) -> LedCtrl1Bits {
        self.enable
    }

    pub fn high_current_active(&self) -> bool {
        self.high_current
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Release the register port and coordinator.
    pub fn free(self) -> (P, C) {
        (self.port, self.coordinator)
    }
}
