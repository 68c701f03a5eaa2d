//! Register map and constants for the SC6607 flash/torch block.

/// 7-bit I2C address of the flash block on the reference board.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x63;

/// Register addresses.
pub mod addr {
    pub const DEVICE_ID: u8 = 0x00;
    /// Shared enable register for both LED channels.
    pub const LED_CTRL1: u8 = 0x80;
    /// Flash brightness, LED1 / LED2.
    pub const TLED1_FLASH_BR: u8 = 0x81;
    pub const TLED2_FLASH_BR: u8 = 0x82;
    /// Flash safety timer.
    pub const FLED_TIMER: u8 = 0x83;
    /// Torch brightness, LED1 / LED2.
    pub const TLED1_TORCH_BR: u8 = 0x84;
    pub const TLED2_TORCH_BR: u8 = 0x85;
    /// Current protection.
    pub const LED_PRO: u8 = 0x86;
    pub const LED_STAT1: u8 = 0x87;
    pub const LED_STAT2: u8 = 0x88;
    pub const LED_FLG: u8 = 0x89;
    /// Interrupt mask.
    pub const LED_MASK: u8 = 0x8A;
    pub const FL_TX_REPORT: u8 = 0x8B;
}

/// Timeout the flash block enforces on its own, reported to callers.
pub const HW_TIMEOUT_MS: u32 = 400;

bitflags::bitflags! {
    /// LED_CTRL1 register bits (0x80). Both channels share this register.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct LedCtrl1Bits: u8 {
        /// Bit 0: held high in every value the driver writes.
        const BASE       = 1 << 0;
        /// Bit 4: LED2 torch enable.
        const LED2_TORCH = 1 << 4;
        /// Bit 5: LED1 torch enable.
        const LED1_TORCH = 1 << 5;
        /// Bit 6: LED2 flash enable.
        const LED2_FLASH = 1 << 6;
        /// Bit 7: LED1 flash enable.
        const LED1_FLASH = 1 << 7;
    }
}

impl LedCtrl1Bits {
    /// Value that switches both channels off.
    pub const DISABLE: Self = Self::BASE;
    pub const LED1_ALL: Self = Self::LED1_TORCH.union(Self::LED1_FLASH);
    pub const LED2_ALL: Self = Self::LED2_TORCH.union(Self::LED2_FLASH);
}

/// Chip defaults written on init: enable cleared, ramp time and flash
/// timeout, current protection, interrupt mask.
pub const INIT_SEQUENCE: [(u8, u8); 9] = [
    (addr::LED_CTRL1, LedCtrl1Bits::DISABLE.bits()),
    (addr::TLED1_FLASH_BR, 0x56),
    (addr::TLED2_FLASH_BR, 0x00),
    (addr::FLED_TIMER, 0x9F),
    (addr::TLED1_TORCH_BR, 0x06),
    (addr::TLED2_TORCH_BR, 0x00),
    (addr::LED_PRO, 0x02),
    (addr::LED_MASK, 0x48),
    (addr::FL_TX_REPORT, 0x01),
];
