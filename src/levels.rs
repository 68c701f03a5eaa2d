//! Brightness level table.
//!
//! Levels 0..=7 drive the torch sub-register, 8..=27 the flash sub-register.
//! Codes are 12.5 mA steps above a 25 mA offset.

/// Number of brightness levels.
pub const LEVEL_NUM: usize = 28;
/// First level in flash range.
pub const LEVEL_TORCH: u8 = 8;
/// Highest level that still drives the torch sub-register.
pub const MAX_TORCH_LEVEL: u8 = LEVEL_TORCH - 1;

/// One row of the level table.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LevelEntry {
    /// Torch brightness code (0 outside torch range).
    pub torch: u8,
    /// Flash brightness code.
    pub flash: u8,
    /// LED current in milliamps.
    pub milliamps: u16,
}

const fn row(torch: u8, flash: u8, milliamps: u16) -> LevelEntry {
    LevelEntry { torch, flash, milliamps }
}

pub const LEVELS: [LevelEntry; LEVEL_NUM] = [
    row(0x00, 0x00, 25),
    row(0x02, 0x02, 50),
    row(0x04, 0x04, 75),
    row(0x06, 0x06, 100),
    row(0x08, 0x08, 125),
    row(0x0A, 0x0A, 150),
    row(0x0C, 0x0C, 175),
    row(0x0E, 0x0E, 200),
    row(0x00, 0x12, 250),
    row(0x00, 0x16, 300),
    row(0x00, 0x1A, 350),
    row(0x00, 0x1E, 400),
    row(0x00, 0x22, 450),
    row(0x00, 0x26, 500),
    row(0x00, 0x2A, 550),
    row(0x00, 0x2E, 600),
    row(0x00, 0x32, 650),
    row(0x00, 0x36, 700),
    row(0x00, 0x3A, 750),
    row(0x00, 0x3E, 800),
    row(0x00, 0x42, 850),
    row(0x00, 0x46, 900),
    row(0x00, 0x4A, 950),
    row(0x00, 0x4E, 1000),
    row(0x00, 0x52, 1050),
    row(0x00, 0x56, 1100),
    row(0x00, 0x5A, 1150),
    row(0x00, 0x5E, 1200),
];

/// Clamp a requested level into `0..=27`.
pub fn verify_level(level: i32) -> u8 {
    level.clamp(0, LEVEL_NUM as i32 - 1) as u8
}

/// True if `level` is in torch range.
pub fn is_torch(level: u8) -> bool {
    level < LEVEL_TORCH
}

/// Table row for a level, clamped.
pub fn entry(level: u8) -> LevelEntry {
    LEVELS[usize::from(level).min(LEVEL_NUM - 1)]
}

/// LED current for a requested level, clamped.
pub fn current_ma(level: i32) -> u16 {
    entry(verify_level(level)).milliamps
}
