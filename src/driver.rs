//! Register port for the SC6607 flash block.
//! Blocking I2C helpers over `embedded-hal`; the controller talks to any
//! [`RegisterPort`], this is the one backed by a real bus.

use crate::registers::DEFAULT_I2C_ADDRESS;

/// Single-byte register access to one physical device.
///
/// Retry policy, if any, belongs to the implementation; callers see every
/// failure.
pub trait RegisterPort {
    type Error: core::fmt::Debug;

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;

    fn read(&mut self, reg: u8) -> Result<u8, Self::Error>;
}

/// SC6607 flash block on an I2C bus.
pub struct Sc6607<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Sc6607<I2C> {
    /// Create a new driver instance with the default I2C address.
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_I2C_ADDRESS,
        }
    }

    /// Create a new driver instance with a custom I2C address.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Return the 7-bit I2C address configured for this instance.
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Release the bus.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Sc6607<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Write a single register.
    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), I2C::Error> {
        trace!("write {:#x} <- {:#x}", reg, value);
        self.i2c.write(self.address, &[reg, value]).inspect_err(|_| {
            error!("failed writing at {:#x}", reg);
        })
    }

    /// Read a single register.
    pub fn read_reg(&mut self, reg: u8) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .inspect_err(|_| {
                error!("failed read at {:#x}", reg);
            })?;
        Ok(buf[0])
    }
}

impl<I2C> RegisterPort for Sc6607<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = I2C::Error;

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.write_reg(reg, value)
    }

    fn read(&mut self, reg: u8) -> Result<u8, Self::Error> {
        self.read_reg(reg)
    }
}
