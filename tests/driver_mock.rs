use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use sc6607_flashlight::registers::{DEFAULT_I2C_ADDRESS, INIT_SEQUENCE};
use sc6607_flashlight::{Channel, ChannelController, Config, Error, Sc6607};

const ADDR: u8 = DEFAULT_I2C_ADDRESS;

fn no_charge(_: bool) {}

#[test]
fn read_reg_uses_write_read() {
    let expectations = [I2cTrans::write_read(ADDR, vec![0x80], vec![0x01])];
    let mock = I2cMock::new(&expectations);
    let mut driver = Sc6607::new(mock);
    assert_eq!(driver.read_reg(0x80).unwrap(), 0x01);
    driver.free().done();
}

#[test]
fn custom_address_is_used() {
    let expectations = [I2cTrans::write(0x30, vec![0x84, 0x02])];
    let mock = I2cMock::new(&expectations);
    let mut driver = Sc6607::with_address(mock, 0x30);
    assert_eq!(driver.address(), 0x30);
    driver.write_reg(0x84, 0x02).unwrap();
    driver.free().done();
}

#[test]
fn flash_level_then_enable_hits_registers() {
    // Level 10 -> TLED1_FLASH_BR = 0x1A, then LED_CTRL1 = LED1 flash (0x81).
    let expectations = [
        I2cTrans::write(ADDR, vec![0x81, 0x1A]),
        I2cTrans::write(ADDR, vec![0x80, 0x81]),
        I2cTrans::write(ADDR, vec![0x80, 0x01]),
    ];
    let mock = I2cMock::new(&expectations);
    let mut controller = ChannelController::new(Sc6607::new(mock), no_charge, &Config::default());
    controller.set_level(Channel::Ch1, 10).unwrap();
    controller.enable(Channel::Ch1).unwrap();
    controller.disable(Channel::Ch1).unwrap();
    let (driver, _) = controller.free();
    driver.free().done();
}

#[test]
fn chip_init_writes_defaults_in_order() {
    let expectations: Vec<_> = INIT_SEQUENCE
        .iter()
        .map(|&(reg, value)| I2cTrans::write(ADDR, vec![reg, value]))
        .collect();
    let mock = I2cMock::new(&expectations);
    let mut controller = ChannelController::new(Sc6607::new(mock), no_charge, &Config::default());
    controller.chip_init().unwrap();
    let (driver, _) = controller.free();
    driver.free().done();
}

#[test]
fn chip_init_follows_a_board_specific_sequence() {
    // Board variant: lower default torch level, NTC masked off.
    static BOARD_INIT: [(u8, u8); 3] = [(0x80, 0x01), (0x84, 0x02), (0x8A, 0x7F)];
    let expectations = [
        I2cTrans::write(ADDR, vec![0x80, 0x01]),
        I2cTrans::write(ADDR, vec![0x84, 0x02]),
        I2cTrans::write(ADDR, vec![0x8A, 0x7F]),
    ];
    let mock = I2cMock::new(&expectations);
    let config = Config::default().with_init_sequence(&BOARD_INIT);
    assert_eq!(config.init_sequence.len(), 3);
    let mut controller = ChannelController::new(Sc6607::new(mock), no_charge, &config);
    controller.chip_init().unwrap();
    assert_eq!(controller.enable_bits().bits(), 0x01);
    let (driver, _) = controller.free();
    driver.free().done();
}

#[test]
fn chip_init_keeps_going_after_a_bus_error() {
    let expectations: Vec<_> = INIT_SEQUENCE
        .iter()
        .enumerate()
        .map(|(i, &(reg, value))| {
            let t = I2cTrans::write(ADDR, vec![reg, value]);
            if i == 2 { t.with_error(ErrorKind::Other) } else { t }
        })
        .collect();
    let mock = I2cMock::new(&expectations);
    let mut controller = ChannelController::new(Sc6607::new(mock), no_charge, &Config::default());
    assert_eq!(controller.chip_init(), Err(Error::Io(ErrorKind::Other)));
    let (driver, _) = controller.free();
    driver.free().done();
}

#[test]
fn set_level_reports_bus_error() {
    let expectations = [I2cTrans::write(ADDR, vec![0x85, 0x0E]).with_error(ErrorKind::Other)];
    let mock = I2cMock::new(&expectations);
    let mut controller = ChannelController::new(Sc6607::new(mock), no_charge, &Config::default());
    let err = controller.set_level(Channel::Ch2, 7).unwrap_err();
    assert_eq!(err.errno(), -5);
    // The level is still recorded.
    assert_eq!(controller.state(Channel::Ch2).level, Some(7));
    let (driver, _) = controller.free();
    driver.free().done();
}
