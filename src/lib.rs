//! # Host-side access to a Pimoroni Motor 2040 over I2C
//!
//! The [Motor 2040](https://shop.pimoroni.com/products/motor-2040) runs a
//! small I2C responder (address 0x41 by default) that exposes its encoders,
//! sensors and motor settings as single-byte registers, and accepts three
//! byte commands to drive the motors.
//!
//! Supported:
//!
//! * Encoder state for channels A to D
//! * Board voltage, current sense and the fault line
//! * Motor settings readback and all motor commands
//!
//! Every reading is one byte wide; that is all the responder sends back.

extern crate i2cdev;
#[macro_use]
extern crate log;
extern crate measurements;

pub mod motor2040;
mod percent;
pub mod registers;

pub use measurements::Angle;
pub use measurements::Current;
pub use measurements::Voltage;
pub use percent::Percent;

use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// One of the four motor/encoder channels on the board
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Channel {
    A,
    B,
    C,
    D,
}

/// The two analog sensor inputs that report a voltage
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VoltageSensor {
    A1,
    A2,
}

/// Represents the Motor 2040 at the other end of the bus
pub struct Board<T: I2CDevice = LinuxI2CDevice> {
    chip: motor2040::Motor2040<T>,
}

/// Errors that this crate can return. `E` is the bus error.
#[derive(Debug)]
pub enum Motor2040Error<E = LinuxI2CError> {
    InvalidChannel(String),
    UnknownRegister(String),
    UnknownCommand(String),
    /// The register number is shadowed by another one in the board's map.
    UnreachableRegister(u8),
    I2CError(E),
}

/// A shortcut for Results that can return `T` or `Motor2040Error`
pub type Motor2040Result<T, E = LinuxI2CError> = Result<T, Motor2040Error<E>>;

impl Channel {
    pub fn index(self) -> usize {
        match self {
            Channel::A => 0,
            Channel::B => 1,
            Channel::C => 2,
            Channel::D => 3,
        }
    }

    fn wire(self) -> u8 {
        self.index() as u8
    }
}

impl FromStr for Channel {
    type Err = Motor2040Error;

    fn from_str(s: &str) -> Motor2040Result<Channel> {
        match s.trim().to_lowercase().as_str() {
            "a" | "0" => Ok(Channel::A),
            "b" | "1" => Ok(Channel::B),
            "c" | "2" => Ok(Channel::C),
            "d" | "3" => Ok(Channel::D),
            _ => Err(Motor2040Error::InvalidChannel(s.to_owned())),
        }
    }
}

impl VoltageSensor {
    fn register(self) -> u8 {
        match self {
            VoltageSensor::A1 => registers::VOLTAGE_SENSOR_A1,
            VoltageSensor::A2 => registers::VOLTAGE_SENSOR_A2,
        }
    }
}

/// The 16-bit value printed by the one-shot diagnostic.
///
/// `raw` is the register read widened to 16 bits and `high` stands in for
/// the byte meant to fill the top half. The mask keeps only bits 1 to 3 of
/// `high << 8`, which are always clear, so a single-byte read yields 0.
pub fn diagnostic_word(raw: u16, high: u8) -> u16 {
    ((raw >> 8) & 0xff) | ((u16::from(high) << 8) & 0x0E)
}

impl Board<LinuxI2CDevice> {
    /// Open the board on `/dev/i2c-1` at address 0x41.
    pub fn new() -> Motor2040Result<Board> {
        Board::open(registers::DEFAULT_BUS, registers::DEFAULT_ADDRESS)
    }

    /// Open the board on any bus and address.
    pub fn open<P: AsRef<Path>>(path: P, address: u16) -> Motor2040Result<Board> {
        info!("opening {} at {:#04x}", path.as_ref().display(), address);
        Ok(Board::from_device(LinuxI2CDevice::new(path, address)?))
    }
}

impl<T> Board<T>
    where T: I2CDevice + Sized
{
    /// Use an already opened device.
    pub fn from_device(i2cdev: T) -> Board<T> {
        Board {
            chip: motor2040::Motor2040::new(i2cdev),
        }
    }

    /// Give back the underlying device.
    pub fn release(self) -> T {
        self.chip.release()
    }

    /// Read any register as a raw byte.
    pub fn raw(&mut self, reg: u8) -> Motor2040Result<u8, T::Error> {
        self.chip.read_register(reg).map_err(Motor2040Error::I2CError)
    }

    /// Read every register the board answers.
    pub fn dump(&mut self) -> Motor2040Result<Vec<(u8, u8)>, T::Error> {
        self.chip.dump().map_err(Motor2040Error::I2CError)
    }

    pub fn encoder_count(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::ENCODER_COUNT[channel.index()])
    }

    pub fn encoder_delta(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::ENCODER_DELTA[channel.index()])
    }

    pub fn encoder_step(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::ENCODER_STEP[channel.index()])
    }

    pub fn encoder_turn(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::ENCODER_TURN[channel.index()])
    }

    pub fn encoder_revolutions(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::ENCODER_REVOLUTIONS[channel.index()])
    }

    pub fn encoder_common_pin(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::ENCODER_COMMON_PIN[channel.index()])
    }

    pub fn encoder_counts_per_revolution(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::ENCODER_COUNTS_PER_REV[channel.index()])
    }

    /// Encoder angle, whole degrees.
    pub fn encoder_degrees(&mut self, channel: Channel) -> Motor2040Result<Angle, T::Error> {
        let value = self.raw(registers::ENCODER_DEGREES[channel.index()])?;
        Ok(Angle::from_degrees(f64::from(value)))
    }

    /// Encoder angle, whole radians.
    pub fn encoder_radians(&mut self, channel: Channel) -> Motor2040Result<Angle, T::Error> {
        let value = self.raw(registers::ENCODER_RADIANS[channel.index()])?;
        Ok(Angle::from_radians(f64::from(value)))
    }

    /// True when the encoder reports it is turning in reverse.
    pub fn encoder_direction(&mut self, channel: Channel) -> Motor2040Result<bool, T::Error> {
        Ok(self.raw(registers::ENCODER_DIRECTION[channel.index()])? != 0)
    }

    /// Supply voltage, whole volts.
    pub fn voltage(&mut self) -> Motor2040Result<Voltage, T::Error> {
        let value = self.raw(registers::VOLTAGE)?;
        Ok(Voltage::from_volts(f64::from(value)))
    }

    pub fn voltage_sensor(&mut self, sensor: VoltageSensor) -> Motor2040Result<Voltage, T::Error> {
        let value = self.raw(sensor.register())?;
        Ok(Voltage::from_volts(f64::from(value)))
    }

    /// Current drawn by one motor, whole amps.
    pub fn current(&mut self, channel: Channel) -> Motor2040Result<Current, T::Error> {
        let value = self.raw(registers::CURRENT[channel.index()])?;
        Ok(Current::from_amperes(f64::from(value)))
    }

    pub fn is_fault(&mut self) -> Motor2040Result<bool, T::Error> {
        Ok(self.raw(registers::IS_FAULT)? != 0)
    }

    /// Channel B cannot be read back; the board answers channel A instead.
    pub fn motor_speed(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        match registers::motor_speed(channel.index()) {
            Some(reg) => self.raw(reg),
            None => Err(Motor2040Error::UnreachableRegister(
                registers::MOTOR_SPEED[channel.index()],
            )),
        }
    }

    pub fn motor_deadzone(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::MOTOR_DEADZONE[channel.index()])
    }

    pub fn motor_frequency(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::MOTOR_FREQUENCY[channel.index()])
    }

    pub fn motor_direction(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::MOTOR_DIRECTION[channel.index()])
    }

    pub fn motor_zeropoint(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::MOTOR_ZEROPOINT[channel.index()])
    }

    pub fn motor_speed_scale(&mut self, channel: Channel) -> Motor2040Result<u8, T::Error> {
        self.raw(registers::MOTOR_SPEED_SCALE[channel.index()])
    }

    /// Send a command by code. Use the typed setters where one exists.
    pub fn command(&mut self, cmd: u8, channel: u8, value: u8) -> Motor2040Result<(), T::Error> {
        self.chip
            .send_command(cmd, channel, value)
            .map_err(Motor2040Error::I2CError)
    }

    fn channel_command(&mut self, cmd: u8, channel: Channel, value: u8) -> Motor2040Result<(), T::Error> {
        self.command(cmd, channel.wire(), value)
    }

    fn board_command(&mut self, cmd: u8) -> Motor2040Result<(), T::Error> {
        self.chip
            .send_board_command(cmd)
            .map_err(Motor2040Error::I2CError)
    }

    /// Enable all four motors
    pub fn enable(&mut self) -> Motor2040Result<(), T::Error> {
        self.board_command(registers::CMD_ENABLE)
    }

    /// Disable all four motors
    pub fn disable(&mut self) -> Motor2040Result<(), T::Error> {
        self.board_command(registers::CMD_DISABLE)
    }

    pub fn set_speed(&mut self, channel: Channel, speed: Percent) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_SPEED, channel, speed.as_percent())
    }

    pub fn full_negative(&mut self, channel: Channel) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_FULL_NEGATIVE, channel, 0)
    }

    pub fn full_positive(&mut self, channel: Channel) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_FULL_POSITIVE, channel, 0)
    }

    pub fn stop(&mut self, channel: Channel) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_STOP_CHANNEL, channel, 0)
    }

    pub fn stop_all(&mut self) -> Motor2040Result<(), T::Error> {
        self.board_command(registers::CMD_STOP)
    }

    pub fn coast(&mut self, channel: Channel) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_COAST_CHANNEL, channel, 0)
    }

    pub fn coast_all(&mut self) -> Motor2040Result<(), T::Error> {
        self.board_command(registers::CMD_COAST)
    }

    pub fn brake(&mut self, channel: Channel) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_BRAKE_CHANNEL, channel, 0)
    }

    pub fn brake_all(&mut self) -> Motor2040Result<(), T::Error> {
        self.board_command(registers::CMD_BRAKE)
    }

    pub fn set_speed_scale(&mut self, channel: Channel, scale: Percent) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_SPEED_SCALE, channel, scale.as_percent())
    }

    pub fn set_zeropoint(&mut self, channel: Channel, zeropoint: Percent) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_ZEROPOINT, channel, zeropoint.as_percent())
    }

    /// Set speed as a percentage of the motor's full range.
    pub fn to_percent(&mut self, channel: Channel, value: Percent) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_TO_PERCENT, channel, value.as_percent())
    }

    pub fn set_duty(&mut self, channel: Channel, duty: u8) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_DUTY, channel, duty)
    }

    pub fn set_deadzone(&mut self, channel: Channel, deadzone: u8) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_DEADZONE, channel, deadzone)
    }

    pub fn set_frequency(&mut self, channel: Channel, frequency: u8) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_FREQUENCY, channel, frequency)
    }

    /// Flip the motor's direction to reversed.
    pub fn reverse_direction(&mut self, channel: Channel) -> Motor2040Result<(), T::Error> {
        self.channel_command(registers::CMD_DIRECTION, channel, 0)
    }
}

impl<E: fmt::Display> fmt::Display for Motor2040Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Motor2040Error::InvalidChannel(ref s) => write!(f, "invalid channel {:?}", s),
            Motor2040Error::UnknownRegister(ref s) => write!(f, "unknown register {:?}", s),
            Motor2040Error::UnknownCommand(ref s) => write!(f, "unknown command {:?}", s),
            Motor2040Error::UnreachableRegister(reg) => {
                write!(f, "register {} is shadowed and cannot be read", reg)
            }
            Motor2040Error::I2CError(ref e) => write!(f, "I2C error: {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Motor2040Error<E> {}

impl From<LinuxI2CError> for Motor2040Error {
    fn from(err: LinuxI2CError) -> Motor2040Error {
        Motor2040Error::I2CError(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use i2cdev::core::I2CDevice;
    use i2cdev::mock::MockI2CDevice;

    type MockError = <MockI2CDevice as I2CDevice>::Error;

    const UNTOUCHED: u8 = 0xee;

    fn mock_board(regs: &[(usize, u8)]) -> Board<MockI2CDevice> {
        let mut dev = MockI2CDevice::new();
        for &(reg, value) in regs {
            dev.regmap.write_regs(reg, &[value]);
        }
        Board::from_device(dev)
    }

    /// Runs `f` on a board whose command area is pre-filled, then returns
    /// the bytes at `cmd - 1`, `cmd` and `cmd + 1`.
    fn frame_after<F>(cmd: u8, f: F) -> [u8; 3]
        where F: FnOnce(&mut Board<MockI2CDevice>) -> Motor2040Result<(), MockError>
    {
        let mut dev = MockI2CDevice::new();
        dev.regmap.write_regs(79, &[UNTOUCHED; 21]);
        let mut board = Board::from_device(dev);
        f(&mut board).unwrap();
        [
            board.raw(cmd - 1).unwrap(),
            board.raw(cmd).unwrap(),
            board.raw(cmd + 1).unwrap(),
        ]
    }

    #[test]
    fn parse_channels() {
        assert_eq!("a".parse::<Channel>().unwrap(), Channel::A);
        assert_eq!("B".parse::<Channel>().unwrap(), Channel::B);
        assert_eq!("2".parse::<Channel>().unwrap(), Channel::C);
        assert_eq!(" d ".parse::<Channel>().unwrap(), Channel::D);
    }
    #[test]
    fn parse_bad_channel() {
        assert!("e".parse::<Channel>().is_err());
        assert!("4".parse::<Channel>().is_err());
        assert!("".parse::<Channel>().is_err());
    }
    #[test]
    fn channel_indexes_registers() {
        assert_eq!(registers::ENCODER_COUNT[Channel::A.index()], 14);
        assert_eq!(registers::CURRENT[Channel::D.index()], 54);
        assert_eq!(Channel::C.wire(), 2);
    }
    #[test]
    fn voltage_sensor_registers() {
        assert_eq!(VoltageSensor::A1.register(), 0);
        assert_eq!(VoltageSensor::A2.register(), 1);
    }
    #[test]
    fn diagnostic_word_of_single_byte_is_zero() {
        for raw in 0..=255u16 {
            assert_eq!(diagnostic_word(raw, 0), 0);
            assert_eq!(diagnostic_word(raw, 0xff), 0);
        }
    }
    #[test]
    fn diagnostic_word_keeps_high_byte_of_raw() {
        assert_eq!(diagnostic_word(0x1234, 0), 0x12);
        assert_eq!(diagnostic_word(0xff00, 0xab), 0xff);
    }
    #[test]
    fn error_display() {
        let err: Motor2040Error = Motor2040Error::UnreachableRegister(56);
        assert_eq!(err.to_string(), "register 56 is shadowed and cannot be read");
        let err: Motor2040Error = Motor2040Error::InvalidChannel("x".to_owned());
        assert_eq!(err.to_string(), "invalid channel \"x\"");
        let err: Motor2040Error = Motor2040Error::UnknownCommand("spin".to_owned());
        assert_eq!(err.to_string(), "unknown command \"spin\"");
    }
    #[test]
    fn board_wide_commands() {
        let zero = [UNTOUCHED, 0, 0];
        assert_eq!(frame_after(80, |b| b.enable()), zero);
        assert_eq!(frame_after(81, |b| b.disable()), zero);
        assert_eq!(frame_after(86, |b| b.stop_all()), zero);
        assert_eq!(frame_after(87, |b| b.coast_all()), zero);
        assert_eq!(frame_after(89, |b| b.brake_all()), zero);
    }
    #[test]
    fn channel_commands() {
        assert_eq!(frame_after(83, |b| b.full_negative(Channel::D)), [UNTOUCHED, 3, 0]);
        assert_eq!(frame_after(84, |b| b.full_positive(Channel::B)), [UNTOUCHED, 1, 0]);
        assert_eq!(frame_after(85, |b| b.stop(Channel::C)), [UNTOUCHED, 2, 0]);
        assert_eq!(frame_after(88, |b| b.coast(Channel::D)), [UNTOUCHED, 3, 0]);
        assert_eq!(frame_after(90, |b| b.brake(Channel::B)), [UNTOUCHED, 1, 0]);
        assert_eq!(frame_after(98, |b| b.reverse_direction(Channel::C)), [UNTOUCHED, 2, 0]);
    }
    #[test]
    fn channel_commands_with_value() {
        let pc = Percent::from_percent;
        assert_eq!(frame_after(82, |b| b.set_speed(Channel::C, pc(40))), [UNTOUCHED, 2, 40]);
        assert_eq!(frame_after(91, |b| b.set_speed_scale(Channel::A, pc(80))), [UNTOUCHED, 0, 80]);
        assert_eq!(frame_after(92, |b| b.set_zeropoint(Channel::D, pc(5))), [UNTOUCHED, 3, 5]);
        assert_eq!(frame_after(93, |b| b.to_percent(Channel::B, pc(60))), [UNTOUCHED, 1, 60]);
        assert_eq!(frame_after(95, |b| b.set_duty(Channel::C, 7)), [UNTOUCHED, 2, 7]);
        assert_eq!(frame_after(96, |b| b.set_deadzone(Channel::A, 3)), [UNTOUCHED, 0, 3]);
        assert_eq!(frame_after(97, |b| b.set_frequency(Channel::B, 25)), [UNTOUCHED, 1, 25]);
    }
    #[test]
    fn motor_b_speed_is_refused_without_bus_traffic() {
        let mut board = mock_board(&[(20, 0xaa), (21, 0xaa), (56, 0x55), (57, 0x55)]);
        assert_eq!(board.raw(20).unwrap(), 0xaa);
        match board.motor_speed(Channel::B) {
            Err(Motor2040Error::UnreachableRegister(56)) => {}
            other => panic!("expected UnreachableRegister(56), got {:?}", other),
        }
        // The device is still addressed where the last read left it.
        let mut dev = board.release();
        let mut buf = [0u8];
        dev.read(&mut buf).unwrap();
        assert_eq!(buf[0], 0xaa);
        let mut board = Board::from_device(dev);
        assert_eq!(board.raw(56).unwrap(), 0x55);
    }
    #[test]
    fn motor_speed_other_channels() {
        let mut board = mock_board(&[(56, 11), (57, 33), (58, 44)]);
        assert_eq!(board.motor_speed(Channel::A).unwrap(), 11);
        assert_eq!(board.motor_speed(Channel::C).unwrap(), 33);
        assert_eq!(board.motor_speed(Channel::D).unwrap(), 44);
    }
    #[test]
    fn typed_readings() {
        let mut board = mock_board(&[
            (36, 90),
            (38, 3),
            (42, 0),
            (45, 1),
            (50, 12),
            (1, 5),
            (52, 2),
            (55, 1),
            (14, 0x2a),
        ]);
        assert_eq!(board.encoder_degrees(Channel::C).unwrap().as_degrees(), 90.0);
        assert_eq!(board.encoder_radians(Channel::A).unwrap().as_radians(), 3.0);
        assert!(!board.encoder_direction(Channel::A).unwrap());
        assert!(board.encoder_direction(Channel::D).unwrap());
        assert_eq!(board.voltage().unwrap().as_volts(), 12.0);
        assert_eq!(board.voltage_sensor(VoltageSensor::A2).unwrap().as_volts(), 5.0);
        assert_eq!(board.current(Channel::B).unwrap().as_amperes(), 2.0);
        assert!(board.is_fault().unwrap());
        assert_eq!(board.encoder_count(Channel::A).unwrap(), 0x2a);
    }
}

// End of file
