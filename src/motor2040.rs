//! * Driver for the I2C responder running on a Pimoroni Motor 2040
//! See https://github.com/pimoroni/pimoroni-pico/tree/main/micropython/modules/motor
//!
//! Reads are one byte: write the register number, read the answer back.
//! Commands are always three bytes, `[command, channel, value]`; the board
//! ignores writes of any other length.

use i2cdev::core::I2CDevice;

use registers;

pub struct Motor2040<T: I2CDevice + Sized> {
    i2cdev: T,
}

impl<T> Motor2040<T>
    where T: I2CDevice + Sized
{
    /// Wrap an opened device. Nothing is sent on the bus.
    pub fn new(i2cdev: T) -> Motor2040<T> {
        Motor2040 { i2cdev }
    }

    /// Give back the device handle.
    pub fn release(self) -> T {
        self.i2cdev
    }

    /// Read one byte from a register on the board.
    pub fn read_register(&mut self, reg: u8) -> Result<u8, T::Error> {
        let value = self.i2cdev.smbus_read_byte_data(reg)?;
        trace!("read register {} = {:#04x}", reg, value);
        Ok(value)
    }

    /// Send a three byte command frame.
    pub fn send_command(&mut self, cmd: u8, channel: u8, value: u8) -> Result<(), T::Error> {
        debug!(
            "command {} ({}) channel={} value={}",
            cmd,
            registers::command_name(cmd).unwrap_or("unknown"),
            channel,
            value
        );
        self.i2cdev.write(&[cmd, channel, value])
    }

    /// Send a command that applies to the whole board (enable, stop, ...).
    /// Channel and value are padded with zeroes.
    pub fn send_board_command(&mut self, cmd: u8) -> Result<(), T::Error> {
        self.send_command(cmd, 0, 0)
    }

    /// Read every register the board answers, in ascending order.
    pub fn dump(&mut self) -> Result<Vec<(u8, u8)>, T::Error> {
        let mut out = Vec::with_capacity(registers::READABLE.len());
        for &reg in registers::READABLE.iter() {
            out.push((reg, self.read_register(reg)?));
        }
        Ok(out)
    }
}


// End of file
