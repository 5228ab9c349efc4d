extern crate motor2040;
extern crate pretty_env_logger;
extern crate structopt;
#[macro_use]
extern crate log;

use std::path::PathBuf;

use structopt::StructOpt;

use motor2040::registers;
use motor2040::{Board, Channel, Motor2040Error};

pub type DynResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(StructOpt)]
#[structopt(name = "motor2040")]
#[structopt(about = r#"
Talk to the I2C responder on a Motor 2040 board.

With no subcommand, reads the encoder count of channel A and prints it the
way the original bench diagnostic did.
"#)]
struct Args {
    /// I2C bus device.
    #[structopt(long, default_value = "/dev/i2c-1", parse(from_os_str))]
    bus: PathBuf,

    /// 7-bit address of the board, decimal or 0x-prefixed hex.
    #[structopt(long, default_value = "0x41", parse(try_from_str = parse_address))]
    address: u16,

    #[structopt(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(StructOpt)]
enum Cmd {
    /// Read one register and print it raw, then as the derived 16-bit word.
    Diagnose {
        /// Register by name or number.
        #[structopt(long, default_value = "14", parse(try_from_str = parse_register))]
        register: u8,
    },
    /// Read one register by name or number.
    Read { register: String },
    /// Read every register the board answers.
    Dump,
    /// Send a command by name or number, e.g. `command speed b 40`.
    Command {
        name: String,
        channel: Option<Channel>,
        value: Option<u8>,
    },
}

fn parse_address(s: &str) -> Result<u16, String> {
    match registers::parse_wide(s) {
        Some(addr) if addr <= 0x7f => Ok(addr),
        Some(addr) => Err(format!("address {:#x} is not a 7-bit address", addr)),
        None => Err(format!("bad address {:?}", s)),
    }
}

/// Any register number, or the name of a readable one.
fn parse_register(s: &str) -> Result<u8, String> {
    registers::register_by_name(s)
        .or_else(|| registers::parse_number(s))
        .ok_or_else(|| format!("unknown register {:?}", s))
}

/// The two lines the bench diagnostic prints for one register read.
fn diagnostic_lines(raw: u8) -> (String, String) {
    let value = u16::from(raw);
    (
        format!("{:04X} >> RAW", value),
        format!("{}", motor2040::diagnostic_word(value, 0)),
    )
}

fn diagnose(board: &mut Board, register: u8) -> DynResult<()> {
    let (raw, derived) = diagnostic_lines(board.raw(register)?);
    println!("{}", raw);
    println!("{}", derived);
    Ok(())
}

fn main() -> DynResult<()> {
    pretty_env_logger::formatted_builder()
        .filter(None, log::LevelFilter::Warn)
        .filter(Some("motor2040"), log::LevelFilter::Info)
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_default())
        .init();

    let args = Args::from_args();
    let mut board = Board::open(&args.bus, args.address)?;

    match args.cmd {
        None => diagnose(&mut board, registers::DIAGNOSTIC_REGISTER)?,
        Some(Cmd::Diagnose { register }) => diagnose(&mut board, register)?,
        Some(Cmd::Read { register }) => {
            let reg = registers::register_by_name(&register).ok_or_else(|| -> Motor2040Error {
                Motor2040Error::UnknownRegister(register.clone())
            })?;
            let value = board.raw(reg)?;
            println!("{} = {}", registers::register_name(reg).unwrap_or("?"), value);
        }
        Some(Cmd::Dump) => {
            for (reg, value) in board.dump()? {
                println!(
                    "  {:02} {}: {}",
                    reg,
                    registers::register_name(reg).unwrap_or("?"),
                    value
                );
            }
        }
        Some(Cmd::Command {
            name,
            channel,
            value,
        }) => {
            let cmd = registers::command_by_name(&name).ok_or_else(|| -> Motor2040Error {
                Motor2040Error::UnknownCommand(name.clone())
            })?;
            let channel = channel.map(Channel::index).unwrap_or(0) as u8;
            board.command(cmd, channel, value.unwrap_or(0))?;
            info!(
                "sent {} to channel {}",
                registers::command_name(cmd).unwrap_or("?"),
                channel
            );
        }
    }

    Ok(())
}
