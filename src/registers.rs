//! Register map of the Motor 2040 I2C responder
//!
//! A one byte write selects one of the read registers and the board answers
//! with a single byte. Command codes are sent as `[command, channel, value]`.
//! Per-channel tables are indexed A, B, C, D.

pub const DEFAULT_BUS: &str = "/dev/i2c-1";
pub const DEFAULT_ADDRESS: u16 = 0x41;
/// Register read by the one-shot diagnostic (encoder count, channel A).
pub const DIAGNOSTIC_REGISTER: u8 = 14;

pub const VOLTAGE_SENSOR_A1: u8 = 0;
pub const VOLTAGE_SENSOR_A2: u8 = 1;

pub const ENCODER_COMMON_PIN: [u8; 4] = [10, 11, 12, 13];
pub const ENCODER_COUNT: [u8; 4] = [14, 15, 16, 17];
pub const ENCODER_DELTA: [u8; 4] = [18, 19, 20, 21];
pub const ENCODER_STEP: [u8; 4] = [22, 23, 24, 25];
pub const ENCODER_TURN: [u8; 4] = [26, 27, 28, 29];
pub const ENCODER_REVOLUTIONS: [u8; 4] = [30, 31, 32, 33];
pub const ENCODER_DEGREES: [u8; 4] = [34, 35, 36, 37];
pub const ENCODER_RADIANS: [u8; 4] = [38, 39, 40, 41];
pub const ENCODER_DIRECTION: [u8; 4] = [42, 43, 44, 45];
pub const ENCODER_COUNTS_PER_REV: [u8; 4] = [46, 47, 48, 49];

pub const VOLTAGE: u8 = 50;
pub const CURRENT: [u8; 4] = [51, 52, 53, 54];
pub const IS_FAULT: u8 = 55;

// The firmware maps both A and B to 56 and matches A first.
pub const MOTOR_SPEED: [u8; 4] = [56, 56, 57, 58];
pub const MOTOR_DEADZONE: [u8; 4] = [59, 60, 61, 62];
pub const MOTOR_FREQUENCY: [u8; 4] = [63, 64, 65, 66];
pub const MOTOR_DIRECTION: [u8; 4] = [67, 68, 69, 70];
pub const MOTOR_ZEROPOINT: [u8; 4] = [71, 72, 73, 74];
pub const MOTOR_SPEED_SCALE: [u8; 4] = [75, 76, 77, 78];

pub const CMD_ENABLE: u8 = 80;
pub const CMD_DISABLE: u8 = 81;
pub const CMD_SPEED: u8 = 82;
pub const CMD_FULL_NEGATIVE: u8 = 83;
pub const CMD_FULL_POSITIVE: u8 = 84;
pub const CMD_STOP_CHANNEL: u8 = 85;
pub const CMD_STOP: u8 = 86;
pub const CMD_COAST: u8 = 87;
pub const CMD_COAST_CHANNEL: u8 = 88;
pub const CMD_BRAKE: u8 = 89;
pub const CMD_BRAKE_CHANNEL: u8 = 90;
pub const CMD_SPEED_SCALE: u8 = 91;
pub const CMD_ZEROPOINT: u8 = 92;
pub const CMD_TO_PERCENT: u8 = 93;
pub const CMD_TO_PERCENT_ALT: u8 = 94;
pub const CMD_DUTY: u8 = 95;
pub const CMD_DEADZONE: u8 = 96;
pub const CMD_FREQUENCY: u8 = 97;
pub const CMD_DIRECTION: u8 = 98;

/// Every register the responder answers, ascending, each listed once.
pub const READABLE: [u8; 71] = [
    0, 1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31,
    32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55,
    56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71, 72, 73, 74, 75, 76, 77, 78,
];

const REGISTER_NAMES: [(u8, &str); 71] = [
    (0, "voltage_sensor_a1"),
    (1, "voltage_sensor_a2"),
    (10, "encoder_a_common_pin"),
    (11, "encoder_b_common_pin"),
    (12, "encoder_c_common_pin"),
    (13, "encoder_d_common_pin"),
    (14, "encoder_a_count"),
    (15, "encoder_b_count"),
    (16, "encoder_c_count"),
    (17, "encoder_d_count"),
    (18, "encoder_a_delta"),
    (19, "encoder_b_delta"),
    (20, "encoder_c_delta"),
    (21, "encoder_d_delta"),
    (22, "encoder_a_step"),
    (23, "encoder_b_step"),
    (24, "encoder_c_step"),
    (25, "encoder_d_step"),
    (26, "encoder_a_turn"),
    (27, "encoder_b_turn"),
    (28, "encoder_c_turn"),
    (29, "encoder_d_turn"),
    (30, "encoder_a_revolutions"),
    (31, "encoder_b_revolutions"),
    (32, "encoder_c_revolutions"),
    (33, "encoder_d_revolutions"),
    (34, "encoder_a_degrees"),
    (35, "encoder_b_degrees"),
    (36, "encoder_c_degrees"),
    (37, "encoder_d_degrees"),
    (38, "encoder_a_radians"),
    (39, "encoder_b_radians"),
    (40, "encoder_c_radians"),
    (41, "encoder_d_radians"),
    (42, "encoder_a_direction"),
    (43, "encoder_b_direction"),
    (44, "encoder_c_direction"),
    (45, "encoder_d_direction"),
    (46, "encoder_a_counts_per_rev"),
    (47, "encoder_b_counts_per_rev"),
    (48, "encoder_c_counts_per_rev"),
    (49, "encoder_d_counts_per_rev"),
    (50, "voltage"),
    (51, "current_a"),
    (52, "current_b"),
    (53, "current_c"),
    (54, "current_d"),
    (55, "is_fault"),
    (56, "motor_a_speed"),
    (57, "motor_c_speed"),
    (58, "motor_d_speed"),
    (59, "motor_a_deadzone"),
    (60, "motor_b_deadzone"),
    (61, "motor_c_deadzone"),
    (62, "motor_d_deadzone"),
    (63, "motor_a_frequency"),
    (64, "motor_b_frequency"),
    (65, "motor_c_frequency"),
    (66, "motor_d_frequency"),
    (67, "motor_a_direction"),
    (68, "motor_b_direction"),
    (69, "motor_c_direction"),
    (70, "motor_d_direction"),
    (71, "motor_a_zeropoint"),
    (72, "motor_b_zeropoint"),
    (73, "motor_c_zeropoint"),
    (74, "motor_d_zeropoint"),
    (75, "motor_a_speed_scale"),
    (76, "motor_b_speed_scale"),
    (77, "motor_c_speed_scale"),
    (78, "motor_d_speed_scale"),
];

const COMMAND_NAMES: [(u8, &str); 19] = [
    (CMD_ENABLE, "enable"),
    (CMD_DISABLE, "disable"),
    (CMD_SPEED, "speed"),
    (CMD_FULL_NEGATIVE, "full_negative"),
    (CMD_FULL_POSITIVE, "full_positive"),
    (CMD_STOP_CHANNEL, "stop_channel"),
    (CMD_STOP, "stop"),
    (CMD_COAST, "coast"),
    (CMD_COAST_CHANNEL, "coast_channel"),
    (CMD_BRAKE, "brake"),
    (CMD_BRAKE_CHANNEL, "brake_channel"),
    (CMD_SPEED_SCALE, "speed_scale"),
    (CMD_ZEROPOINT, "zeropoint"),
    (CMD_TO_PERCENT, "to_percent"),
    (CMD_TO_PERCENT_ALT, "to_percent_alt"),
    (CMD_DUTY, "duty"),
    (CMD_DEADZONE, "deadzone"),
    (CMD_FREQUENCY, "frequency"),
    (CMD_DIRECTION, "direction"),
];

/// Name of a readable register.
pub fn register_name(reg: u8) -> Option<&'static str> {
    lookup_name(&REGISTER_NAMES, reg)
}

/// Find a readable register by name or by number (decimal or `0x` hex).
pub fn register_by_name(name: &str) -> Option<u8> {
    lookup_code(&REGISTER_NAMES, name)
}

pub fn command_name(cmd: u8) -> Option<&'static str> {
    lookup_name(&COMMAND_NAMES, cmd)
}

/// Find a command code by name or by number (decimal or `0x` hex).
pub fn command_by_name(name: &str) -> Option<u8> {
    lookup_code(&COMMAND_NAMES, name)
}

/// Register holding the speed of a motor channel, if the responder can
/// answer it. Channel B shares 56 with channel A and is never served.
pub fn motor_speed(channel: usize) -> Option<u8> {
    match channel {
        1 => None,
        _ => MOTOR_SPEED.get(channel).cloned(),
    }
}

/// Parse a 16-bit number written as decimal or `0x`-prefixed hex.
pub fn parse_wide(s: &str) -> Option<u16> {
    let s = s.trim();
    if s.starts_with("0x") || s.starts_with("0X") {
        u16::from_str_radix(&s[2..], 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Parse a byte written as decimal or `0x`-prefixed hex.
pub fn parse_number(s: &str) -> Option<u8> {
    parse_wide(s).and_then(|n| if n <= 0xff { Some(n as u8) } else { None })
}

fn lookup_name(table: &[(u8, &'static str)], code: u8) -> Option<&'static str> {
    table.iter().find(|&&(c, _)| c == code).map(|&(_, n)| n)
}

fn lookup_code(table: &[(u8, &'static str)], name: &str) -> Option<u8> {
    match parse_number(name) {
        Some(code) => table.iter().find(|&&(c, _)| c == code).map(|&(c, _)| c),
        None => {
            let name = name.trim().to_lowercase();
            table.iter().find(|&&(_, n)| n == name).map(|&(c, _)| c)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn readable_is_sorted_and_named() {
        for pair in READABLE.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for reg in READABLE.iter() {
            assert!(register_name(*reg).is_some(), "register {} has no name", reg);
        }
    }

    #[test]
    fn diagnostic_register_is_encoder_a_count() {
        assert_eq!(ENCODER_COUNT[0], DIAGNOSTIC_REGISTER);
        assert_eq!(register_name(DIAGNOSTIC_REGISTER), Some("encoder_a_count"));
    }

    #[test]
    fn lookup_by_name_or_number() {
        assert_eq!(register_by_name("voltage"), Some(VOLTAGE));
        assert_eq!(register_by_name("IS_FAULT"), Some(IS_FAULT));
        assert_eq!(register_by_name("0x0e"), Some(14));
        assert_eq!(register_by_name("14"), Some(14));
        assert_eq!(register_by_name("5"), None);
        assert_eq!(register_by_name("motor_b_speed"), None);
        assert_eq!(command_by_name("brake_channel"), Some(CMD_BRAKE_CHANNEL));
        assert_eq!(command_by_name("98"), Some(CMD_DIRECTION));
        assert_eq!(command_by_name("14"), None);
    }

    #[test]
    fn motor_b_speed_is_shadowed() {
        assert_eq!(motor_speed(0), Some(56));
        assert_eq!(motor_speed(1), None);
        assert_eq!(motor_speed(2), Some(57));
        assert_eq!(motor_speed(3), Some(58));
        assert_eq!(motor_speed(4), None);
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(parse_number("0x41"), Some(0x41));
        assert_eq!(parse_number(" 255 "), Some(255));
        assert_eq!(parse_number("256"), None);
        assert_eq!(parse_number("speed"), None);
        assert_eq!(parse_number("0x100"), None);
        assert_eq!(parse_wide("0x100"), Some(0x100));
        assert_eq!(parse_wide("1000"), Some(1000));
        assert_eq!(parse_wide("0xg"), None);
    }
}
