use std::time::Duration;

/// Terminator ending every protocol message (BEL + BS, `\a\b`).
pub const TERMINATOR: &[u8] = b"\x07\x08";

/// Client message literals
pub const RECHARGING: &str = "RECHARGING";
pub const FULL_POWER: &str = "FULL POWER";

/// Prefix of a movement acknowledgement (`OK <x> <y>`)
pub const OK_PREFIX: &str = "OK ";

/// Maximum client message lengths, excluding the terminator
pub const MAX_USERNAME_LEN: usize = 18;
pub const MAX_KEY_ID_LEN: usize = 3;
pub const MAX_CONFIRMATION_LEN: usize = 5;
pub const MAX_OK_LEN: usize = 10;
pub const MAX_SECRET_LEN: usize = 98;

/// Numeric gates on decoded values
pub const MAX_KEY_ID_VALUE: i64 = 999;
pub const MAX_CONFIRMATION_VALUE: i64 = 0xFFFF;

/// Hash parameters: `hash = (byte_sum * 1000) mod 2^16`
pub const HASH_MULTIPLIER: u16 = 1000;

/// Timeouts
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_RECHARGE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Movement budgets
pub const DEFAULT_MAX_STEPS: u32 = 200;
pub const DEFAULT_MAX_OBSTACLE_HITS: u32 = 20;

/// Default listen port
pub const DEFAULT_PORT: u16 = 9999;
