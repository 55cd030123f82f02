/// Length of a freshly generated server seed
pub const SERVER_SEED_LENGTH: usize = 64;

/// Length of a freshly generated client seed
pub const CLIENT_SEED_LENGTH: usize = 16;

/// Alphabet seeds are drawn from (62 symbols)
pub const SEED_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a hex-encoded SHA-256 digest
pub const RESULT_HASH_LENGTH: usize = 64;

/// Number of most-recent rounds retained by a session
pub const HISTORY_CAPACITY: usize = 10;

/// Default starting balance for new sessions
pub const INITIAL_BALANCE: u64 = 1_000;

/// Default bet amount carried in the session snapshot
pub const DEFAULT_BET_AMOUNT: u64 = 10;

/// Lowest die face that counts as a win (4, 5 and 6 win)
pub const WINNING_FACE_THRESHOLD: u8 = 4;
