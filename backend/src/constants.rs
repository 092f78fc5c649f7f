// =============================================================================
// WorlDate Backend Constants
// =============================================================================
// This file contains all constants used throughout the backend to enable
// easy tuning and configuration from a single location.

// =============================================================================
// DAILY PICKS
// =============================================================================

/// Maximum number of recommendations generated per user per day
pub const DAILY_PICK_LIMIT: usize = 10;

/// Timezone used to decide which calendar day "today" is
pub const DEFAULT_PICKS_TIMEZONE: &str = "UTC";

// =============================================================================
// MESSAGING
// =============================================================================

/// Maximum message body length in characters (after trimming)
pub const MESSAGE_BODY_CHAR_LIMIT: usize = 1000;

// =============================================================================
// PROFILES
// =============================================================================

/// Youngest allowed profile age
pub const MIN_USER_AGE: i32 = 18;

/// Oldest allowed profile age
pub const MAX_USER_AGE: i32 = 99;

/// Maximum character limit for a profile bio
pub const BIO_CHAR_LIMIT: usize = 500;

// =============================================================================
// PAGING
// =============================================================================

/// Default page size for received likes
pub const DEFAULT_LIKES_PAGE_SIZE: i64 = 50;

/// Largest page size accepted for received likes
pub const MAX_LIKES_PAGE_SIZE: i64 = 100;

/// Default page size for the user directory
pub const DEFAULT_USERS_PAGE_SIZE: i64 = 10;

/// Largest page size accepted for the user directory
pub const MAX_USERS_PAGE_SIZE: i64 = 100;

// =============================================================================
// AUTHENTICATION
// =============================================================================

/// Header carrying the caller's user id, set by the upstream auth gateway
pub const USER_ID_HEADER: &str = "x-user-id";

// =============================================================================
// ADDRESS VALIDATION
// =============================================================================

/// Expected length of a world/wallet address (including 0x prefix)
pub const ETHEREUM_ADDRESS_LENGTH: usize = 42;

/// Ethereum address prefix
pub const ETHEREUM_ADDRESS_PREFIX: &str = "0x";

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// HELPER FUNCTIONS FOR VALIDATION
// =============================================================================

/// Validates if a string has the shape of an Ethereum address
pub fn is_valid_ethereum_address(address: &str) -> bool {
    address.starts_with(ETHEREUM_ADDRESS_PREFIX) && address.len() == ETHEREUM_ADDRESS_LENGTH
}

/// Validates if an age is within the accepted profile range
pub fn is_valid_age(age: i32) -> bool {
    (MIN_USER_AGE..=MAX_USER_AGE).contains(&age)
}
