/// Scaled amounts stored by the program carry 24 fractional bits.
pub const AMOUNT_MULTIPLIER: u128 = 1 << 24;

/// `UserInfo::page_id` of a wallet that has not been assigned a users page.
pub const INVALID_PAGE: u16 = u16::MAX;

/// Page ids above this value are treated as "not added yet" by clients.
pub const MAX_ASSIGNED_PAGE_ID: u16 = 10_000;

pub const BASE_PDA_SEED: &[u8] = b"2";
pub const PRICE_PDA_SEED: &[u8] = b"PRICE";

pub const POOL_LIST_SEED: &str = "PoolList";
pub const POOL_SUMMARIES_SEED: &str = "PoolSummaries";
pub const PRICE_SUMMARIES_SEED: &str = "PriceSummaries";
pub const USER_PAGES_STATS_SEED: &str = "UserPagesStats";
pub const USERS_PAGE_SEED_PREFIX: &str = "UsersPage_";
pub const USER_INFO_SEED: &str = "UserInfo";
pub const POOL_SEED_PREFIX: &str = "POOL__";

/// Nonce the serum dex uses when deriving a market's vault signer.
pub const MARKET_VAULT_NONCE: [u8; 8] = [0; 8];
