//! Custom error codes returned by the lending program and their
//! human-readable messages.

use {
    num_derive::FromPrimitive,
    num_traits::FromPrimitive,
    solana_program::program_error::ProgramError,
    thiserror::Error,
};

/// Errors that may be returned by the lending program.
#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum ProtocolError {
    // 0x1000: accounts supplied to the instruction
    #[error("Internal error, incorrect base_pda account")]
    IncorrectBasePda = 0x1000,
    #[error("Internal error, incorrect user_pages_stats account")]
    IncorrectUserPagesStats = 0x1001,
    #[error("Internal error, incorrect users_page account")]
    IncorrectUsersPage = 0x1002,
    #[error("Internal error, incorrect user_info account")]
    IncorrectUserInfo = 0x1003,
    #[error("Internal error, incorrect asset_pool account")]
    IncorrectAssetPool = 0x1004,
    #[error("Internal error, incorrect asset_price account")]
    IncorrectAssetPrice = 0x1005,
    #[error("Internal error, incorrect asset_pool_spl account")]
    IncorrectAssetPoolSpl = 0x1006,
    #[error("Internal error, incorrect user_asset_info account")]
    IncorrectUserAssetInfo = 0x1007,
    #[error("Internal error, missing active accounts")]
    MissingActiveAccounts = 0x1008,
    #[error("Internal error, incorrect intermediate_spl account")]
    IncorrectIntermediateSpl = 0x1009,
    #[error("Internal error, incorrect collateral_market account")]
    IncorrectSellMarket = 0x100a,
    #[error("Internal error, incorrect borrowed_market account")]
    IncorrectBuyMarket = 0x100b,
    #[error("Internal error, incorrect serum_program account")]
    IncorrectSerumProgram = 0x100c,
    #[error("Internal error, incorrect admin account")]
    IncorrectAdmin = 0x100d,
    #[error("Internal error, intermediate_spl account has the wrong owner")]
    IncorrectIntermediateSplOwner = 0x100e,
    #[error("Internal error, incorrect pool_list account")]
    IncorrectPoolList = 0x100f,
    #[error("Internal error, incorrect pool_summaries account")]
    IncorrectPoolSummaries = 0x1010,
    #[error("Internal error, incorrect price_summaries account")]
    IncorrectPriceSummaries = 0x1011,
    #[error("Internal error, incorrect price_pda account")]
    IncorrectPricePda = 0x1012,

    // 0x2000: instruction data
    #[error("Internal error, missing page_id")]
    MissingPageId = 0x2000,
    #[error("Internal error, page_id too large")]
    PageIdTooLarge = 0x2001,
    #[error("Internal error, missing amount")]
    MissingAmount = 0x2002,
    #[error("Internal error, missing seed_str")]
    MissingMintSeedStr = 0x2003,
    #[error("Internal error, missing active_seed_str")]
    MissingActiveMintSeedStr = 0x2004,
    #[error("Internal error, wrong instruction data size")]
    WrongDataSize = 0x2005,

    // 0x3000: client workflow misuse
    #[error("Internal error, account already added. Should use deposit()")]
    AccountAlreadyAdded = 0x3000,
    #[error("Internal error, not enough available slots for chosen users_page")]
    NoAvailableSlots = 0x3001,
    #[error("Internal error, account not added. Should use add_user_and_deposit()")]
    AccountNotAdded = 0x3002,
    #[error("Internal error, wallet did not sign")]
    WalletDidNotSign = 0x3003,
    #[error("Internal error, maximum number of pools reached")]
    MaximumNumPoolsReached = 0x3004,
    #[error("Internal error, user has no such asset")]
    UserHasNoSuchAsset = 0x3005,
    #[error("Internal error, swap needs at least a buy or a sell")]
    NeedAtLeastBuyOrSell = 0x3006,
    #[error("Internal error, insufficient fees")]
    InsufficientFees = 0x3007,

    // 0x4000: business rules
    #[error("Trying to deposit an amount less than minimum required. Please try depositing more.")]
    DepositLessThanMinimum = 0x4000,
    #[error("User cannot withdraw more than their deposit.")]
    InsufficientDeposit = 0x4001,
    #[error("Pool does not have enough funds for borrowing/withdrawal at the time.")]
    PoolNoFreeFund = 0x4002,
    #[error("Please try withdrawing all remaining amount as after the current withdrawal, amount of deposit left will be less than minimum required")]
    PleaseWithdrawAll = 0x4003,
    #[error("User does not have enough borrowing power. Please deposit more assets as collateral.")]
    InsufficientBorrowPower = 0x4004,
    #[error("User cannot repay more than what they owe.")]
    CannotRepayMoreThanDebt = 0x4005,
    #[error("This withdrawal failed because it will cause user's collateral ratio to fall below requirement.")]
    WithdrawalBelowMinCollateralRatio = 0x4006,
    #[error("This account cannot be liquidated as it has not reached liquidation threshold yet")]
    LiquidationNotReached = 0x4007,
    #[error("Liquidator asked for too much collateral")]
    LiquidatorAskedTooMuchCollateral = 0x4008,
    #[error("Liquidator tried to repay more than what the user owes")]
    AccountNotEnoughDebtForLiquidation = 0x4009,
    #[error("Liquidator asked for more collateral than the user has")]
    AccountNotEnoughCollateralForLiquidation = 0x400a,
    #[error("Liquidation will lead to a collateral ratio that is too large. Try liquidating less.")]
    ExceedsLiquidationLimit = 0x400b,
    #[error("Self-liquidation threshold is too small")]
    SelfLiquidationThresholdTooSmall = 0x400c,
    #[error("Post self-liquidation target ratio too small")]
    PostSelfLiquidationTargetTooSmall = 0x400d,
    #[error("Post external-liquidation target ratio too small")]
    PostExternLiquidationTargetTooSmall = 0x400e,
    #[error("Self-liquidation threshold has not been reached yet")]
    SelfLiquidationNotReached = 0x400f,
    #[error("Self-liquidation target exceeded")]
    SelfLiquidationTargetExceeded = 0x4010,
    #[error("Self-liquidation led to too much slippage")]
    SelfLiquidationHighSlippage = 0x4011,
    #[error("Exceeded maximum number of assets supported")]
    MaxNumAssetsReached = 0x4012,
    #[error("Bought less than min")]
    SwapBoughtLessThanMin = 0x4013,
    #[error("Asset not used as collateral")]
    AssetNotUsedAsCollateral = 0x4014,
}

impl ProtocolError {
    /// Look up a custom program error code.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

impl From<ProtocolError> for ProgramError {
    fn from(e: ProtocolError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

const CUSTOM_ERROR_MARKER: &str = "custom program error";
const MISSING_TOKEN_ACCOUNT_MARKER: &str = "invalid account data";
const MISSING_SOL_MARKER: &str = "found no record of a prior credit";

const MISSING_TOKEN_ACCOUNT_MESSAGE: &str =
    "User does not appear to have created an SPL account for this token.";
const MISSING_SOL_MESSAGE: &str = "Cannot proceed as user has no SOL in their main wallet.";

/// Message for a custom program error code, if the code is known.
pub fn explain_code(code: u32) -> Option<String> {
    ProtocolError::from_code(code).map(|e| e.to_string())
}

/// Turn a transaction failure message into something a user can read.
///
/// Messages that carry a known custom program error code are replaced by the
/// code's description. A missing token account or an empty wallet are
/// recognised by their runtime wording. Anything else comes back unchanged.
pub fn explain(message: &str) -> String {
    if message.contains(CUSTOM_ERROR_MARKER) && message.contains("0x") {
        return parse_custom_code(message)
            .and_then(explain_code)
            .unwrap_or_else(|| message.to_string());
    }
    if message.contains(MISSING_TOKEN_ACCOUNT_MARKER) {
        return MISSING_TOKEN_ACCOUNT_MESSAGE.to_string();
    }
    if message.contains(MISSING_SOL_MARKER) {
        return MISSING_SOL_MESSAGE.to_string();
    }
    message.to_string()
}

/// Reads the hex code following the last `0x`, at most four digits.
fn parse_custom_code(message: &str) -> Option<u32> {
    let start = message.rfind("0x")? + 2;
    let digits: String = message[start..]
        .chars()
        .take(4)
        .take_while(|c| c.is_ascii_hexdigit())
        .collect();
    u32::from_str_radix(&digits, 16).ok()
}
