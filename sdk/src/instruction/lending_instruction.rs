use num_derive::FromPrimitive;

/// First byte of every instruction the lending program accepts.
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
#[repr(u8)]
pub enum Opcode {
    InitPoolList = 0x00,
    AddUsersPage = 0x01,
    AddPool = 0x02,
    UpdatePrice = 0x03,
    UpdatePythKey = 0x04,
    UpdatePoolRate = 0x05,
    AddUserAndDeposit = 0x10,
    Deposit = 0x11,
    Withdraw = 0x12,
    Borrow = 0x13,
    Repay = 0x14,
    ExternLiquidate = 0x15,
    SelfLiquidate = 0x16,
    UpdateUserConfig = 0x17,
    MarginSwap = 0x18,
    UpdateUserAssetConfig = 0x19,
    WithdrawAndRemoveUser = 0x1a,
}

impl Opcode {
    /// Operator instructions. Their payloads are not produced by this crate.
    pub fn is_admin(self) -> bool {
        (self as u8) < Opcode::AddUserAndDeposit as u8
    }
}

/// Arguments shared by self-liquidation and margin swaps: sell one pool's
/// asset on serum and buy another's.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SwapParams {
    pub need_to_sell: bool,
    pub need_to_buy: bool,
    /// Amount of the sell pool's token to sell
    pub sell_amount: u64,
    /// Amount of the buy pool's token to buy; the minimum accepted for a
    /// margin swap
    pub buy_amount: u64,
    /// Collateral pool when self-liquidating
    pub sell_pool_id: u8,
    /// Borrowed pool when self-liquidating
    pub buy_pool_id: u8,
}

/// User instructions supported by the lending program.
///
/// Amounts are plain token base units.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LendingInstruction {
    // 0x10
    /// Registers the wallet in a users page and makes its first deposit.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[signer, writable]` User wallet.
    ///   1. `[writable]` User token account to deposit from.
    ///   2. `[writable]` UserPagesStats account.
    ///   3. `[writable]` UsersPage account for `page_id`.
    ///   4. `[writable]` UserInfo account of the wallet.
    ///   5. `[writable]` Asset pool.
    ///   6. `[writable]` Asset pool token account.
    ///   7. `[writable]` PoolSummaries account.
    ///   8. `[]` System program id.
    ///   9. `[]` Token program id.
    AddUserAndDeposit {
        /// Users page with a free slot
        page_id: u16,
        amount: u64,
        pool_id: u8,
    },
    // 0x11
    /// Deposits into a pool for an already added wallet.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[signer, writable]` User wallet.
    ///   1. `[writable]` User token account to deposit from.
    ///   2. `[writable]` UserInfo account of the wallet.
    ///   3. `[writable]` Asset pool.
    ///   4. `[writable]` Asset pool token account.
    ///   5. `[writable]` PoolSummaries account.
    ///   6. `[]` Token program id.
    Deposit { amount: u64, pool_id: u8 },
    // 0x12
    /// Withdraws a deposit.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[signer, writable]` User wallet.
    ///   1. `[writable]` User token account to withdraw to.
    ///   2. `[writable]` UserInfo account of the wallet.
    ///   3. `[writable]` Asset pool.
    ///   4. `[writable]` Asset pool token account.
    ///   5. `[writable]` PoolSummaries account.
    ///   6. `[]` PriceSummaries account.
    ///   7. `[]` Base pda.
    ///   8. `[]` Token program id.
    Withdraw {
        /// Withdraw the whole deposit, `amount` is ignored
        withdraw_all: bool,
        amount: u64,
        pool_id: u8,
    },
    // 0x13
    /// Borrows from a pool against the user's collateral.
    ///
    /// Accounts expected by this instruction: same as `Withdraw`.
    Borrow { amount: u64, pool_id: u8 },
    // 0x14
    /// Repays a borrow.
    ///
    /// Accounts expected by this instruction: same as `Deposit`.
    Repay {
        /// Repay the whole debt, `amount` is ignored
        repay_all: bool,
        amount: u64,
        pool_id: u8,
    },
    // 0x15
    /// Repays part of an unhealthy user's debt in exchange for their
    /// collateral.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[]` Liquidated wallet.
    ///   1. `[signer]` Liquidator wallet.
    ///   2. `[writable]` UserInfo account of the liquidated wallet.
    ///   3. `[]` Base pda.
    ///   4. `[writable]` Liquidator token account receiving collateral.
    ///   5. `[writable]` Liquidator token account repaying the borrow.
    ///   6. `[writable]` Collateral asset pool.
    ///   7. `[writable]` Collateral asset pool token account.
    ///   8. `[writable]` Borrowed asset pool.
    ///   9. `[writable]` Borrowed asset pool token account.
    ///   10. `[writable]` PoolSummaries account.
    ///   11. `[]` PriceSummaries account.
    ///   12. `[]` Token program id.
    ExternLiquidate {
        /// Least collateral the liquidator accepts
        min_collateral_amount: u64,
        repaid_borrow_amount: u64,
        collateral_pool_id: u8,
        borrowed_pool_id: u8,
    },
    // 0x16
    /// Sells a user's collateral on serum to repay their borrow, once the
    /// user's self-liquidation threshold is reached. Anyone may send it.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[]` User wallet.
    ///   1. `[writable]` UserInfo account of the wallet.
    ///   2. `[]` Base pda.
    ///   3. `[writable]` Sell asset pool.
    ///   4. `[writable]` Sell asset pool token account.
    ///   5. `[writable]` Buy asset pool.
    ///   6. `[writable]` Buy asset pool token account.
    ///   7. `[writable]` PoolSummaries account.
    ///   8. `[]` PriceSummaries account.
    ///   9. `[writable]` Intermediate token account.
    ///   10. `[]` Token program id.
    ///   11. `[]` Serum dex program id.
    ///   12. `[]` Rent sysvar.
    ///   13. .. Serum market accounts of the sell side, then of the buy side.
    SelfLiquidate(SwapParams),
    // 0x17
    /// Sets the user's liquidation preferences, all in percent.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[signer]` User wallet.
    ///   1. `[writable]` UserInfo account of the wallet.
    UpdateUserConfig {
        self_liquidation_threshold: u8,
        post_self_liquidation_ratio_target: u8,
        post_extern_liquidation_ratio_target: u8,
    },
    // 0x18
    /// Swaps between two of the user's assets through serum.
    ///
    /// Accounts expected by this instruction: same as `SelfLiquidate`, with
    /// the user wallet signing.
    MarginSwap(SwapParams),
    // 0x19
    /// Includes or excludes a deposit from the user's collateral.
    UpdateUserAssetConfig { use_as_collateral: bool, pool_id: u8 },
    // 0x1a
    /// Withdraws and, once the user holds nothing, frees their users page
    /// slot.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[signer, writable]` User wallet.
    ///   1. `[writable]` User token account to withdraw to.
    ///   2. `[writable]` UserPagesStats account.
    ///   3. `[writable]` UsersPage account holding the wallet.
    ///   4. `[writable]` UserInfo account of the wallet.
    ///   5. `[writable]` Asset pool.
    ///   6. `[writable]` Asset pool token account.
    ///   7. `[writable]` PoolSummaries account.
    ///   8. `[]` PriceSummaries account.
    ///   9. `[]` Base pda.
    ///   10. `[]` Token program id.
    WithdrawAndRemoveUser {
        withdraw_all: bool,
        amount: u64,
        pool_id: u8,
    },
}

impl LendingInstruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::AddUserAndDeposit { .. } => Opcode::AddUserAndDeposit,
            Self::Deposit { .. } => Opcode::Deposit,
            Self::Withdraw { .. } => Opcode::Withdraw,
            Self::Borrow { .. } => Opcode::Borrow,
            Self::Repay { .. } => Opcode::Repay,
            Self::ExternLiquidate { .. } => Opcode::ExternLiquidate,
            Self::SelfLiquidate(_) => Opcode::SelfLiquidate,
            Self::UpdateUserConfig { .. } => Opcode::UpdateUserConfig,
            Self::MarginSwap(_) => Opcode::MarginSwap,
            Self::UpdateUserAssetConfig { .. } => Opcode::UpdateUserAssetConfig,
            Self::WithdrawAndRemoveUser { .. } => Opcode::WithdrawAndRemoveUser,
        }
    }
}
