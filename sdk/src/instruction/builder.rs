// helpers for rust clients to create lending instructions
use {
    super::{LendingInstruction, SwapParams},
    crate::{
        config::{ProtocolConfig, SYSTEM_PROGRAM_ID},
        constants::MAX_ASSIGNED_PAGE_ID,
        error::EncodeError,
        pda,
    },
    log::{debug, warn},
    solana_program::{
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
        sysvar,
    },
};

fn lending_instruction(
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    instruction: LendingInstruction,
) -> Instruction {
    debug!("built {:?} with {} accounts", instruction, accounts.len());
    Instruction {
        program_id,
        accounts,
        data: instruction.pack(),
    }
}

/// Pool state and token account of `pool_id`.
fn pool_accounts(config: &ProtocolConfig, pool_id: u8) -> Result<[AccountMeta; 2], EncodeError> {
    Ok([
        AccountMeta::new(pda::asset_pool(config, pool_id)?, false),
        AccountMeta::new(pda::asset_pool_spl(config, pool_id)?, false),
    ])
}

/// Creates an `UpdateUserConfig` instruction.
pub fn update_user_config(
    config: &ProtocolConfig,
    wallet: Pubkey,
    self_liquidation_threshold: u8,
    post_self_liquidation_ratio_target: u8,
    post_extern_liquidation_ratio_target: u8,
) -> Result<Instruction, EncodeError> {
    let accounts = vec![
        AccountMeta::new_readonly(wallet, true),
        AccountMeta::new(pda::user_info(config, &wallet)?, false),
    ];
    Ok(lending_instruction(
        config.program_id,
        accounts,
        LendingInstruction::UpdateUserConfig {
            self_liquidation_threshold,
            post_self_liquidation_ratio_target,
            post_extern_liquidation_ratio_target,
        },
    ))
}

/// Creates an `AddUserAndDeposit` instruction.
pub fn add_user_and_deposit(
    config: &ProtocolConfig,
    page_id: u16,
    wallet: Pubkey,
    user_spl: Pubkey,
    mint: Pubkey,
    amount: u64,
) -> Result<Instruction, EncodeError> {
    let pool_id = config.pool_id_of(&mint)?;
    let [asset_pool, asset_pool_spl] = pool_accounts(config, pool_id)?;
    let accounts = vec![
        AccountMeta::new(wallet, true),
        AccountMeta::new(user_spl, false),
        AccountMeta::new(pda::user_pages_stats(config)?, false),
        AccountMeta::new(pda::users_page(config, page_id)?, false),
        AccountMeta::new(pda::user_info(config, &wallet)?, false),
        asset_pool,
        asset_pool_spl,
        AccountMeta::new(pda::pool_summaries(config)?, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(config.token_program_id, false),
    ];
    Ok(lending_instruction(
        config.program_id,
        accounts,
        LendingInstruction::AddUserAndDeposit {
            page_id,
            amount,
            pool_id,
        },
    ))
}

/// Creates a `Deposit` instruction for a registered mint.
pub fn deposit(
    config: &ProtocolConfig,
    wallet: Pubkey,
    user_spl: Pubkey,
    mint: Pubkey,
    amount: u64,
) -> Result<Instruction, EncodeError> {
    let pool_id = config.pool_id_of(&mint)?;
    deposit_by_pool_id(config, wallet, user_spl, pool_id, amount)
}

/// Creates a `Deposit` instruction for `pool_id`, deriving every other
/// account.
pub fn deposit_by_pool_id(
    config: &ProtocolConfig,
    wallet: Pubkey,
    user_spl: Pubkey,
    pool_id: u8,
    amount: u64,
) -> Result<Instruction, EncodeError> {
    Ok(deposit_full(
        config.program_id,
        amount,
        pool_id,
        wallet,
        user_spl,
        pda::user_info(config, &wallet)?,
        pda::asset_pool(config, pool_id)?,
        pda::asset_pool_spl(config, pool_id)?,
        pda::pool_summaries(config)?,
        config.token_program_id,
    ))
}

/// Creates a `Deposit` instruction from explicit accounts.
#[allow(clippy::too_many_arguments)]
pub fn deposit_full(
    program_id: Pubkey,
    amount: u64,
    pool_id: u8,
    wallet_pubkey: Pubkey,
    user_spl_pubkey: Pubkey,
    user_info_pubkey: Pubkey,
    asset_pool_pubkey: Pubkey,
    asset_pool_spl_pubkey: Pubkey,
    pool_summaries_pubkey: Pubkey,
    token_program_id: Pubkey,
) -> Instruction {
    lending_instruction(
        program_id,
        vec![
            AccountMeta::new(wallet_pubkey, true),
            AccountMeta::new(user_spl_pubkey, false),
            AccountMeta::new(user_info_pubkey, false),
            AccountMeta::new(asset_pool_pubkey, false),
            AccountMeta::new(asset_pool_spl_pubkey, false),
            AccountMeta::new(pool_summaries_pubkey, false),
            AccountMeta::new_readonly(token_program_id, false),
        ],
        LendingInstruction::Deposit { amount, pool_id },
    )
}

/// Creates a `Borrow` instruction for a registered mint.
pub fn borrow(
    config: &ProtocolConfig,
    wallet: Pubkey,
    user_spl: Pubkey,
    mint: Pubkey,
    amount: u64,
) -> Result<Instruction, EncodeError> {
    let pool_id = config.pool_id_of(&mint)?;
    borrow_by_pool_id(config, wallet, user_spl, pool_id, amount)
}

/// Creates a `Borrow` instruction for `pool_id`, deriving every other
/// account.
pub fn borrow_by_pool_id(
    config: &ProtocolConfig,
    wallet: Pubkey,
    user_spl: Pubkey,
    pool_id: u8,
    amount: u64,
) -> Result<Instruction, EncodeError> {
    let (base_pda, _bump_seed) = pda::base_pda(&config.program_id);
    Ok(borrow_full(
        config.program_id,
        amount,
        pool_id,
        wallet,
        user_spl,
        pda::user_info(config, &wallet)?,
        pda::asset_pool(config, pool_id)?,
        pda::asset_pool_spl(config, pool_id)?,
        pda::pool_summaries(config)?,
        pda::price_summaries(config)?,
        base_pda,
        config.token_program_id,
    ))
}

/// Creates a `Borrow` instruction from explicit accounts.
#[allow(clippy::too_many_arguments)]
pub fn borrow_full(
    program_id: Pubkey,
    amount: u64,
    pool_id: u8,
    wallet_pubkey: Pubkey,
    user_spl_pubkey: Pubkey,
    user_info_pubkey: Pubkey,
    asset_pool_pubkey: Pubkey,
    asset_pool_spl_pubkey: Pubkey,
    pool_summaries_pubkey: Pubkey,
    price_summaries_pubkey: Pubkey,
    base_pda_pubkey: Pubkey,
    token_program_id: Pubkey,
) -> Instruction {
    lending_instruction(
        program_id,
        vec![
            AccountMeta::new(wallet_pubkey, true),
            AccountMeta::new(user_spl_pubkey, false),
            AccountMeta::new(user_info_pubkey, false),
            AccountMeta::new(asset_pool_pubkey, false),
            AccountMeta::new(asset_pool_spl_pubkey, false),
            AccountMeta::new(pool_summaries_pubkey, false),
            AccountMeta::new_readonly(price_summaries_pubkey, false),
            AccountMeta::new_readonly(base_pda_pubkey, false),
            AccountMeta::new_readonly(token_program_id, false),
        ],
        LendingInstruction::Borrow { amount, pool_id },
    )
}

/// Creates a `Withdraw` instruction for a registered mint.
pub fn withdraw(
    config: &ProtocolConfig,
    wallet: Pubkey,
    user_spl: Pubkey,
    mint: Pubkey,
    withdraw_all: bool,
    amount: u64,
) -> Result<Instruction, EncodeError> {
    let pool_id = config.pool_id_of(&mint)?;
    withdraw_by_pool_id(config, wallet, user_spl, pool_id, withdraw_all, amount)
}

/// Creates a `Withdraw` instruction for `pool_id`, deriving every other
/// account.
pub fn withdraw_by_pool_id(
    config: &ProtocolConfig,
    wallet: Pubkey,
    user_spl: Pubkey,
    pool_id: u8,
    withdraw_all: bool,
    amount: u64,
) -> Result<Instruction, EncodeError> {
    let (base_pda, _bump_seed) = pda::base_pda(&config.program_id);
    Ok(withdraw_full(
        config.program_id,
        withdraw_all,
        amount,
        pool_id,
        wallet,
        user_spl,
        pda::user_info(config, &wallet)?,
        pda::asset_pool(config, pool_id)?,
        pda::asset_pool_spl(config, pool_id)?,
        pda::pool_summaries(config)?,
        pda::price_summaries(config)?,
        base_pda,
        config.token_program_id,
    ))
}

/// Creates a `Withdraw` instruction from explicit accounts.
#[allow(clippy::too_many_arguments)]
pub fn withdraw_full(
    program_id: Pubkey,
    withdraw_all: bool,
    amount: u64,
    pool_id: u8,
    wallet_pubkey: Pubkey,
    user_spl_pubkey: Pubkey,
    user_info_pubkey: Pubkey,
    asset_pool_pubkey: Pubkey,
    asset_pool_spl_pubkey: Pubkey,
    pool_summaries_pubkey: Pubkey,
    price_summaries_pubkey: Pubkey,
    base_pda_pubkey: Pubkey,
    token_program_id: Pubkey,
) -> Instruction {
    lending_instruction(
        program_id,
        vec![
            AccountMeta::new(wallet_pubkey, true),
            AccountMeta::new(user_spl_pubkey, false),
            AccountMeta::new(user_info_pubkey, false),
            AccountMeta::new(asset_pool_pubkey, false),
            AccountMeta::new(asset_pool_spl_pubkey, false),
            AccountMeta::new(pool_summaries_pubkey, false),
            AccountMeta::new_readonly(price_summaries_pubkey, false),
            AccountMeta::new_readonly(base_pda_pubkey, false),
            AccountMeta::new_readonly(token_program_id, false),
        ],
        LendingInstruction::Withdraw {
            withdraw_all,
            amount,
            pool_id,
        },
    )
}

/// Creates a `Repay` instruction for a registered mint.
pub fn repay(
    config: &ProtocolConfig,
    wallet: Pubkey,
    user_spl: Pubkey,
    mint: Pubkey,
    repay_all: bool,
    amount: u64,
) -> Result<Instruction, EncodeError> {
    let pool_id = config.pool_id_of(&mint)?;
    repay_by_pool_id(config, wallet, user_spl, pool_id, repay_all, amount)
}

/// Creates a `Repay` instruction for `pool_id`, deriving every other
/// account.
pub fn repay_by_pool_id(
    config: &ProtocolConfig,
    wallet: Pubkey,
    user_spl: Pubkey,
    pool_id: u8,
    repay_all: bool,
    amount: u64,
) -> Result<Instruction, EncodeError> {
    Ok(repay_full(
        config.program_id,
        repay_all,
        amount,
        pool_id,
        wallet,
        user_spl,
        pda::user_info(config, &wallet)?,
        pda::asset_pool(config, pool_id)?,
        pda::asset_pool_spl(config, pool_id)?,
        pda::pool_summaries(config)?,
        config.token_program_id,
    ))
}

/// Creates a `Repay` instruction from explicit accounts.
#[allow(clippy::too_many_arguments)]
pub fn repay_full(
    program_id: Pubkey,
    repay_all: bool,
    amount: u64,
    pool_id: u8,
    wallet_pubkey: Pubkey,
    user_spl_pubkey: Pubkey,
    user_info_pubkey: Pubkey,
    asset_pool_pubkey: Pubkey,
    asset_pool_spl_pubkey: Pubkey,
    pool_summaries_pubkey: Pubkey,
    token_program_id: Pubkey,
) -> Instruction {
    lending_instruction(
        program_id,
        vec![
            AccountMeta::new(wallet_pubkey, true),
            AccountMeta::new(user_spl_pubkey, false),
            AccountMeta::new(user_info_pubkey, false),
            AccountMeta::new(asset_pool_pubkey, false),
            AccountMeta::new(asset_pool_spl_pubkey, false),
            AccountMeta::new(pool_summaries_pubkey, false),
            AccountMeta::new_readonly(token_program_id, false),
        ],
        LendingInstruction::Repay {
            repay_all,
            amount,
            pool_id,
        },
    )
}

/// Creates a `WithdrawAndRemoveUser` instruction.
///
/// `page_id` is the user's current page, read from their UserInfo account.
/// Fails with [`EncodeError::InvalidPageId`] when the user has not been
/// added to a page yet.
#[allow(clippy::too_many_arguments)]
pub fn withdraw_and_remove_user(
    config: &ProtocolConfig,
    wallet: Pubkey,
    user_spl: Pubkey,
    mint: Pubkey,
    withdraw_all: bool,
    amount: u64,
    page_id: u16,
) -> Result<Instruction, EncodeError> {
    if page_id > MAX_ASSIGNED_PAGE_ID {
        warn!("user {} has not been added to a users page yet", wallet);
        return Err(EncodeError::InvalidPageId(page_id));
    }
    let pool_id = config.pool_id_of(&mint)?;
    let [asset_pool, asset_pool_spl] = pool_accounts(config, pool_id)?;
    let (base_pda, _bump_seed) = pda::base_pda(&config.program_id);
    let accounts = vec![
        AccountMeta::new(wallet, true),
        AccountMeta::new(user_spl, false),
        AccountMeta::new(pda::user_pages_stats(config)?, false),
        AccountMeta::new(pda::users_page(config, page_id)?, false),
        AccountMeta::new(pda::user_info(config, &wallet)?, false),
        asset_pool,
        asset_pool_spl,
        AccountMeta::new(pda::pool_summaries(config)?, false),
        AccountMeta::new_readonly(pda::price_summaries(config)?, false),
        AccountMeta::new_readonly(base_pda, false),
        AccountMeta::new_readonly(config.token_program_id, false),
    ];
    Ok(lending_instruction(
        config.program_id,
        accounts,
        LendingInstruction::WithdrawAndRemoveUser {
            withdraw_all,
            amount,
            pool_id,
        },
    ))
}

/// Creates an `ExternLiquidate` instruction for registered mints.
#[allow(clippy::too_many_arguments)]
pub fn extern_liquidate(
    config: &ProtocolConfig,
    liquidator_wallet: Pubkey,
    liquidated_wallet: Pubkey,
    liquidator_collateral_spl: Pubkey,
    liquidator_borrowed_spl: Pubkey,
    collateral_mint: Pubkey,
    borrowed_mint: Pubkey,
    min_collateral_amount: u64,
    repaid_borrow_amount: u64,
) -> Result<Instruction, EncodeError> {
    extern_liquidate_by_pool_id(
        config,
        liquidator_wallet,
        liquidated_wallet,
        liquidator_collateral_spl,
        liquidator_borrowed_spl,
        config.pool_id_of(&collateral_mint)?,
        config.pool_id_of(&borrowed_mint)?,
        min_collateral_amount,
        repaid_borrow_amount,
    )
}

/// Creates an `ExternLiquidate` instruction for the given pool ids,
/// deriving every other account.
#[allow(clippy::too_many_arguments)]
pub fn extern_liquidate_by_pool_id(
    config: &ProtocolConfig,
    liquidator_wallet: Pubkey,
    liquidated_wallet: Pubkey,
    liquidator_collateral_spl: Pubkey,
    liquidator_borrowed_spl: Pubkey,
    collateral_pool_id: u8,
    borrowed_pool_id: u8,
    min_collateral_amount: u64,
    repaid_borrow_amount: u64,
) -> Result<Instruction, EncodeError> {
    let (base_pda, _bump_seed) = pda::base_pda(&config.program_id);
    Ok(extern_liquidate_full(
        config.program_id,
        min_collateral_amount,
        repaid_borrow_amount,
        collateral_pool_id,
        borrowed_pool_id,
        liquidated_wallet,
        liquidator_wallet,
        pda::user_info(config, &liquidated_wallet)?,
        base_pda,
        liquidator_collateral_spl,
        liquidator_borrowed_spl,
        pda::asset_pool(config, collateral_pool_id)?,
        pda::asset_pool_spl(config, collateral_pool_id)?,
        pda::asset_pool(config, borrowed_pool_id)?,
        pda::asset_pool_spl(config, borrowed_pool_id)?,
        pda::pool_summaries(config)?,
        pda::price_summaries(config)?,
        config.token_program_id,
    ))
}

/// Creates an `ExternLiquidate` instruction from explicit accounts.
#[allow(clippy::too_many_arguments)]
pub fn extern_liquidate_full(
    program_id: Pubkey,
    min_collateral_amount: u64,
    repaid_borrow_amount: u64,
    collateral_pool_id: u8,
    borrowed_pool_id: u8,
    liquidated_wallet_pubkey: Pubkey,
    liquidator_wallet_pubkey: Pubkey,
    liquidated_user_info_pubkey: Pubkey,
    base_pda_pubkey: Pubkey,
    liquidator_collateral_spl_pubkey: Pubkey,
    liquidator_borrowed_spl_pubkey: Pubkey,
    collateral_pool_pubkey: Pubkey,
    collateral_pool_spl_pubkey: Pubkey,
    borrowed_pool_pubkey: Pubkey,
    borrowed_pool_spl_pubkey: Pubkey,
    pool_summaries_pubkey: Pubkey,
    price_summaries_pubkey: Pubkey,
    token_program_id: Pubkey,
) -> Instruction {
    lending_instruction(
        program_id,
        vec![
            AccountMeta::new_readonly(liquidated_wallet_pubkey, false),
            AccountMeta::new_readonly(liquidator_wallet_pubkey, true),
            AccountMeta::new(liquidated_user_info_pubkey, false),
            AccountMeta::new_readonly(base_pda_pubkey, false),
            AccountMeta::new(liquidator_collateral_spl_pubkey, false),
            AccountMeta::new(liquidator_borrowed_spl_pubkey, false),
            AccountMeta::new(collateral_pool_pubkey, false),
            AccountMeta::new(collateral_pool_spl_pubkey, false),
            AccountMeta::new(borrowed_pool_pubkey, false),
            AccountMeta::new(borrowed_pool_spl_pubkey, false),
            AccountMeta::new(pool_summaries_pubkey, false),
            AccountMeta::new_readonly(price_summaries_pubkey, false),
            AccountMeta::new_readonly(token_program_id, false),
        ],
        LendingInstruction::ExternLiquidate {
            min_collateral_amount,
            repaid_borrow_amount,
            collateral_pool_id,
            borrowed_pool_id,
        },
    )
}

/// Which serum swap [`build_swap`] produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwapKind {
    /// Unsigned, anyone may trigger it for the user
    SelfLiquidate,
    /// Signed by the user
    MarginSwap,
}

/// Creates a `SelfLiquidate` or `MarginSwap` instruction.
///
/// `serum_sell_accounts` and `serum_buy_accounts` are the serum market
/// accounts of each side, appended in that order.
#[allow(clippy::too_many_arguments)]
pub fn build_swap(
    config: &ProtocolConfig,
    kind: SwapKind,
    wallet: Pubkey,
    need_to_sell: bool,
    need_to_buy: bool,
    sell_mint: Pubkey,
    sell_amount: u64,
    buy_mint: Pubkey,
    buy_amount: u64,
    intermediate_spl: Pubkey,
    serum_sell_accounts: &[AccountMeta],
    serum_buy_accounts: &[AccountMeta],
) -> Result<Instruction, EncodeError> {
    let params = SwapParams {
        need_to_sell,
        need_to_buy,
        sell_amount,
        buy_amount,
        sell_pool_id: config.pool_id_of(&sell_mint)?,
        buy_pool_id: config.pool_id_of(&buy_mint)?,
    };
    let [sell_pool, sell_pool_spl] = pool_accounts(config, params.sell_pool_id)?;
    let [buy_pool, buy_pool_spl] = pool_accounts(config, params.buy_pool_id)?;
    let (base_pda, _bump_seed) = pda::base_pda(&config.program_id);
    let (signed, instruction) = match kind {
        SwapKind::SelfLiquidate => (false, LendingInstruction::SelfLiquidate(params)),
        SwapKind::MarginSwap => (true, LendingInstruction::MarginSwap(params)),
    };
    let mut accounts = vec![
        AccountMeta::new_readonly(wallet, signed),
        AccountMeta::new(pda::user_info(config, &wallet)?, false),
        AccountMeta::new_readonly(base_pda, false),
        sell_pool,
        sell_pool_spl,
        buy_pool,
        buy_pool_spl,
        AccountMeta::new(pda::pool_summaries(config)?, false),
        AccountMeta::new_readonly(pda::price_summaries(config)?, false),
        AccountMeta::new(intermediate_spl, false),
        AccountMeta::new_readonly(config.token_program_id, false),
        AccountMeta::new_readonly(config.serum_program_id, false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
    ];
    accounts.extend_from_slice(serum_sell_accounts);
    accounts.extend_from_slice(serum_buy_accounts);
    Ok(lending_instruction(config.program_id, accounts, instruction))
}

/// Creates a `SelfLiquidate` instruction, selling `collateral_mint` to repay
/// `borrowed_mint`.
#[allow(clippy::too_many_arguments)]
pub fn self_liquidate(
    config: &ProtocolConfig,
    liquidated_wallet: Pubkey,
    need_to_sell: bool,
    need_to_buy: bool,
    collateral_mint: Pubkey,
    sell_collateral_amount: u64,
    borrowed_mint: Pubkey,
    buy_borrowed_amount: u64,
    intermediate_spl: Pubkey,
    serum_collateral_accounts: &[AccountMeta],
    serum_borrowed_accounts: &[AccountMeta],
) -> Result<Instruction, EncodeError> {
    build_swap(
        config,
        SwapKind::SelfLiquidate,
        liquidated_wallet,
        need_to_sell,
        need_to_buy,
        collateral_mint,
        sell_collateral_amount,
        borrowed_mint,
        buy_borrowed_amount,
        intermediate_spl,
        serum_collateral_accounts,
        serum_borrowed_accounts,
    )
}

/// Creates a `MarginSwap` instruction.
#[allow(clippy::too_many_arguments)]
pub fn margin_swap(
    config: &ProtocolConfig,
    wallet: Pubkey,
    need_to_sell: bool,
    need_to_buy: bool,
    sell_mint: Pubkey,
    sell_amount: u64,
    buy_mint: Pubkey,
    min_buy_amount: u64,
    intermediate_spl: Pubkey,
    serum_sell_accounts: &[AccountMeta],
    serum_buy_accounts: &[AccountMeta],
) -> Result<Instruction, EncodeError> {
    build_swap(
        config,
        SwapKind::MarginSwap,
        wallet,
        need_to_sell,
        need_to_buy,
        sell_mint,
        sell_amount,
        buy_mint,
        min_buy_amount,
        intermediate_spl,
        serum_sell_accounts,
        serum_buy_accounts,
    )
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    fn mint(config: &ProtocolConfig, symbol: &str) -> Pubkey {
        config.pools.get_by_symbol(symbol).unwrap().mint
    }

    #[test]
    fn test_update_user_config() {
        let config = ProtocolConfig::devnet();
        let wallet = Pubkey::new_unique();
        let instruction = update_user_config(&config, wallet, 90, 80, 70).unwrap();
        assert_eq!(instruction.program_id, config.program_id);
        assert_eq!(instruction.accounts.len(), 2);
        assert!(instruction.accounts[0].is_signer);
        assert!(!instruction.accounts[0].is_writable);
        assert_eq!(
            instruction.accounts[1].pubkey,
            pda::user_info(&config, &wallet).unwrap()
        );
        assert_eq!(instruction.data, vec![0x17, 90, 80, 70]);
    }

    #[test]
    fn test_add_user_and_deposit() {
        let config = ProtocolConfig::devnet();
        let wallet = Pubkey::new_unique();
        let instruction = add_user_and_deposit(
            &config,
            7,
            wallet,
            Pubkey::new_unique(),
            mint(&config, "ETH"),
            1_000,
        )
        .unwrap();
        assert_eq!(instruction.accounts.len(), 10);
        assert_eq!(
            instruction.accounts[3].pubkey,
            pda::users_page(&config, 7).unwrap()
        );
        assert_eq!(instruction.accounts[8].pubkey, SYSTEM_PROGRAM_ID);
        assert_eq!(SYSTEM_PROGRAM_ID, Pubkey::default());
        assert_eq!(instruction.accounts[9].pubkey, spl_token::id());
        assert_eq!(
            instruction.data,
            LendingInstruction::AddUserAndDeposit {
                page_id: 7,
                amount: 1_000,
                pool_id: 1
            }
            .pack()
        );
    }

    #[test]
    fn test_deposit_and_repay_share_accounts() {
        let config = ProtocolConfig::devnet();
        let wallet = Pubkey::new_unique();
        let user_spl = Pubkey::new_unique();
        let usdc = mint(&config, "USDC");
        let deposit = deposit(&config, wallet, user_spl, usdc, 42).unwrap();
        let repay = repay(&config, wallet, user_spl, usdc, true, 42).unwrap();
        assert_eq!(deposit.accounts.len(), 7);
        assert_eq!(deposit.accounts, repay.accounts);
        assert_eq!(deposit.data[0], 0x11);
        assert_eq!(repay.data, vec![0x14, 1, 42, 0, 0, 0, 0, 0, 0, 0, 3]);
    }

    #[test]
    fn test_withdraw_and_borrow_share_accounts() {
        let config = ProtocolConfig::devnet();
        let wallet = Pubkey::new_unique();
        let user_spl = Pubkey::new_unique();
        let btc = mint(&config, "BTC");
        let borrow = borrow(&config, wallet, user_spl, btc, 5).unwrap();
        let withdraw = withdraw(&config, wallet, user_spl, btc, false, 5).unwrap();
        assert_eq!(borrow.accounts.len(), 9);
        assert_eq!(borrow.accounts, withdraw.accounts);
        assert_eq!(
            borrow.accounts[7].pubkey,
            pda::base_pda(&config.program_id).0
        );
        assert_eq!(borrow.data, vec![0x13, 5, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(withdraw.data, vec![0x12, 0, 5, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_pool_id_builders_skip_registry() {
        let config = ProtocolConfig::devnet();
        let wallet = Pubkey::new_unique();
        let user_spl = Pubkey::new_unique();

        // pool 9 has no registered mint
        let deposit = deposit_by_pool_id(&config, wallet, user_spl, 9, 42).unwrap();
        assert_eq!(
            deposit.accounts,
            vec![
                AccountMeta::new(wallet, true),
                AccountMeta::new(user_spl, false),
                AccountMeta::new(pda::user_info(&config, &wallet).unwrap(), false),
                AccountMeta::new(pda::asset_pool(&config, 9).unwrap(), false),
                AccountMeta::new(pda::asset_pool_spl(&config, 9).unwrap(), false),
                AccountMeta::new(pda::pool_summaries(&config).unwrap(), false),
                AccountMeta::new_readonly(spl_token::id(), false),
            ]
        );
        assert_eq!(deposit.data, vec![0x11, 42, 0, 0, 0, 0, 0, 0, 0, 9]);

        let borrow = borrow_by_pool_id(&config, wallet, user_spl, 9, 5).unwrap();
        assert_eq!(
            &borrow.accounts[5..],
            &[
                AccountMeta::new(pda::pool_summaries(&config).unwrap(), false),
                AccountMeta::new_readonly(pda::price_summaries(&config).unwrap(), false),
                AccountMeta::new_readonly(pda::base_pda(&config.program_id).0, false),
                AccountMeta::new_readonly(spl_token::id(), false),
            ]
        );
        let withdraw = withdraw_by_pool_id(&config, wallet, user_spl, 9, true, 5).unwrap();
        assert_eq!(withdraw.accounts, borrow.accounts);
        let repay = repay_by_pool_id(&config, wallet, user_spl, 9, false, 5).unwrap();
        assert_eq!(repay.accounts, deposit.accounts);
    }

    #[test]
    fn test_mint_builders_match_pool_id_builders() {
        let config = ProtocolConfig::devnet();
        let wallet = Pubkey::new_unique();
        let user_spl = Pubkey::new_unique();
        let sol = mint(&config, "SOL");
        assert_eq!(
            deposit(&config, wallet, user_spl, sol, 1),
            deposit_by_pool_id(&config, wallet, user_spl, 4, 1)
        );
        assert_eq!(
            borrow(&config, wallet, user_spl, sol, 2),
            borrow_by_pool_id(&config, wallet, user_spl, 4, 2)
        );
        assert_eq!(
            withdraw(&config, wallet, user_spl, sol, true, 3),
            withdraw_by_pool_id(&config, wallet, user_spl, 4, true, 3)
        );
        assert_eq!(
            repay(&config, wallet, user_spl, sol, true, 4),
            repay_by_pool_id(&config, wallet, user_spl, 4, true, 4)
        );
        assert_eq!(
            extern_liquidate(
                &config,
                wallet,
                user_spl,
                Pubkey::default(),
                Pubkey::default(),
                sol,
                mint(&config, "USDC"),
                5,
                6,
            ),
            extern_liquidate_by_pool_id(
                &config,
                wallet,
                user_spl,
                Pubkey::default(),
                Pubkey::default(),
                4,
                3,
                5,
                6,
            )
        );
    }

    #[test]
    fn test_full_builders_use_given_accounts() {
        let program_id = Pubkey::new_unique();
        let keys: Vec<Pubkey> = (0..13).map(|_| Pubkey::new_unique()).collect();

        let deposit = deposit_full(
            program_id, 7, 1, keys[0], keys[1], keys[2], keys[3], keys[4], keys[5], keys[6],
        );
        assert_eq!(deposit.program_id, program_id);
        let deposit_keys: Vec<Pubkey> = deposit.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(deposit_keys, keys[..7].to_vec());
        assert!(deposit.accounts[0].is_signer);

        let withdraw = withdraw_full(
            program_id, false, 7, 1, keys[0], keys[1], keys[2], keys[3], keys[4], keys[5],
            keys[6], keys[7], keys[8],
        );
        assert_eq!(withdraw.accounts.len(), 9);
        assert_eq!(withdraw.accounts[6], AccountMeta::new_readonly(keys[6], false));
        assert_eq!(withdraw.accounts[8], AccountMeta::new_readonly(keys[8], false));

        let liquidate = extern_liquidate_full(
            program_id, 10, 20, 0, 2, keys[0], keys[1], keys[2], keys[3], keys[4], keys[5],
            keys[6], keys[7], keys[8], keys[9], keys[10], keys[11], keys[12],
        );
        let liquidate_keys: Vec<Pubkey> =
            liquidate.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(liquidate_keys, keys);
        assert_eq!(liquidate.accounts[1], AccountMeta::new_readonly(keys[1], true));
        assert_eq!(liquidate.accounts[11], AccountMeta::new_readonly(keys[11], false));
        assert_matches!(
            LendingInstruction::unpack(&liquidate.data),
            Ok(LendingInstruction::ExternLiquidate {
                collateral_pool_id: 0,
                borrowed_pool_id: 2,
                ..
            })
        );
    }

    #[test]
    fn test_unknown_mint() {
        let config = ProtocolConfig::devnet();
        let unknown = Pubkey::new_unique();
        assert_eq!(
            deposit(&config, Pubkey::new_unique(), Pubkey::new_unique(), unknown, 1),
            Err(EncodeError::UnknownMint(unknown))
        );
    }

    #[test]
    fn test_withdraw_and_remove_user() {
        let config = ProtocolConfig::devnet();
        let wallet = Pubkey::new_unique();
        let sol = mint(&config, "SOL");
        assert_eq!(
            withdraw_and_remove_user(&config, wallet, Pubkey::new_unique(), sol, true, 0, 20_000),
            Err(EncodeError::InvalidPageId(20_000))
        );
        assert_matches!(
            withdraw_and_remove_user(&config, wallet, Pubkey::new_unique(), sol, true, 0, 10_000),
            Ok(instruction) if instruction.accounts.len() == 11
        );
    }

    #[test]
    fn test_extern_liquidate() {
        let config = ProtocolConfig::devnet();
        let liquidator = Pubkey::new_unique();
        let liquidated = Pubkey::new_unique();
        let instruction = extern_liquidate(
            &config,
            liquidator,
            liquidated,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            mint(&config, "BTC"),
            mint(&config, "USDT"),
            10,
            20,
        )
        .unwrap();
        assert_eq!(instruction.accounts.len(), 13);
        assert_eq!(instruction.accounts[0], AccountMeta::new_readonly(liquidated, false));
        assert_eq!(instruction.accounts[1], AccountMeta::new_readonly(liquidator, true));
        assert_eq!(
            instruction.accounts[2].pubkey,
            pda::user_info(&config, &liquidated).unwrap()
        );
        assert_eq!(
            instruction.data,
            LendingInstruction::ExternLiquidate {
                min_collateral_amount: 10,
                repaid_borrow_amount: 20,
                collateral_pool_id: 0,
                borrowed_pool_id: 2,
            }
            .pack()
        );
    }

    #[test]
    fn test_build_swap_payload() {
        let config = ProtocolConfig::devnet();
        let serum_sell = [AccountMeta::new(Pubkey::new_unique(), false)];
        let serum_buy = [
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new_readonly(Pubkey::new_unique(), false),
        ];
        let instruction = build_swap(
            &config,
            SwapKind::SelfLiquidate,
            Pubkey::new_unique(),
            true,
            false,
            mint(&config, "ETH"),
            1000,
            mint(&config, "USDC"),
            0,
            Pubkey::new_unique(),
            &serum_sell,
            &serum_buy,
        )
        .unwrap();
        let mut expected = vec![0x16, 1, 0];
        expected.extend_from_slice(&1000u64.to_le_bytes());
        expected.extend_from_slice(&0u64.to_le_bytes());
        expected.extend_from_slice(&[1, 3]);
        assert_eq!(instruction.data, expected);
        assert_eq!(instruction.accounts.len(), 13 + 3);
        assert!(!instruction.accounts[0].is_signer);
        assert_eq!(instruction.accounts[11].pubkey, config.serum_program_id);
        assert_eq!(instruction.accounts[12].pubkey, sysvar::rent::id());
        assert_eq!(&instruction.accounts[13..14], &serum_sell);
        assert_eq!(&instruction.accounts[14..], &serum_buy);
    }

    #[test]
    fn test_margin_swap_is_signed() {
        let config = ProtocolConfig::devnet();
        let wallet = Pubkey::new_unique();
        let instruction = margin_swap(
            &config,
            wallet,
            true,
            true,
            mint(&config, "SOL"),
            3,
            mint(&config, "BTC"),
            2,
            Pubkey::new_unique(),
            &[],
            &[],
        )
        .unwrap();
        assert_eq!(instruction.accounts[0], AccountMeta::new_readonly(wallet, true));
        assert_eq!(instruction.data[0], 0x18);
        assert_eq!(
            LendingInstruction::unpack(&instruction.data),
            Ok(LendingInstruction::MarginSwap(SwapParams {
                need_to_sell: true,
                need_to_buy: true,
                sell_amount: 3,
                buy_amount: 2,
                sell_pool_id: 4,
                buy_pool_id: 0,
            }))
        );
    }
}
