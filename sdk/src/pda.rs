//! Addresses of the accounts owned by the lending program.
//!
//! Everything here except the market vault search is a pure function of the
//! configuration and its arguments; nothing is cached.

use {
    crate::{
        config::{PriceSource, ProtocolConfig},
        constants::*,
        error::DerivationError,
    },
    log::debug,
    solana_program::pubkey::{Pubkey, PubkeyError},
    solana_sdk::signature::{Keypair, Signer},
};

/// Program-derived base authority, seed `"2"`.
pub fn base_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[BASE_PDA_SEED], program_id)
}

/// Program-derived price authority, seed `"PRICE"`.
pub fn price_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PRICE_PDA_SEED], program_id)
}

fn with_base_seed(config: &ProtocolConfig, seed: &str) -> Result<Pubkey, DerivationError> {
    let (base, _bump_seed) = base_pda(&config.program_id);
    Ok(Pubkey::create_with_seed(&base, seed, &config.program_id)?)
}

pub fn pool_list(config: &ProtocolConfig) -> Result<Pubkey, DerivationError> {
    with_base_seed(config, POOL_LIST_SEED)
}

pub fn pool_summaries(config: &ProtocolConfig) -> Result<Pubkey, DerivationError> {
    with_base_seed(config, POOL_SUMMARIES_SEED)
}

pub fn price_summaries(config: &ProtocolConfig) -> Result<Pubkey, DerivationError> {
    with_base_seed(config, PRICE_SUMMARIES_SEED)
}

pub fn user_pages_stats(config: &ProtocolConfig) -> Result<Pubkey, DerivationError> {
    with_base_seed(config, USER_PAGES_STATS_SEED)
}

pub fn users_page(config: &ProtocolConfig, page_id: u16) -> Result<Pubkey, DerivationError> {
    with_base_seed(config, &format!("{}{}", USERS_PAGE_SEED_PREFIX, page_id))
}

/// Seed string of a pool: `POOL__` followed by the pool id written as two
/// letters from `a..=p`, high nibble first.
pub fn pool_seed(pool_id: u8) -> String {
    let high = (b'a' + pool_id / 16) as char;
    let low = (b'a' + pool_id % 16) as char;
    format!("{}{}{}", POOL_SEED_PREFIX, high, low)
}

/// Inverse of [`pool_seed`].
pub fn pool_id_from_seed(seed: &str) -> Result<u8, DerivationError> {
    let malformed = || DerivationError::MalformedPoolSeed(seed.to_string());
    let code = seed.strip_prefix(POOL_SEED_PREFIX).ok_or_else(malformed)?;
    match code.as_bytes() {
        [high @ b'a'..=b'p', low @ b'a'..=b'p'] => Ok((high - b'a') * 16 + (low - b'a')),
        _ => Err(malformed()),
    }
}

/// Pool state account of `pool_id`.
pub fn asset_pool(config: &ProtocolConfig, pool_id: u8) -> Result<Pubkey, DerivationError> {
    with_base_seed(config, &pool_seed(pool_id))
}

/// Token account holding the pool's liquidity. Same seed as the pool state
/// account, owned by the token program instead.
pub fn asset_pool_spl(config: &ProtocolConfig, pool_id: u8) -> Result<Pubkey, DerivationError> {
    let (base, _bump_seed) = base_pda(&config.program_id);
    Ok(Pubkey::create_with_seed(
        &base,
        &pool_seed(pool_id),
        &config.token_program_id,
    )?)
}

/// The program's price account for `pool_id`.
pub fn asset_price(config: &ProtocolConfig, pool_id: u8) -> Result<Pubkey, DerivationError> {
    let (price_base, _bump_seed) = price_pda(&config.program_id);
    Ok(Pubkey::create_with_seed(
        &price_base,
        &pool_seed(pool_id),
        &config.program_id,
    )?)
}

pub fn asset_pool_by_mint(config: &ProtocolConfig, mint: &Pubkey) -> Result<Pubkey, DerivationError> {
    asset_pool(config, config.pool_id_of(mint)?)
}

pub fn asset_pool_spl_by_mint(
    config: &ProtocolConfig,
    mint: &Pubkey,
) -> Result<Pubkey, DerivationError> {
    asset_pool_spl(config, config.pool_id_of(mint)?)
}

pub fn asset_price_by_mint(
    config: &ProtocolConfig,
    mint: &Pubkey,
) -> Result<Pubkey, DerivationError> {
    asset_price(config, config.pool_id_of(mint)?)
}

/// Account to read the price of `mint` from, honouring the configured price
/// source.
pub fn price_key(config: &ProtocolConfig, mint: &Pubkey) -> Result<Pubkey, DerivationError> {
    let entry = config
        .pools
        .get(mint)
        .ok_or(DerivationError::UnknownMint(*mint))?;
    match (config.price_source, entry.pyth_price) {
        (PriceSource::Pyth, Some(pyth_price)) => Ok(pyth_price),
        _ => asset_price(config, entry.pool_id),
    }
}

/// Per-wallet user state. Seeded from the wallet itself, not the base pda.
pub fn user_info(config: &ProtocolConfig, wallet: &Pubkey) -> Result<Pubkey, DerivationError> {
    Ok(Pubkey::create_with_seed(
        wallet,
        USER_INFO_SEED,
        &config.program_id,
    )?)
}

/// Generates a serum market account whose vault signer, derived with the
/// all-zero nonce, falls off the curve.
///
/// Each attempt has roughly even odds, so the search normally ends after a
/// couple of keypairs. With `max_attempts` set to `None` it never gives up.
pub fn find_market_vault(
    serum_program_id: &Pubkey,
    max_attempts: Option<usize>,
) -> Result<(Keypair, Pubkey), DerivationError> {
    find_market_vault_with(serum_program_id, max_attempts, Keypair::new)
}

/// [`find_market_vault`] drawing candidate market keypairs from
/// `next_keypair`.
pub fn find_market_vault_with<F>(
    serum_program_id: &Pubkey,
    max_attempts: Option<usize>,
    mut next_keypair: F,
) -> Result<(Keypair, Pubkey), DerivationError>
where
    F: FnMut() -> Keypair,
{
    let mut attempts = 0;
    loop {
        if max_attempts.is_some_and(|max| attempts >= max) {
            return Err(DerivationError::SearchExhausted { attempts });
        }
        attempts += 1;
        let market = next_keypair();
        let market_key = market.pubkey();
        let seeds: [&[u8]; 2] = [market_key.as_ref(), &MARKET_VAULT_NONCE];
        match Pubkey::create_program_address(&seeds, serum_program_id) {
            Ok(vault) => {
                debug!("market vault {} found after {} attempts", vault, attempts);
                return Ok((market, vault));
            }
            Err(PubkeyError::InvalidSeeds) => {
                debug!("market {} vault is on curve, retrying", market_key);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::config::{PoolEntry, PoolRegistry},
        assert_matches::assert_matches,
        solana_program::pubkey,
        solana_sdk::signer::keypair::keypair_from_seed,
    };

    #[test]
    fn test_pool_seed() {
        assert_eq!(pool_seed(0), "POOL__aa");
        assert_eq!(pool_seed(1), "POOL__ab");
        assert_eq!(pool_seed(16), "POOL__ba");
        assert_eq!(pool_seed(255), "POOL__pp");
    }

    #[test]
    fn test_pool_seed_round_trip() {
        for pool_id in 0..=u8::MAX {
            assert_eq!(pool_id_from_seed(&pool_seed(pool_id)), Ok(pool_id));
        }
    }

    #[test]
    fn test_malformed_pool_seed() {
        for seed in ["POOL__", "POOL__a", "POOL__aq", "POOL__abc", "POOL_aa", "pool__aa"] {
            assert_matches!(
                pool_id_from_seed(seed),
                Err(DerivationError::MalformedPoolSeed(_))
            );
        }
    }

    #[test]
    fn test_devnet_authorities() {
        let program_id = crate::id();
        assert_eq!(
            base_pda(&program_id),
            (pubkey!("JBSGCV1hPY3CTfpqDQqB4TzwnL9Mjv9ahrSGkpvnxSiM"), 255)
        );
        assert_eq!(
            price_pda(&program_id),
            (pubkey!("BPLk2Nd5B9pggzD6i6upRqPFptLBCjQSwfKHjjLjFYNp"), 254)
        );
    }

    #[test]
    fn test_seeded_accounts() {
        let config = ProtocolConfig::devnet();
        let (base, _) = base_pda(&config.program_id);
        let (price_base, _) = price_pda(&config.program_id);
        let program_id = config.program_id;

        assert_eq!(
            pool_list(&config).unwrap(),
            Pubkey::create_with_seed(&base, "PoolList", &program_id).unwrap()
        );
        assert_eq!(
            pool_summaries(&config).unwrap(),
            Pubkey::create_with_seed(&base, "PoolSummaries", &program_id).unwrap()
        );
        assert_eq!(
            price_summaries(&config).unwrap(),
            Pubkey::create_with_seed(&base, "PriceSummaries", &program_id).unwrap()
        );
        assert_eq!(
            user_pages_stats(&config).unwrap(),
            Pubkey::create_with_seed(&base, "UserPagesStats", &program_id).unwrap()
        );
        assert_eq!(
            users_page(&config, 42).unwrap(),
            Pubkey::create_with_seed(&base, "UsersPage_42", &program_id).unwrap()
        );
        assert_eq!(
            asset_pool(&config, 3).unwrap(),
            Pubkey::create_with_seed(&base, "POOL__ad", &program_id).unwrap()
        );
        assert_eq!(
            asset_pool_spl(&config, 3).unwrap(),
            Pubkey::create_with_seed(&base, "POOL__ad", &spl_token::id()).unwrap()
        );
        assert_eq!(
            asset_price(&config, 3).unwrap(),
            Pubkey::create_with_seed(&price_base, "POOL__ad", &program_id).unwrap()
        );

        let wallet = Pubkey::new_unique();
        assert_eq!(
            user_info(&config, &wallet).unwrap(),
            Pubkey::create_with_seed(&wallet, "UserInfo", &program_id).unwrap()
        );
    }

    #[test]
    fn test_pool_and_token_account_differ() {
        let config = ProtocolConfig::devnet();
        assert_ne!(
            asset_pool(&config, 0).unwrap(),
            asset_pool_spl(&config, 0).unwrap()
        );
    }

    #[test]
    fn test_derivation_is_per_config() {
        let devnet = ProtocolConfig::devnet();
        let other = ProtocolConfig::devnet().with_program_id(Pubkey::new_unique());
        assert_ne!(pool_list(&devnet).unwrap(), pool_list(&other).unwrap());
        assert_eq!(pool_list(&devnet).unwrap(), pool_list(&devnet).unwrap());
    }

    #[test]
    fn test_by_mint() {
        let config = ProtocolConfig::devnet();
        let usdc = config.pools.get_by_symbol("USDC").unwrap().mint;
        assert_eq!(
            asset_pool_by_mint(&config, &usdc).unwrap(),
            asset_pool(&config, 3).unwrap()
        );
        assert_eq!(
            asset_pool_spl_by_mint(&config, &usdc).unwrap(),
            asset_pool_spl(&config, 3).unwrap()
        );
        assert_eq!(
            asset_price_by_mint(&config, &usdc).unwrap(),
            asset_price(&config, 3).unwrap()
        );

        let unknown = Pubkey::new_unique();
        assert_eq!(
            asset_pool_by_mint(&config, &unknown),
            Err(DerivationError::UnknownMint(unknown))
        );
    }

    #[test]
    fn test_price_key_source() {
        let mint = Pubkey::new_unique();
        let pyth = Pubkey::new_unique();
        let pools = PoolRegistry::new(vec![
            PoolEntry::new("BTC", mint, 0).with_pyth_price(pyth),
            PoolEntry::new("ETH", Pubkey::new_unique(), 1),
        ])
        .unwrap();
        let config = ProtocolConfig::new(crate::id(), Pubkey::new_unique(), pools);
        assert_eq!(price_key(&config, &mint).unwrap(), asset_price(&config, 0).unwrap());

        let config = config.with_price_source(PriceSource::Pyth);
        assert_eq!(price_key(&config, &mint).unwrap(), pyth);
        let eth = config.pools.get_by_pool_id(1).unwrap().mint;
        assert_eq!(price_key(&config, &eth).unwrap(), asset_price(&config, 1).unwrap());
    }

    #[test]
    fn test_market_vault_search() {
        let serum = ProtocolConfig::devnet().serum_program_id;
        let mut seed = 0u8;
        let mut next = || {
            seed += 1;
            keypair_from_seed(&[seed; 32]).unwrap()
        };
        let (market, vault) = find_market_vault_with(&serum, None, &mut next).unwrap();
        assert!(!vault.is_on_curve());
        assert_eq!(
            Pubkey::create_program_address(&[market.pubkey().as_ref(), &[0u8; 8]], &serum),
            Ok(vault)
        );
    }

    #[test]
    fn test_market_vault_search_bounded() {
        let serum = Pubkey::new_unique();
        assert_eq!(
            find_market_vault(&serum, Some(0)).map(|(_, vault)| vault),
            Err(DerivationError::SearchExhausted { attempts: 0 })
        );
        let (_, vault) = find_market_vault(&serum, None).unwrap();
        assert!(!vault.is_on_curve());
    }
}
