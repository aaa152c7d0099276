//! Protocol deployment settings: program ids and the mint to pool id
//! registry. A `ProtocolConfig` is immutable once built and is passed to every
//! derivation and builder that needs it, so several deployments can be used
//! side by side.

use {
    crate::error::{ConfigError, DerivationError},
    solana_program::{pubkey, pubkey::Pubkey},
    std::{collections::HashSet, str::FromStr},
};

/// Serum dex program used by the devnet deployment.
pub const DEVNET_SERUM_PROGRAM_ID: Pubkey =
    pubkey!("9NaBPcFZpHWj6p5sSbLSPEt85j5xev84Bq3HvhTNWq4c");

/// The native system program.
pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");

/// Where clients read asset prices from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PriceSource {
    /// The program's own per-asset price accounts.
    #[default]
    Protocol,
    /// Pyth price feeds registered per pool, falling back to the program's
    /// price account for pools without one.
    Pyth,
}

/// One supported asset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolEntry {
    /// Short coin name, e.g. "BTC"
    pub symbol: String,
    pub mint: Pubkey,
    pub pool_id: u8,
    /// Pyth price feed for the asset, if any
    pub pyth_price: Option<Pubkey>,
}

impl PoolEntry {
    pub fn new(symbol: &str, mint: Pubkey, pool_id: u8) -> Self {
        Self {
            symbol: symbol.to_string(),
            mint,
            pool_id,
            pyth_price: None,
        }
    }

    pub fn with_pyth_price(mut self, pyth_price: Pubkey) -> Self {
        self.pyth_price = Some(pyth_price);
        self
    }
}

/// Mint to pool id mapping, validated 1:1.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolRegistry {
    entries: Vec<PoolEntry>,
}

impl PoolRegistry {
    pub fn new(entries: Vec<PoolEntry>) -> Result<Self, ConfigError> {
        let mut pool_ids = HashSet::new();
        let mut mints = HashSet::new();
        for entry in &entries {
            if !pool_ids.insert(entry.pool_id) {
                return Err(ConfigError::DuplicatePoolId(entry.pool_id));
            }
            if !mints.insert(entry.mint) {
                return Err(ConfigError::DuplicateMint(entry.mint));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn get(&self, mint: &Pubkey) -> Option<&PoolEntry> {
        self.entries.iter().find(|entry| entry.mint == *mint)
    }

    pub fn get_by_pool_id(&self, pool_id: u8) -> Option<&PoolEntry> {
        self.entries.iter().find(|entry| entry.pool_id == pool_id)
    }

    pub fn get_by_symbol(&self, symbol: &str) -> Option<&PoolEntry> {
        self.entries
            .iter()
            .find(|entry| entry.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Pool id registered for `mint`.
    pub fn pool_id_of(&self, mint: &Pubkey) -> Result<u8, DerivationError> {
        self.get(mint)
            .map(|entry| entry.pool_id)
            .ok_or(DerivationError::UnknownMint(*mint))
    }

    /// Same as [`Self::pool_id_of`] for a base58 mint string. A string that
    /// is not a valid key is reported as an unknown mint.
    pub fn pool_id_of_str(&self, mint: &str) -> Result<u8, DerivationError> {
        let mint = Pubkey::from_str(mint)
            .map_err(|_| DerivationError::UnknownMint(Pubkey::default()))?;
        self.pool_id_of(&mint)
    }

    /// Registers the Pyth price feed of an existing pool.
    pub fn set_pyth_price(&mut self, pool_id: u8, pyth_price: Pubkey) -> Result<(), ConfigError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.pool_id == pool_id)
            .ok_or(ConfigError::UnknownPoolId(pool_id))?;
        entry.pyth_price = Some(pyth_price);
        Ok(())
    }

    pub fn symbol_of(&self, mint: &Pubkey) -> Result<&str, DerivationError> {
        self.get(mint)
            .map(|entry| entry.symbol.as_str())
            .ok_or(DerivationError::UnknownMint(*mint))
    }
}

/// Addresses and pools of one protocol deployment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProtocolConfig {
    pub program_id: Pubkey,
    pub serum_program_id: Pubkey,
    pub token_program_id: Pubkey,
    pub price_source: PriceSource,
    pub pools: PoolRegistry,
}

impl ProtocolConfig {
    pub fn new(program_id: Pubkey, serum_program_id: Pubkey, pools: PoolRegistry) -> Self {
        Self {
            program_id,
            serum_program_id,
            token_program_id: spl_token::id(),
            price_source: PriceSource::Protocol,
            pools,
        }
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_token_program_id(mut self, token_program_id: Pubkey) -> Self {
        self.token_program_id = token_program_id;
        self
    }

    pub fn with_price_source(mut self, price_source: PriceSource) -> Self {
        self.price_source = price_source;
        self
    }

    /// The devnet deployment with its five test mints.
    pub fn devnet() -> Self {
        let pools = vec![
            PoolEntry::new("BTC", pubkey!("7MtysQGohtvxjV53ffV3BumvNaF7DHMC47QwPsDUE98f"), 0),
            PoolEntry::new("ETH", pubkey!("DQ6Vw2iFQ3jWYsT52TtUXkrBQfkuAu2rtCcWZZ5BtktY"), 1),
            PoolEntry::new("USDT", pubkey!("GjJFUSzbjZZMXySmJ8jwYmYcZhosN4PAcBKDTnSpHd3s"), 2),
            PoolEntry::new("USDC", pubkey!("BwNiXVdAYt5g5tGSn6Apadk72SEqzmEd3Tv2W5pgvWFM"), 3),
            PoolEntry::new("SOL", pubkey!("4jSAADAjfidWvkpRVBk4Q5LMiZT2UNyw8A3D3oKwBC2u"), 4),
        ];
        Self::new(
            crate::id(),
            DEVNET_SERUM_PROGRAM_ID,
            PoolRegistry { entries: pools },
        )
    }

    pub fn pool_id_of(&self, mint: &Pubkey) -> Result<u8, DerivationError> {
        self.pools.pool_id_of(mint)
    }
}

/// Parses a base58 public key from configuration input.
pub fn parse_pubkey(value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value).map_err(|_| ConfigError::InvalidPubkey(value.to_string()))
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    #[test]
    fn test_devnet_registry() {
        let config = ProtocolConfig::devnet();
        assert_eq!(config.program_id, crate::id());
        assert_eq!(config.token_program_id, spl_token::id());
        // rebuilding through the validating constructor must succeed
        PoolRegistry::new(config.pools.entries().to_vec()).unwrap();
        for (pool_id, entry) in config.pools.entries().iter().enumerate() {
            assert_eq!(config.pool_id_of(&entry.mint), Ok(pool_id as u8));
            assert_eq!(
                config.pools.pool_id_of_str(&entry.mint.to_string()),
                Ok(pool_id as u8)
            );
        }
        assert_eq!(config.pools.get_by_symbol("usdc").unwrap().pool_id, 3);
        assert_eq!(config.pools.get_by_pool_id(4).unwrap().symbol, "SOL");
    }

    #[test]
    fn test_unknown_mint() {
        let config = ProtocolConfig::devnet();
        let mint = Pubkey::new_unique();
        assert_eq!(config.pool_id_of(&mint), Err(DerivationError::UnknownMint(mint)));
        assert_matches!(
            config.pools.pool_id_of_str("not a mint"),
            Err(DerivationError::UnknownMint(_))
        );
        assert_matches!(config.pools.symbol_of(&mint), Err(DerivationError::UnknownMint(_)));
    }

    #[test]
    fn test_set_pyth_price() {
        let mut config = ProtocolConfig::devnet().with_price_source(PriceSource::Pyth);
        let feed = Pubkey::new_unique();
        let btc = config.pools.get_by_pool_id(0).unwrap().mint;
        assert_ne!(crate::pda::price_key(&config, &btc).unwrap(), feed);

        config.pools.set_pyth_price(0, feed).unwrap();
        assert_eq!(config.pools.get_by_pool_id(0).unwrap().pyth_price, Some(feed));
        assert_eq!(crate::pda::price_key(&config, &btc).unwrap(), feed);
        assert_eq!(
            config.pools.set_pyth_price(9, feed),
            Err(ConfigError::UnknownPoolId(9))
        );
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mint = Pubkey::new_unique();
        assert_eq!(
            PoolRegistry::new(vec![
                PoolEntry::new("A", mint, 0),
                PoolEntry::new("B", Pubkey::new_unique(), 0),
            ]),
            Err(ConfigError::DuplicatePoolId(0))
        );
        assert_eq!(
            PoolRegistry::new(vec![PoolEntry::new("A", mint, 0), PoolEntry::new("B", mint, 1)]),
            Err(ConfigError::DuplicateMint(mint))
        );
    }

    #[test]
    fn test_parse_pubkey() {
        assert_eq!(parse_pubkey(&crate::id().to_string()), Ok(crate::id()));
        assert_matches!(parse_pubkey("xyz"), Err(ConfigError::InvalidPubkey(_)));
    }
}
