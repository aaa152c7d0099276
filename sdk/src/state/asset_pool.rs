use {
    super::AccountData,
    crate::math::{pack_str, unpack_str, ScaledAmount},
    arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs},
    solana_program::pubkey::Pubkey,
};

/// Size of an asset pool record
pub const ASSET_POOL_LEN: usize = 283; // 32 + 32 + 1 + 16 + 8 + 16 + 8 + 8 + 32 + 32 + 32 + 8 + 2 + 8 * 7

/// Width of the NUL padded coin name
pub const COIN_NAME_LEN: usize = 32;

/// State of one lending pool
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetPool {
    /// Short coin name, e.g. "BTC"
    pub coin_name: String,
    /// Mint of the pooled token
    pub mint: Pubkey,
    pub pool_id: u8,
    /// Total deposits
    pub deposit_amount: ScaledAmount,
    /// Cumulative deposit interest index
    pub deposit_index: f64,
    /// Total borrows
    pub borrow_amount: ScaledAmount,
    /// Cumulative borrow interest index
    pub borrow_index: f64,
    /// Unix time of the last interest accrual
    pub last_update_time: u64,
    /// Token account holding the pool's liquidity
    pub spl_key: Pubkey,
    /// Price account the program reads
    pub price_key: Pubkey,
    /// Pyth feed for the asset
    pub pyth_price_key: Pubkey,
    /// Next client order id used on serum
    pub serum_next_cl_id: u64,
    /// Loan to value, per mille
    pub ltv: u16,
    /// `10^decimals` of the mint
    pub mint_decimal_mult: u64,
    pub base_rate: f64,
    pub multiplier1: f64,
    pub multiplier2: f64,
    /// Utilization at which `multiplier2` takes over
    pub kink: f64,
    pub borrow_rate: f64,
    pub deposit_rate: f64,
}

impl AssetPool {
    /// Whole base units deposited, fraction dropped.
    pub fn deposit_units(&self) -> u128 {
        self.deposit_amount.units()
    }

    /// Whole base units borrowed, fraction dropped.
    pub fn borrow_units(&self) -> u128 {
        self.borrow_amount.units()
    }

    /// Loan to value as a fraction of one.
    pub fn ltv_ratio(&self) -> f64 {
        self.ltv as f64 / 1000.0
    }
}

impl AccountData for AssetPool {
    const MIN_LEN: usize = ASSET_POOL_LEN;

    fn unpack_from_slice(src: &[u8]) -> Self {
        let src = array_ref![src, 0, ASSET_POOL_LEN];
        #[allow(clippy::ptr_offset_with_cast)]
        let (
            coin_name,
            mint,
            pool_id,
            deposit_amount,
            deposit_index,
            borrow_amount,
            borrow_index,
            last_update_time,
            spl_key,
            price_key,
            pyth_price_key,
            serum_next_cl_id,
            ltv,
            mint_decimal_mult,
            base_rate,
            multiplier1,
            multiplier2,
            kink,
            borrow_rate,
            deposit_rate,
        ) = array_refs![
            src,
            COIN_NAME_LEN,
            32,
            1,
            16,
            8,
            16,
            8,
            8,
            32,
            32,
            32,
            8,
            2,
            8,
            8,
            8,
            8,
            8,
            8,
            8
        ];
        Self {
            coin_name: unpack_str(coin_name),
            mint: Pubkey::new_from_array(*mint),
            pool_id: pool_id[0],
            deposit_amount: ScaledAmount::unpack(deposit_amount),
            deposit_index: f64::from_le_bytes(*deposit_index),
            borrow_amount: ScaledAmount::unpack(borrow_amount),
            borrow_index: f64::from_le_bytes(*borrow_index),
            last_update_time: u64::from_le_bytes(*last_update_time),
            spl_key: Pubkey::new_from_array(*spl_key),
            price_key: Pubkey::new_from_array(*price_key),
            pyth_price_key: Pubkey::new_from_array(*pyth_price_key),
            serum_next_cl_id: u64::from_le_bytes(*serum_next_cl_id),
            ltv: u16::from_le_bytes(*ltv),
            mint_decimal_mult: u64::from_le_bytes(*mint_decimal_mult),
            base_rate: f64::from_le_bytes(*base_rate),
            multiplier1: f64::from_le_bytes(*multiplier1),
            multiplier2: f64::from_le_bytes(*multiplier2),
            kink: f64::from_le_bytes(*kink),
            borrow_rate: f64::from_le_bytes(*borrow_rate),
            deposit_rate: f64::from_le_bytes(*deposit_rate),
        }
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, ASSET_POOL_LEN];
        #[allow(clippy::ptr_offset_with_cast)]
        let (
            coin_name,
            mint,
            pool_id,
            deposit_amount,
            deposit_index,
            borrow_amount,
            borrow_index,
            last_update_time,
            spl_key,
            price_key,
            pyth_price_key,
            serum_next_cl_id,
            ltv,
            mint_decimal_mult,
            base_rate,
            multiplier1,
            multiplier2,
            kink,
            borrow_rate,
            deposit_rate,
        ) = mut_array_refs![
            dst,
            COIN_NAME_LEN,
            32,
            1,
            16,
            8,
            16,
            8,
            8,
            32,
            32,
            32,
            8,
            2,
            8,
            8,
            8,
            8,
            8,
            8,
            8
        ];
        pack_str(&self.coin_name, coin_name);
        mint.copy_from_slice(self.mint.as_ref());
        pool_id[0] = self.pool_id;
        self.deposit_amount.pack(deposit_amount);
        *deposit_index = self.deposit_index.to_le_bytes();
        self.borrow_amount.pack(borrow_amount);
        *borrow_index = self.borrow_index.to_le_bytes();
        *last_update_time = self.last_update_time.to_le_bytes();
        spl_key.copy_from_slice(self.spl_key.as_ref());
        price_key.copy_from_slice(self.price_key.as_ref());
        pyth_price_key.copy_from_slice(self.pyth_price_key.as_ref());
        *serum_next_cl_id = self.serum_next_cl_id.to_le_bytes();
        *ltv = self.ltv.to_le_bytes();
        *mint_decimal_mult = self.mint_decimal_mult.to_le_bytes();
        *base_rate = self.base_rate.to_le_bytes();
        *multiplier1 = self.multiplier1.to_le_bytes();
        *multiplier2 = self.multiplier2.to_le_bytes();
        *kink = self.kink.to_le_bytes();
        *borrow_rate = self.borrow_rate.to_le_bytes();
        *deposit_rate = self.deposit_rate.to_le_bytes();
    }
}
