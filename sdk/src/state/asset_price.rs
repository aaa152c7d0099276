use {super::AccountData, arrayref::array_ref};

pub const ASSET_PRICE_LEN: usize = 8;

/// Price the program holds for one asset
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AssetPrice {
    pub price_in_usd: u64,
}

impl AccountData for AssetPrice {
    const MIN_LEN: usize = ASSET_PRICE_LEN;

    fn unpack_from_slice(src: &[u8]) -> Self {
        let price_in_usd = array_ref![src, 0, ASSET_PRICE_LEN];
        Self {
            price_in_usd: u64::from_le_bytes(*price_in_usd),
        }
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        dst[..ASSET_PRICE_LEN].copy_from_slice(&self.price_in_usd.to_le_bytes());
    }
}
