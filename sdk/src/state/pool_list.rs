use {
    super::{check_count, AccountData},
    crate::error::EncodeError,
    arrayref::array_ref,
    solana_program::pubkey::{Pubkey, PUBKEY_BYTES},
};

/// Count plus reserved padding ahead of the first address
pub const POOL_LIST_HEADER_LEN: usize = 8;

/// Addresses of every registered asset pool, in registration order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolList {
    pub pools: Vec<Pubkey>,
}

impl PoolList {
    fn count(src: &[u8]) -> usize {
        u16::from_le_bytes(*array_ref![src, 0, 2]) as usize
    }
}

impl AccountData for PoolList {
    const MIN_LEN: usize = POOL_LIST_HEADER_LEN;

    fn required_len(src: &[u8]) -> usize {
        POOL_LIST_HEADER_LEN + PUBKEY_BYTES * Self::count(src)
    }

    fn packed_len(&self) -> usize {
        POOL_LIST_HEADER_LEN + PUBKEY_BYTES * self.pools.len()
    }

    fn check_packable(&self) -> Result<(), EncodeError> {
        check_count(self.pools.len(), u16::MAX as usize)
    }

    fn unpack_from_slice(src: &[u8]) -> Self {
        let pools = src[POOL_LIST_HEADER_LEN..]
            .chunks_exact(PUBKEY_BYTES)
            .take(Self::count(src))
            .map(|key| Pubkey::new_from_array(*array_ref![key, 0, PUBKEY_BYTES]))
            .collect();
        Self { pools }
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let (header, keys) = dst.split_at_mut(POOL_LIST_HEADER_LEN);
        header.fill(0);
        header[..2].copy_from_slice(&(self.pools.len() as u16).to_le_bytes());
        for (dst, pool) in keys.chunks_exact_mut(PUBKEY_BYTES).zip(&self.pools) {
            dst.copy_from_slice(pool.as_ref());
        }
    }
}
