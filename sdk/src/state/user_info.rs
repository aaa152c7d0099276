use {
    super::{check_count, AccountData},
    crate::{constants::INVALID_PAGE, error::EncodeError, math::ScaledAmount},
    arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs},
};

/// page_id, three liquidation settings and the asset count
pub const USER_INFO_HEADER_LEN: usize = 6;
pub const USER_ASSET_INFO_LEN: usize = 50; // 1 + 1 + 16 + 8 + 16 + 8

/// A wallet's position in the protocol
#[derive(Clone, Debug, PartialEq)]
pub struct UserInfo {
    /// Users page holding the wallet, `INVALID_PAGE` when not added
    pub page_id: u16,
    pub self_liquidation_threshold: u8,
    pub post_self_liquidation_ratio_target: u8,
    pub post_extern_liquidation_ratio_target: u8,
    /// One entry per asset the user holds or owes
    pub assets: Vec<UserAssetInfo>,
}

impl Default for UserInfo {
    fn default() -> Self {
        Self {
            page_id: INVALID_PAGE,
            self_liquidation_threshold: 0,
            post_self_liquidation_ratio_target: 0,
            post_extern_liquidation_ratio_target: 0,
            assets: Vec::new(),
        }
    }
}

impl UserInfo {
    /// Whether the wallet has been added to a users page.
    pub fn is_active(&self) -> bool {
        self.page_id != INVALID_PAGE
    }

    pub fn num_assets(&self) -> usize {
        self.assets.len()
    }

    pub fn asset(&self, pool_id: u8) -> Option<&UserAssetInfo> {
        self.assets.iter().find(|asset| asset.pool_id == pool_id)
    }

    fn unpack_header(src: &[u8]) -> (u16, u8, u8, u8, u8) {
        let src = array_ref![src, 0, USER_INFO_HEADER_LEN];
        let (page_id, threshold, post_self, post_extern, num_assets) =
            array_refs![src, 2, 1, 1, 1, 1];
        (
            u16::from_le_bytes(*page_id),
            threshold[0],
            post_self[0],
            post_extern[0],
            num_assets[0],
        )
    }
}

impl AccountData for UserInfo {
    const MIN_LEN: usize = USER_INFO_HEADER_LEN;

    fn required_len(src: &[u8]) -> usize {
        let (.., num_assets) = Self::unpack_header(src);
        USER_INFO_HEADER_LEN + USER_ASSET_INFO_LEN * num_assets as usize
    }

    fn packed_len(&self) -> usize {
        USER_INFO_HEADER_LEN + USER_ASSET_INFO_LEN * self.assets.len()
    }

    fn check_packable(&self) -> Result<(), EncodeError> {
        check_count(self.assets.len(), u8::MAX as usize)
    }

    fn unpack_from_slice(src: &[u8]) -> Self {
        let (
            page_id,
            self_liquidation_threshold,
            post_self_liquidation_ratio_target,
            post_extern_liquidation_ratio_target,
            num_assets,
        ) = Self::unpack_header(src);
        let assets = src[USER_INFO_HEADER_LEN..]
            .chunks_exact(USER_ASSET_INFO_LEN)
            .take(num_assets as usize)
            .map(UserAssetInfo::unpack_from_slice)
            .collect();
        Self {
            page_id,
            self_liquidation_threshold,
            post_self_liquidation_ratio_target,
            post_extern_liquidation_ratio_target,
            assets,
        }
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let (header, body) = dst.split_at_mut(USER_INFO_HEADER_LEN);
        let header = array_mut_ref![header, 0, USER_INFO_HEADER_LEN];
        let (page_id, threshold, post_self, post_extern, num_assets) =
            mut_array_refs![header, 2, 1, 1, 1, 1];
        *page_id = self.page_id.to_le_bytes();
        threshold[0] = self.self_liquidation_threshold;
        post_self[0] = self.post_self_liquidation_ratio_target;
        post_extern[0] = self.post_extern_liquidation_ratio_target;
        num_assets[0] = self.assets.len() as u8;
        for (dst, asset) in body.chunks_exact_mut(USER_ASSET_INFO_LEN).zip(&self.assets) {
            asset.pack_into_slice(dst);
        }
    }
}

/// A user's deposit and borrow in one pool
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserAssetInfo {
    pub pool_id: u8,
    /// Non-zero when the deposit counts as collateral
    pub use_as_collateral: u8,
    pub deposit_amount: ScaledAmount,
    /// Pool deposit index at the user's last update
    pub deposit_index: f64,
    pub borrow_amount: ScaledAmount,
    /// Pool borrow index at the user's last update
    pub borrow_index: f64,
}

impl UserAssetInfo {
    pub fn is_collateral(&self) -> bool {
        self.use_as_collateral != 0
    }

    pub fn deposit_units(&self) -> u128 {
        self.deposit_amount.units()
    }

    pub fn borrow_units(&self) -> u128 {
        self.borrow_amount.units()
    }
}

impl AccountData for UserAssetInfo {
    const MIN_LEN: usize = USER_ASSET_INFO_LEN;

    fn unpack_from_slice(src: &[u8]) -> Self {
        let src = array_ref![src, 0, USER_ASSET_INFO_LEN];
        let (pool_id, use_as_collateral, deposit_amount, deposit_index, borrow_amount, borrow_index) =
            array_refs![src, 1, 1, 16, 8, 16, 8];
        Self {
            pool_id: pool_id[0],
            use_as_collateral: use_as_collateral[0],
            deposit_amount: ScaledAmount::unpack(deposit_amount),
            deposit_index: f64::from_le_bytes(*deposit_index),
            borrow_amount: ScaledAmount::unpack(borrow_amount),
            borrow_index: f64::from_le_bytes(*borrow_index),
        }
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, USER_ASSET_INFO_LEN];
        let (pool_id, use_as_collateral, deposit_amount, deposit_index, borrow_amount, borrow_index) =
            mut_array_refs![dst, 1, 1, 16, 8, 16, 8];
        pool_id[0] = self.pool_id;
        use_as_collateral[0] = self.use_as_collateral;
        self.deposit_amount.pack(deposit_amount);
        *deposit_index = self.deposit_index.to_le_bytes();
        self.borrow_amount.pack(borrow_amount);
        *borrow_index = self.borrow_index.to_le_bytes();
    }
}
