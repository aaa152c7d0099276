//! Decoders for the accounts owned by the lending program.

mod asset_pool;
mod asset_price;
mod pool_list;
mod user_info;
mod user_pages_stats;

pub use {asset_pool::*, asset_price::*, pool_list::*, user_info::*, user_pages_stats::*};

use {
    crate::error::{DecodeError, EncodeError},
    std::{fmt, str::FromStr},
};

/// A record with a fixed little-endian layout.
///
/// Shaped after `solana_program::program_pack::Pack`, but lengths may depend
/// on a header inside the record and buffers longer than the record are
/// accepted.
pub trait AccountData: Sized {
    /// Bytes needed before anything else about the record can be read.
    const MIN_LEN: usize;

    /// Bytes the record occupies in `src`. Only called once `src` holds at
    /// least [`Self::MIN_LEN`] bytes.
    fn required_len(_src: &[u8]) -> usize {
        Self::MIN_LEN
    }

    /// Bytes [`Self::pack_into_slice`] writes for this value.
    fn packed_len(&self) -> usize {
        Self::MIN_LEN
    }

    /// Decodes from a buffer already known to be long enough.
    fn unpack_from_slice(src: &[u8]) -> Self;

    /// Fails when a count in the value does not fit its header field.
    fn check_packable(&self) -> Result<(), EncodeError> {
        Ok(())
    }

    /// Writes the wire form into the first [`Self::packed_len`] bytes of
    /// `dst`. Panics if `dst` is shorter. Counts are only exact once
    /// [`Self::check_packable`] has passed.
    fn pack_into_slice(&self, dst: &mut [u8]);

    /// Checks the length of `src`, then decodes. Trailing bytes are ignored.
    fn unpack(src: &[u8]) -> Result<Self, DecodeError> {
        check_len(src, Self::MIN_LEN)?;
        check_len(src, Self::required_len(src))?;
        Ok(Self::unpack_from_slice(src))
    }

    fn pack_to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        self.check_packable()?;
        let mut dst = vec![0u8; self.packed_len()];
        self.pack_into_slice(&mut dst);
        Ok(dst)
    }
}

pub(crate) fn check_count(count: usize, max: usize) -> Result<(), EncodeError> {
    if count > max {
        return Err(EncodeError::TooManyItems { count, max });
    }
    Ok(())
}

fn check_len(src: &[u8], expected: usize) -> Result<(), DecodeError> {
    if src.len() < expected {
        return Err(DecodeError::BufferTooShort {
            expected,
            actual: src.len(),
        });
    }
    Ok(())
}

/// Kinds of account [`decode`] understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccountShape {
    AssetPool,
    AssetPrice,
    PoolList,
    UserPagesStats,
    UserInfo,
}

impl AccountShape {
    pub const ALL: [AccountShape; 5] = [
        AccountShape::AssetPool,
        AccountShape::AssetPrice,
        AccountShape::PoolList,
        AccountShape::UserPagesStats,
        AccountShape::UserInfo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AccountShape::AssetPool => "asset-pool",
            AccountShape::AssetPrice => "asset-price",
            AccountShape::PoolList => "pool-list",
            AccountShape::UserPagesStats => "user-pages-stats",
            AccountShape::UserInfo => "user-info",
        }
    }
}

impl fmt::Display for AccountShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccountShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| format!("unknown account shape {:?}", s))
    }
}

/// A decoded account of any [`AccountShape`].
#[derive(Clone, Debug, PartialEq)]
pub enum AccountRecord {
    AssetPool(AssetPool),
    AssetPrice(AssetPrice),
    PoolList(PoolList),
    UserPagesStats(UserPagesStats),
    UserInfo(UserInfo),
}

/// Decodes `data` as an account of the given shape.
pub fn decode(shape: AccountShape, data: &[u8]) -> Result<AccountRecord, DecodeError> {
    Ok(match shape {
        AccountShape::AssetPool => AccountRecord::AssetPool(AssetPool::unpack(data)?),
        AccountShape::AssetPrice => AccountRecord::AssetPrice(AssetPrice::unpack(data)?),
        AccountShape::PoolList => AccountRecord::PoolList(PoolList::unpack(data)?),
        AccountShape::UserPagesStats => {
            AccountRecord::UserPagesStats(UserPagesStats::unpack(data)?)
        }
        AccountShape::UserInfo => AccountRecord::UserInfo(UserInfo::unpack(data)?),
    })
}
