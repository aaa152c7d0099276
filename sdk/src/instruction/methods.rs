// wire form of the instruction enum: opcode, payload, then pool ids
use {
    super::{LendingInstruction, Opcode, SwapParams},
    crate::error::EncodeError,
    log::debug,
    num_traits::FromPrimitive,
};

impl LendingInstruction {
    /// Reads instruction data back. Admin opcodes, unknown opcodes, short
    /// payloads and trailing bytes are all rejected.
    pub fn unpack(input: &[u8]) -> Result<Self, EncodeError> {
        let (&tag, rest) = input.split_first().ok_or(EncodeError::InvalidInstruction)?;
        let opcode = Opcode::from_u8(tag).ok_or_else(|| {
            debug!("unknown opcode {:#04x}", tag);
            EncodeError::InvalidInstruction
        })?;
        let (instruction, rest) = match opcode {
            Opcode::AddUserAndDeposit => {
                let (page_id, rest) = Self::unpack_u16(rest)?;
                let (amount, rest) = Self::unpack_u64(rest)?;
                let (pool_id, rest) = Self::unpack_u8(rest)?;
                (
                    Self::AddUserAndDeposit {
                        page_id,
                        amount,
                        pool_id,
                    },
                    rest,
                )
            }
            Opcode::Deposit => {
                let (amount, rest) = Self::unpack_u64(rest)?;
                let (pool_id, rest) = Self::unpack_u8(rest)?;
                (Self::Deposit { amount, pool_id }, rest)
            }
            Opcode::Withdraw => {
                let (withdraw_all, rest) = Self::unpack_bool(rest)?;
                let (amount, rest) = Self::unpack_u64(rest)?;
                let (pool_id, rest) = Self::unpack_u8(rest)?;
                (
                    Self::Withdraw {
                        withdraw_all,
                        amount,
                        pool_id,
                    },
                    rest,
                )
            }
            Opcode::Borrow => {
                let (amount, rest) = Self::unpack_u64(rest)?;
                let (pool_id, rest) = Self::unpack_u8(rest)?;
                (Self::Borrow { amount, pool_id }, rest)
            }
            Opcode::Repay => {
                let (repay_all, rest) = Self::unpack_bool(rest)?;
                let (amount, rest) = Self::unpack_u64(rest)?;
                let (pool_id, rest) = Self::unpack_u8(rest)?;
                (
                    Self::Repay {
                        repay_all,
                        amount,
                        pool_id,
                    },
                    rest,
                )
            }
            Opcode::ExternLiquidate => {
                let (min_collateral_amount, rest) = Self::unpack_u64(rest)?;
                let (repaid_borrow_amount, rest) = Self::unpack_u64(rest)?;
                let (collateral_pool_id, rest) = Self::unpack_u8(rest)?;
                let (borrowed_pool_id, rest) = Self::unpack_u8(rest)?;
                (
                    Self::ExternLiquidate {
                        min_collateral_amount,
                        repaid_borrow_amount,
                        collateral_pool_id,
                        borrowed_pool_id,
                    },
                    rest,
                )
            }
            Opcode::SelfLiquidate => {
                let (params, rest) = Self::unpack_swap_params(rest)?;
                (Self::SelfLiquidate(params), rest)
            }
            Opcode::UpdateUserConfig => {
                let (self_liquidation_threshold, rest) = Self::unpack_u8(rest)?;
                let (post_self_liquidation_ratio_target, rest) = Self::unpack_u8(rest)?;
                let (post_extern_liquidation_ratio_target, rest) = Self::unpack_u8(rest)?;
                (
                    Self::UpdateUserConfig {
                        self_liquidation_threshold,
                        post_self_liquidation_ratio_target,
                        post_extern_liquidation_ratio_target,
                    },
                    rest,
                )
            }
            Opcode::MarginSwap => {
                let (params, rest) = Self::unpack_swap_params(rest)?;
                (Self::MarginSwap(params), rest)
            }
            Opcode::UpdateUserAssetConfig => {
                let (use_as_collateral, rest) = Self::unpack_bool(rest)?;
                let (pool_id, rest) = Self::unpack_u8(rest)?;
                (
                    Self::UpdateUserAssetConfig {
                        use_as_collateral,
                        pool_id,
                    },
                    rest,
                )
            }
            Opcode::WithdrawAndRemoveUser => {
                let (withdraw_all, rest) = Self::unpack_bool(rest)?;
                let (amount, rest) = Self::unpack_u64(rest)?;
                let (pool_id, rest) = Self::unpack_u8(rest)?;
                (
                    Self::WithdrawAndRemoveUser {
                        withdraw_all,
                        amount,
                        pool_id,
                    },
                    rest,
                )
            }
            Opcode::InitPoolList
            | Opcode::AddUsersPage
            | Opcode::AddPool
            | Opcode::UpdatePrice
            | Opcode::UpdatePythKey
            | Opcode::UpdatePoolRate => {
                debug!("admin instruction {:?} cannot be unpacked", opcode);
                return Err(EncodeError::InvalidInstruction);
            }
        };
        if !rest.is_empty() {
            debug!("{} trailing bytes after {:?}", rest.len(), opcode);
            return Err(EncodeError::InvalidInstruction);
        }
        Ok(instruction)
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(20);
        buf.push(self.opcode() as u8);
        match *self {
            Self::AddUserAndDeposit {
                page_id,
                amount,
                pool_id,
            } => {
                buf.extend_from_slice(&page_id.to_le_bytes());
                buf.extend_from_slice(&amount.to_le_bytes());
                buf.push(pool_id);
            }
            Self::Deposit { amount, pool_id } | Self::Borrow { amount, pool_id } => {
                buf.extend_from_slice(&amount.to_le_bytes());
                buf.push(pool_id);
            }
            Self::Withdraw {
                withdraw_all: all,
                amount,
                pool_id,
            }
            | Self::Repay {
                repay_all: all,
                amount,
                pool_id,
            }
            | Self::WithdrawAndRemoveUser {
                withdraw_all: all,
                amount,
                pool_id,
            } => {
                buf.push(all as u8);
                buf.extend_from_slice(&amount.to_le_bytes());
                buf.push(pool_id);
            }
            Self::ExternLiquidate {
                min_collateral_amount,
                repaid_borrow_amount,
                collateral_pool_id,
                borrowed_pool_id,
            } => {
                buf.extend_from_slice(&min_collateral_amount.to_le_bytes());
                buf.extend_from_slice(&repaid_borrow_amount.to_le_bytes());
                buf.push(collateral_pool_id);
                buf.push(borrowed_pool_id);
            }
            Self::SelfLiquidate(params) | Self::MarginSwap(params) => {
                buf.push(params.need_to_sell as u8);
                buf.push(params.need_to_buy as u8);
                buf.extend_from_slice(&params.sell_amount.to_le_bytes());
                buf.extend_from_slice(&params.buy_amount.to_le_bytes());
                buf.push(params.sell_pool_id);
                buf.push(params.buy_pool_id);
            }
            Self::UpdateUserConfig {
                self_liquidation_threshold,
                post_self_liquidation_ratio_target,
                post_extern_liquidation_ratio_target,
            } => {
                buf.push(self_liquidation_threshold);
                buf.push(post_self_liquidation_ratio_target);
                buf.push(post_extern_liquidation_ratio_target);
            }
            Self::UpdateUserAssetConfig {
                use_as_collateral,
                pool_id,
            } => {
                buf.push(use_as_collateral as u8);
                buf.push(pool_id);
            }
        }
        buf
    }

    fn unpack_swap_params(input: &[u8]) -> Result<(SwapParams, &[u8]), EncodeError> {
        let (need_to_sell, rest) = Self::unpack_bool(input)?;
        let (need_to_buy, rest) = Self::unpack_bool(rest)?;
        let (sell_amount, rest) = Self::unpack_u64(rest)?;
        let (buy_amount, rest) = Self::unpack_u64(rest)?;
        let (sell_pool_id, rest) = Self::unpack_u8(rest)?;
        let (buy_pool_id, rest) = Self::unpack_u8(rest)?;
        Ok((
            SwapParams {
                need_to_sell,
                need_to_buy,
                sell_amount,
                buy_amount,
                sell_pool_id,
                buy_pool_id,
            },
            rest,
        ))
    }

    fn unpack_u8(input: &[u8]) -> Result<(u8, &[u8]), EncodeError> {
        let (&value, rest) = input.split_first().ok_or_else(|| {
            debug!("u8 cannot be unpacked");
            EncodeError::InvalidInstruction
        })?;
        Ok((value, rest))
    }

    fn unpack_bool(input: &[u8]) -> Result<(bool, &[u8]), EncodeError> {
        match Self::unpack_u8(input)? {
            (0, rest) => Ok((false, rest)),
            (1, rest) => Ok((true, rest)),
            (value, _) => {
                debug!("flag {} cannot be unpacked as a bool", value);
                Err(EncodeError::InvalidInstruction)
            }
        }
    }

    fn unpack_u16(input: &[u8]) -> Result<(u16, &[u8]), EncodeError> {
        if input.len() < 2 {
            debug!("u16 cannot be unpacked");
            return Err(EncodeError::InvalidInstruction);
        }
        let (bytes, rest) = input.split_at(2);
        let value = bytes
            .try_into()
            .map(u16::from_le_bytes)
            .map_err(|_| EncodeError::InvalidInstruction)?;
        Ok((value, rest))
    }

    fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), EncodeError> {
        if input.len() < 8 {
            debug!("u64 cannot be unpacked");
            return Err(EncodeError::InvalidInstruction);
        }
        let (bytes, rest) = input.split_at(8);
        let value = bytes
            .try_into()
            .map(u64::from_le_bytes)
            .map_err(|_| EncodeError::InvalidInstruction)?;
        Ok((value, rest))
    }
}
