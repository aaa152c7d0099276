//! Errors raised locally while decoding accounts, deriving addresses and
//! encoding instructions. Failures reported by the on-chain program live in
//! [`crate::remote_error`].

use {
    solana_program::pubkey::{Pubkey, PubkeyError},
    thiserror::Error,
};

/// Account data could not be decoded into the requested record.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// The buffer ends before the last byte the record needs.
    #[error("Account data too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },
}

/// An address could not be derived.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DerivationError {
    /// The mint is not registered in the pool registry.
    #[error("Mint {0} is not registered with any pool")]
    UnknownMint(Pubkey),
    /// The runtime rejected the seeds.
    #[error("Invalid seeds: {0}")]
    InvalidSeed(#[from] PubkeyError),
    /// The string is not a `POOL__xy` pool seed.
    #[error("Malformed pool seed {0:?}")]
    MalformedPoolSeed(String),
    /// A bounded market vault search ran out of attempts.
    #[error("No off-curve market vault found after {attempts} attempts")]
    SearchExhausted { attempts: usize },
}

/// An instruction could not be built, or instruction data could not be read
/// back.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EncodeError {
    /// The mint is not registered in the pool registry.
    #[error("Mint {0} is not registered with any pool")]
    UnknownMint(Pubkey),
    /// The wallet has no users page yet.
    #[error("Page id {0} is not assigned, user has not been added yet")]
    InvalidPageId(u16),
    /// Instruction data is truncated or carries an unknown opcode.
    #[error("Failed to unpack instruction data")]
    InvalidInstruction,
    /// An account record holds more items than its header can count.
    #[error("{count} items do not fit a header counting at most {max}")]
    TooManyItems { count: usize, max: usize },
    /// An account address could not be derived.
    #[error(transparent)]
    Derivation(DerivationError),
}

impl From<DerivationError> for EncodeError {
    fn from(e: DerivationError) -> Self {
        match e {
            DerivationError::UnknownMint(mint) => EncodeError::UnknownMint(mint),
            e => EncodeError::Derivation(e),
        }
    }
}

/// A protocol configuration is inconsistent or malformed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("Pool id {0} is registered more than once")]
    DuplicatePoolId(u8),
    #[error("Mint {0} is registered more than once")]
    DuplicateMint(Pubkey),
    #[error("No pool with id {0} is registered")]
    UnknownPoolId(u8),
    #[error("Invalid public key {0:?}")]
    InvalidPubkey(String),
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    #[test]
    fn test_unknown_mint_keeps_its_kind_across_layers() {
        let mint = Pubkey::new_unique();
        let e: EncodeError = DerivationError::UnknownMint(mint).into();
        assert_eq!(e, EncodeError::UnknownMint(mint));

        let e: EncodeError = DerivationError::SearchExhausted { attempts: 3 }.into();
        assert_matches!(
            e,
            EncodeError::Derivation(DerivationError::SearchExhausted { attempts: 3 })
        );
    }

    #[test]
    fn test_buffer_too_short_message() {
        let e = DecodeError::BufferTooShort {
            expected: 156,
            actual: 155,
        };
        assert_eq!(
            e.to_string(),
            "Account data too short: expected at least 156 bytes, got 155"
        );
    }
}
