//! Client side of the Apricot lending program: account decoders, address
//! derivation, instruction builders and error messages.

pub mod config;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod math;
pub mod pda;
pub mod remote_error;
pub mod state;

pub use {
    config::{PoolEntry, PoolRegistry, PriceSource, ProtocolConfig},
    error::{ConfigError, DecodeError, DerivationError, EncodeError},
    remote_error::{explain, ProtocolError},
    state::{decode, AccountData, AccountRecord, AccountShape},
};

solana_program::declare_id!("HidHf4DzeZj6F7BL37WP6YnTuhh4c4DTsdSTmiFaDtSf");
