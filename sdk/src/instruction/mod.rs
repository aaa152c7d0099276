pub mod builder;
mod lending_instruction;
mod methods;

pub use {builder::*, lending_instruction::*};
