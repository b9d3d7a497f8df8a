pub mod errors;
pub mod opcodes;
pub mod script_builder;
pub mod script_class;
pub mod standard;
pub mod vm_number;

use opcodes::{codes::OpReturn, parse_script};

pub use errors::TxScriptError;
pub use standard::*;

/// Maximum size of a locking or unlocking bytecode.
pub const MAX_SCRIPTS_SIZE: usize = 10_000;
/// Maximum size of a single pushed element.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 10_000;
/// Maximum size of an `OP_RETURN` output relayed by standard nodes.
pub const MAX_OP_RETURN_RELAY: usize = 223;

/// A script is provably unspendable when it starts with `OP_RETURN` or fails to parse.
pub fn is_unspendable(script: &[u8]) -> bool {
    parse_script(script).enumerate().any(|(index, op)| match op {
        Err(_) => true,
        Ok(op) => index == 0 && op.value == OpReturn,
    })
}
