use super::CovenantArtifact;
use crate::imports::*;
use bitcann_addresses::Version;
use bitcann_hashes::hash256;
use bitcann_txscript::{pay_to_script_hash_script, pay_to_script_hash_signature_script, script_builder::ScriptBuilder};

/// A constructor or function argument as the contracts receive it on the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    Int(i64),
    Bytes(Vec<u8>),
    Bool(bool),
}

impl Argument {
    fn push(&self, builder: &mut ScriptBuilder) -> Result<()> {
        match self {
            Argument::Int(value) => builder.add_i64(*value)?,
            Argument::Bytes(bytes) => builder.add_data(bytes)?,
            Argument::Bool(value) => builder.add_i64(*value as i64)?,
        };
        Ok(())
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Int(value)
    }
}

impl From<Vec<u8>> for Argument {
    fn from(bytes: Vec<u8>) -> Self {
        Argument::Bytes(bytes)
    }
}

/// Which covenant function an input unlocks with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unlock {
    /// The single entry point of the registry covenants.
    Call(Vec<Argument>),
    /// The name covenant's authorization path; `0` spends the internal
    /// authorization token, `1` the external one.
    UseAuth(i64),
}

impl Unlock {
    pub const CALL: &'static str = "call";
    pub const USE_AUTH: &'static str = "useAuth";

    pub fn function(&self) -> &'static str {
        match self {
            Unlock::Call(_) => Self::CALL,
            Unlock::UseAuth(_) => Self::USE_AUTH,
        }
    }

    fn arguments(&self) -> Vec<Argument> {
        match self {
            Unlock::Call(arguments) => arguments.clone(),
            Unlock::UseAuth(index) => vec![Argument::Int(*index)],
        }
    }
}

fn push_reversed(builder: &mut ScriptBuilder, arguments: &[Argument]) -> Result<()> {
    arguments.iter().rev().try_for_each(|argument| argument.push(builder))
}

/// A covenant instantiated with its constructor arguments.
///
/// The redeem script is the constructor arguments pushed in reverse order
/// followed by the artifact bytecode; the covenant is locked by the P2SH32 of
/// that redeem script.
#[derive(Clone, Debug)]
pub struct Covenant {
    artifact: Arc<CovenantArtifact>,
    redeem_script: Vec<u8>,
    locking_bytecode: LockingBytecode,
}

impl Covenant {
    pub fn new(artifact: Arc<CovenantArtifact>, arguments: Vec<Argument>) -> Result<Self> {
        if artifact.constructor_inputs.len() != arguments.len() {
            return Err(Error::ArtifactArguments {
                contract: artifact.contract_name.clone(),
                expected: artifact.constructor_inputs.len(),
                actual: arguments.len(),
            });
        }
        let mut builder = ScriptBuilder::new();
        push_reversed(&mut builder, &arguments)?;
        let redeem_script = builder.add_bytecode(&artifact.bytecode_bytes()?)?.drain();
        let locking_bytecode = pay_to_script_hash_script(&redeem_script);
        Ok(Self { artifact, redeem_script, locking_bytecode })
    }

    pub fn name(&self) -> &str {
        &self.artifact.contract_name
    }

    pub fn artifact(&self) -> &Arc<CovenantArtifact> {
        &self.artifact
    }

    pub fn redeem_script(&self) -> &[u8] {
        &self.redeem_script
    }

    pub fn locking_bytecode(&self) -> &LockingBytecode {
        &self.locking_bytecode
    }

    /// Token-aware P2SH32 address of the covenant.
    pub fn address(&self, prefix: Prefix) -> Address {
        Address::new(prefix, Version::TokenP2sh32, hash256(&self.redeem_script).as_bytes())
    }

    /// Function arguments in reverse order, the function selector when the
    /// covenant has more than one function, then the redeem script.
    pub fn unlocking_bytecode(&self, unlock: &Unlock) -> Result<Vec<u8>> {
        let index = self.artifact.function_index(unlock.function())?;
        let arguments = unlock.arguments();
        let expected = self.artifact.abi[index].inputs.len();
        if expected != arguments.len() {
            return Err(Error::ArtifactArguments {
                contract: format!("{}.{}", self.name(), unlock.function()),
                expected,
                actual: arguments.len(),
            });
        }
        let mut builder = ScriptBuilder::new();
        push_reversed(&mut builder, &arguments)?;
        if self.artifact.abi.len() > 1 {
            builder.add_i64(index as i64)?;
        }
        Ok(pay_to_script_hash_signature_script(self.redeem_script.clone(), builder.drain())?)
    }
}

impl PartialEq for Covenant {
    fn eq(&self, other: &Self) -> bool {
        self.redeem_script == other.redeem_script
    }
}

impl Eq for Covenant {}
