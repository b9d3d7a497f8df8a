use crate::imports::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiInput {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiFunction {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiInput>,
}

/// A compiled covenant: its constructor signature, unlock functions and the
/// bytecode that follows the constructor argument pushes in the redeem script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CovenantArtifact {
    pub contract_name: String,
    #[serde(default)]
    pub constructor_inputs: Vec<AbiInput>,
    pub abi: Vec<AbiFunction>,
    /// Hex encoded.
    pub bytecode: String,
}

impl CovenantArtifact {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn bytecode_bytes(&self) -> Result<Vec<u8>> {
        if self.bytecode.is_empty() || self.bytecode.len() % 2 != 0 {
            return Err(Error::InvalidBytecode(self.contract_name.clone()));
        }
        let mut bytes = vec![0u8; self.bytecode.len() / 2];
        faster_hex::hex_decode(self.bytecode.as_bytes(), &mut bytes)?;
        Ok(bytes)
    }

    /// Index of the function named `function`, used as the selector pushed by
    /// multi-function covenants.
    pub fn function_index(&self, function: &str) -> Result<usize> {
        self.abi
            .iter()
            .position(|abi| abi.name == function)
            .ok_or_else(|| Error::UnknownFunction { contract: self.contract_name.clone(), function: function.to_string() })
    }
}

/// The nine artifacts a registry deployment is made of.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSet {
    pub registry: CovenantArtifact,
    pub auction: CovenantArtifact,
    pub bid: CovenantArtifact,
    pub factory: CovenantArtifact,
    pub auction_name_enforcer: CovenantArtifact,
    pub auction_conflict_resolver: CovenantArtifact,
    pub name_ownership_guard: CovenantArtifact,
    pub accumulator: CovenantArtifact,
    pub name: CovenantArtifact,
}

impl ArtifactSet {
    /// Loads a JSON object keyed by `registry`, `auction`, `bid`, `factory`,
    /// `auctionNameEnforcer`, `auctionConflictResolver`, `nameOwnershipGuard`,
    /// `accumulator` and `name`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
