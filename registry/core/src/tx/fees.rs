use crate::imports::*;

/// Linear fee policy: every operation pays `fee_rate` satoshis per byte of
/// its serialized transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePolicy {
    pub fee_rate: u64,
}

impl FeePolicy {
    pub fn new(fee_rate: u64) -> Self {
        Self { fee_rate }
    }

    pub fn fee(&self, serialized_size: u64) -> u64 {
        serialized_size.saturating_mul(self.fee_rate)
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee() {
        assert_eq!(FeePolicy::default().fee(250), 250);
        assert_eq!(FeePolicy::new(3).fee(250), 750);
        assert_eq!(FeePolicy::new(u64::MAX).fee(2), u64::MAX);
    }
}
