//! Byte ceilings that keep evidence from being used to exhaust resources or
//! crowd transactions out of a block.

/// Maximum size of a single encoded evidence frame (type tag plus payload).
pub const MAX_EVIDENCE_BYTES: usize = 512;

/// Evidence may take at most a tenth of a block.
pub fn max_evidence_bytes_per_block(block_max_bytes: i64) -> i64 {
    block_max_bytes / 10
}

/// How many maximum-size evidence frames fit in the per-block evidence budget.
pub fn max_evidence_per_block(block_max_bytes: i64) -> i64 {
    max_evidence_bytes_per_block(block_max_bytes) / MAX_EVIDENCE_BYTES as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_block_budget_is_a_tenth() {
        assert_eq!(max_evidence_bytes_per_block(10_000), 1_000);
        assert_eq!(max_evidence_bytes_per_block(9), 0);
        assert_eq!(max_evidence_bytes_per_block(22_020_096), 2_202_009);
    }

    #[test]
    fn test_per_block_count() {
        assert_eq!(max_evidence_per_block(10_000), 1);
        assert_eq!(max_evidence_per_block(5_000), 0);
        assert_eq!(max_evidence_per_block(1_048_576), 204);
    }
}
