//! Structured results for bulk order operations
//!
//! Bulk operations never raise for a per-order failure: each order succeeds
//! or fails on its own and the caller always gets a summary back, even when
//! every order failed.

use serde::{Deserialize, Serialize};

/// One failed order inside a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchError {
    pub order_id: String,
    pub message: String,
}

/// Summary of a bulk order operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<BatchError>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, order_id: impl Into<String>, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(BatchError {
            order_id: order_id.into(),
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_result_accumulates() {
        let mut result = BatchResult::new();
        result.record_success();
        result.record_success();
        result.record_failure("order:1", "cannot transition from cancelled to confirmed");

        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].order_id, "order:1");
    }
}
