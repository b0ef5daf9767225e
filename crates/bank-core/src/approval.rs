use serde::{Deserialize, Serialize};

use crate::types::{OperationType, RequestStatus, Timestamp};

/// A queued request awaiting an operator's decision. Which of the broker's
/// two queues a request belongs to is determined entirely by `operation_type`
/// (see [`OperationType::is_verification`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub request_id: String,
    pub client_account_id: String,
    pub operation_type: OperationType,
    pub amount: f64,
    pub target_account: String,
    pub description: String,
    pub timestamp: Timestamp,
    pub status: RequestStatus,
}
