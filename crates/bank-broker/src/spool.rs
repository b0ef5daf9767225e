use bank_core::{ApprovalRequest, OperationType, RequestStatus};

/// Encodes the verification queue as the plaintext spool line format:
/// `<requestId>|<clientAccountId>|<operationType>|<amount>|<targetAccount>|<description>|<timestamp>|<status>`.
pub fn encode_spool(requests: &[ApprovalRequest]) -> String {
    let mut out = String::new();
    for r in requests {
        out.push_str(&format!(
            "{}|{}|{}|{}|{}|{}|{}|{}\n",
            r.request_id, r.client_account_id, r.operation_type.as_str(), r.amount, r.target_account, r.description, r.timestamp, r.status.as_str(),
        ));
    }
    out
}

pub fn parse_spool(data: &str) -> Vec<ApprovalRequest> {
    let mut requests = Vec::new();
    for line in data.lines() {
        if line.is_empty() {
            continue;
        }
        match parse_spool_line(line) {
            Ok(r) => requests.push(r),
            Err(e) => tracing::warn!(error = %e, line, "skipping malformed verification queue spool line"),
        }
    }
    requests
}

fn parse_spool_line(line: &str) -> Result<ApprovalRequest, String> {
    let mut fields = line.splitn(8, '|');
    let request_id = fields.next().ok_or("missing requestId")?.to_string();
    let client_account_id = fields.next().ok_or("missing clientAccountId")?.to_string();
    let operation_type_str = fields.next().ok_or("missing operationType")?;
    let amount: f64 = fields.next().ok_or("missing amount")?.parse().map_err(|_| "invalid amount")?;
    let target_account = fields.next().ok_or("missing targetAccount")?.to_string();
    let description = fields.next().ok_or("missing description")?.to_string();
    let timestamp: i64 = fields.next().ok_or("missing timestamp")?.parse().map_err(|_| "invalid timestamp")?;
    let status_str = fields.next().ok_or("missing status")?;

    let operation_type = OperationType::from_str_field(operation_type_str).ok_or("invalid operationType")?;
    let status = RequestStatus::from_str_field(status_str.trim()).ok_or("invalid status")?;

    Ok(ApprovalRequest {
        request_id,
        client_account_id,
        operation_type,
        amount,
        target_account,
        description,
        timestamp,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_parse_round_trips() {
        let requests = vec![ApprovalRequest {
            request_id: "REQ17000000001234".into(),
            client_account_id: "ACC1003".into(),
            operation_type: OperationType::Verification,
            amount: 0.0,
            target_account: "".into(),
            description: "Name: Sidorov".into(),
            timestamp: 1_700_000_000,
            status: RequestStatus::Pending,
        }];
        let encoded = encode_spool(&requests);
        let parsed = parse_spool(&encoded);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].client_account_id, "ACC1003");
        assert_eq!(parsed[0].status, RequestStatus::Pending);
    }

    #[test]
    fn malformed_line_is_skipped() {
        let parsed = parse_spool("garbage|too|few\n");
        assert!(parsed.is_empty());
    }
}
