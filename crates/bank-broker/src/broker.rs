use std::fs;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use bank_core::{ApprovalRequest, BankError, BankResult, OperationType, RequestStatus, Timestamp};
use rand::Rng;

use crate::spool::{encode_spool, parse_spool};

struct QueueState {
    operation_queue: Vec<ApprovalRequest>,
    verification_queue: Vec<ApprovalRequest>,
}

/// Two FIFO queues (operation approvals, verification approvals) guarded by
/// one mutex and one condition variable, matching the concurrency model: a
/// client worker thread calls [`Broker::wait_for_decision`] and blocks until
/// an operator thread calls [`Broker::decide`], which broadcasts.
///
/// Only the verification queue is persisted to `spool_path` across
/// restarts; the operation queue is intentionally volatile.
pub struct Broker {
    state: Mutex<QueueState>,
    cv: Condvar,
    spool_path: PathBuf,
}

impl Broker {
    pub fn open(spool_path: impl Into<PathBuf>) -> Self {
        let spool_path = spool_path.into();
        let verification_queue = match fs::read_to_string(&spool_path) {
            Ok(data) => parse_spool(&data),
            Err(_) => {
                tracing::info!(path = %spool_path.display(), "verification queue spool not found, starting empty");
                Vec::new()
            }
        };
        Broker {
            state: Mutex::new(QueueState {
                operation_queue: Vec::new(),
                verification_queue,
            }),
            cv: Condvar::new(),
            spool_path,
        }
    }

    fn persist_spool(&self, state: &QueueState) {
        if let Some(parent) = self.spool_path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "failed to create verification queue spool directory");
                    return;
                }
            }
        }
        let encoded = encode_spool(&state.verification_queue);
        if let Err(e) = fs::write(&self.spool_path, encoded) {
            tracing::warn!(error = %e, path = %self.spool_path.display(), "failed to persist verification queue spool");
        }
    }

    fn queue_mut<'a>(state: &'a mut QueueState, kind: OperationType) -> &'a mut Vec<ApprovalRequest> {
        if kind.is_verification() {
            &mut state.verification_queue
        } else {
            &mut state.operation_queue
        }
    }

    /// Appends `request` to the queue selected by its `operation_type`.
    /// Verification requests are deduplicated: if a PENDING verification
    /// request already exists for the same client, the existing request is
    /// returned instead of creating a second one.
    pub fn submit(&self, request: ApprovalRequest) -> ApprovalRequest {
        let mut state = self.state.lock().unwrap();
        if request.operation_type.is_verification() {
            if let Some(existing) = state
                .verification_queue
                .iter()
                .find(|r| r.client_account_id == request.client_account_id && r.status == RequestStatus::Pending)
            {
                return existing.clone();
            }
        }
        let inserted = request.clone();
        Self::queue_mut(&mut state, request.operation_type).push(request);
        if inserted.operation_type.is_verification() {
            self.persist_spool(&state);
        }
        self.cv.notify_all();
        inserted
    }

    /// Snapshot of the queue selected by `kind`, in submission order with
    /// stable 0-based indices.
    pub fn list(&self, kind: OperationType) -> Vec<ApprovalRequest> {
        let state = self.state.lock().unwrap();
        if kind.is_verification() {
            state.verification_queue.clone()
        } else {
            state.operation_queue.clone()
        }
    }

    /// Sets the status of the request at `index` in the queue selected by
    /// `kind`. For a verification request decided APPROVED, also removes
    /// the entry (the caller is expected to have already flipped the
    /// client's status to Verified in the Store before calling this).
    pub fn decide(&self, kind: OperationType, index: usize, outcome: RequestStatus) -> BankResult<()> {
        let mut state = self.state.lock().unwrap();
        let queue = Self::queue_mut(&mut state, kind);
        let request = queue.get_mut(index).ok_or(BankError::RequestIndexOutOfRange(index))?;
        request.status = outcome;

        if kind.is_verification() && outcome == RequestStatus::Approved {
            queue.remove(index);
        }
        if kind.is_verification() {
            self.persist_spool(&state);
        }
        self.cv.notify_all();
        Ok(())
    }

    /// Blocks until the request's status becomes APPROVED (`true`) or
    /// REJECTED (`false`), until it disappears from the queue (treated as
    /// implicitly resolved, returns `true`), or until `timeout` elapses
    /// (returns `false`). Re-polls in slices no longer than one second.
    /// Removes the request from the queue before returning, if still
    /// present.
    pub fn wait_for_decision(&self, kind: OperationType, request_id: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        loop {
            let queue = Self::queue_mut(&mut state, kind);
            let position = queue.iter().position(|r| r.request_id == request_id);
            match position {
                None => return true,
                Some(idx) => match queue[idx].status {
                    RequestStatus::Approved => {
                        queue.remove(idx);
                        return true;
                    }
                    RequestStatus::Rejected => {
                        queue.remove(idx);
                        return false;
                    }
                    RequestStatus::Pending => {}
                },
            }

            let now = Instant::now();
            if now >= deadline {
                let queue = Self::queue_mut(&mut state, kind);
                if let Some(idx) = queue.iter().position(|r| r.request_id == request_id) {
                    queue.remove(idx);
                }
                return false;
            }
            let slice = Duration::from_secs(1).min(deadline - now);
            let (guard, _) = self.cv.wait_timeout(state, slice).unwrap();
            state = guard;
        }
    }

    /// Drops verification entries whose client no longer exists or is no
    /// longer PendingVerification, per `client_is_pending`.
    pub fn cleanup_verification_queue(&self, client_is_pending: impl Fn(&str) -> bool) {
        let mut state = self.state.lock().unwrap();
        state.verification_queue.retain(|r| client_is_pending(&r.client_account_id));
        self.persist_spool(&state);
    }

    pub fn generate_request_id(&self) -> String {
        let now: Timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64;
        let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
        format!("REQ{now}{suffix:04}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn sample_request(kind: OperationType, client: &str) -> ApprovalRequest {
        ApprovalRequest {
            request_id: format!("REQ{client}"),
            client_account_id: client.to_string(),
            operation_type: kind,
            amount: 1000.0,
            target_account: String::new(),
            description: String::new(),
            timestamp: 0,
            status: RequestStatus::Pending,
        }
    }

    #[test]
    fn submit_then_list_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let broker = Broker::open(dir.path().join("verification_queue.dat"));
        broker.submit(sample_request(OperationType::Withdraw, "ACC1001"));
        broker.submit(sample_request(OperationType::Transfer, "ACC1002"));
        let listed = broker.list(OperationType::Withdraw);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].client_account_id, "ACC1001");
    }

    #[test]
    fn verification_submit_dedups_pending_for_same_client() {
        let dir = tempfile::tempdir().unwrap();
        let broker = Broker::open(dir.path().join("verification_queue.dat"));
        let first = broker.submit(sample_request(OperationType::Verification, "ACC1003"));
        let second = broker.submit(sample_request(OperationType::Verification, "ACC1003"));
        assert_eq!(first.request_id, second.request_id);
        assert_eq!(broker.list(OperationType::Verification).len(), 1);
    }

    #[test]
    fn approved_wait_returns_true_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let broker = Arc::new(Broker::open(dir.path().join("verification_queue.dat")));
        broker.submit(sample_request(OperationType::Withdraw, "ACC1001"));
        let b2 = broker.clone();
        let handle = thread::spawn(move || b2.wait_for_decision(OperationType::Withdraw, "REQACC1001", Duration::from_secs(5)));
        thread::sleep(Duration::from_millis(50));
        broker.decide(OperationType::Withdraw, 0, RequestStatus::Approved).unwrap();
        assert!(handle.join().unwrap());
        assert!(broker.list(OperationType::Withdraw).is_empty());
    }

    #[test]
    fn rejected_wait_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let broker = Arc::new(Broker::open(dir.path().join("verification_queue.dat")));
        broker.submit(sample_request(OperationType::Transfer, "ACC1001"));
        let b2 = broker.clone();
        let handle = thread::spawn(move || b2.wait_for_decision(OperationType::Transfer, "REQACC1001", Duration::from_secs(5)));
        thread::sleep(Duration::from_millis(50));
        broker.decide(OperationType::Transfer, 0, RequestStatus::Rejected).unwrap();
        assert!(!handle.join().unwrap());
    }

    #[test]
    fn timeout_returns_false_and_drops_request() {
        let dir = tempfile::tempdir().unwrap();
        let broker = Broker::open(dir.path().join("verification_queue.dat"));
        broker.submit(sample_request(OperationType::Withdraw, "ACC1001"));
        let resolved = broker.wait_for_decision(OperationType::Withdraw, "REQACC1001", Duration::from_millis(50));
        assert!(!resolved);
        assert!(broker.list(OperationType::Withdraw).is_empty());
    }

    #[test]
    fn verify_approved_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let broker = Broker::open(dir.path().join("verification_queue.dat"));
        broker.submit(sample_request(OperationType::Verification, "ACC1003"));
        broker.decide(OperationType::Verification, 0, RequestStatus::Approved).unwrap();
        assert!(broker.list(OperationType::Verification).is_empty());
    }

    #[test]
    fn verification_queue_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let spool = dir.path().join("verification_queue.dat");
        {
            let broker = Broker::open(&spool);
            broker.submit(sample_request(OperationType::Verification, "ACC1003"));
        }
        let reopened = Broker::open(&spool);
        assert_eq!(reopened.list(OperationType::Verification).len(), 1);
    }

    #[test]
    fn operation_queue_does_not_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let spool = dir.path().join("verification_queue.dat");
        {
            let broker = Broker::open(&spool);
            broker.submit(sample_request(OperationType::Withdraw, "ACC1001"));
        }
        let reopened = Broker::open(&spool);
        assert!(reopened.list(OperationType::Withdraw).is_empty());
    }
}
