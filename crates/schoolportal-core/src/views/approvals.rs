use crate::models::{TcStatus, TransferCertificate};

/// Transfer certificate requests as shown on the approval screen: pending
/// requests first, newest application first within each group.
#[derive(Debug, Clone, Default)]
pub struct ApprovalQueue {
    requests: Vec<TransferCertificate>,
}

impl ApprovalQueue {
    pub fn new(mut requests: Vec<TransferCertificate>) -> Self {
        requests.sort_by(|a, b| {
            b.status
                .is_pending()
                .cmp(&a.status.is_pending())
                .then_with(|| b.application_date.cmp(&a.application_date))
        });
        Self { requests }
    }

    pub fn requests(&self) -> &[TransferCertificate] {
        &self.requests
    }

    pub fn get(&self, index: usize) -> Option<&TransferCertificate> {
        self.requests.get(index)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn count(&self, status: TcStatus) -> usize {
        self.requests.iter().filter(|r| r.status == status).count()
    }

    pub fn pending_count(&self) -> usize {
        self.count(TcStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tc(id: &str, status: TcStatus, applied: &str) -> TransferCertificate {
        TransferCertificate {
            tc_id: id.to_string(),
            student_id: "1001".to_string(),
            student_name: None,
            application_date: Some(applied.to_string()),
            destination_school: "Delhi Public School".to_string(),
            reason: "Relocation".to_string(),
            status,
            comments: None,
            processed_by: None,
            processed_date: None,
        }
    }

    #[test]
    fn test_pending_first_then_newest() {
        let queue = ApprovalQueue::new(vec![
            tc("103", TcStatus::Approved, "2025-02-20"),
            tc("101", TcStatus::Pending, "2025-02-28"),
            tc("104", TcStatus::Rejected, "2025-02-25"),
            tc("102", TcStatus::Pending, "2025-03-01"),
        ]);
        let ids: Vec<&str> = queue.requests().iter().map(|r| r.tc_id.as_str()).collect();
        assert_eq!(ids, vec!["102", "101", "104", "103"]);
        assert_eq!(queue.pending_count(), 2);
        assert_eq!(queue.count(TcStatus::Approved), 1);
    }
}
