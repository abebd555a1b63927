use crate::api::{ApiClient, Transport};
use crate::error::DataFetchError;

/// Headline counts on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminSummary {
    pub total_students: usize,
    pub pending_requests: usize,
    pub schools: usize,
}

/// Fetch students, TC requests and schools concurrently and count them.
/// The first failure wins.
pub async fn load_admin_summary<T: Transport>(
    client: &ApiClient<T>,
) -> Result<AdminSummary, DataFetchError> {
    let (students, requests, schools) = futures::try_join!(
        client.fetch_students(),
        client.fetch_transfer_requests(),
        client.fetch_schools(),
    )?;

    Ok(AdminSummary {
        total_students: students.len(),
        pending_requests: requests.iter().filter(|r| r.status.is_pending()).count(),
        schools: schools.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::api::client::tests::FakeTransport;
    use crate::api::ApiError;
    use crate::error::Resource;

    #[tokio::test]
    async fn test_admin_summary_counts() {
        let fake = FakeTransport::default()
            .respond(Ok(json!({"students": [
                {"student_id": 1001, "name": "Rahul Kumar"},
                {"student_id": 1002, "name": "Priya Singh"}
            ]})))
            .respond(Ok(json!({"transferCertificates": [
                {"tc_id": 1, "student_id": 1001, "destination_school": "DPS", "reason": "r", "status": "pending"},
                {"tc_id": 2, "student_id": 1002, "destination_school": "DPS", "reason": "r", "status": "approved"}
            ]})))
            .respond(Ok(json!({"schools": [{"school_id": 501, "name": "PM Shri School"}]})));
        let client = ApiClient::new(fake.clone()).with_token("t1".to_string());

        let summary = load_admin_summary(&client).await.unwrap();
        assert_eq!(
            summary,
            AdminSummary {
                total_students: 2,
                pending_requests: 1,
                schools: 1
            }
        );
        assert_eq!(fake.calls(), 3);
    }

    #[tokio::test]
    async fn test_admin_summary_failure() {
        let fake = FakeTransport::default().respond(Err(ApiError::Unauthorized));
        let client = ApiClient::new(fake);
        let err = load_admin_summary(&client).await.unwrap_err();
        assert_eq!(err.resource, Resource::Students);
    }
}
