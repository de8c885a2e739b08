use chrono::Utc;
use tracing::warn;

use crate::dispatch::DispatchReport;
use crate::redis::GuestRepository;

/// Mark every guest with an acknowledged send as notified.
///
/// Only `Sent` outcomes are reconciled: a guest whose send failed keeps
/// `notified = false`, so a later run can target them again. Store write
/// failures are logged and skipped — one bad record must not abort the pass.
/// Returns the number of records updated.
pub async fn reconcile_notified(repo: &GuestRepository, report: &DispatchReport) -> usize {
    let now = Utc::now();
    let mut updated = 0;

    for entry in report.outcomes.iter().filter(|o| o.outcome.is_sent()) {
        match repo.mark_notified(&entry.guest_id, now).await {
            Ok(()) => updated += 1,
            Err(e) => {
                warn!(guest_id = %entry.guest_id, error = %e, "Failed to mark guest notified");
            }
        }
    }

    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{GuestOutcome, SendOutcome};
    use crate::models::Guest;

    #[tokio::test]
    #[ignore] // Requires a local Redis
    async fn test_only_acknowledged_sends_are_marked() {
        let config = crate::config::Config {
            server_host: "localhost".to_string(),
            server_port: 8080,
            redis_url: std::env::var("TEST_REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            emailjs_service_id: "service".to_string(),
            emailjs_template_id: "template".to_string(),
            emailjs_public_key: "key".to_string(),
            invite_base_url: "http://localhost:3000".to_string(),
            dispatch_batch_size: 3,
            dispatch_batch_delay_secs: 2,
            dispatch_send_timeout_secs: 30,
        };
        let repo = GuestRepository::new(crate::redis::create_pool(&config).expect("Should create pool"));

        let sent_guest = Guest::new("Sent".to_string(), Some("sent@example.com".to_string()));
        let failed_guest = Guest::new("Failed".to_string(), Some("failed@example.com".to_string()));
        repo.create_guest(&sent_guest).await.expect("Should create");
        repo.create_guest(&failed_guest).await.expect("Should create");

        let report = DispatchReport {
            outcomes: vec![
                GuestOutcome {
                    guest_id: sent_guest.id.clone(),
                    outcome: SendOutcome::Sent,
                },
                GuestOutcome {
                    guest_id: failed_guest.id.clone(),
                    outcome: SendOutcome::Failed("relay rejected the message".to_string()),
                },
            ],
            sent: 1,
        };

        let updated = reconcile_notified(&repo, &report).await;
        assert_eq!(updated, 1);

        let sent_after = repo
            .get_guest(&sent_guest.id)
            .await
            .expect("Should read")
            .expect("Should exist");
        let failed_after = repo
            .get_guest(&failed_guest.id)
            .await
            .expect("Should read")
            .expect("Should exist");

        assert!(sent_after.notified);
        assert!(sent_after.notified_at.is_some());
        assert!(!failed_after.notified);

        repo.delete_guest(&sent_guest.id).await.expect("Should delete");
        repo.delete_guest(&failed_guest.id).await.expect("Should delete");
    }
}
