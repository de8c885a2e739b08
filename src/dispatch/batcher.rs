use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::dispatch::sender::InvitationSender;
use crate::dispatch::{DispatchReport, GuestOutcome};
use crate::mail::InvitationMailer;
use crate::models::Guest;

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Messages sent concurrently per batch
    pub batch_size: usize,
    /// Fixed pause between batches; the relay throttles bursts beyond a few
    /// requests per short interval
    pub batch_delay: Duration,
    /// Per-send ceiling; a hung relay call counts as a failure
    pub send_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            batch_delay: Duration::from_secs(2),
            send_timeout: Duration::from_secs(30),
        }
    }
}

/// Drives a guest list through the relay in rate-limited batches
///
/// Batches run strictly in input order; sends within a batch fan out
/// concurrently and all settle before the next batch starts. Individual
/// failures lower the total and nothing else — the run itself always
/// completes unless cancelled.
pub struct BatchDispatcher<'a> {
    mailer: &'a dyn InvitationMailer,
    config: DispatcherConfig,
}

impl<'a> BatchDispatcher<'a> {
    pub fn new(mailer: &'a dyn InvitationMailer, config: DispatcherConfig) -> Self {
        Self { mailer, config }
    }

    /// Send invitations to `guests`, invoking `on_progress` with the running
    /// sent count once per settled batch.
    ///
    /// Input is assumed pre-filtered for eligibility. Guest order determines
    /// batch assignment; completion order within a batch is unspecified.
    /// Cancellation is honored between batches and during the inter-batch
    /// delay — outcomes already settled are kept in the report.
    pub async fn dispatch(
        &self,
        guests: &[Guest],
        base_url: &str,
        cancel: &CancellationToken,
        mut on_progress: impl FnMut(usize),
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        if guests.is_empty() {
            return report;
        }

        let batch_size = self.config.batch_size.max(1);
        let total_batches = guests.len().div_ceil(batch_size);
        let sender = InvitationSender::new(self.mailer, base_url, self.config.send_timeout);

        for (batch_index, batch) in guests.chunks(batch_size).enumerate() {
            if cancel.is_cancelled() {
                info!(batch = batch_index, sent = report.sent, "Dispatch cancelled");
                break;
            }

            let outcomes = join_all(batch.iter().map(|guest| sender.send(guest))).await;

            let batch_sent = outcomes.iter().filter(|o| o.is_sent()).count();
            report.sent += batch_sent;
            report
                .outcomes
                .extend(batch.iter().zip(outcomes).map(|(guest, outcome)| {
                    GuestOutcome {
                        guest_id: guest.id.clone(),
                        outcome,
                    }
                }));

            debug!(
                batch = batch_index,
                batch_sent,
                total_sent = report.sent,
                "Batch settled"
            );
            on_progress(report.sent);

            if batch_index + 1 < total_batches {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!(sent = report.sent, "Dispatch cancelled during batch delay");
                        break;
                    }
                    _ = tokio::time::sleep(self.config.batch_delay) => {}
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    use super::*;
    use crate::dispatch::test_support::FakeMailer;
    use crate::dispatch::SendOutcome;

    const BASE_URL: &str = "http://localhost:3000";

    fn guests(n: usize) -> Vec<Guest> {
        (0..n)
            .map(|i| {
                Guest::new(
                    format!("Guest {}", i),
                    Some(format!("guest{}@example.com", i)),
                )
            })
            .collect()
    }

    fn addresses(guests: &[Guest]) -> HashSet<String> {
        guests.iter().filter_map(|g| g.email.clone()).collect()
    }

    #[tokio::test]
    async fn test_empty_list_returns_immediately() {
        let mailer = FakeMailer::accepting();
        let dispatcher = BatchDispatcher::new(&mailer, DispatcherConfig::default());
        let cancel = CancellationToken::new();
        let mut progress: Vec<usize> = Vec::new();

        let report = dispatcher
            .dispatch(&[], BASE_URL, &cancel, |sent| progress.push(sent))
            .await;

        assert_eq!(report.sent, 0);
        assert!(report.outcomes.is_empty());
        assert!(progress.is_empty());
        assert!(mailer.recipients().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_seven_guests_settle_in_three_batches() {
        let mailer = FakeMailer::accepting();
        let dispatcher = BatchDispatcher::new(&mailer, DispatcherConfig::default());
        let list = guests(7);
        let cancel = CancellationToken::new();
        let mut progress: Vec<usize> = Vec::new();

        let started = tokio::time::Instant::now();
        let report = dispatcher
            .dispatch(&list, BASE_URL, &cancel, |sent| progress.push(sent))
            .await;

        assert_eq!(report.sent, 7);
        assert_eq!(progress, vec![3, 6, 7]);

        // Two inter-batch delays, not three
        assert_eq!(started.elapsed(), Duration::from_secs(4));

        // Guest i always lands in batch i / 3, whatever order the batch
        // members complete in
        let recipients = mailer.recipients();
        assert_eq!(recipients.len(), 7);
        let as_set = |s: &[String]| s.iter().cloned().collect::<HashSet<_>>();
        assert_eq!(as_set(&recipients[0..3]), addresses(&list[0..3]));
        assert_eq!(as_set(&recipients[3..6]), addresses(&list[3..6]));
        assert_eq!(as_set(&recipients[6..7]), addresses(&list[6..7]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_systemic_failure_still_reports_every_batch() {
        let mailer = FakeMailer::rejecting_all();
        let dispatcher = BatchDispatcher::new(&mailer, DispatcherConfig::default());
        let list = guests(7);
        let cancel = CancellationToken::new();
        let mut progress: Vec<usize> = Vec::new();

        let report = dispatcher
            .dispatch(&list, BASE_URL, &cancel, |sent| progress.push(sent))
            .await;

        assert_eq!(report.sent, 0);
        assert_eq!(report.failed(), 7);
        assert_eq!(progress, vec![0, 0, 0]);
        assert!(report
            .outcomes
            .iter()
            .all(|o| matches!(o.outcome, SendOutcome::Failed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_counts_only_acknowledged_sends() {
        let mailer = FakeMailer::rejecting(&["guest1@example.com", "guest3@example.com"]);
        let dispatcher = BatchDispatcher::new(&mailer, DispatcherConfig::default());
        let list = guests(5);
        let cancel = CancellationToken::new();
        let mut progress: Vec<usize> = Vec::new();

        let report = dispatcher
            .dispatch(&list, BASE_URL, &cancel, |sent| progress.push(sent))
            .await;

        assert_eq!(report.sent, 3);
        assert_eq!(report.failed(), 2);
        assert_eq!(progress, vec![2, 3]);

        for entry in &report.outcomes {
            let failed = entry.guest_id == list[1].id || entry.guest_id == list[3].id;
            assert_eq!(entry.outcome.is_sent(), !failed);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_between_batches_stops_the_next_batch() {
        let mailer = FakeMailer::accepting();
        let dispatcher = BatchDispatcher::new(&mailer, DispatcherConfig::default());
        let list = guests(6);
        let cancel = CancellationToken::new();
        let mut progress: Vec<usize> = Vec::new();

        let report = dispatcher
            .dispatch(&list, BASE_URL, &cancel, |sent| {
                progress.push(sent);
                cancel.cancel();
            })
            .await;

        assert_eq!(report.sent, 3);
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(progress, vec![3]);
        assert_eq!(mailer.recipients().len(), 3);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_sends_nothing() {
        let mailer = FakeMailer::accepting();
        let dispatcher = BatchDispatcher::new(&mailer, DispatcherConfig::default());
        let list = guests(3);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut progress: Vec<usize> = Vec::new();

        let report = dispatcher
            .dispatch(&list, BASE_URL, &cancel, |sent| progress.push(sent))
            .await;

        assert_eq!(report.sent, 0);
        assert!(report.outcomes.is_empty());
        assert!(progress.is_empty());
        assert!(mailer.recipients().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_short_batch_skips_the_delay() {
        let mailer = FakeMailer::accepting();
        let dispatcher = BatchDispatcher::new(&mailer, DispatcherConfig::default());
        let list = guests(2);
        let cancel = CancellationToken::new();
        let mut progress: Vec<usize> = Vec::new();

        let started = tokio::time::Instant::now();
        let report = dispatcher
            .dispatch(&list, BASE_URL, &cancel, |sent| progress.push(sent))
            .await;

        assert_eq!(report.sent, 2);
        assert_eq!(progress, vec![2]);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
