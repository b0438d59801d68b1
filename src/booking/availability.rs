use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::clients::{ReservationClient, TableClient};
use crate::domain::{TableAvailability, TableId};
use crate::error::BookingError;

/// The slot a guest asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u32,
}

/// Identifies one resolution; later requests get larger tokens.
pub type ResolutionToken = u64;

/// Candidate tables for a slot, in the repository's name order.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub token: ResolutionToken,
    pub request: SlotRequest,
    pub tables: Vec<TableAvailability>,
}

/// Works out which tables are free for a requested slot.
///
/// Each table is checked on its own task. A failed or timed-out check marks
/// only that table unavailable. Results from a resolution that has since been
/// superseded are recognisable through [`AvailabilityResolver::is_current`].
#[derive(Clone)]
pub struct AvailabilityResolver {
    tables: TableClient,
    reservations: ReservationClient,
    check_timeout: Duration,
    latest: Arc<AtomicU64>,
}

impl AvailabilityResolver {
    pub fn new(tables: TableClient, reservations: ReservationClient, check_timeout: Duration) -> Self {
        Self {
            tables,
            reservations,
            check_timeout,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether `token` belongs to the most recently started resolution.
    pub fn is_current(&self, token: ResolutionToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// Starts a resolution. The token is taken immediately, so a request made
    /// after this call supersedes it even if this future has not been polled.
    pub fn resolve(
        &self,
        request: SlotRequest,
    ) -> impl Future<Output = Result<Resolution, BookingError>> + Send + 'static {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let resolver = self.clone();
        async move { resolver.run(token, request).await }
    }

    #[instrument(
        name = "resolve_availability",
        skip(self, request),
        fields(date = %request.date, time = %request.time, party_size = request.party_size)
    )]
    async fn run(self, token: ResolutionToken, request: SlotRequest) -> Result<Resolution, BookingError> {
        let candidates = self
            .tables
            .list_active_tables(request.party_size)
            .await
            .map_err(|e| BookingError::ActorCommunicationError(e.to_string()))?;
        debug!(candidate_count = candidates.len(), "Candidate tables fetched");

        // One slot per candidate, written by index so completion order never
        // leaks into the output.
        let mut slots = vec![false; candidates.len()];
        let mut checks = JoinSet::new();
        for (index, table) in candidates.iter().enumerate() {
            let reservations = self.reservations.clone();
            let table_id = table.id.clone();
            let timeout = self.check_timeout;
            checks.spawn(async move {
                let outcome = check_table(&reservations, table_id, request.date, request.time, timeout).await;
                (index, outcome)
            });
        }

        while let Some(joined) = checks.join_next().await {
            match joined {
                Ok((index, Ok(available))) => slots[index] = available,
                Ok((_, Err(e))) => warn!(error = %e, "Treating table as unavailable"),
                Err(e) => warn!(error = %e, "Availability check task failed"),
            }
        }

        let tables: Vec<TableAvailability> = candidates
            .into_iter()
            .zip(slots)
            .map(|(table, available)| TableAvailability { table, available })
            .collect();
        info!(
            free = tables.iter().filter(|t| t.available).count(),
            total = tables.len(),
            "Availability resolved"
        );

        Ok(Resolution { token, request, tables })
    }
}

/// Single-table check with a deadline. Any failure comes back as
/// [`BookingError::AvailabilityCheck`].
pub async fn check_table(
    reservations: &ReservationClient,
    table_id: TableId,
    date: NaiveDate,
    time: NaiveTime,
    timeout: Duration,
) -> Result<bool, BookingError> {
    let check = reservations.check_table_availability(table_id.clone(), date, time);
    match tokio::time::timeout(timeout, check).await {
        Ok(Ok(available)) => Ok(available),
        Ok(Err(e)) => Err(BookingError::AvailabilityCheck {
            table_id,
            reason: e.to_string(),
        }),
        Err(_) => Err(BookingError::AvailabilityCheck {
            table_id,
            reason: format!("no answer within {}ms", timeout.as_millis()),
        }),
    }
}
