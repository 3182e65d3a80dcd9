//! Queue loading and confidence filtering.

use pairdeck_backend::ReviewBackend;
use pairdeck_types::{ConfidenceFilter, MatchCandidate, SourceFilter};

/// Fetch candidates in source order.
///
/// Transport failures degrade to an empty queue and are only logged.
pub async fn fetch(backend: &dyn ReviewBackend, filter: SourceFilter) -> Vec<MatchCandidate> {
    match backend.fetch_queue(filter).await {
        Ok(candidates) => candidates,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load review queue");
            Vec::new()
        }
    }
}

/// Candidates admitted by `filter`, in their original relative order.
#[must_use]
pub fn apply_filter(all: &[MatchCandidate], filter: ConfidenceFilter) -> Vec<MatchCandidate> {
    all.iter()
        .filter(|candidate| filter.admits(candidate))
        .cloned()
        .collect()
}

/// Per-filter pending counts shown on the filter tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub all: usize,
    pub high: usize,
    pub low: usize,
}

impl FilterCounts {
    #[must_use]
    pub fn tally(all: &[MatchCandidate]) -> Self {
        let high = all
            .iter()
            .filter(|candidate| ConfidenceFilter::High.admits(candidate))
            .count();
        Self {
            all: all.len(),
            high,
            low: all.len() - high,
        }
    }

    #[must_use]
    pub fn get(&self, filter: ConfidenceFilter) -> usize {
        match filter {
            ConfidenceFilter::All => self.all,
            ConfidenceFilter::High => self.high,
            ConfidenceFilter::Low => self.low,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use pairdeck_types::{CandidateId, Confidence, Endpoint, MatchCandidate};

    pub(crate) fn candidate(id: &str, confidence: f64) -> MatchCandidate {
        let at = |secs: i64| Utc.timestamp_opt(1_714_557_600 + secs, 0).unwrap();
        MatchCandidate {
            id: CandidateId::new(id),
            endpoint_a: Endpoint {
                source_id: "cam-1".into(),
                track_id: format!("{id}-a"),
                first_seen: at(0),
                last_seen: at(12),
                classification: None,
                crop_ref: None,
            },
            endpoint_b: Endpoint {
                source_id: "cam-2".into(),
                track_id: format!("{id}-b"),
                first_seen: at(90),
                last_seen: at(101),
                classification: None,
                crop_ref: None,
            },
            confidence: Confidence::new(confidence),
            match_method: None,
            entity_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures_util::FutureExt;
    use futures_util::future::{self, BoxFuture};
    use pairdeck_backend::{BackendError, SubmitAck};
    use pairdeck_types::{CandidateId, EndpointSide, Verdict};

    use super::fixtures::candidate;
    use super::*;

    fn ids(queue: &[MatchCandidate]) -> Vec<&str> {
        queue.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn filter_preserves_relative_order() {
        let all = vec![
            candidate("a", 0.2),
            candidate("b", 0.95),
            candidate("c", 0.7),
            candidate("d", 0.69),
            candidate("e", 0.71),
        ];
        assert_eq!(ids(&apply_filter(&all, ConfidenceFilter::All)), ["a", "b", "c", "d", "e"]);
        assert_eq!(ids(&apply_filter(&all, ConfidenceFilter::High)), ["b", "c", "e"]);
        assert_eq!(ids(&apply_filter(&all, ConfidenceFilter::Low)), ["a", "d"]);
    }

    #[test]
    fn filter_of_empty_is_empty() {
        assert!(apply_filter(&[], ConfidenceFilter::High).is_empty());
    }

    #[test]
    fn counts_split_on_threshold() {
        let all = vec![candidate("a", 0.9), candidate("b", 0.3), candidate("c", 0.7)];
        let counts = FilterCounts::tally(&all);
        assert_eq!(counts, FilterCounts { all: 3, high: 2, low: 1 });
        assert_eq!(counts.get(ConfidenceFilter::Low), 1);
    }

    /// Backend whose queue call returns a canned result once.
    struct CannedQueue(Mutex<Option<Result<Vec<MatchCandidate>, BackendError>>>);

    impl ReviewBackend for CannedQueue {
        fn fetch_queue(
            &self,
            _filter: SourceFilter,
        ) -> BoxFuture<'static, Result<Vec<MatchCandidate>, BackendError>>
        {
            let result = self.0.lock().unwrap().take().unwrap_or(Ok(Vec::new()));
            future::ready(result).boxed()
        }

        fn submit_decision(
            &self,
            _id: CandidateId,
            _verdict: Verdict,
        ) -> BoxFuture<'static, Result<SubmitAck, BackendError>> {
            future::ready(Ok(SubmitAck { success: true })).boxed()
        }

        fn fetch_crop(
            &self,
            _id: CandidateId,
            _side: EndpointSide,
        ) -> BoxFuture<'static, Result<Vec<u8>, BackendError>> {
            future::ready(Ok(Vec::new())).boxed()
        }
    }

    #[tokio::test]
    async fn fetch_returns_source_order() {
        let backend = CannedQueue(Mutex::new(Some(Ok(vec![
            candidate("z", 0.1),
            candidate("y", 0.9),
        ]))));
        let queue = fetch(&backend, SourceFilter::default()).await;
        assert_eq!(ids(&queue), ["z", "y"]);
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_empty() {
        let backend = CannedQueue(Mutex::new(Some(Err(BackendError::Status {
            status: 502,
            body: "bad gateway".into(),
        }))));
        assert!(fetch(&backend, SourceFilter::default()).await.is_empty());
    }
}
