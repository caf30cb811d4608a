use async_trait::async_trait;
use color_eyre::eyre::bail;
use futures::StreamExt;
use log::{error, info, warn};
use tokio::sync::watch;
use crate::address::{AddressRecord, Coordinates};

mod nominatim;

pub use nominatim::NominatimClient;

/// Address-in, coordinates-out lookup service.
#[async_trait]
pub trait Geocoder {
    /// `Ok(None)` means the service answered but had no match.
    async fn lookup(&self, query: &str) -> color_eyre::Result<Option<Coordinates>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Resolved(Coordinates),
    NoMatch,
    Failed(String),
}

/// Result of one pipeline run. `outcomes[i]` belongs to `records[i]`.
#[derive(Debug)]
pub struct BatchReport {
    pub records: Vec<AddressRecord>,
    pub outcomes: Vec<LookupOutcome>,
}

impl BatchReport {
    pub fn resolved(&self) -> usize {
        self.count(|outcome| matches!(outcome, LookupOutcome::Resolved(_)))
    }

    pub fn unmatched(&self) -> usize {
        self.count(|outcome| matches!(outcome, LookupOutcome::NoMatch))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, LookupOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&LookupOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|outcome| pred(outcome)).count()
    }
}

/// Resolves records one lookup at a time.
///
/// The public geocoding service has a usage policy of roughly one request per
/// second per client, so lookups are never issued concurrently: the next
/// request is only sent once the previous response has settled. A pipeline
/// also refuses to start a second run while one is in progress.
pub struct GeocodingPipeline<G> {
    geocoder: G,
    country: String,
    running: watch::Sender<bool>,
}

impl<G: Geocoder> GeocodingPipeline<G> {
    pub fn new(geocoder: G, country: impl Into<String>) -> Self {
        let (running, _) = watch::channel(false);
        Self {
            geocoder,
            country: country.into(),
            running,
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// observe the in-progress flag, i.e. to disable uploads while it is set
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.running.subscribe()
    }

    /// Geocode every record in order. A failed lookup is logged and recorded
    /// as [`LookupOutcome::Failed`]; the remaining records are still resolved.
    #[tracing::instrument(skip_all, fields(total = records.len()))]
    pub async fn resolve(&self, records: Vec<AddressRecord>) -> color_eyre::Result<BatchReport> {
        if self.running.send_replace(true) {
            bail!("a geocoding run is already in progress");
        }
        let _guard = RunningGuard(&self.running);

        let total = records.len();
        let resolved = futures::stream::iter(records).enumerate().then(|(idx, mut record)| {
            async move {
                let query = record.lookup_query(&self.country);
                info!("[{}/{total}] geocoding [{}]", idx + 1, query);

                let outcome = match self.geocoder.lookup(&query).await {
                    Ok(Some(coordinates)) => {
                        record.coordinates = Some(coordinates);
                        LookupOutcome::Resolved(coordinates)
                    }
                    Ok(None) => {
                        warn!("no match for [{}]", query);
                        LookupOutcome::NoMatch
                    }
                    Err(e) => {
                        error!("cannot geocode [{}]: {:?}", query, e);
                        LookupOutcome::Failed(e.to_string())
                    }
                };
                (record, outcome)
            }
        })
            .collect::<Vec<_>>()
            .await;

        let (records, outcomes) = resolved.into_iter().unzip();
        Ok(BatchReport { records, outcomes })
    }
}

/// clears the in-progress flag when a run ends, including when it is dropped mid-flight
struct RunningGuard<'a>(&'a watch::Sender<bool>);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}
