use async_trait::async_trait;
use futures::future::join_all;
use homedata_api_types::{Selection, SeriesRequest, TimeSeriesResponse};
use homedata_client::{Error, HomedataClient};
use log::{debug, warn};

/// Where rental time series come from.
#[async_trait]
pub trait TimeSeriesSource: Send + Sync {
    async fn fetch(&self, request: &SeriesRequest) -> Result<TimeSeriesResponse, Error>;
}

#[async_trait]
impl TimeSeriesSource for HomedataClient {
    async fn fetch(&self, request: &SeriesRequest) -> Result<TimeSeriesResponse, Error> {
        self.rental_data(request).await
    }
}

/// A successful response along with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSeries {
    pub request: SeriesRequest,
    pub response: TimeSeriesResponse,
}

/// Runs one request per combination in the selection concurrently.
///
/// Results come back in request order. A request that fails is logged and
/// left out, the rest of the batch is still returned.
pub async fn fetch_all<S>(source: &S, selection: &Selection) -> Vec<FetchedSeries>
where
    S: TimeSeriesSource + ?Sized,
{
    let requests = selection.requests();
    let results = join_all(requests.iter().map(|request| source.fetch(request))).await;
    let fetched: Vec<_> = requests
        .into_iter()
        .zip(results)
        .filter_map(|(request, result)| match result {
            Ok(response) => Some(FetchedSeries { request, response }),
            Err(e) => {
                warn!(
                    "dropping {} {} {}: {e}",
                    request.data_type, request.bedroom, request.neighborhood
                );
                None
            }
        })
        .collect();
    debug!("fetched {} series", fetched.len());
    fetched
}

#[cfg(test)]
pub(crate) mod test {
    use std::collections::HashMap;

    use homedata_api_types::{Bedroom, DataType, SeasonalMode};
    use homedata_client::StatusCode;

    use super::*;

    /// Canned responses keyed by neighborhood. Neighborhoods without an
    /// entry fail like a backend returning a 500.
    #[derive(Default)]
    pub(crate) struct StubSource {
        pub(crate) bodies: HashMap<String, String>,
    }

    impl StubSource {
        pub(crate) fn with(mut self, neighborhood: &str, body: &str) -> Self {
            self.bodies
                .insert(neighborhood.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl TimeSeriesSource for StubSource {
        async fn fetch(&self, request: &SeriesRequest) -> Result<TimeSeriesResponse, Error> {
            match self.bodies.get(&request.neighborhood) {
                Some(body) => homedata_client::decode_time_series(StatusCode::OK, body),
                None => Err(Error::api(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                )),
            }
        }
    }

    #[tokio::test]
    async fn failed_requests_are_dropped() {
        let source = StubSource::default()
            .with("Manhattan", r#"{"Manhattan": {"monthly": {"raw": {"2020-01": 1}}}}"#)
            .with("Queens", r#"{"error": "Data file not found"}"#)
            .with("Bronx", r#"{"Bronx": {"monthly": {"raw": {"2020-01": 2}}}}"#);
        let selection = Selection::new(
            [DataType::Median],
            [Bedroom::All],
            ["Manhattan", "Queens", "Bronx", "Brooklyn"],
            SeasonalMode::Raw,
        );
        let fetched = fetch_all(&source, &selection).await;
        let neighborhoods: Vec<_> = fetched
            .iter()
            .map(|f| f.request.neighborhood.as_str())
            .collect();
        assert_eq!(neighborhoods, vec!["Manhattan", "Bronx"]);
    }

    #[tokio::test]
    async fn empty_selection_fetches_nothing() {
        let source = StubSource::default();
        let selection = Selection::new([], [Bedroom::All], ["Manhattan"], SeasonalMode::Raw);
        assert!(fetch_all(&source, &selection).await.is_empty());
    }
}
