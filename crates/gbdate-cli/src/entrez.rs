//! NCBI Entrez efetch client
//!
//! Downloads GenBank flat files for batches of accessions and streams each
//! response body line by line into a single [`RecordScanner`], so the full
//! download is never held in memory.

use crate::config::Config;
use crate::error::Result;
use crate::progress::create_accession_progress;
use futures::TryStreamExt;
use gbdate_core::parser::feed_async_reader;
use gbdate_core::{RawDateMap, RecordScanner};
use reqwest::{Client, Response};
use tokio_util::io::StreamReader;
use tracing::{debug, info, instrument, warn};

pub struct EntrezClient {
    client: Client,
    config: Config,
}

impl EntrezClient {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("{}/{}", config.tool, env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch records for `accessions` and resolve one raw date per LOCUS
    pub async fn fetch_raw_dates(&self, accessions: &[String]) -> Result<RawDateMap> {
        let mut scanner = RecordScanner::new()?;
        self.fetch_into(accessions, &mut scanner).await?;
        Ok(scanner.finish())
    }

    /// Stream every batch into `scanner`
    pub async fn fetch_into(
        &self,
        accessions: &[String],
        scanner: &mut RecordScanner,
    ) -> Result<()> {
        let batches: Vec<&[String]> = accessions.chunks(self.config.batch_size).collect();
        info!(
            accessions = accessions.len(),
            batches = batches.len(),
            url = %self.config.efetch_url(),
            "Fetching GenBank records"
        );

        let pb = create_accession_progress(accessions.len() as u64, "Fetching GenBank records");

        for (index, batch) in batches.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.request_delay()).await;
            }

            let before = scanner.records_seen();
            self.fetch_batch(index, batch, scanner).await?;
            debug!(
                batch = index,
                records = scanner.records_seen() - before,
                "Batch scanned"
            );
            pb.inc(batch.len() as u64);
        }

        pb.finish_and_clear();
        Ok(())
    }

    #[instrument(skip(self, batch, scanner), fields(size = batch.len()))]
    async fn fetch_batch(
        &self,
        index: usize,
        batch: &[String],
        scanner: &mut RecordScanner,
    ) -> Result<()> {
        let response = self.request_with_retries(batch).await?;

        let body = response.bytes_stream().map_err(std::io::Error::other);
        let reader = StreamReader::new(Box::pin(body));
        feed_async_reader(scanner, reader).await?;

        Ok(())
    }

    async fn request_with_retries(&self, batch: &[String]) -> Result<Response> {
        let form = self.efetch_form(batch);
        let url = self.config.efetch_url();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let result = self
                .client
                .post(&url)
                .form(&form)
                .send()
                .await
                .and_then(Response::error_for_status);

            match result {
                Ok(response) => return Ok(response),
                Err(e) if attempt <= self.config.max_retries => {
                    let wait = self.config.retry_backoff() * attempt;
                    warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        wait_ms = wait.as_millis() as u64,
                        error = %e,
                        "efetch request failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                },
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn efetch_form(&self, batch: &[String]) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("db", "nucleotide".to_string()),
            ("id", batch.join(",")),
            ("rettype", "gb".to_string()),
            ("retmode", "text".to_string()),
            ("tool", self.config.tool.clone()),
        ];
        if let Some(email) = &self.config.email {
            form.push(("email", email.clone()));
        }
        if let Some(key) = &self.config.api_key {
            form.push(("api_key", key.clone()));
        }
        form
    }
}

/// Accessions requested but absent from the returned LOCUS names.
///
/// LOCUS names carry no version, so `MN908947.3` matches `MN908947`.
pub fn unreturned_accessions<'a>(requested: &'a [String], returned: &RawDateMap) -> Vec<&'a str> {
    requested
        .iter()
        .map(String::as_str)
        .filter(|&accession| {
            let unversioned = accession.split('.').next().unwrap_or(accession);
            !returned.contains_key(accession) && !returned.contains_key(unversioned)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use gbdate_core::RawDate;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BATCH_ONE: &str = "LOCUS       MN908947               29903 bp    ss-RNA     linear   VRL 18-MAR-2020\n\
                             \x20 JOURNAL   Submitted (05-JAN-2020) Shanghai\n\
                             \x20                    /collection_date=\"Dec-2019\"\n//\n";
    const BATCH_TWO: &str = "LOCUS       OQ291490                 897 bp    DNA     linear   PLN 02-FEB-2023\n\
                             \x20 JOURNAL   Submitted (15-NOV-2022) Yangling\n//\n";

    fn test_config(server: &MockServer) -> Config {
        Config::new()
            .with_eutils_url(server.uri())
            .with_retry_backoff_ms(1)
    }

    #[test]
    fn test_efetch_form() {
        let client = EntrezClient::new(Config::new().with_email("me@example.org")).unwrap();
        let form = client.efetch_form(&["A".to_string(), "B".to_string()]);
        assert!(form.contains(&("id", "A,B".to_string())));
        assert!(form.contains(&("rettype", "gb".to_string())));
        assert!(form.contains(&("email", "me@example.org".to_string())));
        assert!(!form.iter().any(|(k, _)| *k == "api_key"));
    }

    #[test]
    fn test_unreturned_accessions() {
        let mut returned = RawDateMap::new();
        returned.insert("MN908947".into(), RawDate::Empty);
        let requested = vec!["MN908947.3".to_string(), "OQ291490.1".to_string()];
        assert_eq!(unreturned_accessions(&requested, &returned), vec!["OQ291490.1"]);
    }

    #[tokio::test]
    async fn test_fetch_batches_into_one_map() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/efetch.fcgi"))
            .and(body_string_contains("id=MN908947.3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BATCH_ONE))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/efetch.fcgi"))
            .and(body_string_contains("id=OQ291490.1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BATCH_TWO))
            .expect(1)
            .mount(&server)
            .await;

        let client = EntrezClient::new(test_config(&server).with_batch_size(1)).unwrap();
        let raw = client
            .fetch_raw_dates(&["MN908947.3".to_string(), "OQ291490.1".to_string()])
            .await
            .unwrap();

        let keys: Vec<_> = raw.keys().cloned().collect();
        assert_eq!(keys, vec!["MN908947", "OQ291490"]);
        assert_eq!(raw["MN908947"], RawDate::RawText("Dec-2019".into()));
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/efetch.fcgi"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/efetch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BATCH_TWO))
            .mount(&server)
            .await;

        let client = EntrezClient::new(test_config(&server)).unwrap();
        let raw = client.fetch_raw_dates(&["OQ291490".to_string()]).await.unwrap();
        assert_eq!(raw.len(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/efetch.fcgi"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = EntrezClient::new(test_config(&server).with_max_retries(2)).unwrap();
        let err = client
            .fetch_raw_dates(&["OQ291490".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::CliError::Http(_)));
    }
}
