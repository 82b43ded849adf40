//! Blocking HTTP fetcher with a fixed-attempt retry policy.
//!
//! Each request is tried up to [`config::FETCH_ATTEMPTS`] times with a fixed
//! delay between attempts. Transport errors, HTTP statuses above 202 and
//! undecodable bodies all count as a failed attempt; the last failure is
//! returned once every attempt has been used.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config;
use crate::error::{CatalogError, Result};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Fetches and decodes JSON documents, retrying failed attempts.
pub struct Fetcher {
    client: Client,
    attempts: u32,
    delay: Duration,
}

impl Fetcher {
    /// Create a fetcher with the default retry policy and the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            attempts: config::FETCH_ATTEMPTS,
            delay: config::FETCH_RETRY_DELAY,
        })
    }

    /// Override the number of attempts (at least one).
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Override the delay slept between attempts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// GET `url` and decode the body as JSON.
    pub fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut last_err: Option<CatalogError> = None;

        for attempt in 1..=self.attempts {
            if attempt > 1 {
                thread::sleep(self.delay);
            }
            debug!(url, attempt, "fetching");

            match self.try_fetch(url) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(url, attempt, error = %e, "fetch attempt failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            CatalogError::InvalidArgument(format!("no fetch attempts made for {}", url))
        }))
    }

    fn try_fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.client.get(url).send()?;
        let status = resp.status().as_u16();
        if status > 202 {
            return Err(CatalogError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        let bytes = resp.bytes()?;
        parse_payload(&bytes)
    }
}

/// Decode a JSON body, ignoring a leading UTF-8 byte order mark.
pub fn parse_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    Ok(serde_json::from_slice(body)?)
}
