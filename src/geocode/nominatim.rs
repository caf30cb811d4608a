use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Request};
use serde_json::Value;
use crate::address::Coordinates;
use crate::config::Settings;
use super::Geocoder;

/// HTTP client for the OpenStreetMap Nominatim search endpoint
pub struct NominatimClient {
    client: Client,
    endpoint: String,
}

impl NominatimClient {
    pub fn new(settings: &Settings) -> color_eyre::Result<Self> {
        Ok(
            Self {
                client: Client::builder()
                    .default_headers(Self::default_headers(&settings.user_agent)?)
                    .build()?,
                endpoint: settings.endpoint.clone(),
            }
        )
    }

    fn default_headers(user_agent: &str) -> color_eyre::Result<HeaderMap> {
        let mut map = HeaderMap::new();
        map.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        Ok(map)
    }

    fn search_request(&self, query: &str) -> reqwest::Result<Request> {
        self.client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .build()
    }

    /// Position of the first candidate. An empty list, a body that is not a
    /// list, or a first candidate without usable numbers all count as no
    /// match. Later candidates are never looked at.
    fn first_match(body: &str) -> Option<Coordinates> {
        let places: Vec<Value> = match serde_json::from_str(body) {
            Ok(places) => places,
            Err(e) => {
                debug!("unexpected geocoder response: {:?}", e);
                return None;
            }
        };
        let place = places.into_iter().next()?;
        Some(
            Coordinates {
                lat: Self::number(&place["lat"])?,
                lng: Self::number(&place["lon"])?,
            }
        )
    }

    /// Nominatim sends positions as strings, accept plain numbers too
    fn number(value: &Value) -> Option<f64> {
        match value {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn lookup(&self, query: &str) -> color_eyre::Result<Option<Coordinates>> {
        let request = self.search_request(query)?;
        let body = self.client
            .execute(request)
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(Self::first_match(&body))
    }
}
