use crate::config::AppConfig;
use crate::error::AppError;
use serde::Deserialize;
use std::cell::Cell;
use std::time::{Duration, Instant};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeOutcome {
    Found(String),
    NotFound,
    TimedOut,
    Failed(String),
}

impl GeocodeOutcome {
    pub fn into_place(self) -> Option<String> {
        match self {
            GeocodeOutcome::Found(name) => Some(name),
            _ => None,
        }
    }
}

/// Maps coordinates to a locality name. Implementations never fail the
/// caller; every problem is folded into the outcome.
pub trait ReverseGeocoder {
    fn reverse(&self, lat: f64, lon: f64) -> GeocodeOutcome;
}

/// Used when geocoding is switched off.
pub struct OfflineGeocoder;

impl ReverseGeocoder for OfflineGeocoder {
    fn reverse(&self, _lat: f64, _lon: f64) -> GeocodeOutcome {
        GeocodeOutcome::NotFound
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub hamlet: Option<String>,
    pub county: Option<String>,
}

impl Address {
    /// First populated of city, town, village, hamlet, county.
    pub fn locality(&self) -> Option<String> {
        [&self.city, &self.town, &self.village, &self.hamlet, &self.county]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .cloned()
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
    error: Option<String>,
}

/// Interprets a Nominatim `/reverse` JSON body.
pub fn parse_reverse_response(body: &str) -> GeocodeOutcome {
    let response: ReverseResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return GeocodeOutcome::Failed(format!("invalid response: {}", e)),
    };
    if let Some(error) = response.error {
        log::debug!("Geocoding service returned no result: {}", error);
        return GeocodeOutcome::NotFound;
    }
    match response.address.and_then(|a| a.locality()) {
        Some(name) => GeocodeOutcome::Found(name),
        None => GeocodeOutcome::NotFound,
    }
}

/// Blocking client for a Nominatim-compatible service.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    endpoint: Url,
    language: String,
    min_interval: Duration,
    last_request: Cell<Option<Instant>>,
}

impl NominatimGeocoder {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.geocoding_timeout_secs))
            .user_agent(&config.geocoding_user_agent)
            .build();
        log::debug!(
            "Reverse geocoding via {} in language {:?}",
            config.geocoding_url,
            config.geocoding_language
        );
        Ok(Self {
            agent,
            endpoint: reverse_endpoint(&config.geocoding_url)?,
            language: config.geocoding_language.clone(),
            min_interval: Duration::from_millis(config.geocoding_min_interval_ms),
            last_request: Cell::new(None),
        })
    }

    pub fn request_url(&self, lat: f64, lon: f64) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string())
            .append_pair("addressdetails", "1")
            .append_pair("accept-language", &self.language);
        url
    }

    fn throttle(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    fn reverse(&self, lat: f64, lon: f64) -> GeocodeOutcome {
        self.throttle();
        let url = self.request_url(lat, lon);
        log::trace!("Reverse geocoding request: {}", url);

        match self.agent.request_url("GET", &url).call() {
            Ok(response) => match response.into_string() {
                Ok(body) => parse_reverse_response(&body),
                Err(e) if is_timeout(&e) => GeocodeOutcome::TimedOut,
                Err(e) => GeocodeOutcome::Failed(e.to_string()),
            },
            Err(ureq::Error::Status(code, _)) => GeocodeOutcome::Failed(format!("HTTP {}", code)),
            Err(ureq::Error::Transport(transport)) => {
                let timed_out = std::error::Error::source(&transport)
                    .and_then(|source| source.downcast_ref::<std::io::Error>())
                    .map_or(false, is_timeout);
                if timed_out {
                    GeocodeOutcome::TimedOut
                } else {
                    GeocodeOutcome::Failed(transport.to_string())
                }
            }
        }
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(e.kind(), std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock)
}

/// `<base>/reverse`, tolerating a base with or without a trailing slash.
pub fn reverse_endpoint(base: &str) -> Result<Url, AppError> {
    let mut base = base.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?.join("reverse")?)
}
