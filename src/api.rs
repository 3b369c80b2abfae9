// API client module: a small blocking HTTP client for the console's device
// inventory. Every call is a single request checked against its status code;
// nothing is retried and nothing is paginated.

use crate::config::Config;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, CONTENT_TYPE};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Header carrying the `{api_key}/{api_id}` credential pair.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Lower bound of every search window.
pub const SEARCH_WINDOW_START: &str = "2000-01-01T00:00:00.000Z";

/// Maximum number of devices returned by one search. Only the first page is read.
pub const SEARCH_ROWS: u32 = 10_000;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

/// The request a failure belongs to, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Search,
    Deregister,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => f.write_str("search devices"),
            Action::Deregister => f.write_str("deregister sensors"),
            Action::Delete => f.write_str("delete sensors"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("credentials cannot be used as an auth header")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("API request to {action} could not be sent")]
    Transport {
        action: Action,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request to {action} failed with status code = {status}")]
    Status {
        action: Action,
        status: u16,
        body: String,
    },

    #[error("could not decode the response to {action}")]
    Decode {
        action: Action,
        #[source]
        source: reqwest::Error,
    },
}

/// Search window on `last_contact_time`: from the fixed epoch start up to
/// the cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// Window ending `days` days before `now`. Returns `None` when the cutoff
    /// falls outside the representable calendar.
    pub fn days_before(now: DateTime<Utc>, days: u32) -> Option<Self> {
        let cutoff = now.checked_sub_signed(Duration::try_days(i64::from(days))?)?;
        Some(DateRange {
            start: SEARCH_WINDOW_START.to_string(),
            end: cutoff.format(TIMESTAMP_FORMAT).to_string(),
        })
    }
}

/// One sensor as returned by a device search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub id: String,
    pub last_contact_time: String,
}

/// Raw search result. The console sends `id` as a number; string ids are
/// accepted too. A missing, null or empty id fails the whole decode so it
/// can never reach a bulk action.
#[derive(Deserialize, Debug)]
struct RawDevice {
    name: Option<String>,
    #[serde(deserialize_with = "device_id")]
    id: String,
    last_contact_time: Option<String>,
}

fn device_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) if !s.is_empty() => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("invalid device id: {other}"))),
    }
}

impl From<RawDevice> for Device {
    fn from(raw: RawDevice) -> Self {
        Device {
            name: raw.name.unwrap_or_default(),
            id: raw.id,
            last_contact_time: raw.last_contact_time.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    results: Vec<RawDevice>,
}

#[derive(Serialize, Debug)]
struct SearchRequest<'a> {
    criteria: Criteria<'a>,
    rows: u32,
    start: u32,
    sort: [SortField; 1],
}

#[derive(Serialize, Debug)]
struct Criteria<'a> {
    last_contact_time: TimeWindow<'a>,
    // Sent as `staus`: the console ignores the unknown key, so no status
    // filtering actually happens. Left as-is until the intended filter is confirmed.
    #[serde(rename = "staus")]
    status: [&'static str; 1],
}

#[derive(Serialize, Debug)]
struct TimeWindow<'a> {
    start: &'a str,
    end: &'a str,
}

#[derive(Serialize, Debug)]
struct SortField {
    field: &'static str,
    order: &'static str,
}

impl<'a> SearchRequest<'a> {
    fn new(range: &'a DateRange) -> Self {
        SearchRequest {
            criteria: Criteria {
                last_contact_time: TimeWindow {
                    start: &range.start,
                    end: &range.end,
                },
                status: ["ACTIVE"],
            },
            rows: SEARCH_ROWS,
            start: 0,
            sort: [SortField {
                field: "last_contact_time",
                order: "asc",
            }],
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum ActionType {
    UninstallSensor,
    DeleteSensor,
}

#[derive(Serialize, Debug)]
struct DeviceActionRequest<'a> {
    action_type: ActionType,
    device_id: Vec<&'a str>,
}

/// Blocking client for one console organization. Every request carries the
/// auth token and a JSON content type.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build the authenticated client from the loaded config.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut token = HeaderValue::from_str(&format!("{}/{}", config.api_key, config.api_id))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ApiError::Client)?;
        let base_url = format!(
            "{}/appservices/v6/orgs/{}",
            config.backend.trim_end_matches('/'),
            config.org_key
        );
        Ok(ApiClient { client, base_url })
    }

    /// Find devices whose last check-in falls inside `range`, oldest first.
    pub fn search(&self, range: &DateRange) -> Result<Vec<Device>, ApiError> {
        let res = self.post(Action::Search, "/devices/_search", &SearchRequest::new(range))?;
        let body: SearchResponse = res.json().map_err(|source| ApiError::Decode {
            action: Action::Search,
            source,
        })?;
        Ok(body.results.into_iter().map(Device::from).collect())
    }

    /// Ask the sensors on `devices` to uninstall themselves.
    pub fn deregister(&self, devices: &[Device]) -> Result<(), ApiError> {
        self.device_action(Action::Deregister, ActionType::UninstallSensor, devices)
    }

    /// Remove `devices` from the console inventory.
    pub fn delete(&self, devices: &[Device]) -> Result<(), ApiError> {
        self.device_action(Action::Delete, ActionType::DeleteSensor, devices)
    }

    fn device_action(
        &self,
        action: Action,
        action_type: ActionType,
        devices: &[Device],
    ) -> Result<(), ApiError> {
        let req = DeviceActionRequest {
            action_type,
            device_id: devices.iter().map(|d| d.id.as_str()).collect(),
        };
        self.post(action, "/device_actions", &req)?;
        Ok(())
    }

    fn post<T: Serialize>(
        &self,
        action: Action,
        path: &str,
        body: &T,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {url} ({action})");
        let res = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|source| ApiError::Transport { action, source })?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().unwrap_or_default();
            debug!("{action} returned {status}: {body}");
            return Err(ApiError::Status {
                action,
                status,
                body,
            });
        }
        Ok(res)
    }
}
