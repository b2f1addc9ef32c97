use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{DisplayField, DisplayState, FlagRef, Query},
    error::LookupError,
    protocol::CountryRecord,
};
use tracing::{debug, error, info, warn};

pub mod config;
pub mod mode;

pub use config::{load_settings, Settings, SettingsError};
pub use mode::{ModeToggleController, RegionModes, ThemeSurface};

pub const DEFAULT_API_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Source of country records for a name query.
#[async_trait]
pub trait CountryLookup: Send + Sync {
    /// Returns the first record matching `query` (`None` for an empty list),
    /// or the HTTP-level failure. Later records are never inspected.
    async fn find_by_name(&self, query: &Query) -> Result<Option<CountryRecord>, LookupError>;
}

pub struct CountryClient {
    http: Client,
    api_base_url: String,
}

impl CountryClient {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base_url: api_base_url.into(),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// The query text is appended as-is; the HTTP client applies its default
    /// percent-encoding when the request is built.
    pub fn endpoint_for(&self, query: &Query) -> String {
        format!("{}/name/{}", self.api_base_url.trim_end_matches('/'), query)
    }

    pub async fn fetch_flag_image(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to request flag image {url}"))?
            .error_for_status()?
            .bytes()
            .await
            .with_context(|| format!("failed to read flag image {url}"))?;
        Ok(bytes.to_vec())
    }
}

impl Default for CountryClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

#[async_trait]
impl CountryLookup for CountryClient {
    async fn find_by_name(&self, query: &Query) -> Result<Option<CountryRecord>, LookupError> {
        let url = self.endpoint_for(query);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| LookupError::transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::not_found(query.as_str()));
        }
        if !status.is_success() {
            return Err(LookupError::fetch(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| LookupError::transport(err.to_string()))?;
        let records = serde_json::from_slice::<Vec<serde_json::Value>>(&body).map_err(|err| {
            warn!(query = %query, "country api returned an unexpected body: {err}");
            LookupError::DataUnavailable
        })?;
        let Some(first) = records.into_iter().next() else {
            return Ok(None);
        };
        serde_json::from_value::<CountryRecord>(first)
            .map(Some)
            .map_err(|err| {
                warn!(query = %query, "first country record is malformed: {err}");
                LookupError::DataUnavailable
            })
    }
}

/// Identifies one lookup invocation. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupTicket(u64);

impl LookupTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct LookupSequencer {
    latest: AtomicU64,
}

impl LookupSequencer {
    pub fn issue(&self) -> LookupTicket {
        LookupTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Outcome of one lookup, stamped with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedLookup {
    pub ticket: LookupTicket,
    pub query: Option<Query>,
    pub state: DisplayState,
}

/// The element writes a lookup result needs. Implemented by whatever shows
/// the country panel (terminal, window, test recorder).
pub trait DisplaySurface {
    fn set_field(&mut self, field: DisplayField, value: &str);
    fn set_flag_visible(&mut self, visible: bool);
    fn set_flag_source(&mut self, flag: &FlagRef);
    fn set_info_visible(&mut self, visible: bool);
}

/// Writes every field of `state` to `surface`, so nothing from an earlier
/// render survives. The info container is only ever shown, never hidden.
pub fn render<S: DisplaySurface + ?Sized>(state: &DisplayState, surface: &mut S) {
    for field in DisplayField::COUNTRY {
        surface.set_field(field, state.field(field));
    }

    match state.flag() {
        Some(flag) => {
            surface.set_flag_source(flag);
            surface.set_flag_visible(true);
            surface.set_info_visible(true);
        }
        None => surface.set_flag_visible(false),
    }

    surface.set_field(
        DisplayField::ErrorMessage,
        state.field(DisplayField::ErrorMessage),
    );
}

pub struct LookupController<L> {
    lookup: L,
    sequencer: LookupSequencer,
    grouping_separator: char,
}

impl<L: CountryLookup> LookupController<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            sequencer: LookupSequencer::default(),
            grouping_separator: ',',
        }
    }

    pub fn with_grouping_separator(mut self, separator: char) -> Self {
        self.grouping_separator = separator;
        self
    }

    pub fn lookup_service(&self) -> &L {
        &self.lookup
    }

    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        self.sequencer.is_current(ticket)
    }

    /// First record of the response, provided it carries a usable flag.
    pub async fn fetch_country(&self, query: &Query) -> Result<CountryRecord, LookupError> {
        match self.lookup.find_by_name(query).await? {
            Some(record) if record.has_usable_flag() => Ok(record),
            _ => Err(LookupError::DataUnavailable),
        }
    }

    /// Issues the ticket for a lookup that will run later, e.g. on another
    /// thread. Issue at the moment the user acts so request order is kept.
    pub fn begin(&self) -> LookupTicket {
        self.sequencer.issue()
    }

    /// Runs one lookup under a fresh ticket.
    pub async fn lookup(&self, raw: &str) -> CompletedLookup {
        let ticket = self.begin();
        self.lookup_with_ticket(ticket, raw).await
    }

    /// Blank input resolves to a cleared display without touching the network.
    pub async fn lookup_with_ticket(&self, ticket: LookupTicket, raw: &str) -> CompletedLookup {
        let Some(query) = Query::parse(raw) else {
            warn!(ticket = ticket.0, "please enter a country name");
            return CompletedLookup {
                ticket,
                query: None,
                state: DisplayState::blank(),
            };
        };

        let outcome = self.fetch_country(&query).await;
        match &outcome {
            Ok(_) => info!(ticket = ticket.0, query = %query, "country lookup succeeded"),
            Err(err) => error!(
                ticket = ticket.0,
                query = %query,
                code = ?err.code(),
                "error fetching country data: {err}"
            ),
        }

        CompletedLookup {
            ticket,
            state: DisplayState::from_outcome(&outcome, self.grouping_separator),
            query: Some(query),
        }
    }

    /// Renders `completed` only if no newer lookup has been issued since.
    pub fn render_if_current<S: DisplaySurface + ?Sized>(
        &self,
        completed: &CompletedLookup,
        surface: &mut S,
    ) -> bool {
        if !self.sequencer.is_current(completed.ticket) {
            debug!(
                ticket = completed.ticket.0,
                "discarding stale country lookup result"
            );
            return false;
        }
        render(&completed.state, surface);
        true
    }

    pub async fn lookup_and_render<S: DisplaySurface + ?Sized>(
        &self,
        raw: &str,
        surface: &mut S,
    ) -> CompletedLookup {
        let completed = self.lookup(raw).await;
        self.render_if_current(&completed, surface);
        completed
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
