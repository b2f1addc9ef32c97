//! Backend commands queued from UI to backend worker.

use client_core::LookupTicket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Raw search text; the ticket was issued when the user pressed search.
    Lookup { ticket: LookupTicket, query: String },
    FetchFlag { ticket: LookupTicket, url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lookup { .. } => "lookup",
            Self::FetchFlag { .. } => "fetch_flag",
        }
    }
}
