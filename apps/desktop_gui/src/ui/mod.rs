//! UI layer for the desktop GUI: app shell and region themes.

pub mod app;
pub mod theme;

pub use app::CountryLookupApp;
