//! Client-side toolkit for the nomina web pages.
//!
//! # Overview
//! Issues JSON requests against the application's API, shows transient
//! notification banners, fills tables from API collections, and formats
//! dates and times for display.
//!
//! # Design
//! - `ApiClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values. A `Transport` performs the actual round trip
//!   (`UreqTransport` over real HTTP, anything else in tests).
//! - The client reports failures only through `ApiError`. `Page` is the
//!   presentation layer that logs them and turns them into banners.
//! - Banners expire through `Notifier::tick` driven by a `Clock`, and every
//!   banner has a `NotificationHandle` for early dismissal.
//! - `dom` is a small in-memory document so every page mutation can be
//!   inspected.

pub mod client;
pub mod config;
pub mod dom;
pub mod error;
pub mod format;
pub mod http;
pub mod notify;
pub mod page;
pub mod table;
pub mod transport;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use dom::{Document, Element, Node, SelectorError};
pub use error::{ApiError, ErrorKind};
pub use format::{format_date, format_time};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::{Clock, ManualClock, NotificationHandle, Notifier, Severity, SystemClock};
pub use page::{Page, REQUEST_FAILED_MESSAGE};
pub use table::{cell_text, render_rows, LoadError, TableOutcome};
pub use transport::{Transport, UreqTransport};
