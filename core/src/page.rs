//! The hosting page: document, notifier, client and transport in one place.
//!
//! # Design
//! `ApiClient` only returns typed results. `Page` is the presentation layer
//! that decides what the user sees: a failed request is logged and shown as
//! a single generic error banner, then handed back to the caller. The table
//! loader builds on that and swallows its own failures.

use serde_json::Value;
use tracing::{error, warn};

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::dom::Document;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::notify::{Clock, NotificationHandle, Notifier, Severity};
use crate::table::{as_collection, render_rows, LoadError, TableOutcome};
use crate::transport::Transport;

/// Banner text shown for any failed request.
pub const REQUEST_FAILED_MESSAGE: &str = "Error en la solicitud";

pub struct Page<T: Transport, C: Clock> {
    document: Document,
    notifier: Notifier<C>,
    client: ApiClient,
    transport: T,
}

impl<T: Transport, C: Clock> Page<T, C> {
    pub fn new(client: ApiClient, transport: T, notifier: Notifier<C>) -> Self {
        Self {
            document: Document::new(),
            notifier,
            client,
            transport,
        }
    }

    pub fn from_config(config: &ClientConfig, transport: T, clock: C) -> Self {
        Self::new(
            ApiClient::from_config(config),
            transport,
            Notifier::with_ttl(clock, config.notification_ttl),
        )
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn notifier(&self) -> &Notifier<C> {
        &self.notifier
    }

    pub fn notify(&mut self, message: &str, severity: impl Into<Severity>) -> NotificationHandle {
        self.notifier.notify(&mut self.document, message, severity)
    }

    pub fn dismiss(&mut self, handle: NotificationHandle) -> bool {
        self.notifier.dismiss(&mut self.document, handle)
    }

    /// Expire due notifications. Call from the host's timer.
    pub fn tick(&mut self) -> usize {
        self.notifier.tick(&mut self.document)
    }

    /// Perform a request. On failure the error is logged, one error banner
    /// is shown, and the error is returned.
    pub fn request(
        &mut self,
        endpoint: &str,
        method: HttpMethod,
        payload: Option<&Value>,
    ) -> Result<Value, ApiError> {
        self.client
            .request(&self.transport, endpoint, method, payload)
            .inspect_err(|err| {
                error!(endpoint, %method, kind = ?err.kind(), error = %err, "request failed");
                self.notifier
                    .notify(&mut self.document, REQUEST_FAILED_MESSAGE, Severity::Error);
            })
    }

    /// Fill the first element matching `selector` with one row per item of
    /// the collection at `endpoint`. Never fails: every problem is logged
    /// and reported through the outcome.
    pub fn load_table(&mut self, endpoint: &str, selector: &str) -> TableOutcome {
        match self.try_load_table(endpoint, selector) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(endpoint, selector, error = %err, "error loading table");
                TableOutcome::Failed
            }
        }
    }

    fn try_load_table(&mut self, endpoint: &str, selector: &str) -> Result<TableOutcome, LoadError> {
        let data = self.request(endpoint, HttpMethod::Get, None)?;
        let Some(table) = self.document.query_selector_mut(selector)? else {
            warn!(endpoint, selector, "no element matches table selector, data discarded");
            return Ok(TableOutcome::TargetMissing);
        };
        let items = as_collection(&data)?;
        let rows = render_rows(table, items);
        Ok(TableOutcome::Rendered { rows })
    }
}
