//! Transient notification banners.
//!
//! # Design
//! `Notifier::notify` inserts a banner at the top of the page and returns a
//! `NotificationHandle`. Removal is not tied to a background timer: the host
//! calls `tick` from its own timer (see `next_deadline`), and `Clock` lets
//! tests move time forward without sleeping.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::DEFAULT_NOTIFICATION_TTL;
use crate::dom::{Document, Element};

/// Attribute that ties a banner element back to its handle.
const ID_ATTRIBUTE: &str = "data-notification-id";

/// Source of the current time for expiring notifications.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Visual category of a notification. Unknown tags are kept as-is and still
/// yield an `alert-<tag>` class, which simply has no style attached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Success,
    Error,
    Warning,
    Info,
    Custom(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Custom(tag) => tag,
        }
    }

    pub fn class_name(&self) -> String {
        format!("alert alert-{}", self.as_str())
    }
}

impl From<&str> for Severity {
    fn from(tag: &str) -> Self {
        match tag {
            "success" => Severity::Success,
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            "info" => Severity::Info,
            other => Severity::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one banner for early dismissal or timer cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationHandle(u64);

impl NotificationHandle {
    pub fn id(&self) -> u64 {
        self.0
    }

    fn attribute_value(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Debug, Clone)]
struct Pending {
    handle: NotificationHandle,
    expires_at: Instant,
}

/// Creates banners and expires them.
#[derive(Debug)]
pub struct Notifier<C: Clock = SystemClock> {
    clock: C,
    ttl: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl Default for Notifier<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> Notifier<C> {
    pub fn new(clock: C) -> Self {
        Self::with_ttl(clock, DEFAULT_NOTIFICATION_TTL)
    }

    pub fn with_ttl(clock: C, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Show `message` at the top of the page and schedule its removal.
    pub fn notify(
        &mut self,
        doc: &mut Document,
        message: &str,
        severity: impl Into<Severity>,
    ) -> NotificationHandle {
        let severity = severity.into();
        let handle = NotificationHandle(self.next_id);
        self.next_id += 1;

        let banner = Element::new("div")
            .with_attribute("class", &severity.class_name())
            .with_attribute(ID_ATTRIBUTE, &handle.attribute_value())
            .with_text(message);
        doc.body_mut().prepend_child(banner);

        self.pending.push(Pending {
            handle,
            expires_at: self.clock.now() + self.ttl,
        });
        debug!(id = handle.id(), %severity, "notification shown");
        handle
    }

    /// Remove every banner whose time is up. Returns how many were removed.
    pub fn tick(&mut self, doc: &mut Document) -> usize {
        let now = self.clock.now();
        let (due, keep): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|p| p.expires_at <= now);
        self.pending = keep;
        due.iter().map(|p| remove_banner(doc, p.handle)).sum()
    }

    /// Remove a banner right away. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, doc: &mut Document, handle: NotificationHandle) -> bool {
        self.pending.retain(|p| p.handle != handle);
        remove_banner(doc, handle) > 0
    }

    /// Keep a banner on the page until it is dismissed explicitly.
    pub fn cancel_expiry(&mut self, handle: NotificationHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Earliest scheduled removal, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.expires_at).min()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

fn remove_banner(doc: &mut Document, handle: NotificationHandle) -> usize {
    let value = handle.attribute_value();
    doc.remove_where(|e| e.attribute(ID_ATTRIBUTE) == Some(value.as_str()))
}
