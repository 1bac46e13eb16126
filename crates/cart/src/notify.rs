//! User-facing notifications.
//!
//! Cart operations never return errors to their caller. Failures are turned
//! into a [`Notification`] and handed to a [`Notifier`], which is the front
//! end's toast/alert channel.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::warn;

/// A user-facing message emitted when a cart operation is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// Adding a product failed for a reason other than stock.
    AddFailed,
    /// Removing a product failed (e.g., it was not in the cart).
    RemoveFailed,
    /// Changing a line's quantity failed for a reason other than stock.
    UpdateFailed,
    /// The requested quantity is more than the stock service has available.
    StockExceeded,
}

impl Notification {
    /// Localized message text.
    #[must_use]
    pub const fn message(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::AddFailed, Locale::En) => "Failed to add product",
            (Self::AddFailed, Locale::PtBr) => "Erro na adição do produto",
            (Self::RemoveFailed, Locale::En) => "Failed to remove product",
            (Self::RemoveFailed, Locale::PtBr) => "Erro na remoção do produto",
            (Self::UpdateFailed, Locale::En) => "Failed to update product quantity",
            (Self::UpdateFailed, Locale::PtBr) => "Erro na alteração de quantidade do produto",
            (Self::StockExceeded, Locale::En) => "Requested quantity is out of stock",
            (Self::StockExceeded, Locale::PtBr) => "Quantidade solicitada fora de estoque",
        }
    }
}

/// Language used for notification text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    PtBr,
}

/// Error returned when parsing an unsupported locale tag.
#[derive(Debug, Clone, Error)]
#[error("unsupported locale: {0} (expected `en` or `pt-BR`)")]
pub struct UnknownLocale(String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" => Ok(Self::En),
            "pt" | "pt-br" => Ok(Self::PtBr),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

/// A fire-and-forget sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification. Must not block or fail.
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Emits each notification as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier {
    locale: Locale,
}

impl TracingNotifier {
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        warn!(
            kind = ?notification,
            "{}",
            notification.message(self.locale)
        );
    }
}

/// Buffers notifications so a front end can drain and render them later.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain all received notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_str() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("pt-BR".parse::<Locale>().unwrap(), Locale::PtBr);
        assert_eq!("pt_br".parse::<Locale>().unwrap(), Locale::PtBr);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_messages_are_localized() {
        assert_eq!(
            Notification::StockExceeded.message(Locale::PtBr),
            "Quantidade solicitada fora de estoque"
        );
        assert_eq!(
            Notification::RemoveFailed.message(Locale::En),
            "Failed to remove product"
        );
    }

    #[test]
    fn test_recording_notifier_take_drains() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::AddFailed);
        notifier.notify(Notification::StockExceeded);

        assert_eq!(
            notifier.take(),
            vec![Notification::AddFailed, Notification::StockExceeded]
        );
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_arc_notifier_forwards() {
        let inner = Arc::new(RecordingNotifier::new());
        let shared: Arc<RecordingNotifier> = Arc::clone(&inner);
        shared.notify(Notification::UpdateFailed);
        assert_eq!(inner.notifications(), vec![Notification::UpdateFailed]);
    }
}
