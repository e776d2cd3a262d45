//! Notification delivery
//!
//! The controller owns an [`EventSink`] handed to it at construction and pushes
//! every [`Notification`] into it as it happens. Renderers, cursor widgets and
//! motion drivers all read from that one stream.

use crate::types::Notification;

/// Receiver of engine notifications
pub trait EventSink {
    fn notify(&mut self, notification: Notification);
}

/// Buffer notifications for the driver to drain each tick
impl EventSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Sink that drops everything (benches, headless checks)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Discard;

impl EventSink for Discard {
    fn notify(&mut self, _notification: Notification) {}
}
