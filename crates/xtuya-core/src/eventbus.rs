//! Event bus carrying device-manager notifications.
//!
//! The device manager publishes [`XtEvent`]s here; entity platforms subscribe
//! to the discovery events and build entities for newly visible devices.

use crate::config::IntegrationConfig;
use crate::event::{EventMetadata, XtEvent};
use tokio::sync::broadcast;

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast event bus.
///
/// Every subscriber receives every event published after it subscribed.
/// Slow subscribers may lag and lose the oldest buffered events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<(XtEvent, EventMetadata)>,
    capacity: usize,
}

impl EventBus {
    /// Create a new event bus with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new event bus with the specified capacity.
    ///
    /// The capacity determines how many events are buffered for slow subscribers.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Create an event bus sized by `config.event_channel_capacity`.
    pub fn from_config(config: &IntegrationConfig) -> Self {
        Self::with_capacity(config.event_channel_capacity)
    }

    /// Number of events buffered per subscriber.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish an event with default metadata.
    ///
    /// Returns `true` if there was at least one subscriber. Events published
    /// without subscribers are discarded.
    pub fn publish(&self, event: XtEvent) -> bool {
        self.publish_with_source(event, "system")
    }

    /// Publish an event with a custom source.
    pub fn publish_with_source(&self, event: XtEvent, source: impl Into<String>) -> bool {
        self.publish_with_metadata(event, EventMetadata::new(source))
    }

    /// Publish an event with custom metadata.
    pub fn publish_with_metadata(&self, event: XtEvent, metadata: EventMetadata) -> bool {
        tracing::trace!(event = event.type_name(), "publishing event");
        self.tx.send((event, metadata)).is_ok()
    }

    /// Subscribe to all events.
    pub fn subscribe(&self) -> EventBusReceiver {
        EventBusReceiver {
            rx: self.tx.subscribe(),
        }
    }

    /// Create a filtered subscription helper for common patterns.
    pub fn filter(&self) -> FilterBuilder {
        FilterBuilder {
            tx: self.tx.clone(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver for all events from the event bus.
pub struct EventBusReceiver {
    rx: broadcast::Receiver<(XtEvent, EventMetadata)>,
}

impl EventBusReceiver {
    /// Receive the next event.
    ///
    /// Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<(XtEvent, EventMetadata)> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&mut self) -> Option<(XtEvent, EventMetadata)> {
        self.rx.try_recv().ok()
    }
}

/// Item yielded by [`FilteredReceiver::next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Event(XtEvent, EventMetadata),
    /// The receiver fell behind and this many events were dropped.
    Lagged(u64),
}

/// Receiver for filtered events from the event bus.
pub struct FilteredReceiver<F>
where
    F: Fn(&XtEvent) -> bool + Send,
{
    rx: broadcast::Receiver<(XtEvent, EventMetadata)>,
    filter: F,
}

impl<F> FilteredReceiver<F>
where
    F: Fn(&XtEvent) -> bool + Send,
{
    fn new(rx: broadcast::Receiver<(XtEvent, EventMetadata)>, filter: F) -> Self {
        Self { rx, filter }
    }

    /// Receive the next event matching the filter.
    ///
    /// Lost events are logged and skipped. Returns `None` once every sender
    /// is gone.
    pub async fn recv(&mut self) -> Option<(XtEvent, EventMetadata)> {
        loop {
            match self.next().await? {
                Delivery::Event(event, meta) => return Some((event, meta)),
                Delivery::Lagged(skipped) => {
                    tracing::warn!(skipped, "filtered event receiver lagged");
                }
            }
        }
    }

    /// Like [`recv`](Self::recv), but reports lost events to the caller.
    ///
    /// Events dropped by a lag are unknown, so matching ones may be among
    /// them. Callers that must not miss an event resynchronize on
    /// [`Delivery::Lagged`].
    pub async fn next(&mut self) -> Option<Delivery> {
        loop {
            match self.rx.recv().await {
                Ok((event, meta)) => {
                    if (self.filter)(&event) {
                        return Some(Delivery::Event(event, meta));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    return Some(Delivery::Lagged(skipped));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive a matching event without blocking.
    pub fn try_recv(&mut self) -> Option<(XtEvent, EventMetadata)> {
        while let Ok((event, meta)) = self.rx.try_recv() {
            if (self.filter)(&event) {
                return Some((event, meta));
            }
        }
        None
    }
}

/// Builder for creating filtered subscriptions.
pub struct FilterBuilder {
    tx: broadcast::Sender<(XtEvent, EventMetadata)>,
}

impl FilterBuilder {
    /// Subscribe to discovery notifications only.
    pub fn discovery_events(&self) -> FilteredReceiver<fn(&XtEvent) -> bool> {
        FilteredReceiver::new(self.tx.subscribe(), XtEvent::is_discovery_event)
    }

    /// Subscribe to per-device events (status pushes, removals).
    pub fn device_events(&self) -> FilteredReceiver<fn(&XtEvent) -> bool> {
        FilteredReceiver::new(self.tx.subscribe(), XtEvent::is_device_event)
    }

    /// Subscribe to events concerning one device.
    pub fn device(
        &self,
        device_id: impl Into<String>,
    ) -> FilteredReceiver<impl Fn(&XtEvent) -> bool + Send + 'static> {
        let target = device_id.into();
        FilteredReceiver::new(self.tx.subscribe(), move |event: &XtEvent| {
            event.device_id() == Some(target.as_str())
        })
    }
}
