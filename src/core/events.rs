//! View events for a presentation layer
//!
//! The controller publishes what happened to the view (visibility flips,
//! completed loads, saved comments, surfaced errors) on a
//! `tokio::sync::broadcast` channel. A presentation layer subscribes and
//! drives its transitions from these events; nothing in this crate depends
//! on anyone listening.
//!
//! ```text
//! DetailViewController::load() ──▶ EventBus::publish() ──▶ broadcast ──▶ fade animation
//!                                                                  ──▶ page title
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Whether the dish panel is currently visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Hidden,
    #[default]
    Shown,
}

/// Something that happened to the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewEvent {
    /// The dish panel changed visibility
    VisibilityChanged { visibility: Visibility },
    /// A dish finished loading
    DishLoaded {
        dish_id: String,
        previous: String,
        next: String,
    },
    /// A comment was saved on a dish
    CommentSaved { dish_id: String, comments: usize },
    /// A repository failure was surfaced to the user
    ErrorSurfaced { message: String },
}

impl ViewEvent {
    /// Short name of the event
    pub fn action(&self) -> &str {
        match self {
            ViewEvent::VisibilityChanged { .. } => "visibility_changed",
            ViewEvent::DishLoaded { .. } => "dish_loaded",
            ViewEvent::CommentSaved { .. } => "comment_saved",
            ViewEvent::ErrorSurfaced { .. } => "error_surfaced",
        }
    }

    /// The dish this event relates to, if any
    pub fn dish_id(&self) -> Option<&str> {
        match self {
            ViewEvent::DishLoaded { dish_id, .. } | ViewEvent::CommentSaved { dish_id, .. } => {
                Some(dish_id)
            }
            _ => None,
        }
    }
}

/// Envelope wrapping a view event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: ViewEvent,
}

impl EventEnvelope {
    pub fn new(event: ViewEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; all clones publish to the same subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Slow receivers lose the oldest events once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails; returns how many receivers got the event.
    pub fn publish(&self, event: ViewEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() errs only when nobody listens
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to future events
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
