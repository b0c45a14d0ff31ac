//! Progress events for drafting and publishing
//!
//! An in-process broadcast bus distributes progress events to any number
//! of subscribers (CLI output, a future UI) without blocking the
//! operations that emit them. This is the structured replacement for the
//! console side channel the tools previously relied on: logging stays
//! observability-only, and anything a front end needs to show goes
//! through here.
//!
//! If no subscribers exist, events are dropped immediately. Lagging
//! subscribers lose the oldest events rather than blocking emitters.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Broadcast bus for progress events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus.
    ///
    /// `capacity` is the per-subscriber buffer; a lagging subscriber
    /// starts losing the oldest events once it falls that far behind.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers; never blocks or fails
    pub fn emit(&self, event: Event) {
        // send() errors when nobody is listening, which is fine
        let _ = self.sender.send(event);
    }

    /// Number of active subscribers (for diagnostics only)
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}

/// The publication step an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStep {
    /// Upload initiation (`initializeUpload`)
    Initiate,
    /// Binary transfer to the upload URL
    Upload,
    /// Post creation referencing the asset
    Create,
}

impl std::fmt::Display for PublishStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishStep::Initiate => write!(f, "initiate"),
            PublishStep::Upload => write!(f, "upload"),
            PublishStep::Create => write!(f, "create"),
        }
    }
}

/// Events emitted while composing drafts and publishing posts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Draft composition started
    DraftStarted { draft_id: String, topic: String },

    /// Background search returned context for the draft
    ContextRetrieved { draft_id: String, chars: usize },

    /// Post text was generated and normalized
    ContentGenerated { draft_id: String, chars: usize },

    /// The accompanying image was staged to a local file
    ImageStaged { draft_id: String, path: String },

    /// Step 1 succeeded; an upload session is open
    UploadInitiated { asset_urn: String },

    /// Step 2 succeeded; the binary is on LinkedIn's side
    BinaryUploaded { asset_urn: String, bytes: u64 },

    /// Step 3 succeeded; `post_id` is `None` when LinkedIn omitted the
    /// identifier headers
    PostPublished { post_id: Option<String> },

    /// A publication step failed; the sequence stops here
    PublishFailed { step: PublishStep, error: String },
}
