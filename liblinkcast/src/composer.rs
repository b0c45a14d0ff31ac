//! Draft composition pipeline
//!
//! Turns a topic into a ready-to-review draft: gather search context,
//! generate the post text, normalize it, and stage an accompanying
//! image. The stages run strictly in order and the first failure stops
//! the pipeline — no image is generated for text that never existed.
//!
//! The staged image file persists until the caller discards it; an
//! operator may publish hours later with `link-post`.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::error::{LinkcastError, Result};
use crate::events::{Event, EventBus, EventReceiver};
use crate::providers::{ImageGenerator, SearchProvider, TextGenerator};
use crate::types::Draft;

/// Composes drafts from a topic using the configured providers.
pub struct DraftComposer {
    search: Box<dyn SearchProvider>,
    text: Box<dyn TextGenerator>,
    image: Box<dyn ImageGenerator>,
    event_bus: EventBus,
}

impl DraftComposer {
    pub fn new(
        search: Box<dyn SearchProvider>,
        text: Box<dyn TextGenerator>,
        image: Box<dyn ImageGenerator>,
    ) -> Self {
        Self {
            search,
            text,
            image,
            event_bus: EventBus::default(),
        }
    }

    /// Replace the event bus (builder style)
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    /// Subscribe to composition progress events
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    /// Compose a draft for `topic`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank topic, otherwise propagates
    /// the first provider failure. The pipeline is sequential; a text
    /// generation failure means the image stage never runs.
    pub async fn compose(&self, topic: &str) -> Result<Draft> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(LinkcastError::InvalidInput(
                "Topic cannot be empty".to_string(),
            ));
        }

        let draft_id = uuid::Uuid::new_v4().to_string();
        info!(topic, "composing draft");
        self.event_bus.emit(Event::DraftStarted {
            draft_id: draft_id.clone(),
            topic: topic.to_string(),
        });

        let context = self.search.search(topic).await?;
        self.event_bus.emit(Event::ContextRetrieved {
            draft_id: draft_id.clone(),
            chars: context.chars().count(),
        });

        let raw = self.text.generate(topic, &context).await?;
        let content = normalize_content(&raw);
        self.event_bus.emit(Event::ContentGenerated {
            draft_id: draft_id.clone(),
            chars: content.chars().count(),
        });

        let image = self.image.generate(topic).await?;
        self.event_bus.emit(Event::ImageStaged {
            draft_id: draft_id.clone(),
            path: image.path.display().to_string(),
        });

        let mut draft = Draft::new(
            topic.to_string(),
            context,
            content,
            image.url,
            image.path,
        );
        draft.id = draft_id;
        Ok(draft)
    }
}

fn blank_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid pattern"))
}

/// Normalize generated post text for publication.
///
/// Canonicalizes CRLF/CR line endings, collapses runs of three or more
/// newlines down to a single blank line, trims every line, and trims the
/// whole. Model output tends to arrive with decorative spacing that
/// LinkedIn renders badly.
pub fn normalize_content(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = blank_runs().replace_all(&unified, "\n\n");
    collapsed
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Best-effort removal of a staged image file.
///
/// Returns `true` when the file is gone (deleted now, or already
/// absent). Failure to delete is logged, not fatal — the draft was
/// already published or abandoned by the time this runs.
pub fn discard_image(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not remove staged image");
            false
        }
    }
}
