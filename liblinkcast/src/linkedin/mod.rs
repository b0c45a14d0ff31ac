//! LinkedIn REST publication client
//!
//! Publishing an image post is a three-call protocol:
//!
//! 1. `POST /rest/images?action=initializeUpload` opens an upload
//!    session: a pre-authorized upload URL plus the URN the asset will
//!    be known by.
//! 2. `PUT <uploadUrl>` transfers the raw image bytes.
//! 3. `POST /rest/posts` creates the post referencing the asset URN.
//!
//! The sequence is atomic from the caller's perspective: the first
//! failing step aborts the rest and surfaces as a [`PublishError`]
//! variant naming the step, its HTTP status, and the raw response body.
//! Nothing is retried and nothing is cleaned up server-side — LinkedIn
//! has no cancellation call, so a failed attempt simply orphans the
//! session or asset it had created. Upload sessions and asset URNs are
//! single-use; the types enforce this by being consumed by value.

pub mod mock;
pub mod transport;

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::credentials::Credentials;
use crate::error::{LinkcastError, PublishError, Result};
use crate::events::{Event, EventBus, EventReceiver, PublishStep};
use crate::types::{AssetUrn, ImageAsset, PostReceipt, UploadSession};
use self::transport::{Body, HttpTransport, Method, RestTransport, WireRequest};

/// Default base URL of the LinkedIn REST API
pub const DEFAULT_API_BASE: &str = "https://api.linkedin.com";

const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";

/// Header names the post id has historically arrived under, in
/// preference order
const POST_ID_HEADERS: [&str; 2] = ["x-linkedin-id", "x-restli-id"];

/// Client for the three-call LinkedIn publication protocol.
///
/// Holds immutable credentials and a transport; one publication attempt
/// at a time. The transport is injectable so the protocol logic can be
/// exercised against [`mock::MockTransport`].
pub struct LinkedInClient {
    credentials: Credentials,
    api_base: String,
    transport: Arc<dyn HttpTransport>,
    event_bus: EventBus,
}

impl LinkedInClient {
    /// Create a client against the production API
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(credentials, DEFAULT_API_BASE, Arc::new(RestTransport::new()))
    }

    /// Create a client against a specific API base URL
    pub fn with_api_base(credentials: Credentials, api_base: impl Into<String>) -> Self {
        Self::with_transport(credentials, api_base, Arc::new(RestTransport::new()))
    }

    /// Create a client with an injected transport
    pub fn with_transport(
        credentials: Credentials,
        api_base: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let api_base = api_base.into();
        Self {
            credentials,
            api_base: api_base.trim_end_matches('/').to_string(),
            transport,
            event_bus: EventBus::default(),
        }
    }

    /// Replace the event bus (builder style)
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    /// Subscribe to publication progress events
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.credentials.access_token)
    }

    /// Step 1: open an upload session for an image owned by the
    /// configured author.
    ///
    /// # Errors
    ///
    /// - `PublishError::UploadInitiationFailed` on any non-2xx status.
    /// - `PublishError::MalformedUploadResponse` when a 2xx response
    ///   lacks `value.uploadUrl` or `value.image` — the HTTP layer said
    ///   yes but the protocol contract was broken.
    pub async fn initiate_upload(&self) -> Result<UploadSession> {
        let request = WireRequest {
            method: Method::Post,
            url: format!("{}/rest/images?action=initializeUpload", self.api_base),
            headers: vec![
                ("Authorization".to_string(), self.bearer()),
                ("Content-Type".to_string(), "application/json".to_string()),
                (
                    "X-Restli-Protocol-Version".to_string(),
                    RESTLI_PROTOCOL_VERSION.to_string(),
                ),
                (
                    "LinkedIn-Version".to_string(),
                    self.credentials.api_version.clone(),
                ),
            ],
            body: Body::Json(json!({
                "initializeUploadRequest": {
                    "owner": self.credentials.author_urn,
                }
            })),
        };

        let response = self.transport.send(request).await?;
        debug!(status = response.status, "upload initiation response");

        if !response.is_success() {
            return Err(PublishError::UploadInitiationFailed {
                status: response.status,
                body: response.body,
            }
            .into());
        }

        let parsed: Value = match serde_json::from_str(&response.body) {
            Ok(v) => v,
            Err(_) => {
                return Err(PublishError::MalformedUploadResponse {
                    body: response.body,
                }
                .into())
            }
        };

        let upload_url = parsed.pointer("/value/uploadUrl").and_then(Value::as_str);
        let asset_urn = parsed.pointer("/value/image").and_then(Value::as_str);

        match (upload_url, asset_urn) {
            (Some(upload_url), Some(asset_urn)) => {
                debug!(asset_urn, "upload session opened");
                Ok(UploadSession {
                    upload_url: upload_url.to_string(),
                    asset_urn: AssetUrn::new(asset_urn),
                })
            }
            _ => Err(PublishError::MalformedUploadResponse {
                body: response.body,
            }
            .into()),
        }
    }

    /// Step 2: transfer the image bytes to the session's upload URL.
    ///
    /// Consumes the session — a transfer attempt uses it up whether or
    /// not it succeeds — and hands back the asset URN for step 3. The
    /// bearer token is attached even though the upload endpoint may not
    /// require it; LinkedIn's own examples do the same and the endpoint
    /// ignores it harmlessly.
    ///
    /// The local file is read fully into memory and never modified or
    /// deleted; cleanup stays with the caller.
    ///
    /// # Errors
    ///
    /// - `PublishError::Asset` if the file cannot be read at this
    ///   moment.
    /// - `PublishError::BinaryUploadFailed` on any non-2xx status. There
    ///   is no partial-upload resumption: the caller must restart from
    ///   [`Self::initiate_upload`] because asset URNs are single-use.
    pub async fn upload_binary(
        &self,
        session: UploadSession,
        asset: &ImageAsset,
    ) -> Result<AssetUrn> {
        let bytes = tokio::fs::read(&asset.path).await.map_err(|e| {
            PublishError::Asset(format!(
                "Failed to read image file {}: {}",
                asset.path.display(),
                e
            ))
        })?;

        let request = WireRequest {
            method: Method::Put,
            url: session.upload_url,
            headers: vec![
                ("Authorization".to_string(), self.bearer()),
                (
                    "Content-Type".to_string(),
                    "application/octet-stream".to_string(),
                ),
            ],
            body: Body::Bytes(bytes),
        };

        let response = self.transport.send(request).await?;
        debug!(status = response.status, "binary upload response");

        if !response.is_success() {
            return Err(PublishError::BinaryUploadFailed {
                status: response.status,
                body: response.body,
            }
            .into());
        }

        Ok(session.asset_urn)
    }

    /// Step 3: create the post binding author, caption, and the
    /// uploaded asset. Visibility is fixed to public main-feed
    /// distribution and the lifecycle state to `PUBLISHED`; drafts and
    /// scheduling are not supported by this surface.
    ///
    /// 201 is the only success status. The post id is taken from the
    /// `x-linkedin-id` header, falling back to `x-restli-id`. A 201
    /// with neither header still counts as success — the post exists —
    /// with `post_id: None`.
    ///
    /// # Errors
    ///
    /// - `LinkcastError::InvalidInput` for an empty caption, before any
    ///   network call.
    /// - `PublishError::PostCreationFailed` on any non-201 status,
    ///   carrying status and body verbatim. There is no idempotency
    ///   key, so re-invoking after a failure that actually created the
    ///   post server-side can duplicate it.
    pub async fn create_post(&self, caption: &str, asset: AssetUrn) -> Result<PostReceipt> {
        if caption.trim().is_empty() {
            return Err(LinkcastError::InvalidInput(
                "Caption cannot be empty".to_string(),
            ));
        }

        let asset_urn = asset.into_string();
        let request = WireRequest {
            method: Method::Post,
            url: format!("{}/rest/posts", self.api_base),
            headers: vec![
                ("Authorization".to_string(), self.bearer()),
                (
                    "Content-Type".to_string(),
                    "application/json; charset=utf-8".to_string(),
                ),
                (
                    "LinkedIn-Version".to_string(),
                    self.credentials.api_version.clone(),
                ),
            ],
            body: Body::Json(json!({
                "author": self.credentials.author_urn,
                "commentary": caption,
                "visibility": "PUBLIC",
                "distribution": {
                    "feedDistribution": "MAIN_FEED",
                },
                "content": {
                    "media": {
                        "id": asset_urn,
                    }
                },
                "lifecycleState": "PUBLISHED",
                "isReshareDisabledByAuthor": false,
            })),
        };

        let response = self.transport.send(request).await?;
        debug!(status = response.status, "post creation response");

        if response.status != 201 {
            return Err(PublishError::PostCreationFailed {
                status: response.status,
                body: response.body,
            }
            .into());
        }

        let post_id = POST_ID_HEADERS
            .iter()
            .find_map(|name| response.header(name))
            .map(str::to_string);

        if post_id.is_none() {
            warn!("post created but no identifier header was present");
        }

        Ok(PostReceipt {
            caption: caption.to_string(),
            asset_urn,
            post_id,
        })
    }

    /// Run the full three-step sequence: initiate, transfer, create.
    ///
    /// Either all three steps succeed and a receipt is returned, or the
    /// first failing step aborts the rest — there is no partial-success
    /// return value. Each invocation opens a fresh upload session, so a
    /// retried `publish` can never reuse state from a failed attempt.
    /// A `PublishFailed` event names the step that stopped the
    /// sequence.
    pub async fn publish(&self, caption: &str, asset: &ImageAsset) -> Result<PostReceipt> {
        if caption.trim().is_empty() {
            return Err(LinkcastError::InvalidInput(
                "Caption cannot be empty".to_string(),
            ));
        }

        info!(image = %asset.path.display(), bytes = asset.size, "publishing post");

        let session = match self.initiate_upload().await {
            Ok(session) => {
                self.event_bus.emit(Event::UploadInitiated {
                    asset_urn: session.asset_urn.as_str().to_string(),
                });
                session
            }
            Err(e) => {
                self.event_bus.emit(Event::PublishFailed {
                    step: PublishStep::Initiate,
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let asset_urn = match self.upload_binary(session, asset).await {
            Ok(urn) => {
                self.event_bus.emit(Event::BinaryUploaded {
                    asset_urn: urn.as_str().to_string(),
                    bytes: asset.size,
                });
                urn
            }
            Err(e) => {
                // The session from step 1 is now orphaned on LinkedIn's
                // side; no cancellation call exists.
                self.event_bus.emit(Event::PublishFailed {
                    step: PublishStep::Upload,
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        match self.create_post(caption, asset_urn).await {
            Ok(receipt) => {
                info!(post_id = receipt.post_id.as_deref().unwrap_or("unknown"), "post published");
                self.event_bus.emit(Event::PostPublished {
                    post_id: receipt.post_id.clone(),
                });
                Ok(receipt)
            }
            Err(e) => {
                // The uploaded asset remains orphaned.
                self.event_bus.emit(Event::PublishFailed {
                    step: PublishStep::Create,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
