use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use shared::{
    domain::{seed_state, ChecklistState, FoodId, LogEntry, Participant},
    migrate::normalize,
    protocol::{ErrorBody, MarkRequest, RawState, StateEnvelope},
};
use storage::BlobStore;

pub mod config;
pub mod error;
pub mod view;

pub use config::{build_state_source, load_settings, Settings, SourceMode};
pub use error::StateSourceError;

pub type SourceResult<T> = Result<T, StateSourceError>;

/// Versioned key the local fallback persists the whole state under.
pub const LOCAL_STATE_KEY: &str = "churras_checklist_v4";

/// The four-operation contract shared by the remote service client and the
/// local fallback. Every mutating call is a full round trip returning the
/// complete resulting state; callers never apply deltas.
#[async_trait]
pub trait StateSource: Send + Sync {
    async fn load(&self) -> SourceResult<ChecklistState>;
    async fn mark(&self, food_id: &FoodId, by: Participant) -> SourceResult<ChecklistState>;
    async fn clear_log(&self) -> SourceResult<ChecklistState>;
    async fn reset(&self) -> SourceResult<ChecklistState>;
}

/// JSON client for the remote checklist service.
pub struct RemoteStateSource {
    http: Client,
    api_base: String,
}

impl RemoteStateSource {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            api_base,
        }
    }

    async fn post_mutation<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SourceResult<ChecklistState> {
        let response = self
            .http
            .post(format!("{}{path}", self.api_base))
            .json(body)
            .send()
            .await?;
        let envelope: StateEnvelope = decode_response(response).await?;
        Ok(normalize(envelope.state))
    }
}

/// Status handling is manual rather than `error_for_status()`: a failed
/// response's `message`/`error` body text is the surfaced error, with an
/// `HTTP <status>` fallback, and an unparseable error body counts as empty.
async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> SourceResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        let message = body
            .into_message()
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(StateSourceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl StateSource for RemoteStateSource {
    async fn load(&self) -> SourceResult<ChecklistState> {
        let response = self
            .http
            .get(format!("{}/state", self.api_base))
            .send()
            .await?;
        let raw: RawState = decode_response(response).await?;
        Ok(normalize(raw))
    }

    async fn mark(&self, food_id: &FoodId, by: Participant) -> SourceResult<ChecklistState> {
        let body = MarkRequest {
            food_id: food_id.clone(),
            by,
        };
        self.post_mutation("/mark", &body).await
    }

    async fn clear_log(&self) -> SourceResult<ChecklistState> {
        self.post_mutation("/clear-log", &serde_json::json!({})).await
    }

    async fn reset(&self) -> SourceResult<ChecklistState> {
        self.post_mutation("/reset", &serde_json::json!({})).await
    }
}

/// Local fallback mirroring the remote contract over a sqlite blob store.
/// The full state JSON lives under [`LOCAL_STATE_KEY`] and is read/written
/// wholesale on every operation.
pub struct LocalStateSource {
    store: BlobStore,
    key: String,
}

impl LocalStateSource {
    pub fn new(store: BlobStore) -> Self {
        Self::with_key(store, LOCAL_STATE_KEY)
    }

    pub fn with_key(store: BlobStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    async fn load_or_seed(&self) -> SourceResult<ChecklistState> {
        let blob = self
            .store
            .read(&self.key)
            .await
            .map_err(StateSourceError::Storage)?;

        let Some(text) = blob else {
            return Ok(seed_state());
        };

        match serde_json::from_str::<RawState>(&text) {
            Ok(raw) => Ok(normalize(raw)),
            Err(err) => {
                warn!(key = %self.key, "stored checklist blob is unreadable, using seed: {err}");
                Ok(seed_state())
            }
        }
    }

    async fn persist(&self, state: &ChecklistState) -> SourceResult<()> {
        let payload = serde_json::to_string(state)
            .map_err(|err| StateSourceError::Storage(err.into()))?;
        self.store
            .write(&self.key, &payload)
            .await
            .map_err(StateSourceError::Storage)
    }
}

#[async_trait]
impl StateSource for LocalStateSource {
    async fn load(&self) -> SourceResult<ChecklistState> {
        self.load_or_seed().await
    }

    async fn mark(&self, food_id: &FoodId, by: Participant) -> SourceResult<ChecklistState> {
        let mut state = self.load_or_seed().await?;

        let (id, name) = {
            let food = state
                .foods
                .iter_mut()
                .find(|food| &food.id == food_id)
                .ok_or_else(|| StateSourceError::FoodNotFound(food_id.clone()))?;
            food.counts.bump(by);
            (food.id.clone(), food.name.clone())
        };

        state.log.push(LogEntry {
            food_id: id,
            food_name: name,
            by,
            ts: Utc::now(),
        });

        self.persist(&state).await?;
        Ok(state)
    }

    async fn clear_log(&self) -> SourceResult<ChecklistState> {
        let mut state = self.load_or_seed().await?;
        state.log.clear();
        self.persist(&state).await?;
        Ok(state)
    }

    async fn reset(&self) -> SourceResult<ChecklistState> {
        let state = seed_state();
        self.persist(&state).await?;
        Ok(state)
    }
}

/// Domain operations over whichever state source was configured. Thin by
/// design: every operation is one round trip whose returned state replaces
/// whatever the caller rendered before.
pub struct ChecklistClient {
    source: Arc<dyn StateSource>,
}

impl ChecklistClient {
    pub fn new(source: Arc<dyn StateSource>) -> Self {
        Self { source }
    }

    pub async fn load(&self) -> SourceResult<ChecklistState> {
        self.source.load().await
    }

    pub async fn mark_food(
        &self,
        food_id: &FoodId,
        by: Participant,
    ) -> SourceResult<ChecklistState> {
        info!(food = %food_id, by = %by, "marking food");
        self.source.mark(food_id, by).await
    }

    pub async fn clear_log(&self) -> SourceResult<ChecklistState> {
        info!("clearing mark log");
        self.source.clear_log().await
    }

    pub async fn reset_all(&self) -> SourceResult<ChecklistState> {
        info!("resetting checklist to seed state");
        self.source.reset().await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
