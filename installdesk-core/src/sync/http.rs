//! HTTP transport for the appointment backend.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::SchedulerConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::sync::SyncClient;
use crate::sync::protocol::{
    BackendCommand, CreateAppointment, CreateReply, DeleteAppointment, EditAppointment, EditReply,
    ListEvents, Method, MoveAppointment, ReplyEnvelope, ReplyStatus,
};
use crate::view::ViewEvent;

#[derive(Debug, Clone)]
pub struct HttpSyncClient {
    base: Url,
    http: reqwest::Client,
}

impl HttpSyncClient {
    pub fn new(base_url: &str) -> ScheduleResult<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ScheduleError::Config(format!("Invalid backend_url '{base_url}': {e}")))?;

        // Shown directory-style; endpoints are segments below it
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(HttpSyncClient {
            base,
            http: reqwest::Client::new(),
        })
    }

    pub fn from_config(config: &SchedulerConfig) -> ScheduleResult<Self> {
        Self::new(&config.backend_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[String]) -> ScheduleResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ScheduleError::Config(format!("Backend URL '{}' cannot take a path", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a typed command and decode its reply.
    pub async fn call<C: BackendCommand>(&self, command: &C) -> ScheduleResult<C::Reply> {
        let url = self.endpoint(&command.path())?;
        debug!(%url, "backend request");

        let request = match command.method() {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url).form(command.form().pairs()),
        };

        let response = request
            .send()
            .await
            .map_err(|e| ScheduleError::TransportFailure(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScheduleError::TransportFailure(e.to_string()))?;

        if !status.is_success() {
            // Some backends answer a rejection with a 4xx and an envelope
            return match serde_json::from_str::<ReplyEnvelope>(&body) {
                Ok(envelope) if envelope.status == ReplyStatus::Error => Err(envelope.into_error()),
                _ => Err(ScheduleError::TransportFailure(format!(
                    "Backend returned HTTP {status}"
                ))),
            };
        }

        C::decode(&body)
    }
}

#[async_trait]
impl SyncClient for HttpSyncClient {
    async fn list_events(&self) -> ScheduleResult<Vec<ViewEvent>> {
        self.call(&ListEvents).await
    }

    async fn move_appointment(&self, request: MoveAppointment) -> ScheduleResult<()> {
        self.call(&request).await.map(|_| ())
    }

    async fn edit_appointment(&self, request: EditAppointment) -> ScheduleResult<EditReply> {
        self.call(&request).await
    }

    async fn create_appointment(&self, request: CreateAppointment) -> ScheduleResult<CreateReply> {
        self.call(&request).await
    }

    async fn delete_appointment(&self, request: DeleteAppointment) -> ScheduleResult<()> {
        self.call(&request).await.map(|_| ())
    }
}
