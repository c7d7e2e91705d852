//! Cloud recording facade: acquire/start, stop, query and the two update calls.

pub mod builders;
pub mod file_list;
pub mod models;

use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, ServiceError};
use crate::ids::UidGenerator;
use crate::storage::StorageConfig;
use crate::token::{RtcRole, TokenIssuer};
use crate::vendor::{Dispatch, OutboundRequest, parse, stamp};

use builders::{
    RESOURCE_EXPIRED_HOURS, RecordingMode, SessionAction, acquire_url, default_recording_config,
    recording_root, scene_code, session_url, start_url,
};
pub use file_list::{FileDetail, FileList, FileListEntry};
use models::{
    AcquireClientRequest, AcquireResponse, ActiveRecordingResponse, ClientRequest,
    RecordingSession, SessionBody, StartRecording, StartResponse, StopClientRequest,
    StopRecording, UpdateLayout, UpdateResponse, UpdateSubscription,
};

pub struct CloudRecordingService {
    root: String,
    storage: StorageConfig,
    dispatcher: Arc<dyn Dispatch>,
    tokens: Arc<dyn TokenIssuer>,
    uids: UidGenerator,
}

impl CloudRecordingService {
    /// `base_url` already includes the recording path, e.g. `https://host/v1/apps`.
    pub fn new(
        base_url: &str,
        app_id: &str,
        storage: StorageConfig,
        dispatcher: Arc<dyn Dispatch>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            root: recording_root(base_url, app_id),
            storage,
            dispatcher,
            tokens,
            uids: UidGenerator::new(),
        }
    }

    pub fn with_uid_generator(mut self, uids: UidGenerator) -> Self {
        self.uids = uids;
        self
    }

    /// Acquire a resource and start recording `channelName` with a fresh bot uid.
    pub async fn start(&self, request: StartRecording) -> Result<Bytes> {
        let channel = request.channel_name.trim();
        if channel.is_empty() {
            return Err(ServiceError::MalformedRequest(
                "channelName is required".to_string(),
            ));
        }
        let mode = RecordingMode::resolve(request.recording_mode.as_deref())?;
        let scene = scene_code(request.scene_mode.as_deref());

        let uid = self.uids.next_string();
        let token = self.tokens.rtc_token(channel, &uid, RtcRole::Subscriber)?;

        let client_request = ClientRequest {
            token: Some(token),
            storage_config: self.storage.for_session(channel, Utc::now()),
            recording_config: request
                .recording_config
                .unwrap_or_else(default_recording_config),
            recording_file_config: request.recording_file_config,
            snapshot_config: request.snapshot_config,
            extension_service_config: request.extension_service_config,
            apps_collection: request.apps_collection,
            transcode_options: request.transcode_options,
        };

        let resource_id = self
            .acquire(
                channel,
                &uid,
                AcquireClientRequest {
                    scene,
                    resource_expired_hour: RESOURCE_EXPIRED_HOURS,
                    start_parameter: client_request.clone(),
                    exclude_resource_ids: request.exclude_resource_ids,
                },
            )
            .await?;
        info!(channel, %uid, %resource_id, %mode, "Acquired recording resource");

        let started = self
            .start_with_resource(channel, &uid, &resource_id, mode, client_request)
            .await?;
        info!(channel, sid = %started.sid, "Recording started");

        stamp(started)
    }

    pub async fn acquire(
        &self,
        cname: &str,
        uid: &str,
        client_request: AcquireClientRequest,
    ) -> Result<String> {
        let body = SessionBody {
            cname: cname.to_string(),
            uid: uid.to_string(),
            client_request,
        };
        let raw = self
            .dispatcher
            .dispatch(OutboundRequest::post(acquire_url(&self.root), &body)?)
            .await?;
        let acquired: AcquireResponse = parse(&raw)?;
        Ok(acquired.resource_id)
    }

    async fn start_with_resource(
        &self,
        cname: &str,
        uid: &str,
        resource_id: &str,
        mode: RecordingMode,
        client_request: ClientRequest,
    ) -> Result<StartResponse> {
        let body = SessionBody {
            cname: cname.to_string(),
            uid: uid.to_string(),
            client_request,
        };
        let url = start_url(&self.root, resource_id, mode)?;
        let raw = self
            .dispatcher
            .dispatch(OutboundRequest::post(url, &body)?)
            .await?;
        parse(&raw)
    }

    /// Stop a session. The vendor must report a decodable file list.
    pub async fn stop(&self, request: StopRecording) -> Result<Bytes> {
        let session = request.session;
        let mode = session_mode(&session)?;

        let body = SessionBody {
            cname: session.cname.clone(),
            uid: session.uid.clone(),
            client_request: StopClientRequest {
                async_stop: request.async_stop,
            },
        };
        let url = session_url(
            &self.root,
            &session.resource_id,
            &session.sid,
            mode,
            SessionAction::Stop,
        )?;
        let raw = self
            .dispatcher
            .dispatch(OutboundRequest::post(url, &body)?)
            .await?;

        let mut stopped: ActiveRecordingResponse = parse(&raw)?;
        let server = stopped
            .server_response
            .as_mut()
            .ok_or(ServiceError::IncompleteServerResponse)?;
        let files = server.normalize_file_list()?;
        info!(
            cname = %session.cname,
            sid = %session.sid,
            files = files.len(),
            mode = files.mode(),
            "Recording stopped"
        );

        stamp(stopped)
    }

    /// Query a session. Only a file list the vendor actually reported is validated.
    pub async fn query(&self, session: RecordingSession) -> Result<Bytes> {
        let mode = session_mode(&session)?;
        let url = session_url(
            &self.root,
            &session.resource_id,
            &session.sid,
            mode,
            SessionAction::Query,
        )?;
        let raw = self.dispatcher.dispatch(OutboundRequest::get(url)).await?;

        let mut status: ActiveRecordingResponse = parse(&raw)?;
        if let Some(server) = status.server_response.as_mut() {
            if server.has_file_list() {
                server.normalize_file_list()?;
            }
        }
        debug!(sid = %session.sid, "Queried recording");

        stamp(status)
    }

    pub async fn update_subscription(&self, request: UpdateSubscription) -> Result<Bytes> {
        request.update.validate()?;
        let session = request.session;
        let mode = session_mode(&session)?;

        let mut update = request.update;
        update.drop_empty_alternatives();
        let body = SessionBody {
            cname: session.cname.clone(),
            uid: session.uid.clone(),
            client_request: update,
        };
        let url = session_url(
            &self.root,
            &session.resource_id,
            &session.sid,
            mode,
            SessionAction::Update,
        )?;
        let raw = self
            .dispatcher
            .dispatch(OutboundRequest::post(url, &body)?)
            .await?;
        let updated: UpdateResponse = parse(&raw)?;
        info!(sid = %updated.sid, "Recording subscription updated");

        stamp(updated)
    }

    pub async fn update_layout(&self, request: UpdateLayout) -> Result<Bytes> {
        let session = request.session;
        let mode = session_mode(&session)?;

        let body = SessionBody {
            cname: session.cname.clone(),
            uid: session.uid.clone(),
            client_request: request.layout,
        };
        let url = session_url(
            &self.root,
            &session.resource_id,
            &session.sid,
            mode,
            SessionAction::UpdateLayout,
        )?;
        let raw = self
            .dispatcher
            .dispatch(OutboundRequest::post(url, &body)?)
            .await?;
        let updated: UpdateResponse = parse(&raw)?;
        info!(sid = %updated.sid, "Recording layout updated");

        stamp(updated)
    }
}

fn session_mode(session: &RecordingSession) -> Result<RecordingMode> {
    session.ensure_complete()?;
    RecordingMode::resolve(session.recording_mode.as_deref())
}
