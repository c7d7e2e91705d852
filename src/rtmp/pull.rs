use bytes::Bytes;
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::models::{
    OperationStatus, Player, PlayerBody, PlayerUpdate, PullAudioOptions, StartPull,
    StartPullResponse, StopPull, UpdatePull,
};
use super::{Region, RtmpService, ipv4_hint, require};
use crate::error::Result;
use crate::token::RtcRole;
use crate::vendor::{OutboundRequest, parse, stamp, with_query};

pub const DEFAULT_IDLE_TIMEOUT_SECONDS: u32 = 300;
pub const MIN_IDLE_TIMEOUT_SECONDS: u32 = 5;
pub const MAX_IDLE_TIMEOUT_SECONDS: u32 = 600;

impl RtmpService {
    /// Start a cloud player injecting `streamUrl` into `channelName`.
    pub async fn start_pull(&self, request: StartPull, request_id: &str) -> Result<Bytes> {
        let region: Region = request.region.parse()?;
        require(&request.channel_name, "channelName")?;
        require(&request.stream_url, "streamUrl")?;

        let uid = request
            .uid
            .filter(|uid| !uid.is_empty())
            .unwrap_or_else(|| self.uids.next_string());
        let token = self
            .tokens
            .rtc_token(&request.channel_name, &uid, RtcRole::Publisher)?;

        // Audio options only accompany explicit video options.
        let (audio_options, video_options) = match request.video_options {
            Some(video) => (
                Some(request.audio_options.unwrap_or(PullAudioOptions { profile: 0 })),
                Some(video),
            ),
            None => (None, None),
        };

        let player = Player {
            audio_options,
            video_options,
            stream_url: request.stream_url,
            channel_name: request.channel_name.clone(),
            token,
            uid,
            idle_time_out: request.idle_time_out.map(idle_timeout),
            play_ts: request.play_ts,
            encrypt_mode: request.encrypt_mode,
            player_name: request.player_name,
        };

        let mut url = self.players_url(region, None)?;
        if let Some(ip) = ipv4_hint(request.stream_origin_ip.as_deref()) {
            url = with_query(&url, &[("streamIp", ip)])?;
        }

        let raw = self
            .dispatcher
            .dispatch(
                OutboundRequest::post(url, &PlayerBody { player })?.with_request_id(request_id),
            )
            .await?;
        let started: StartPullResponse = parse(&raw)?;
        info!(
            channel = %request.channel_name,
            %region,
            player_id = %started.player.id,
            request_id,
            "Media pull started"
        );

        stamp(started)
    }

    pub async fn stop_pull(&self, request: StopPull, request_id: &str) -> Result<Bytes> {
        let region: Region = request.region.parse()?;
        require(&request.player_id, "playerId")?;

        let url = self.players_url(region, Some(&request.player_id))?;
        self.dispatcher
            .dispatch(OutboundRequest::delete(url).with_request_id(request_id))
            .await?;
        info!(player_id = %request.player_id, request_id, "Media pull stopped");

        stamp(OperationStatus::success())
    }

    pub async fn update_pull(&self, request: UpdatePull, request_id: &str) -> Result<Bytes> {
        let region: Region = request.region.parse()?;
        require(&request.player_id, "playerId")?;

        let update = PlayerUpdate {
            stream_url: request.stream_url,
            audio_options: request.audio_options,
            video_options: request.video_options,
            is_pause: request.is_pause,
            seek_position: request.seek_position,
        };

        let mut url = self.players_url(region, Some(&request.player_id))?;
        if let Some(sequence) = request.sequence_id {
            let sequence = sequence.to_string();
            url = with_query(&url, &[("sequence", sequence.as_str())])?;
        }

        self.dispatcher
            .dispatch(
                OutboundRequest::patch(url, &PlayerBody { player: update })?
                    .with_request_id(request_id),
            )
            .await?;
        info!(player_id = %request.player_id, request_id, "Media pull updated");

        stamp(OperationStatus::success())
    }

    pub async fn list_pull(&self, region: &str, request_id: &str) -> Result<Bytes> {
        let region: Region = region.parse()?;
        let url = self.players_url(region, None)?;
        let raw = self
            .dispatcher
            .dispatch(OutboundRequest::get(url).with_request_id(request_id))
            .await?;
        let listing: Map<String, Value> = parse(&raw)?;
        stamp(listing)
    }
}

fn idle_timeout(requested: u32) -> u32 {
    if (MIN_IDLE_TIMEOUT_SECONDS..=MAX_IDLE_TIMEOUT_SECONDS).contains(&requested) {
        requested
    } else {
        warn!(
            requested,
            default = DEFAULT_IDLE_TIMEOUT_SECONDS,
            "idleTimeOut out of range, using default"
        );
        DEFAULT_IDLE_TIMEOUT_SECONDS
    }
}
