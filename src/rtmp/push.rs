use bytes::Bytes;
use serde_json::{Map, Value};
use tracing::info;

use super::models::{
    Converter, ConverterBody, OperationStatus, RawOptions, StartPush, StartPushResponse, StopPush,
    TranscodeOptions, UpdatePush,
};
use super::{Region, RtmpService, ipv4_hint, require};
use crate::error::{Result, ServiceError};
use crate::vendor::{OutboundRequest, parse, stamp, with_query};

impl RtmpService {
    /// Create a converter pushing `rtcChannel` to `streamUrl + streamKey`.
    pub async fn start_push(&self, request: StartPush, request_id: &str) -> Result<Bytes> {
        let region: Region = request.region.parse()?;
        require(&request.rtc_channel, "rtcChannel")?;

        let mut converter = Converter {
            name: request.converter_name,
            rtmp_url: Some(format!("{}{}", request.stream_url, request.stream_key)),
            idle_time_out: request.idle_time_out,
            jitter_buffer_size_ms: request.jitter_buffer_size_ms,
            ..Default::default()
        };
        if request.use_transcoding {
            converter.transcode_options = Some(TranscodeOptions {
                rtc_channel: request.rtc_channel.clone(),
                audio_options: request.audio_options,
                video_options: request.video_options,
            });
        } else {
            let rtc_stream_uid = request
                .rtc_stream_uid
                .filter(|uid| !uid.is_empty())
                .ok_or_else(|| {
                    ServiceError::MalformedRequest(
                        "rtcStreamUid is required without transcoding".to_string(),
                    )
                })?;
            converter.raw_options = Some(RawOptions {
                rtc_channel: request.rtc_channel.clone(),
                rtc_stream_uid,
            });
        }

        let mut url = self.converters_url(region, None)?;
        if let Some(ip) = ipv4_hint(request.region_hint_ip.as_deref()) {
            url = with_query(&url, &[("regionHintIp", ip)])?;
        }

        let raw = self
            .dispatcher
            .dispatch(
                OutboundRequest::post(url, &ConverterBody { converter })?
                    .with_request_id(request_id),
            )
            .await?;
        let started: StartPushResponse = parse(&raw)?;
        info!(
            channel = %request.rtc_channel,
            %region,
            converter_id = %started.converter.id,
            request_id,
            "Media push started"
        );

        stamp(started)
    }

    pub async fn stop_push(&self, request: StopPush, request_id: &str) -> Result<Bytes> {
        let region: Region = request.region.parse()?;
        require(&request.converter_id, "converterId")?;

        let url = self.converters_url(region, Some(&request.converter_id))?;
        self.dispatcher
            .dispatch(OutboundRequest::delete(url).with_request_id(request_id))
            .await?;
        info!(converter_id = %request.converter_id, request_id, "Media push stopped");

        stamp(OperationStatus::success())
    }

    /// Codec settings of a running converter cannot change and are dropped.
    pub async fn update_push(&self, request: UpdatePush, request_id: &str) -> Result<Bytes> {
        let region: Region = request.region.parse()?;
        require(&request.converter_id, "converterId")?;

        let rtmp_url = match (&request.stream_url, &request.stream_key) {
            (Some(url), Some(key)) => Some(format!("{url}{key}")),
            _ => None,
        };
        let converter = Converter {
            transcode_options: Some(TranscodeOptions {
                rtc_channel: request.rtc_channel,
                audio_options: None,
                video_options: request.video_options.map(|video| video.without_codec()),
            }),
            rtmp_url,
            jitter_buffer_size_ms: request.jitter_buffer_size_ms,
            ..Default::default()
        };

        let mut url = self.converters_url(region, Some(&request.converter_id))?;
        if let Some(sequence) = request.sequence_id {
            let sequence = sequence.to_string();
            url = with_query(&url, &[("sequence", sequence.as_str())])?;
        }

        let raw = self
            .dispatcher
            .dispatch(
                OutboundRequest::patch(url, &ConverterBody { converter })?
                    .with_request_id(request_id),
            )
            .await?;
        let updated: StartPushResponse = parse(&raw)?;
        info!(converter_id = %updated.converter.id, request_id, "Media push updated");

        stamp(updated)
    }

    pub async fn list_push(&self, region: &str, request_id: &str) -> Result<Bytes> {
        let region: Region = region.parse()?;
        let url = self.converters_url(region, None)?;
        let raw = self
            .dispatcher
            .dispatch(OutboundRequest::get(url).with_request_id(request_id))
            .await?;
        let listing: Map<String, Value> = parse(&raw)?;
        stamp(listing)
    }
}
