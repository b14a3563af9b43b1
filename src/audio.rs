use anyhow::anyhow;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

use crate::bridge::fft_size_for_bins;
use crate::constants::ANALYSER_SMOOTHING;

/// Live microphone routed into an analyser. Dropping it releases nothing on
/// the JS side; the nodes live as long as their `AudioContext`.
pub struct MicInput {
    pub audio_ctx: web::AudioContext,
    pub analyser: web::AnalyserNode,
    _source: web::MediaStreamAudioSourceNode,
}

impl MicInput {
    pub fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count() as usize
    }
}

fn js_error(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

pub async fn open_microphone(bins: usize) -> anyhow::Result<MicInput> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let devices = window.navigator().media_devices().map_err(js_error)?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(js_error)?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    let audio_ctx = web::AudioContext::new().map_err(js_error)?;
    _ = audio_ctx.resume();
    let source = audio_ctx
        .create_media_stream_source(&stream)
        .map_err(js_error)?;
    let analyser = create_analyser(&audio_ctx, bins)?;
    source
        .connect_with_audio_node(&analyser)
        .map_err(js_error)?;
    log::info!(
        "[audio] microphone attached: {} Hz, fft {}, {} bins",
        audio_ctx.sample_rate(),
        analyser.fft_size(),
        analyser.frequency_bin_count()
    );
    Ok(MicInput {
        audio_ctx,
        analyser,
        _source: source,
    })
}

pub fn create_analyser(
    audio_ctx: &web::AudioContext,
    bins: usize,
) -> anyhow::Result<web::AnalyserNode> {
    let analyser = web::AnalyserNode::new(audio_ctx).map_err(js_error)?;
    analyser.set_fft_size(fft_size_for_bins(bins));
    analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING);
    Ok(analyser)
}
