//! Live input from the default capture device.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Sample;

/// Mono ring of the most recent input samples, filled from the cpal
/// callback thread.
pub struct CaptureSource {
    _stream: cpal::Stream,
    ring: Arc<Mutex<Vec<f32>>>,
    sample_rate: u32,
}

impl CaptureSource {
    pub fn open(capacity: usize) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("no input device"))?;
        let supported = device
            .default_input_config()
            .context("querying default input config")?;
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let channels = config.channels as usize;
        log::info!(
            "[capture] {} Hz, {} channel(s), {:?}",
            config.sample_rate.0,
            channels,
            format
        );

        let ring = Arc::new(Mutex::new(Vec::with_capacity(capacity * 2)));
        let stream = match format {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config, channels, capacity, Arc::clone(&ring))?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config, channels, capacity, Arc::clone(&ring))?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config, channels, capacity, Arc::clone(&ring))?
            }
            other => return Err(anyhow!("unsupported sample format {:?}", other)),
        };
        stream.play().context("starting input stream")?;
        Ok(Self {
            _stream: stream,
            ring,
            sample_rate: config.sample_rate.0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Copy the newest `out.len()` samples. False until enough have arrived.
    pub fn latest(&self, out: &mut [f32]) -> bool {
        let Ok(ring) = self.ring.lock() else {
            return false;
        };
        if ring.len() < out.len() {
            return false;
        }
        out.copy_from_slice(&ring[ring.len() - out.len()..]);
        true
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    capacity: usize,
    ring: Arc<Mutex<Vec<f32>>>,
) -> anyhow::Result<cpal::Stream>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let err_fn = |e: cpal::StreamError| log::error!("[capture] stream error: {}", e);
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let Ok(mut ring) = ring.lock() else {
                return;
            };
            for frame in data.chunks(channels.max(1)) {
                let sum: f32 = frame.iter().map(|s| (*s).to_sample::<f32>()).sum();
                ring.push(sum / frame.len() as f32);
            }
            if ring.len() > capacity {
                let excess = ring.len() - capacity;
                ring.drain(..excess);
            }
        },
        err_fn,
        None,
    )?;
    Ok(stream)
}
