//! One audio-analysis session: a reducer feeding one smoother per channel,
//! whose updates fan out through a shared dispatcher.
//!
//! Colors only move while the session is running; a paused or stopped
//! session ignores frames so listeners keep their last color.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::config::SessionConfig;
use crate::dispatch::{ChannelId, Dispatcher};
use crate::error::ConfigError;
use crate::reducer::{Reducer, SpectrumReducer};
use crate::smoother::SignalSmoother;
use crate::spectrum::SpectrumFrame;
use crate::track::ValueTrack;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Stopped,
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Session not running; frame ignored.
    Idle,
    /// Reducer produced a non-finite value; nothing emitted.
    Skipped,
    /// `channels` smoothers emitted an update for `raw`.
    Emitted { raw: f32, channels: usize },
}

pub struct AnalysisSession {
    config: SessionConfig,
    reducer: Reducer,
    smoothers: SmallVec<[(ChannelId, SignalSmoother); 2]>,
    dispatcher: Rc<Dispatcher>,
    state: SessionState,
    recorder: Option<ValueTrack>,
}

impl AnalysisSession {
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        Self::with_dispatcher(config, Rc::new(Dispatcher::new()))
    }

    /// Build a session that publishes into an existing dispatcher, so
    /// listeners survive a session being replaced.
    pub fn with_dispatcher(
        config: &SessionConfig,
        dispatcher: Rc<Dispatcher>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let reducer = config.reducer.build()?;
        let smoothers: SmallVec<[(ChannelId, SignalSmoother); 2]> = config
            .channels
            .iter()
            .map(|c| {
                c.palette
                    .build()
                    .map(|target| (c.channel, SignalSmoother::new(target, config.smoothing_rate)))
            })
            .collect::<Result<_, ConfigError>>()?;
        log::info!(
            "[session] reducer={} bins={} channels={} rate={}",
            reducer.name(),
            reducer.required_bins(),
            smoothers.len(),
            config.smoothing_rate
        );
        Ok(Self {
            config: config.clone(),
            reducer,
            smoothers,
            dispatcher,
            state: SessionState::Stopped,
            recorder: None,
        })
    }

    pub fn start(&mut self) {
        self.state = SessionState::Running;
    }

    pub fn pause(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Paused;
        }
    }

    /// Stop and forget all history: smoothers return to their initial
    /// state and the reducer is rebuilt.
    pub fn stop(&mut self) {
        self.state = SessionState::Stopped;
        for (_, s) in self.smoothers.iter_mut() {
            s.reset();
        }
        match self.config.reducer.build() {
            Ok(r) => self.reducer = r,
            // validated at construction
            Err(e) => log::error!("[session] reducer rebuild failed: {}", e),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Spectrum length the host should deliver.
    pub fn bins(&self) -> usize {
        self.config.reducer.bins()
    }

    pub fn tick(&mut self, frame: &SpectrumFrame, dt: f32) -> TickOutcome {
        if self.state != SessionState::Running {
            return TickOutcome::Idle;
        }
        let raw = self.reducer.reduce(frame);
        self.emit(raw, dt)
    }

    /// Feed an already reduced value, e.g. from a [`ValueTrack`] replay.
    /// Like [`tick`](Self::tick), does nothing unless the session is running.
    pub fn push_value(&mut self, raw: f32, dt: f32) -> TickOutcome {
        if self.state != SessionState::Running {
            return TickOutcome::Idle;
        }
        self.emit(raw, dt)
    }

    fn emit(&mut self, raw: f32, dt: f32) -> TickOutcome {
        if !raw.is_finite() {
            log::trace!("[session] skipping tick, raw={}", raw);
            return TickOutcome::Skipped;
        }
        if let Some(track) = self.recorder.as_mut() {
            track.push(raw);
        }
        let mut channels = 0;
        for (channel, smoother) in self.smoothers.iter_mut() {
            if let Some(update) = smoother.update(raw, dt) {
                self.dispatcher.notify(*channel, &update);
                channels += 1;
            }
        }
        if channels == 0 {
            return TickOutcome::Skipped;
        }
        TickOutcome::Emitted { raw, channels }
    }

    pub fn dispatcher(&self) -> &Rc<Dispatcher> {
        &self.dispatcher
    }

    pub fn smoother(&self, channel: ChannelId) -> Option<&SignalSmoother> {
        self.smoothers
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, s)| s)
    }

    pub fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    /// Start recording every accepted raw value into a fresh track.
    pub fn start_recording(&mut self) {
        self.recorder = Some(ValueTrack::new());
    }

    /// Stop recording and hand back what was captured.
    pub fn take_recording(&mut self) -> Option<ValueTrack> {
        self.recorder.take()
    }
}
