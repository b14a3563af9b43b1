use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use deriva_core::{
    AnalysisSession, ChannelId, ColorListener, ColorUpdate, SpectrumFrame, TickOutcome,
    ValueTrack,
};

#[cfg(feature = "capture")]
mod capture;
mod cli;
mod spectrum;
mod synth;

use cli::Args;
use spectrum::SpectrumAnalyzer;
use synth::{SyntheticSignal, SAMPLE_RATE};

/// Logs every `every`th update it receives.
struct ColorLog {
    label: &'static str,
    every: u64,
    seen: u64,
}

impl ColorLog {
    fn new(label: &'static str, every: u64) -> Self {
        Self {
            label,
            every,
            seen: 0,
        }
    }
}

impl ColorListener for ColorLog {
    fn on_color_updated(&mut self, update: &ColorUpdate) -> anyhow::Result<()> {
        if self.every > 0 && self.seen % self.every == 0 {
            log::info!(
                "[{}] #{} {} scalar={:.3}",
                self.label,
                self.seen,
                update.color.to_hex(),
                update.scalar
            );
        }
        self.seen += 1;
        Ok(())
    }
}

#[derive(Default)]
struct RunStats {
    emitted: u64,
    skipped: u64,
}

impl RunStats {
    fn record(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Emitted { .. } => self.emitted += 1,
            TickOutcome::Skipped => self.skipped += 1,
            TickOutcome::Idle => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = args.session_config()?;
    let mut session = AnalysisSession::from_config(&config)?;

    let near = Rc::new(RefCell::new(ColorLog::new("near", args.log_every)));
    let far = Rc::new(RefCell::new(ColorLog::new("far", args.log_every)));
    session.dispatcher().subscribe(ChannelId::NEAR, near);
    session.dispatcher().subscribe(ChannelId::FAR, far);

    if args.record.is_some() {
        session.start_recording();
    }
    session.start();

    let stats = match &args.replay {
        Some(path) => run_replay(&mut session, &args, path)?,
        None => run_live(&mut session, &args)?,
    };

    log::info!(
        "[native] done: {} emitted, {} skipped",
        stats.emitted,
        stats.skipped
    );
    for channel in [ChannelId::NEAR, ChannelId::FAR] {
        if let Some(s) = session.smoother(channel) {
            let state = s.state();
            log::info!(
                "[native] {} final {} scalar={:.3}",
                channel,
                state.color.to_hex(),
                state.scalar
            );
        }
    }

    if let Some(path) = &args.record {
        let track = session.take_recording().unwrap_or_default();
        fs::write(path, track.to_bytes())
            .with_context(|| format!("writing track to {}", path.display()))?;
        log::info!(
            "[native] recorded {} values to {} (range {:?}..{:?})",
            track.len(),
            path.display(),
            track.min(),
            track.max()
        );
    }
    Ok(())
}

fn run_live(session: &mut AnalysisSession, args: &Args) -> anyhow::Result<RunStats> {
    #[cfg(feature = "capture")]
    if args.capture {
        return run_capture(session, args);
    }
    Ok(run_synthetic(session, args))
}

fn run_synthetic(session: &mut AnalysisSession, args: &Args) -> RunStats {
    let bins = session.bins();
    let mut analyzer = SpectrumAnalyzer::new(bins);
    let mut samples = vec![0.0; analyzer.input_len()];
    let mut frame = SpectrumFrame::zeroed(bins);
    let mut signal = SyntheticSignal::new(args.seed, SAMPLE_RATE, args.bpm);
    let dt = args.frame_dt();
    log::info!(
        "[native] synthetic signal: {} ticks at {} fps, {} bins",
        args.ticks,
        args.fps,
        bins
    );

    let mut stats = RunStats::default();
    for _ in 0..args.ticks {
        signal.next_window(dt, &mut samples);
        analyzer.process(&samples, frame.bins_mut());
        stats.record(session.tick(&frame, dt));
    }
    stats
}

fn run_replay(
    session: &mut AnalysisSession,
    args: &Args,
    path: &std::path::Path,
) -> anyhow::Result<RunStats> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let track = ValueTrack::from_bytes(&bytes)?;
    log::info!(
        "[native] replaying {} values from {}",
        track.len(),
        path.display()
    );
    let dt = args.frame_dt();
    let mut stats = RunStats::default();
    for value in track.replay().take(args.ticks as usize) {
        stats.record(session.push_value(value, dt));
    }
    Ok(stats)
}

#[cfg(feature = "capture")]
fn run_capture(session: &mut AnalysisSession, args: &Args) -> anyhow::Result<RunStats> {
    use deriva_core::FrameClock;
    use std::time::Duration;

    let bins = session.bins();
    let mut analyzer = SpectrumAnalyzer::new(bins);
    let source = capture::CaptureSource::open(analyzer.input_len() * 4)?;
    log::info!(
        "[native] capturing at {} Hz, {} bins",
        source.sample_rate(),
        bins
    );
    let mut samples = vec![0.0; analyzer.input_len()];
    let mut frame = SpectrumFrame::zeroed(bins);
    let mut clock = FrameClock::new();
    let mut stats = RunStats::default();
    let period = Duration::from_secs_f32(args.frame_dt());

    for _ in 0..args.ticks {
        std::thread::sleep(period);
        let dt = clock.tick();
        if !source.latest(&mut samples) {
            continue;
        }
        analyzer.process(&samples, frame.bins_mut());
        stats.record(session.tick(&frame, dt));
    }
    Ok(stats)
}
