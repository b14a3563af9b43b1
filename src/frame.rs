use std::cell::RefCell;
use std::rc::Rc;

use deriva_core::{AnalysisSession, FrameClock, SpectrumFrame, TickOutcome};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::audio::MicInput;
use crate::constants::SILENCE_DB;

pub struct FrameContext {
    pub session: AnalysisSession,
    input: Option<MicInput>,
    spectrum: SpectrumFrame,
    db_buf: Vec<f32>,
    clock: FrameClock,
}

impl FrameContext {
    pub fn new(session: AnalysisSession) -> Self {
        let bins = session.bins();
        Self {
            session,
            input: None,
            spectrum: SpectrumFrame::zeroed(bins),
            db_buf: vec![SILENCE_DB; bins],
            clock: FrameClock::new(),
        }
    }

    pub fn bins(&self) -> usize {
        self.spectrum.len()
    }

    pub fn attach(&mut self, input: MicInput) {
        self.db_buf.clear();
        self.db_buf.resize(input.bin_count(), SILENCE_DB);
        if let Some(old) = self.input.replace(input) {
            _ = old.audio_ctx.close();
        }
    }

    pub fn frame(&mut self) {
        // Ticked even while paused so the first step after resuming is short.
        let dt = self.clock.tick();
        let Some(input) = &self.input else {
            return;
        };
        input.analyser.get_float_frequency_data(&mut self.db_buf);
        self.spectrum.fill_from_decibels(&self.db_buf);
        if let TickOutcome::Emitted { raw, channels } = self.session.tick(&self.spectrum, dt) {
            log::trace!("[frame] raw={:.4} channels={} dt={:.4}", raw, channels, dt);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        match frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.frame(),
            Err(_) => log::warn!("[frame] context busy; frame dropped"),
        }
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
