#![cfg(target_arch = "wasm32")]
//! Browser front-end: microphone spectra from a WebAudio `AnalyserNode`,
//! reduced and smoothed by `deriva-core` on every animation frame, with the
//! resulting colors delivered to JS callbacks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use deriva_core::{
    AnalysisSession, ChannelId, ColorListener, ColorUpdate, Dispatcher, ReducerConfig,
    SessionConfig,
};
use wasm_bindgen::prelude::*;

mod audio;
mod bridge;
mod constants;
mod frame;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("deriva-web starting");
    Ok(())
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Calls a JS function with a `Float32Array` of `[r, g, b, scalar]`.
struct JsListener {
    callback: js_sys::Function,
}

impl ColorListener for JsListener {
    fn on_color_updated(&mut self, update: &ColorUpdate) -> anyhow::Result<()> {
        let args = js_sys::Float32Array::from(&bridge::callback_args(update)[..]);
        self.callback
            .call1(&JsValue::NULL, &args)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(())
    }
}

#[wasm_bindgen]
pub struct WebSession {
    ctx: Rc<RefCell<frame::FrameContext>>,
    dispatcher: Rc<Dispatcher>,
    handles: RefCell<bridge::ListenerHandles>,
    looping: Cell<bool>,
}

#[wasm_bindgen]
impl WebSession {
    /// `strategy` is `weighted`, `regression` or `onset`.
    #[wasm_bindgen(constructor)]
    pub fn new(strategy: &str) -> Result<WebSession, JsValue> {
        let reducer: ReducerConfig = strategy.parse().map_err(js_err)?;
        let config = SessionConfig::default().with_reducer(reducer);
        let session = AnalysisSession::from_config(&config).map_err(js_err)?;
        let dispatcher = Rc::clone(session.dispatcher());
        Ok(WebSession {
            ctx: Rc::new(RefCell::new(frame::FrameContext::new(session))),
            dispatcher,
            handles: RefCell::new(bridge::ListenerHandles::default()),
            looping: Cell::new(false),
        })
    }

    /// Ask for microphone access and route it into the analyser. Resolves
    /// once audio is flowing.
    #[wasm_bindgen(js_name = attachMicrophone)]
    pub fn attach_microphone(&self) -> js_sys::Promise {
        let ctx = Rc::clone(&self.ctx);
        let bins = ctx.borrow().bins();
        wasm_bindgen_futures::future_to_promise(async move {
            let input = audio::open_microphone(bins)
                .await
                .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
            ctx.borrow_mut().attach(input);
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Returns a handle for [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, channel: u8, callback: js_sys::Function) -> u32 {
        let channel = ChannelId(channel);
        let listener = Rc::new(RefCell::new(JsListener { callback }));
        let id = self.dispatcher.subscribe(channel, listener);
        self.handles.borrow_mut().insert(channel, id)
    }

    pub fn unsubscribe(&self, handle: u32) -> bool {
        match self.handles.borrow_mut().remove(handle) {
            Some((channel, id)) => self.dispatcher.unsubscribe(channel, id),
            None => false,
        }
    }

    pub fn start(&self) {
        self.with_session(AnalysisSession::start);
    }

    pub fn pause(&self) {
        self.with_session(AnalysisSession::pause);
    }

    pub fn stop(&self) {
        self.with_session(AnalysisSession::stop);
    }

    /// Start the requestAnimationFrame loop. Later calls do nothing.
    pub fn run(&self) {
        if self.looping.replace(true) {
            return;
        }
        frame::start_loop(Rc::clone(&self.ctx));
    }

    #[wasm_bindgen(getter)]
    pub fn bins(&self) -> usize {
        self.ctx.borrow().bins()
    }
}

impl WebSession {
    fn with_session(&self, f: impl FnOnce(&mut AnalysisSession)) {
        match self.ctx.try_borrow_mut() {
            Ok(mut ctx) => f(&mut ctx.session),
            // a listener called back into the session mid-frame
            Err(_) => log::warn!("[web] session busy; call ignored"),
        }
    }
}
