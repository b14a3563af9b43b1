//! Fan-out of smoothed color updates to independently subscribed listeners.
//!
//! Listeners live on the host side (fractal materials, lights, UI swatches)
//! and come and go with their owners, possibly from inside a callback. The
//! dispatcher therefore snapshots a channel's listeners before calling any
//! of them, and every registration carries an `active` flag checked right
//! before its call: a listener removed mid-notify is not called afterwards,
//! every other listener is called exactly once.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use fnv::FnvHashMap;
use smallvec::SmallVec;

use crate::smoother::ColorUpdate;

pub trait ColorListener {
    fn on_color_updated(&mut self, update: &ColorUpdate) -> anyhow::Result<()>;
}

/// Closure adapter used by [`Dispatcher::subscribe_fn`].
pub struct FnListener<F>(pub F);

impl<F> ColorListener for FnListener<F>
where
    F: FnMut(&ColorUpdate) -> anyhow::Result<()>,
{
    fn on_color_updated(&mut self, update: &ColorUpdate) -> anyhow::Result<()> {
        (self.0)(update)
    }
}

/// Dispatch group. Not an audio channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u8);

impl ChannelId {
    /// Small fractals around the player.
    pub const NEAR: ChannelId = ChannelId(0);
    /// Big background fractals.
    pub const FAR: ChannelId = ChannelId(1);
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ListenerHandle = Rc<RefCell<dyn ColorListener>>;

struct Registration {
    id: ListenerId,
    listener: ListenerHandle,
    active: Rc<Cell<bool>>,
}

/// Outcome of one [`Dispatcher::notify`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
    /// Removed mid-notify, or already busy in an outer notify.
    pub skipped: usize,
}

#[derive(Default)]
pub struct Dispatcher {
    channels: RefCell<FnvHashMap<ChannelId, SmallVec<[Registration; 4]>>>,
    next_id: Cell<u64>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L>(&self, channel: ChannelId, listener: Rc<RefCell<L>>) -> ListenerId
    where
        L: ColorListener + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.channels
            .borrow_mut()
            .entry(channel)
            .or_default()
            .push(Registration {
                id,
                listener,
                active: Rc::new(Cell::new(true)),
            });
        log::debug!("[dispatch] listener {} subscribed to {}", id.0, channel);
        id
    }

    pub fn subscribe_fn<F>(&self, channel: ChannelId, f: F) -> ListenerId
    where
        F: FnMut(&ColorUpdate) -> anyhow::Result<()> + 'static,
    {
        self.subscribe(channel, Rc::new(RefCell::new(FnListener(f))))
    }

    /// Returns false when `id` was not subscribed to `channel`.
    /// Returns false when `id` was not subscribed to `channel`.
    pub fn unsubscribe(&self, channel: ChannelId, id: ListenerId) -> bool {
        // The registration may hold the last reference to the listener, whose
        // drop can call back into the dispatcher: release the borrow first.
        let removed = {
            let mut channels = self.channels.borrow_mut();
            let Some(regs) = channels.get_mut(&channel) else {
                return false;
            };
            match regs.iter().position(|r| r.id == id) {
                Some(pos) => regs.remove(pos),
                None => return false,
            }
        };
        removed.active.set(false);
        log::debug!("[dispatch] listener {} left {}", id.0, channel);
        drop(removed);
        true
    }

    pub fn notify(&self, channel: ChannelId, update: &ColorUpdate) -> Delivery {
        let snapshot: SmallVec<[(ListenerId, ListenerHandle, Rc<Cell<bool>>); 8]> = {
            let channels = self.channels.borrow();
            match channels.get(&channel) {
                Some(regs) => regs
                    .iter()
                    .map(|r| (r.id, r.listener.clone(), r.active.clone()))
                    .collect(),
                None => return Delivery::default(),
            }
        };

        let mut delivery = Delivery::default();
        for (id, listener, active) in snapshot {
            if !active.get() {
                delivery.skipped += 1;
                continue;
            }
            let mut listener = match listener.try_borrow_mut() {
                Ok(l) => l,
                Err(_) => {
                    log::warn!("[dispatch] listener {} re-entered on {}; skipped", id.0, channel);
                    delivery.skipped += 1;
                    continue;
                }
            };
            match listener.on_color_updated(update) {
                Ok(()) => delivery.delivered += 1,
                Err(e) => {
                    log::warn!("[dispatch] listener {} on {} failed: {:#}", id.0, channel, e);
                    delivery.failed += 1;
                }
            }
        }
        delivery
    }

    pub fn listener_count(&self, channel: ChannelId) -> usize {
        self.channels
            .borrow()
            .get(&channel)
            .map(|regs| regs.len())
            .unwrap_or(0)
    }

    /// Channels with at least one listener, ascending.
    pub fn channels(&self) -> Vec<ChannelId> {
        let mut ids: Vec<ChannelId> = self
            .channels
            .borrow()
            .iter()
            .filter(|(_, regs)| !regs.is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn clear(&self, channel: ChannelId) {
        let removed = self.channels.borrow_mut().remove(&channel);
        if let Some(regs) = removed {
            for reg in regs {
                reg.active.set(false);
            }
        }
    }
}
