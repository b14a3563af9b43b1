// Browser-independent glue between the JS surface and the core. Kept free
// of web-sys so host tests can include it.

use deriva_core::{ChannelId, ColorUpdate, ListenerId};

use crate::constants::{MAX_FFT_SIZE, MIN_FFT_SIZE};

/// Smallest valid analyser `fftSize` whose `frequencyBinCount` covers
/// `bins`, capped at the analyser maximum.
pub fn fft_size_for_bins(bins: usize) -> u32 {
    let wanted = bins.saturating_mul(2).max(MIN_FFT_SIZE as usize);
    wanted
        .checked_next_power_of_two()
        .map_or(MAX_FFT_SIZE, |size| size.min(MAX_FFT_SIZE as usize) as u32)
}

/// `[r, g, b, scalar]`, the array handed to JS callbacks.
pub fn callback_args(update: &ColorUpdate) -> [f32; 4] {
    let [r, g, b] = update.color.to_array();
    [r, g, b, update.scalar]
}

/// Maps the plain numbers handed to JS back to dispatcher registrations.
#[derive(Debug, Default)]
pub struct ListenerHandles {
    next: u32,
    entries: Vec<(u32, ChannelId, ListenerId)>,
}

impl ListenerHandles {
    pub fn insert(&mut self, channel: ChannelId, id: ListenerId) -> u32 {
        let handle = self.next;
        self.next = self.next.wrapping_add(1);
        self.entries.push((handle, channel, id));
        handle
    }

    pub fn remove(&mut self, handle: u32) -> Option<(ChannelId, ListenerId)> {
        let pos = self.entries.iter().position(|(h, _, _)| *h == handle)?;
        let (_, channel, id) = self.entries.swap_remove(pos);
        Some((channel, id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
