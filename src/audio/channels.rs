//! Output channel pool
//!
//! Sixteen MIDI channels, first-fit allocation. The percussion channel is
//! reserved: it is never handed out and never accepted back.

/// Number of addressable MIDI channels
pub const MIDI_CHANNELS: usize = 16;

/// General MIDI drum channel (channel 10, zero-based 9)
pub const PERCUSSION_CHANNEL: u8 = 9;

/// Tracks which melodic channels are currently sounding a note
#[derive(Debug, Clone, Default)]
pub struct ChannelAllocator {
    busy: [bool; MIDI_CHANNELS],
}

impl ChannelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the lowest free channel, or `None` when every melodic channel is busy
    pub fn allocate(&mut self) -> Option<u8> {
        let ch = (0..MIDI_CHANNELS as u8)
            .filter(|&ch| ch != PERCUSSION_CHANNEL)
            .find(|&ch| !self.busy[ch as usize])?;
        self.busy[ch as usize] = true;
        Some(ch)
    }

    /// Return a channel to the pool
    ///
    /// Releasing a free channel, the percussion channel or an out-of-range
    /// index does nothing.
    pub fn release(&mut self, channel: u8) {
        if channel == PERCUSSION_CHANNEL {
            return;
        }
        if let Some(slot) = self.busy.get_mut(channel as usize) {
            *slot = false;
        }
    }

    pub fn is_busy(&self, channel: u8) -> bool {
        self.busy.get(channel as usize).copied().unwrap_or(false)
    }

    /// Number of channels currently allocated
    pub fn busy_count(&self) -> usize {
        self.busy.iter().filter(|&&b| b).count()
    }

    /// Free every channel
    pub fn reset(&mut self) {
        self.busy = [false; MIDI_CHANNELS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fit_skips_percussion() {
        let mut pool = ChannelAllocator::new();
        let got: Vec<u8> = std::iter::from_fn(|| pool.allocate()).collect();
        assert_eq!(got.len(), MIDI_CHANNELS - 1);
        assert!(!got.contains(&PERCUSSION_CHANNEL));
        assert_eq!(&got[..3], &[0, 1, 2]);
        assert_eq!(got[9], 10);
    }

    #[test]
    fn test_exhaustion_and_release() {
        let mut pool = ChannelAllocator::new();
        while pool.allocate().is_some() {}
        assert_eq!(pool.allocate(), None);

        pool.release(4);
        assert!(!pool.is_busy(4));
        assert_eq!(pool.allocate(), Some(4));
        assert_eq!(pool.allocate(), None);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = ChannelAllocator::new();
        let ch = pool.allocate().unwrap();
        pool.release(ch);
        pool.release(ch);
        assert_eq!(pool.busy_count(), 0);
        assert_eq!(pool.allocate(), Some(ch));
    }

    #[test]
    fn test_reserved_and_out_of_range_release_ignored() {
        let mut pool = ChannelAllocator::new();
        pool.release(PERCUSSION_CHANNEL);
        pool.release(200);
        assert!(!pool.is_busy(PERCUSSION_CHANNEL));
        assert_eq!(pool.busy_count(), 0);
    }
}
