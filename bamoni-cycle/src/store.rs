use bamoni_fmt::{error, info, warn};
use bamoni_history::{ImageError, PersistentState};

use crate::RetainedStore;

/// [`RetainedStore`] over a byte region holding the state's serialized image.
///
/// On the device the region sits in RAM that isn't cleared across the low-power transition or a
/// warm reset. Anything that doesn't decode as a valid image counts as a cold start.
pub struct ImageStore<B, const C: usize> {
    region: B,
}

impl<B, const C: usize> ImageStore<B, C>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    #[inline]
    pub const fn new(region: B) -> Self {
        Self { region }
    }

    #[inline]
    pub fn region(&self) -> &B {
        &self.region
    }

    #[inline]
    pub fn into_inner(self) -> B {
        self.region
    }
}

impl<B, const C: usize> RetainedStore<C> for ImageStore<B, C>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn load(&mut self) -> Option<PersistentState<C>> {
        match PersistentState::read_image(self.region.as_ref()) {
            Ok(state) => Some(state),
            Err(ImageError::BadMagic) => {
                info!("No retained state, starting cold");
                None
            }
            Err(e) => {
                warn!("Discarding retained state: {}", e);
                None
            }
        }
    }

    fn store(&mut self, state: &PersistentState<C>) {
        if let Err(e) = state.write_image(self.region.as_mut()) {
            error!("Failed to retain state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Store = ImageStore<[u8; PersistentState::<3>::IMAGE_LEN], 3>;

    #[test]
    fn blank_region_loads_nothing() {
        let mut store = Store::new([0; PersistentState::<3>::IMAGE_LEN]);

        assert_eq!(store.load(), None);
    }

    #[test]
    fn stored_state_loads_back() {
        let mut store = Store::new([0; PersistentState::<3>::IMAGE_LEN]);
        let mut state = PersistentState::new();

        state.begin_wake();
        state.record_sample(12_000);
        state.set_last_sample_epoch(42);
        store.store(&state);

        assert_eq!(store.load(), Some(state));
    }

    #[test]
    fn undersized_region_is_left_untouched() {
        let mut store = ImageStore::<[u8; 4], 3>::new([0; 4]);
        let mut state = PersistentState::new();

        state.begin_wake();
        store.store(&state);

        assert_eq!(store.load(), None);

        assert_eq!(store.into_inner(), [0; 4]);
    }

    #[test]
    fn corrupted_region_is_cold_start() {
        let mut store = Store::new([0; PersistentState::<3>::IMAGE_LEN]);
        let mut state = PersistentState::new();

        state.begin_wake();
        store.store(&state);

        let mut region = store.into_inner();
        region[10] ^= 0xFF;

        assert_eq!(Store::new(region).load(), None);
    }

    #[test]
    fn copied_region_round_trips_and_noise_is_cold_start() {
        let noise = [0xA5; PersistentState::<3>::IMAGE_LEN];

        assert_eq!(Store::new(noise).load(), None);

        let mut state = PersistentState::new();

        state.begin_wake();
        state.record_sample(11_800);

        let mut written = Store::new([0; PersistentState::<3>::IMAGE_LEN]);
        written.store(&state);

        // A fresh store over a byte copy of the written region sees the same state.
        let copy = *written.region();

        assert_eq!(Store::new(copy).load(), Some(state));
    }
}
