use core::{
    mem::MaybeUninit,
    sync::atomic::{AtomicBool, Ordering},
};

use bamoni_cycle::{ImageStore, RetainedStore};
use bamoni_history::PersistentState;

use crate::constants::BAMONI_HISTORY_LEN;

pub type State = PersistentState<BAMONI_HISTORY_LEN>;

const IMAGE_LEN: usize = State::IMAGE_LEN;

/// Not zeroed by the runtime at startup, so its contents survive a warm reset.
#[unsafe(link_section = ".uninit.bamoni_retained")]
static mut RETAINED: MaybeUninit<[u8; IMAGE_LEN]> = MaybeUninit::uninit();

static TAKEN: AtomicBool = AtomicBool::new(false);

/// The retained RAM region. Only ever read through volatile byte loads, and decoded from a copy.
pub struct RetainedRam {
    region: &'static mut MaybeUninit<[u8; IMAGE_LEN]>,
}

/// Hands out the retained region. Returns `None` if it was already taken.
pub fn take() -> Option<RetainedRam> {
    if TAKEN.swap(true, Ordering::AcqRel) {
        return None;
    }

    // SAFETY: `TAKEN` makes this the only reference ever created to `RETAINED`, and a
    // `MaybeUninit` reference makes no claim about the contents.
    let region = unsafe { &mut *&raw mut RETAINED };

    Some(RetainedRam { region })
}

impl RetainedRam {
    fn copy_out(&self) -> [u8; IMAGE_LEN] {
        let base = self.region.as_ptr().cast::<u8>();

        // SAFETY: every offset is within the region. Volatile loads take whatever the SRAM cells
        // hold, which after a power-up is arbitrary but fixed; the image checks reject it.
        core::array::from_fn(|offset| unsafe { base.add(offset).read_volatile() })
    }
}

impl RetainedStore<BAMONI_HISTORY_LEN> for RetainedRam {
    fn load(&mut self) -> Option<State> {
        ImageStore::<_, BAMONI_HISTORY_LEN>::new(self.copy_out()).load()
    }

    fn store(&mut self, state: &State) {
        let mut image = ImageStore::<_, BAMONI_HISTORY_LEN>::new([0u8; IMAGE_LEN]);

        image.store(state);
        self.region.write(image.into_inner());
    }
}
