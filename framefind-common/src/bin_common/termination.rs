use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use signal_hook::{consts::signal::*, flag};

/// Turns SIGINT/SIGTERM into a flag a drain loop can poll, so iterators get
/// dropped normally and their subprocesses die with them. A second signal
/// falls through to the default handler.
#[derive(Clone, Debug)]
pub struct Interrupt {
    stop: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn install() -> Result<Self, std::io::Error> {
        let stop = Arc::new(AtomicBool::new(false));

        for signal in [SIGINT, SIGTERM] {
            // The conditional one must be registered first to trigger on the
            // second signal, not the first.
            flag::register_conditional_default(signal, Arc::clone(&stop))?;
            flag::register(signal, Arc::clone(&stop))?;
        }

        Ok(Self { stop })
    }

    pub fn raised(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}
