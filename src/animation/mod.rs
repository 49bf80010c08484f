// Animation: cooperative timers and the search/playback drivers

pub mod timer;
pub mod driver;

pub use timer::Timer;
pub use driver::*;
