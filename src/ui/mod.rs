pub mod colors;
pub mod observer;
pub mod spinner;

pub use colors::*;
pub use observer::ConsoleObserver;
pub use spinner::Spinner;
