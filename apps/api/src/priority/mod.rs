// Priority scoring: calculated tier from four signals, display tier after
// manual override, and the annotation store behind both.

pub mod calculator;
pub mod display;
pub mod handlers;
pub mod store;
