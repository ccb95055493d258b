//! Progress fan-out: every update to the UI emitter, throttled updates to
//! the OS notification surface.

mod bridge;
mod throttle;

pub use bridge::{BridgeHandle, NotificationBridge, NotificationTexts};
pub use throttle::ProgressThrottle;
