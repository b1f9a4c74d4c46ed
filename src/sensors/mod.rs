//! Sensor watchers: threshold evaluation over the motion and sound streams.
//!
//! Each watcher owns its acquisition state and answers one question per
//! reading: did this cross the threshold?  Raising the trigger is left to
//! the [`MonitorService`](crate::app::service::MonitorService).

pub mod motion;
pub mod sound;

/// Which watcher raised a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Motion,
    Sound,
}
