//! Call session: the per-call controller and its collaborators.

mod call_control;
mod call_sid;
mod controller;
mod events;

pub use call_control::{CallCommand, CallControl, CallControlError, RecordingStatus};
pub use call_sid::{CallSid, CallSidSource};
pub use controller::{CallSession, SessionSnapshot};
pub use events::{CallbackHandler, EventDispatcher, EventHandler, SessionEvent, SubscriptionId};
