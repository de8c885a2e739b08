pub mod dispatch;
pub mod guest;

pub use dispatch::{CancelDispatchResponse, DispatchRequest, DispatchResponse};
pub use guest::{AttendanceState, CreateGuestRequest, Guest, RsvpRequest, UpdateGuestRequest};
