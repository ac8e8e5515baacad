//! Weather API and holiday relay for dynweather.
//!
//! Each frontend trigger becomes one HTTP GET whose outcome is published
//! as exactly one notification, success or not.

pub mod bridge;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod notification;
pub mod relay;

pub use bridge::{run_bridge, BridgeStats};
pub use envelope::{api_envelope, holiday_envelope, ApiEnvelope, HolidayEnvelope, HolidayResult};
pub use error::{BridgeError, FetchError};
pub use fetch::{fetch_body, FetchedBody};
pub use notification::{FrontendRequest, RelayNotification};
pub use relay::{notification_channel, NotificationReceiver, NotificationSender, Relay};
