//! Narrow host interfaces.
//!
//! The original runtime leaned on implicit browser globals (local storage,
//! online/offline events, wall-clock timers, fetch). Each is abstracted here
//! so the core runs and tests without a browser environment.

mod clock;
mod notify;
mod store;
mod transport;

pub use clock::{Clock, SystemClock};
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use store::KeyValueStore;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
