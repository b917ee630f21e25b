//! Shared test doubles: a settable clock, a scripted HTTP transport, a
//! collecting notifier, and cart fixture builders.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use basket_core::models::{CartLine, ProductSnapshot};
use basket_core::traits::{
    Clock, HttpRequest, HttpResponse, HttpTransport, Notice, Notifier, TransportError,
};

/// Clock fixed at a point in time, advanced explicitly by tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<RefCell<DateTime<Utc>>>,
}

impl FixedClock {
    /// Midnight 2024-01-01 UTC, an arbitrary but stable origin.
    pub fn new() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(RefCell::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.borrow_mut();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.borrow_mut() = to;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.borrow()
    }
}

/// Notifier that records every notice for later assertions.
#[derive(Debug, Default, Clone)]
pub struct CollectingNotifier {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notices.borrow().iter().map(|n| n.title.clone()).collect()
    }

    pub fn clear(&self) {
        self.notices.borrow_mut().clear();
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

type TransportResult = Result<HttpResponse, TransportError>;
type TransportHandler = Box<dyn Fn(&HttpRequest) -> TransportResult>;

/// Scripted HTTP transport. Responses queued with the `push_*` methods are
/// served first; when the queue is empty the optional handler runs; with
/// neither, every call succeeds with an empty-data envelope. All requests
/// are recorded.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Rc<ScriptedInner>,
}

#[derive(Default)]
struct ScriptedInner {
    responses: RefCell<VecDeque<TransportResult>>,
    handler: RefCell<Option<TransportHandler>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve requests through `handler` whenever the scripted queue is empty.
    pub fn with_handler(handler: impl Fn(&HttpRequest) -> TransportResult + 'static) -> Self {
        let transport = Self::new();
        *transport.inner.handler.borrow_mut() = Some(Box::new(handler));
        transport
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.inner.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.into(),
        }));
    }

    /// Queue a 200 response with `data` wrapped in the standard envelope.
    pub fn push_data(&self, data: serde_json::Value) {
        self.push_response(200, ok_envelope(data));
    }

    pub fn push_transport_error(&self, reason: &str, timed_out: bool) {
        self.inner
            .responses
            .borrow_mut()
            .push_back(Err(TransportError {
                reason: reason.to_string(),
                timed_out,
            }));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.borrow().len()
    }
}

impl HttpTransport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> TransportResult {
        self.inner.requests.borrow_mut().push(request.clone());
        if let Some(result) = self.inner.responses.borrow_mut().pop_front() {
            return result;
        }
        if let Some(handler) = self.inner.handler.borrow().as_ref() {
            return handler(request);
        }
        Ok(HttpResponse {
            status: 200,
            body: ok_envelope(serde_json::Value::Null),
        })
    }
}

/// The backend's success envelope around `data`.
pub fn ok_envelope(data: serde_json::Value) -> String {
    serde_json::json!({
        "data": data,
        "message": "ok",
        "success": true,
        "timestamp": null,
    })
    .to_string()
}

/// The backend's failure envelope, as produced for 4xx/5xx bodies.
pub fn error_envelope(message: &str) -> String {
    serde_json::json!({
        "data": null,
        "message": message,
        "success": false,
        "timestamp": null,
    })
    .to_string()
}

/// A product snapshot with a given id and price.
pub fn product(id: &str, price: f64) -> ProductSnapshot {
    ProductSnapshot {
        id: id.to_string(),
        name: format!("Product {id}"),
        price,
        available_stock: 100,
    }
}

/// A cart line for `product(id, price)`.
pub fn cart_line(id: &str, price: f64, quantity: u32) -> CartLine {
    CartLine::new(product(id, price), quantity, Utc::now())
}
