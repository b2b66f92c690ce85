use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use log::{error, info, warn};
use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Status, StatusClass},
    Data, Orbit, Request, Response, Rocket,
};

use crate::model::auth::Caller;

/// A unique identifier for a particular request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> RequestId {
        static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        RequestId(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// When the request arrived.
#[derive(Debug, Copy, Clone)]
struct ReceivedAt(Option<Instant>);

/// The authenticated caller of a request, once the guard has accepted them.
#[derive(Debug, Clone)]
struct RequestCaller(Option<String>);

/// Remember who is making this request, for the response log line.
pub fn record_caller(req: &Request<'_>, caller: &Caller) {
    req.local_cache(|| RequestCaller(Some(caller.id().to_string())));
}

/// Format the log line for a finished request.
fn response_line(
    id: RequestId,
    status: Status,
    route: &str,
    caller: Option<&str>,
    elapsed: &str,
) -> String {
    match caller {
        Some(caller) => format!("<-rsp{id} {status} {route} as {caller} ({elapsed})"),
        None => format!("<-rsp{id} {status} {route} ({elapsed})"),
    }
}

/// A rocket fairing that does global logging, e.g. logging every request and response.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let protocol = if rocket.config().tls_enabled() {
            "https"
        } else {
            "http"
        };
        let ip = &rocket.config().address;
        let port = &rocket.config().port;
        info!("Server launched on {protocol}://{ip}:{port}");
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        // Assign an ID and start the clock.
        let id = *req.local_cache(RequestId::next);
        req.local_cache(|| ReceivedAt(Some(Instant::now())));
        // Log the incoming request.
        info!("->req{id} {} {}", req.method(), req.uri());
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        // Get the ID.
        let id = req.local_cache(RequestId::next);
        // Get the response code.
        let code = res.status();
        // Get the matched route.
        let route = match req.route() {
            Some(r) => {
                let mut str = r.uri.to_string();
                if let Some(ref name) = r.name {
                    str = format!("{name} ({str})");
                }
                str
            }
            None => "UNKNOWN ROUTE".to_string(),
        };
        let elapsed = match req.local_cache(|| ReceivedAt(None)).0 {
            Some(start) => format!("{}ms", start.elapsed().as_millis()),
            None => "?ms".to_string(),
        };
        let caller = req.local_cache(|| RequestCaller(None)).0.as_deref();
        // Log the outgoing response.
        let log_msg = response_line(*id, code, &route, caller, &elapsed);
        match code.class() {
            StatusClass::ServerError => error!("{log_msg}"),
            StatusClass::ClientError => warn!("{log_msg}"),
            _ => info!("{log_msg}"),
        }
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutdown requested, stopping gracefully...");
    }
}
