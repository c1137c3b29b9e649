//! Request routing
//!
//! Rules are tried in order and the first match wins:
//!
//! 1. `/` answers an empty 200.
//! 2. `/echo/<text>` answers `<text>` verbatim.
//! 3. `/files/<name>` answers the file's bytes, if a static root is
//!    configured and the file can be read.
//! 4. Any other request carrying a `User-Agent` header answers that header.
//! 5. Everything else is a 404.

use std::path::{Path, PathBuf};

use crate::handler::static_files;
use crate::http::request::Request;
use crate::http::response::Response;

const ECHO_PREFIX: &str = "/echo/";
const FILES_PREFIX: &str = "/files/";

/// The handler a request was classified into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Echo(String),
    UserAgentEcho(String),
    FileGet(PathBuf),
    NotFound,
}

impl Route {
    /// Short label used in access logs.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Echo(_) => "echo",
            Route::UserAgentEcho(_) => "user-agent",
            Route::FileGet(_) => "file",
            Route::NotFound => "not-found",
        }
    }
}

/// Routes requests; shared read-only by every connection.
#[derive(Debug, Clone, Default)]
pub struct Router {
    static_root: Option<PathBuf>,
}

impl Router {
    pub fn new(static_root: Option<PathBuf>) -> Self {
        Self { static_root }
    }

    pub fn static_root(&self) -> Option<&Path> {
        self.static_root.as_deref()
    }

    /// Classifies a request by its target.
    ///
    /// A `FileGet` here only means the name resolved inside the static root;
    /// whether the file exists is decided by [`Router::handle`].
    pub fn route(&self, req: &Request) -> Route {
        let target = req.target.as_str();

        if target == "/" {
            return Route::Root;
        }

        if let Some(text) = target.strip_prefix(ECHO_PREFIX) {
            return Route::Echo(text.to_string());
        }

        if let (Some(name), Some(root)) = (target.strip_prefix(FILES_PREFIX), self.static_root()) {
            if let Some(path) = static_files::resolve(root, name) {
                return Route::FileGet(path);
            }
        }

        Self::fallback(req)
    }

    /// Runs the handler for `req`, returning the route that actually answered.
    ///
    /// A file that cannot be loaded falls through to the rules after it.
    pub async fn handle(&self, req: &Request) -> (Route, Response) {
        let route = self.route(req);

        let file = match (&route, self.static_root()) {
            (Route::FileGet(path), Some(root)) => Some(static_files::load(root, path).await),
            _ => None,
        };

        match file {
            Some(Some(content)) => (route, Response::octet_stream(content)),
            Some(None) => {
                let fallback = Self::fallback(req);
                let response = Self::respond(&fallback);
                (fallback, response)
            }
            None => {
                let response = Self::respond(&route);
                (route, response)
            }
        }
    }

    fn fallback(req: &Request) -> Route {
        match req.user_agent() {
            Some(agent) => Route::UserAgentEcho(agent.to_string()),
            None => Route::NotFound,
        }
    }

    fn respond(route: &Route) -> Response {
        match route {
            Route::Root => Response::ok(),
            Route::Echo(text) | Route::UserAgentEcho(text) => Response::text(text.as_bytes()),
            // FileGet is answered by `handle` once the file is loaded
            Route::FileGet(_) | Route::NotFound => Response::not_found(),
        }
    }
}
