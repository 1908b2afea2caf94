use core::future::Future;

use crate::config::MAX_ROUTES;
use crate::connection::Connection;
use crate::response::ResponseError;
use crate::transport::Socket;

/// HandlerError is returned by `Handler` implementations.  Errors returned by `Connection`
/// methods should be passed up in the `ResponseError` variant, other errors are a
/// `CustomError`.  The server logs the error and closes the connection.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandlerError {
    /// Errors returned by `Connection` methods
    ResponseError(ResponseError),
    /// Custom errors as specified by the `Handler` implementation author
    CustomError(&'static str),
}

impl From<ResponseError> for HandlerError {
    fn from(value: ResponseError) -> Self {
        Self::ResponseError(value)
    }
}

impl From<&'static str> for HandlerError {
    fn from(value: &'static str) -> Self {
        Self::CustomError(value)
    }
}

/// Error registering a route
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RouteError {
    /// `MAX_ROUTES` routes are registered already
    Full,
    /// Routes can not be added once the server is listening
    AlreadyListening,
}

/// Trait required to be implemented by the resource responsible for answering requests.  A
/// server has a single handler type, applications with several pages typically implement it
/// for an enum and register one variant per path.
pub trait Handler {
    /// Called by the server once the request line has been read and `path` matched the route
    /// the handler was registered for.  `query` is everything after the `?` of the request
    /// target.  The request headers have not been read yet, the implementation should pull
    /// the ones it needs with `Connection::read_header` (or skip them with
    /// `Connection::end_request`) and then respond.
    ///
    /// ```
    /// use contlite::connection::Connection;
    /// use contlite::response::StatusCode;
    /// use contlite::router::{Handler, HandlerError};
    /// use contlite::transport::Socket;
    ///
    /// struct Hello;
    ///
    /// impl Handler for Hello {
    ///     async fn handle<S: Socket>(
    ///         &self,
    ///         conn: &mut Connection<'_, S>,
    ///         _path: &str,
    ///         query: Option<&str>,
    ///     ) -> Result<(), HandlerError> {
    ///         conn.end_request().await;
    ///         conn.start_response(StatusCode::OK).await?;
    ///         conn.send_header("Content-Type", "text/plain").await?;
    ///         conn.end_headers().await?;
    ///         conn.write_string("hello ").await;
    ///         conn.write_string(query.unwrap_or("world")).await;
    ///
    ///         Ok(())
    ///     }
    /// }
    /// ```
    fn handle<S: Socket>(
        &self,
        conn: &mut Connection<'_, S>,
        path: &str,
        query: Option<&str>,
    ) -> impl Future<Output = Result<(), HandlerError>>;
}

struct Route<H> {
    path: &'static str,
    handler: H,
}

/// Ordered table of path to handler routes
pub struct Router<H> {
    routes: heapless::Vec<Route<H>, MAX_ROUTES>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    /// An empty router
    pub fn new() -> Self {
        Self {
            routes: heapless::Vec::new(),
        }
    }

    /// Register `handler` for requests to exactly `path`
    pub fn route(&mut self, path: &'static str, handler: H) -> Result<(), RouteError> {
        self.routes
            .push(Route { path, handler })
            .or(Err(RouteError::Full))
    }

    /// Handler for `path`.  Paths are matched case sensitively, without the query string.
    /// When a path was registered more than once the first registration wins.
    pub fn lookup(&self, path: &str) -> Option<&H> {
        self.routes
            .iter()
            .find(|route| route.path == path)
            .map(|route| &route.handler)
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no route is registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
