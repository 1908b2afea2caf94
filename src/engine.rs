//! The task run for every accepted connection: read the request line, dispatch to the
//! matching handler (or answer 404 / 405 itself), then close the connection.

use alloc::rc::Rc;

use crate::config::MAX_LINE_SIZE;
use crate::connection::Connection;
use crate::header::ResponseHeader;
use crate::request::{Method, RequestError, RequestLine};
use crate::response::StatusCode;
use crate::router::{Handler, HandlerError, Router};
use crate::slot::Slot;
use crate::transport::Socket;

const NOT_FOUND_BODY: &str = "No handler at specified URL";

/// Serve one request on `slot`, then flush, close and release it.
pub(crate) async fn serve<S: Socket, H: Handler>(slot: Rc<Slot<S>>, router: Rc<Router<H>>) {
    let mut conn = Connection::new(&slot);
    let mut request = [0u8; MAX_LINE_SIZE];

    if let Err(e) = handle_request(&mut conn, &mut request, &router).await {
        warn!("connection {}: request failed: {:?}", slot.index(), e);
    }

    slot.finish();
    trace!("connection {}: closed", slot.index());
}

async fn handle_request<S: Socket, H: Handler>(
    conn: &mut Connection<'_, S>,
    buf: &mut [u8],
    router: &Router<H>,
) -> Result<(), HandlerError> {
    let len = conn.read_line(buf).await;

    let line = match RequestLine::parse(&buf[..len]) {
        Ok(line) => line,
        Err(RequestError::ProtocolError(e)) => {
            debug!("connection {}: dropping request: {}", conn.id().index(), e);
            return Ok(());
        }
    };
    info!(
        "connection {}: > {} {} {}",
        conn.id().index(),
        line.method,
        line.path,
        line.version
    );

    if line.method() != Some(Method::GET) {
        conn.end_request().await;
        conn.start_response(StatusCode::MethodNotAllowed).await?;
        conn.end_headers().await?;
        return Ok(());
    }

    match router.lookup(line.path) {
        Some(handler) => handler.handle(conn, line.path, line.query).await,
        None => not_found(conn).await,
    }
}

async fn not_found<S: Socket>(conn: &mut Connection<'_, S>) -> Result<(), HandlerError> {
    conn.end_request().await;
    conn.start_response(StatusCode::NotFound).await?;
    conn.send(ResponseHeader::ContentType("text/plain")).await?;
    conn.end_headers().await?;
    conn.write_string(NOT_FOUND_BODY).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::boxed::Box;
    use std::rc::Rc;
    use std::string::String;

    use core::cell::RefCell;

    use super::*;
    use crate::coroutine::{Resumed, resume};
    use crate::testing::{MockSocket, TestHandler, Wire, mock_socket};

    /// Runs a single connection task to completion against `chunks`, delivered one per
    /// resumption, and returns what was written to the wire.
    fn run(router: Router<TestHandler>, chunks: &[&'static [u8]]) -> (String, Rc<RefCell<Wire>>) {
        let slot = Rc::new(Slot::<MockSocket>::new(0));
        let (socket, wire) = mock_socket(1024);
        slot.claim(socket);

        let mut task = Box::pin(Some(serve(Rc::clone(&slot), Rc::new(router))));
        let mut state = resume(task.as_mut());
        for chunk in chunks {
            assert_eq!(state, Resumed::Suspended);
            slot.store(*chunk).unwrap();
            state = resume(task.as_mut());
        }
        if state == Resumed::Suspended {
            slot.mark_eof();
            state = resume(task.as_mut());
        }
        assert_eq!(state, Resumed::Finished);
        assert!(slot.is_free());
        assert!(wire.borrow().closed);

        let sent = wire.borrow().sent_str();
        (sent, wire)
    }

    fn router(routes: &[(&'static str, TestHandler)]) -> Router<TestHandler> {
        let mut router = Router::new();
        for (path, handler) in routes {
            router.route(*path, *handler).unwrap();
        }
        router
    }

    #[test]
    fn test_dispatch_to_registered_handler() {
        let routes = router(&[
            ("/", TestHandler::Named("index")),
            ("/data", TestHandler::Named("data")),
        ]);
        let (sent, _) = run(routes, &[b"GET /data HTTP/1.1\r\nHost: x\r\n\r\n"]);

        assert_eq!(
            sent,
            "HTTP/1.1 200 OK\r
Connection: close\r
Content-Type: text/plain\r
\r
data"
        );
    }

    #[test]
    fn test_query_and_headers_reach_handler() {
        let routes = router(&[("/echo", TestHandler::Echo)]);
        let (sent, _) = run(
            routes,
            &[
                b"GET /echo?a=1&b=2 HTT",
                b"P/1.1\r\nHost: dev",
                b"ice\r\nX-Flag\r\n\r\n",
            ],
        );

        assert!(sent.ends_with("\r\n\r\n/echo|a=1&b=2|Host=device|X-Flag=-"));
    }

    #[test]
    fn test_unknown_path_drains_headers_and_answers_404() {
        let request: &'static [u8] = b"GET /missing?x=1 HTTP/1.1\r\nHost: x\r\nAccept: */*\r\n\r\n";
        let (sent, wire) = run(router(&[("/", TestHandler::Echo)]), &[request]);

        assert_eq!(
            sent,
            "HTTP/1.1 404 Not Found\r
Connection: close\r
Content-Type: text/plain\r
\r
No handler at specified URL"
        );
        assert_eq!(wire.borrow().acked, request.len());
    }

    #[test]
    fn test_other_methods_answer_405_without_routing() {
        let request: &'static [u8] = b"POST / HTTP/1.1\r\nHost: x\r\n\r\n";
        let (sent, wire) = run(router(&[("/", TestHandler::Named("index"))]), &[request]);

        assert_eq!(
            sent,
            "HTTP/1.1 405 Method Not Allowed\r
Connection: close\r
\r
"
        );
        assert_eq!(wire.borrow().acked, request.len());
    }

    #[test]
    fn test_first_registration_wins() {
        let routes = router(&[
            ("/x", TestHandler::Named("first")),
            ("/x", TestHandler::Named("second")),
        ]);
        let (sent, _) = run(routes, &[b"GET /x HTTP/1.1\r\n\r\n"]);

        assert!(sent.ends_with("first"));
    }

    #[test]
    fn test_malformed_request_line_closed_without_response() {
        let (sent, _) = run(router(&[("/", TestHandler::Echo)]), &[b"GET /\r\n\r\n"]);
        assert!(sent.is_empty());

        let (sent, _) = run(router(&[("/", TestHandler::Echo)]), &[b"\r\n"]);
        assert!(sent.is_empty());

        let (sent, _) = run(router(&[("/", TestHandler::Echo)]), &[b"GET \xff HTTP/1.1\r\n"]);
        assert!(sent.is_empty());
    }

    #[test]
    fn test_end_of_stream_before_request_line() {
        let (sent, _) = run(router(&[("/", TestHandler::Echo)]), &[]);
        assert!(sent.is_empty());
    }

    #[test]
    fn test_handler_error_still_closes() {
        let (sent, _) = run(
            router(&[("/fail", TestHandler::Failing)]),
            &[b"GET /fail HTTP/1.1\r\n\r\n"],
        );

        assert_eq!(
            sent,
            "HTTP/1.1 500 Internal Server Error\r
Connection: close\r
"
        );
    }

    #[test]
    fn test_handler_reads_only_some_headers() {
        let (sent, wire) = run(
            router(&[("/", TestHandler::FirstHeader)]),
            &[b"GET / HTTP/1.1\r\nUser-Agent: t\r\n", b"Accept: */*\r\n\r\n"],
        );

        assert!(sent.ends_with("\r\n\r\nUser-Agent"));
        assert_eq!(wire.borrow().acked, 46);
    }
}
