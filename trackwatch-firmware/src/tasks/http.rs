//! Dashboard HTTP server
//!
//! One connection at a time: read the request head, answer, close.
//! Button presses are forwarded to the monitor task and answered with
//! the last published status.

use defmt::*;
use embassy_net::tcp::{Error as TcpError, TcpSocket};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;
use heapless::String;

use trackwatch_protocol::response::HEAD_CAPACITY;
use trackwatch_protocol::status::JSON_CAPACITY;
use trackwatch_protocol::{
    route, ContentType, RequestError, RequestParser, ResponseHead, Route, StatusCode,
    StatusDocument, WriteError,
};

use crate::channels::{current_status, COMMAND_SLOT};

/// Dashboard page served at `/`
const DASHBOARD: &str = include_str!("../dashboard.html");

/// Idle connections are dropped after this long
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors while serving one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
enum ServeError {
    Tcp(TcpError),
    Render(WriteError),
}

impl From<TcpError> for ServeError {
    fn from(e: TcpError) -> Self {
        ServeError::Tcp(e)
    }
}

impl From<WriteError> for ServeError {
    fn from(e: WriteError) -> Self {
        ServeError::Render(e)
    }
}

/// HTTP task - accepts dashboard connections forever
#[embassy_executor::task]
pub async fn http_task(stack: Stack<'static>, port: u16) {
    let mut rx_buf = [0u8; 1024];
    let mut tx_buf = [0u8; 2048];

    stack.wait_config_up().await;
    info!("HTTP server listening on port {}", port);

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buf, &mut tx_buf);
        socket.set_timeout(Some(SOCKET_TIMEOUT));

        if let Err(e) = socket.accept(port).await {
            warn!("Accept failed: {}", e);
            Timer::after(Duration::from_millis(200)).await;
            continue;
        }

        if let Err(e) = serve(&mut socket).await {
            warn!("Connection error: {}", e);
        }

        socket.close();
        if socket.flush().await.is_err() {
            socket.abort();
        }
    }
}

async fn serve(socket: &mut TcpSocket<'_>) -> Result<(), ServeError> {
    let mut parser = RequestParser::new();
    let mut buf = [0u8; 128];

    let parsed = loop {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            // Peer closed before sending a full request
            return Ok(());
        }
        match parser.feed_bytes(&buf[..n]) {
            Ok(Some(request)) => break Ok(request),
            Ok(None) => {}
            Err(e) => break Err(e),
        }
    };

    let request = match parsed {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected request: {}", e);
            let status = match e {
                RequestError::HeaderTooLarge => StatusCode::HeaderTooLarge,
                RequestError::Malformed => StatusCode::BadRequest,
                RequestError::UnsupportedMethod => StatusCode::MethodNotAllowed,
            };
            return respond(socket, ResponseHead::error(status), &[]).await;
        }
    };

    debug!("GET {=str}", request.path());

    match route(&request) {
        Route::Dashboard => {
            let head = ResponseHead::ok(ContentType::Html, DASHBOARD.len());
            respond(socket, head, DASHBOARD.as_bytes()).await
        }
        Route::Status => send_status(socket).await,
        Route::Act(command) => {
            if let Some(command) = command {
                COMMAND_SLOT.signal(command);
            }
            send_status(socket).await
        }
        Route::Redirect => respond(socket, ResponseHead::redirect("/"), &[]).await,
    }
}

async fn send_status(socket: &mut TcpSocket<'_>) -> Result<(), ServeError> {
    let mut body: String<JSON_CAPACITY> = String::new();
    StatusDocument::from_snapshot(&current_status()).write_json(&mut body)?;
    let head = ResponseHead::ok(ContentType::Json, body.len());
    respond(socket, head, body.as_bytes()).await
}

async fn respond(
    socket: &mut TcpSocket<'_>,
    head: ResponseHead,
    body: &[u8],
) -> Result<(), ServeError> {
    let mut text: String<HEAD_CAPACITY> = String::new();
    head.write(&mut text)?;
    socket.write_all(text.as_bytes()).await?;
    socket.write_all(body).await?;
    Ok(())
}
