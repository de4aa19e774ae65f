// Listener module
// Creates the TCP listener through socket2 so the backlog and address reuse are explicit

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Bind a non-blocking `TcpListener` on `addr`.
///
/// `SO_REUSEADDR` is set so a restarted host can bind while old sockets sit in
/// `TIME_WAIT`.
pub fn bind_listener(addr: std::net::SocketAddr, backlog: i32) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
