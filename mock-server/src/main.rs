use std::io;

use tokio::net::TcpListener;

/// Serves the mock routes on `127.0.0.1:$PORT` (default 3000).
#[tokio::main]
async fn main() -> Result<(), io::Error> {
    let port: u16 = match std::env::var("PORT") {
        Ok(raw) => raw.parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid PORT {raw:?}: {e}"),
            )
        })?,
        Err(_) => 3000,
    };
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    println!("mock server listening on {}", listener.local_addr()?);
    mock_server::run(listener).await
}
