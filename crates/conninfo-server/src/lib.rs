/*!
# Conninfo Server Crate

HTTP surface of the Conninfo service: assembles a [`ConnectionReport`] for
every request to `/` and renders it as an HTML page. Any other path gets a
plain `404 Not Found`.

The report combines the resolved client address and User-Agent
classification from `conninfo-core` with the request's method, path, query
parameters, sorted headers, and a UTC timestamp.

## Usage

```rust,no_run
use conninfo_server::configure_routes;
use std::net::SocketAddr;

# async fn example() -> std::io::Result<()> {
let app = configure_routes();

let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
)
.await?;
# Ok(())
# }
```

The router relies on `ConnectInfo<SocketAddr>` for the transport peer
address, so serve it with `into_make_service_with_connect_info` as above.
*/

pub mod render;
pub mod routes;
pub mod types;

// Re-export commonly used types
pub use render::render_page;
pub use routes::configure_routes;
pub use types::{ConnectionReport, HeaderEntry};
