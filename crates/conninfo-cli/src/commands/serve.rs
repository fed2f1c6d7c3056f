use clap::Args;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use conninfo_server::configure_routes;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "0.0.0.0:8080", env = "CONNINFO_ADDRESS")]
    pub address: String,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.serve())
    }

    async fn serve(self) -> anyhow::Result<()> {
        let app = configure_routes();

        let listener = TcpListener::bind(&self.address).await?;
        info!("Conninfo server listening on {}", self.address);

        // The report handler reads the peer address through ConnectInfo,
        // so the router is served with connect info attached.
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
        info!("Conninfo server exited");

        Ok(())
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl-c signal");
    info!("Received Ctrl+C, initiating graceful shutdown...");
}
