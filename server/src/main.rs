use std::env;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quibble::AppState;
use quibble::core::app::VERSION;
use quibble::routes;

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let listen = env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
	let router = routes::init(Arc::new(AppState::new()));

	let listener = match tokio::net::TcpListener::bind(&listen).await {
		Ok(listener) => listener,
		Err(err) => {
			error!("Failed to bind {}: {}", listen, err);
			std::process::exit(1);
		}
	};
	info!("Quibble {} listening on {}", VERSION, listen);
	if let Err(err) = axum::serve(listener, router).await {
		error!("Server error: {}", err);
	}
}

// vim: ts=4
