//! Test harness for gateway integration tests.
//!
//! Starts the real router on `127.0.0.1:0` with an in-memory store and hands
//! out `ApiConfig`s pointing at it, so the client library drives the gateway
//! over HTTP exactly as the CLI does.

use photoscope_core::ApiConfig;
use photoscope_server::build_router;
use photoscope_server::detect::{create_detector, DetectorKind};
use photoscope_server::types::{EnvelopeStyle, GatewayConfig, GatewayContext};
use std::path::PathBuf;
use url::Url;

pub struct TestGateway {
    pub base_url: String,
    pub ctx: GatewayContext,
}

impl TestGateway {
    pub async fn start(envelope: EnvelopeStyle) -> Self {
        Self::with(|config| config.envelope = envelope).await
    }

    /// Start a gateway after letting the test adjust its config.
    pub async fn with(configure: impl FnOnce(&mut GatewayConfig)) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind gateway");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let mut config = GatewayConfig::new(Url::parse(&base_url).unwrap());
        configure(&mut config);
        let ctx = GatewayContext::new(config, create_detector(DetectorKind::None));
        let app = build_router(ctx.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestGateway { base_url, ctx }
    }

    /// Client config for this gateway, with `/photos` as the storage root.
    pub fn api_config(&self) -> ApiConfig {
        let storage_root = Url::parse(&format!("{}/photos", self.base_url)).unwrap();
        ApiConfig::from_base(&self.base_url).unwrap().with_storage_root(storage_root)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Path of a file under `tests/fixtures/photos`.
pub fn fixture(name: &str) -> PathBuf {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/photos").join(name);
    assert!(path.exists(), "Fixture '{name}' not found at {}", path.display());
    path
}
