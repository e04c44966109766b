use std::time::Duration;

use axum::Router;

use sentiscope_client::SentimentApi;

/// Serve `router` on an ephemeral local port and return its base URL.
///
/// The server task lives until the test runtime shuts down.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, router).await.expect("serve") });
    format!("http://{addr}/api")
}

/// Build a client against `base_url` with the given timeout.
pub fn client(base_url: String, timeout: Duration) -> SentimentApi {
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("reqwest client");
    SentimentApi::with_client(http, base_url, timeout)
}
