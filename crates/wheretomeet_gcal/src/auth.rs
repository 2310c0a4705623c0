// File: crates/wheretomeet_gcal/src/auth.rs
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    CalendarHub,
};
use std::error::Error;

type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// TLS connector shared by every hub this process builds.
#[derive(Clone)]
pub struct HubFactory {
    connector: Connector,
}

impl HubFactory {
    pub fn new() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let connector = HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();
        Ok(Self { connector })
    }

    /// A hub that acts as the user owning `access_token`.
    ///
    /// The token is the user's OAuth provider token from sign-in; it is sent
    /// as-is and never refreshed here.
    pub fn hub_for(&self, access_token: &str) -> HubType {
        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(self.connector.clone());
        CalendarHub::new(client, access_token.to_string())
    }
}
