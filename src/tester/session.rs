extern crate reqwest;

use crate::{
    config::session::{FIREFOX_UA, VERBOSE},
    error::Result,
    types::FetchResult,
};
use log::debug;
use reqwest::{Client, ClientBuilder};

#[derive(Clone)]
pub struct Session {
    client: Client,
}
impl Session {
    fn from_client(builder: ClientBuilder) -> Result<Self> {
        Ok(Session {
            client: builder
                .user_agent(FIREFOX_UA)
                .cookie_store(true)
                .connection_verbose(VERBOSE)
                .build()?,
        })
    }
    pub fn new() -> Result<Self> {
        Self::from_client(Client::builder())
    }

    /// Transport failures are errors; any HTTP status is returned as is.
    pub async fn get(&self, url: &str) -> Result<FetchResult> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("{} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchResult { url, status, body })
    }
}
