use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{FetchError, FetchResult};

const USER_AGENT: &str = concat!("teamsearch_terminal/", env!("CARGO_PKG_VERSION"));

/// Blocking client with the request timeout and user agent applied.
pub fn build_client(timeout: Duration) -> FetchResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(FetchError::Client)
}
