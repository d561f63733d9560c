//! Bridge between sinker-core's `TagLister` trait and the concrete
//! `RegistryClient` in this crate.

use crate::client::RegistryClient;
use sinker_core::TagLister;
use std::future::Future;
use std::pin::Pin;

impl TagLister for RegistryClient {
    fn list_tags<'a>(
        &'a self,
        host: &'a str,
        repository: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<String>>> + Send + 'a>> {
        Box::pin(RegistryClient::list_tags(self, host, repository))
    }
}
