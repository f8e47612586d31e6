// System browser launcher
use crate::application::auth_service::BrowserLauncher;
use anyhow::Context;

#[derive(Debug, Clone, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        open::that(url).with_context(|| format!("Failed to launch browser for {}", url))?;
        tracing::info!("Opened browser for authentication");
        Ok(())
    }
}
