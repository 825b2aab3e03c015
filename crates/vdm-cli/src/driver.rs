//! WebDriver-backed implementation of the document capability.
//!
//! Talks to a chromedriver endpoint. The session carries the basic
//! identity masking the portal expects from a regular browser (real
//! user-agent, automation flag disabled) and routes downloads into the
//! chosen output directory without prompting.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use thirtyfour::prelude::*;

use vdm_core::dom::Dom;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.45 Safari/537.36";

pub struct WebDriverDom {
    driver: WebDriver,
}

impl WebDriverDom {
    /// Start a session against `webdriver_url` with downloads routed to
    /// `download_dir`.
    pub async fn connect(
        webdriver_url: &str,
        download_dir: &Path,
        headless: bool,
    ) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.add_arg("--headless=new")?;
        }
        caps.add_arg(&format!("--user-agent={USER_AGENT}"))?;
        caps.add_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_experimental_option(
            "prefs",
            serde_json::json!({
                "download.default_directory": download_dir.to_string_lossy(),
                "download.prompt_for_download": false,
                "download.directory_upgrade": true,
                "safebrowsing.enabled": true,
                "profile.default_content_settings.popups": 0,
                "plugins.always_open_pdf_externally": true,
                "profile.default_content_setting_values.automatic_downloads": 1,
                "safebrowsing.disable_download_protection": true,
            }),
        )?;

        let driver = WebDriver::new(webdriver_url, caps).await?;
        tracing::info!(url = webdriver_url, headless, "webdriver session started");
        Ok(Self { driver })
    }

    /// Release the automation session.
    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}

#[async_trait]
impl Dom for WebDriverDom {
    type Node = WebElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn find_all(&self, xpath: &str) -> Result<Vec<WebElement>> {
        Ok(self.driver.find_all(By::XPath(xpath)).await?)
    }

    async fn find_all_in(&self, scope: &WebElement, xpath: &str) -> Result<Vec<WebElement>> {
        Ok(scope.find_all(By::XPath(xpath)).await?)
    }

    async fn click(&self, node: &WebElement) -> Result<()> {
        node.click().await?;
        Ok(())
    }

    async fn clear(&self, node: &WebElement) -> Result<()> {
        node.clear().await?;
        Ok(())
    }

    async fn set_value(&self, node: &WebElement, text: &str) -> Result<()> {
        node.send_keys(text).await?;
        Ok(())
    }

    async fn get_attribute(&self, node: &WebElement, name: &str) -> Result<Option<String>> {
        // Form controls report what was actually entered via the live
        // property, not the markup attribute.
        if name == "value" {
            return Ok(node.prop("value").await?);
        }
        Ok(node.attr(name).await?)
    }

    async fn text(&self, node: &WebElement) -> Result<String> {
        Ok(node.text().await?)
    }

    async fn is_visible(&self, node: &WebElement) -> Result<bool> {
        Ok(node.is_displayed().await?)
    }
}
