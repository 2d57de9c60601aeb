use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use crate::acquire::AcquireError;

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed wait after load so deferred, script-injected content can appear.
const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Loads a URL in a headless Chromium instance and returns the fully
/// rendered document HTML.
///
/// The browser process is request-scoped: launched here and closed again on
/// every exit path before the result is returned.
pub(crate) async fn fetch_rendered_html(url: &str) -> Result<String, AcquireError> {
    let config = BrowserConfig::builder()
        .arg("--headless=new")
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-extensions")
        .arg("--disable-background-networking")
        .build()
        .map_err(AcquireError::Browser)?;

    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| AcquireError::Browser(e.to_string()))?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            let _ = event;
        }
    });

    let result = render_page(&browser, url).await;

    if let Err(e) = browser.close().await {
        log::warn!("Failed to close browser cleanly: {e}");
    }
    let _ = browser.wait().await;
    handler_task.abort();

    result
}

async fn render_page(browser: &Browser, url: &str) -> Result<String, AcquireError> {
    let page = tokio::time::timeout(NAVIGATION_TIMEOUT, browser.new_page(url))
        .await
        .map_err(|_| AcquireError::Timeout(url.to_string()))?
        .map_err(|e| AcquireError::Browser(e.to_string()))?;

    let html = async {
        let _ = page.wait_for_navigation().await;
        tokio::time::sleep(SETTLE_DELAY).await;

        page.evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| AcquireError::Browser(e.to_string()))?
            .into_value::<String>()
            .map_err(|e| AcquireError::Browser(format!("unexpected outerHTML result: {e:?}")))
    }
    .await;

    if let Err(e) = page.close().await {
        log::warn!("Failed to close page: {e}");
    }

    html
}
