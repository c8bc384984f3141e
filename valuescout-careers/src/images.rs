//! Core value image acquisition.
//!
//! Each image element is tried as a download first (its `src`, then its
//! `data-src`) and as a rendered element snapshot second. One image failing
//! never stops the others.

use crate::extract::slug;
use crate::types::{CoreValueEntry, DownloadedImage, ImageSource};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use valuescout_common::{Result, Selector};
use valuescout_config::CoreValueSpec;
use valuescout_drivers::BrowserPage;
use valuescout_http::{HttpClient, RequestOpts};

/// Make an image address absolute against `origin`.
///
/// ```
/// use url::Url;
/// use valuescout_careers::images::resolve_image_url;
///
/// let origin = Url::parse("https://careers.example.com").unwrap();
/// let cdn = resolve_image_url(&origin, "//static.example.net/a.png").unwrap();
/// assert_eq!(cdn.as_str(), "https://static.example.net/a.png");
/// let local = resolve_image_url(&origin, "/media/b.png").unwrap();
/// assert_eq!(local.as_str(), "https://careers.example.com/media/b.png");
/// ```
pub fn resolve_image_url(origin: &Url, address: &str) -> std::result::Result<Url, url::ParseError> {
    if let Some(rest) = address.strip_prefix("//") {
        Url::parse(&format!("https://{rest}"))
    } else {
        origin.join(address)
    }
}

/// Where the image for `headline` is written.
pub fn image_path(images_dir: &Path, headline: &str) -> PathBuf {
    images_dir.join(format!("{}.png", slug(headline)))
}

/// Everything image acquisition needs besides the page itself.
pub struct ImageJob<'a> {
    pub http: &'a HttpClient,
    pub origin: &'a Url,
    pub images_dir: &'a Path,
    pub lookup: Duration,
}

/// Acquire one image per (entry, spec) pair, paired by position.
///
/// Returns the images that were written; failures are logged and skipped.
/// Only failing to create `images_dir` is an error.
pub async fn download_core_value_images<P>(
    page: &P,
    entries: &[CoreValueEntry],
    specs: &[CoreValueSpec],
    job: &ImageJob<'_>,
) -> Result<Vec<DownloadedImage>>
where
    P: BrowserPage + ?Sized,
{
    tokio::fs::create_dir_all(job.images_dir).await?;

    let expected = entries.len().min(specs.len());
    let mut saved = Vec::with_capacity(expected);
    for (idx, (entry, spec)) in entries.iter().zip(specs).enumerate() {
        match acquire_one(page, entry, &spec.image, job).await {
            Ok(image) => {
                info!(
                    target: "careers.images",
                    index = idx + 1,
                    path = %image.path.display(),
                    source = ?image.source,
                    "image saved"
                );
                saved.push(image);
            }
            Err(e) => warn!(
                target: "careers.images",
                index = idx + 1,
                headline = %entry.headline,
                error = %format!("{e:#}"),
                "image skipped"
            ),
        }
    }

    if saved.len() < expected {
        warn!(
            target: "careers.images",
            saved = saved.len(),
            expected,
            "fewer images than core values"
        );
    }
    Ok(saved)
}

async fn acquire_one<P>(
    page: &P,
    entry: &CoreValueEntry,
    image: &Selector,
    job: &ImageJob<'_>,
) -> anyhow::Result<DownloadedImage>
where
    P: BrowserPage + ?Sized,
{
    let path = image_path(job.images_dir, &entry.headline);

    let address = match image_address(page, image, job.lookup).await {
        Ok(address) => address,
        Err(e) => {
            debug!(target: "careers.images", %image, error = %e, "address lookup failed");
            None
        }
    };

    if let Some(address) = address {
        match fetch(job, &address).await {
            Ok((url, bytes)) => {
                tokio::fs::write(&path, bytes)
                    .await
                    .with_context(|| format!("write {}", path.display()))?;
                return Ok(DownloadedImage {
                    headline: entry.headline.clone(),
                    path,
                    source: ImageSource::Downloaded { url },
                });
            }
            Err(e) => warn!(
                target: "careers.images",
                %address,
                error = %format!("{e:#}"),
                "download failed, taking element snapshot"
            ),
        }
    } else {
        debug!(target: "careers.images", %image, "no image address, taking element snapshot");
    }

    let png = page
        .screenshot_element(image, job.lookup)
        .await
        .context("element snapshot")?;
    tokio::fs::write(&path, png)
        .await
        .with_context(|| format!("write {}", path.display()))?;
    Ok(DownloadedImage {
        headline: entry.headline.clone(),
        path,
        source: ImageSource::Snapshot,
    })
}

/// `src`, else `data-src`; empty values count as absent.
async fn image_address<P>(page: &P, image: &Selector, lookup: Duration) -> anyhow::Result<Option<String>>
where
    P: BrowserPage + ?Sized,
{
    for name in ["src", "data-src"] {
        if let Some(value) = page.attribute(image, name, lookup).await? {
            if !value.trim().is_empty() {
                return Ok(Some(value));
            }
        }
    }
    Ok(None)
}

async fn fetch(job: &ImageJob<'_>, address: &str) -> anyhow::Result<(String, Vec<u8>)> {
    let url = resolve_image_url(job.origin, address)
        .with_context(|| format!("resolve image address {address}"))?;
    let fetched = job
        .http
        .get_bytes(
            url.as_str(),
            RequestOpts {
                content_type_prefix: Some("image/"),
                ..Default::default()
            },
        )
        .await?;
    Ok((fetched.url.to_string(), fetched.bytes))
}
