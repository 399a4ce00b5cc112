use std::path::PathBuf;
use std::time::Duration;

use futures::channel::mpsc;

use super::{BackgroundFetcher, FetchError, FetchResult, FetchedImage};
use crate::document::Background;

/// Fetches each background on its own worker thread.
///
/// Embedded image data is decoded directly. `http(s)://` urls are downloaded,
/// `file://` urls and bare paths are read from disk, and any other scheme fails.
pub struct ThreadFetcher {
    sender: mpsc::UnboundedSender<FetchResult>,
    receiver: mpsc::UnboundedReceiver<FetchResult>,
}

impl Default for ThreadFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ThreadFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadFetcher").finish_non_exhaustive()
    }
}

impl ThreadFetcher {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self { sender, receiver }
    }
}

impl BackgroundFetcher for ThreadFetcher {
    fn request(&mut self, generation: u64, background: &Background) {
        let background = background.clone();
        let sender = self.sender.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("background-fetch-{generation}"))
            .spawn(move || {
                let outcome = load(&background);
                // The editor may be gone by now; nothing to report to.
                let _ = sender.unbounded_send(FetchResult {
                    generation,
                    outcome,
                });
            });
        if let Err(err) = spawned {
            log::error!("Failed to spawn background fetch thread: {}", err);
        }
    }

    fn poll(&mut self) -> Option<FetchResult> {
        match self.receiver.try_next() {
            Ok(Some(result)) => Some(result),
            // Closed never happens while we hold a sender; empty is Err.
            Ok(None) | Err(_) => None,
        }
    }
}

fn load(background: &Background) -> Result<FetchedImage, FetchError> {
    match background {
        Background::Blank => Err(FetchError::Unsupported(background.locator())),
        Background::ImageData(bytes) => FetchedImage::decode(bytes, &background.locator()),
        Background::Url(url) if is_remote(url) => {
            log::info!("Downloading background from {}", url);
            let bytes = download(url).map_err(|source| FetchError::Network {
                locator: url.clone(),
                source,
            })?;
            FetchedImage::decode(&bytes, url)
        }
        Background::Url(url) => {
            let path = local_path(url).ok_or_else(|| FetchError::Unsupported(url.clone()))?;
            log::info!("Loading background from {}", path.display());
            let bytes = std::fs::read(&path).map_err(|source| FetchError::Io {
                locator: url.clone(),
                source,
            })?;
            FetchedImage::decode(&bytes, url)
        }
    }
}

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn download(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

/// Maps `file://` urls and bare paths to a filesystem path.
fn local_path(url: &str) -> Option<PathBuf> {
    if let Some(path) = url.strip_prefix("file://") {
        let path = urlencoding::decode(path).ok()?;
        return Some(PathBuf::from(path.into_owned()));
    }
    if url.contains("://") {
        return None;
    }
    Some(PathBuf::from(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read, Write};
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn wait_for(fetcher: &mut ThreadFetcher) -> FetchResult {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = fetcher.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "fetch did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_decodes_embedded_bytes() {
        let mut fetcher = ThreadFetcher::new();
        fetcher.request(3, &Background::ImageData(png_bytes(4, 2)));

        let result = wait_for(&mut fetcher);
        assert_eq!(result.generation, 3);
        let image = result.outcome.unwrap();
        assert_eq!(image.size, [4, 2]);
        assert_eq!(image.rgba.len(), 4 * 2 * 4);
    }

    // Answers a single request on localhost with the given status and body
    fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{addr}/bg.png")
    }

    #[test]
    fn test_unknown_scheme_fails_with_locator() {
        let mut fetcher = ThreadFetcher::new();
        fetcher.request(1, &Background::Url("ftp://example.com/a.png".into()));

        let err = wait_for(&mut fetcher).outcome.unwrap_err();
        assert!(matches!(err, FetchError::Unsupported(_)));
        assert_eq!(err.locator(), "ftp://example.com/a.png");
    }

    #[test]
    fn test_downloads_http_urls() {
        let url = serve_once("200 OK", png_bytes(6, 4));

        let mut fetcher = ThreadFetcher::new();
        fetcher.request(2, &Background::Url(url));
        let result = wait_for(&mut fetcher);
        assert_eq!(result.generation, 2);
        assert_eq!(result.outcome.unwrap().size, [6, 4]);
    }

    #[test]
    fn test_http_error_status_fails_with_locator() {
        let url = serve_once("404 Not Found", Vec::new());

        let mut fetcher = ThreadFetcher::new();
        fetcher.request(1, &Background::Url(url.clone()));
        let err = wait_for(&mut fetcher).outcome.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert_eq!(err.locator(), url);
    }

    #[test]
    fn test_reads_file_urls() {
        let path = std::env::temp_dir().join(format!("emoji-art-{}.png", uuid::Uuid::new_v4()));
        std::fs::write(&path, png_bytes(3, 5)).unwrap();

        let mut fetcher = ThreadFetcher::new();
        fetcher.request(1, &Background::Url(format!("file://{}", path.display())));
        let image = wait_for(&mut fetcher).outcome.unwrap();
        assert_eq!(image.size, [3, 5]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let mut fetcher = ThreadFetcher::new();
        fetcher.request(1, &Background::ImageData(vec![0, 1, 2, 3]));
        assert!(matches!(
            wait_for(&mut fetcher).outcome,
            Err(FetchError::Decode { .. })
        ));
    }
}
