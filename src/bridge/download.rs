// File downloads for the shell.
// Enqueues HTTP downloads into the app's download folder and tracks their status.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::{Client, Url};
use tokio::runtime::Handle;

use crate::error::{Result, WidgetError};

/// Folder under the download root that holds app downloads.
pub const DOWNLOAD_SUBDIR: &str = "CQUT-Helper";

/// Handle returned when a download is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTicket {
    pub download_id: u64,
    /// Where the file will be saved.
    pub path: PathBuf,
}

/// Progress of an enqueued download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    Pending,
    Complete,
    Failed(String),
}

/// Download facility the bridge delegates to.
pub trait Downloader {
    /// Accept a download of `url` saved as `file_name`.
    fn enqueue(&self, url: &str, file_name: &str) -> Result<DownloadTicket>;
}

impl<D: Downloader + ?Sized> Downloader for Arc<D> {
    fn enqueue(&self, url: &str, file_name: &str) -> Result<DownloadTicket> {
        (**self).enqueue(url, file_name)
    }
}

/// Downloads over HTTP on a tokio runtime.
pub struct HttpDownloader {
    client: Client,
    runtime: Handle,
    root: PathBuf,
    next_id: AtomicU64,
    statuses: Arc<Mutex<HashMap<u64, DownloadStatus>>>,
}

impl HttpDownloader {
    /// Create a downloader saving under `<root>/CQUT-Helper`.
    pub fn new(root: impl Into<PathBuf>, runtime: Handle) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("wingtable/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(WidgetError::Http)?;

        Ok(Self {
            client,
            runtime,
            root: root.into(),
            next_id: AtomicU64::new(1),
            statuses: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Folder downloads are written into.
    pub fn target_dir(&self) -> PathBuf {
        self.root.join(DOWNLOAD_SUBDIR)
    }

    /// Status of a download, `None` for unknown ids.
    ///
    /// A finished status is reported once and then forgotten.
    pub fn status(&self, download_id: u64) -> Option<DownloadStatus> {
        let mut statuses = self.statuses.lock().ok()?;
        match statuses.get(&download_id)? {
            DownloadStatus::Pending => Some(DownloadStatus::Pending),
            _ => statuses.remove(&download_id),
        }
    }

    /// Number of downloads still in flight.
    pub fn pending_count(&self) -> usize {
        self.statuses.lock().map_or(0, |statuses| {
            statuses
                .values()
                .filter(|status| **status == DownloadStatus::Pending)
                .count()
        })
    }

    fn set_status(
        statuses: &Mutex<HashMap<u64, DownloadStatus>>,
        download_id: u64,
        status: DownloadStatus,
    ) {
        if let Ok(mut statuses) = statuses.lock() {
            statuses.insert(download_id, status);
        }
    }
}

impl Downloader for HttpDownloader {
    fn enqueue(&self, url: &str, file_name: &str) -> Result<DownloadTicket> {
        let url = Url::parse(url.trim())
            .map_err(|e| WidgetError::InvalidArgs(format!("bad url {}: {}", url, e)))?;
        let file_name = sanitize_name(file_name.trim());
        if file_name.is_empty() {
            return Err(WidgetError::InvalidArgs("empty file name".to_string()));
        }

        let download_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let path = self.target_dir().join(&file_name);
        Self::set_status(&self.statuses, download_id, DownloadStatus::Pending);

        let client = self.client.clone();
        let statuses = self.statuses.clone();
        let target = path.clone();
        self.runtime.spawn(async move {
            let status = match fetch_to(&client, url.clone(), &target, download_id).await {
                Ok(bytes) => {
                    tracing::info!(download_id, %url, bytes, path = %target.display(), "download complete");
                    DownloadStatus::Complete
                }
                Err(e) => {
                    tracing::warn!(download_id, %url, error = %e, "download failed");
                    DownloadStatus::Failed(e.to_string())
                }
            };
            HttpDownloader::set_status(&statuses, download_id, status);
        });

        tracing::info!(download_id, path = %path.display(), "download enqueued");
        Ok(DownloadTicket { download_id, path })
    }
}

/// Fetch `url` into `path`, writing atomically via a temp file private to
/// this download. Returns the byte count.
async fn fetch_to(client: &Client, url: Url, path: &Path, download_id: u64) -> Result<usize> {
    let response = client.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(WidgetError::DownloadStatus {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }
    let bytes = response.bytes().await?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path, download_id);
    let written = fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(&bytes)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|_| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(bytes.len())
}

/// Hidden sibling `.<name>.<id>.part` of `path`.
fn temp_path_for(path: &Path, download_id: u64) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.part", name, download_id))
}

/// Sanitize a name for use as a single path component.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    match cleaned.as_str() {
        "." | ".." => String::new(),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("notes.pdf"), "notes.pdf");
        assert_eq!(sanitize_name("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_name("a:b"), "a_b");
        assert_eq!(sanitize_name(".."), "");
    }

    async fn wait_for(downloader: &HttpDownloader, id: u64) -> DownloadStatus {
        for _ in 0..100 {
            match downloader.status(id) {
                Some(DownloadStatus::Pending) | None => {
                    tokio::time::sleep(Duration::from_millis(20)).await
                }
                Some(status) => return status,
            }
        }
        panic!("download {} did not finish", id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_enqueue_downloads_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/timetable.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let downloader = HttpDownloader::new(temp_dir.path(), Handle::current()).unwrap();

        let url = format!("{}/files/timetable.pdf", server.uri());
        let ticket = downloader.enqueue(&url, "timetable.pdf").unwrap();

        assert_eq!(ticket.download_id, 1);
        assert!(ticket.path.ends_with("CQUT-Helper/timetable.pdf"));
        assert_eq!(wait_for(&downloader, ticket.download_id).await, DownloadStatus::Complete);
        assert_eq!(downloader.pending_count(), 0);
        assert_eq!(downloader.status(ticket.download_id), None);
        assert_eq!(fs::read(&ticket.path).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_temp_path_is_per_download() {
        let target = Path::new("/dl/CQUT-Helper/syllabus.pdf");
        assert_eq!(
            temp_path_for(target, 3),
            PathBuf::from("/dl/CQUT-Helper/.syllabus.pdf.3.part")
        );
        assert_ne!(
            temp_path_for(Path::new("/dl/CQUT-Helper/syllabus.docx"), 4),
            temp_path_for(target, 3)
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_same_stem_downloads_keep_their_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/syllabus.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"pdf bytes".to_vec())
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/syllabus.docx"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"docx bytes".to_vec())
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let downloader = HttpDownloader::new(temp_dir.path(), Handle::current()).unwrap();

        let pdf = downloader
            .enqueue(&format!("{}/syllabus.pdf", server.uri()), "syllabus.pdf")
            .unwrap();
        let docx = downloader
            .enqueue(&format!("{}/syllabus.docx", server.uri()), "syllabus.docx")
            .unwrap();

        assert_eq!(wait_for(&downloader, pdf.download_id).await, DownloadStatus::Complete);
        assert_eq!(wait_for(&downloader, docx.download_id).await, DownloadStatus::Complete);
        assert_eq!(fs::read(&pdf.path).unwrap(), b"pdf bytes");
        assert_eq!(fs::read(&docx.path).unwrap(), b"docx bytes");

        let leftovers = fs::read_dir(downloader.target_dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".part"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_enqueue_reports_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let downloader = HttpDownloader::new(temp_dir.path(), Handle::current()).unwrap();

        let ticket = downloader
            .enqueue(&format!("{}/missing", server.uri()), "missing.bin")
            .unwrap();

        assert!(matches!(
            wait_for(&downloader, ticket.download_id).await,
            DownloadStatus::Failed(_)
        ));
        assert!(!ticket.path.exists());
    }

    #[tokio::test]
    async fn test_enqueue_rejects_bad_input() {
        let temp_dir = TempDir::new().unwrap();
        let downloader = HttpDownloader::new(temp_dir.path(), Handle::current()).unwrap();

        assert!(matches!(
            downloader.enqueue("not a url", "a.pdf"),
            Err(WidgetError::InvalidArgs(_))
        ));
        assert!(matches!(
            downloader.enqueue("https://example.com/a.pdf", ".."),
            Err(WidgetError::InvalidArgs(_))
        ));
    }
}
