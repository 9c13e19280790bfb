//! Typed client for the PhotoApp web service.
//!
//! Each operation maps to one endpoint. GET and POST run under the retry
//! policy; the `PUT /user` upsert is a single attempt with no retry, which is
//! how the service has always been called.
//!
//! Operations return `Ok(ClassifiedResult)` whenever the service answered, and
//! `Err` when there is no answer to classify (transport failure) or the answer
//! could not be decoded.

use crate::codec;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::filename;
use crate::paginate::Pages;
use crate::records::{
    decode_record, decode_rows, Asset, BucketItem, ImageDownload, ImageUpload, NewUser, Stats, UploadResponse,
    UpsertUserResponse, User,
};
use crate::response::{classify, ClassifiedResult};
use crate::retry::{is_final_status, run_with_retry, RetryPolicy};
use crate::transport::{CurlTransport, Method, Request, RequestOutcome, Transport};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// An asset written to local disk by [`PhotoAppClient::download_to_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    pub user_id: i64,
    pub asset_name: String,
    pub bucket_key: String,
    pub path: PathBuf,
    pub bytes: usize,
}

pub struct PhotoAppClient<T = CurlTransport> {
    base: Url,
    transport: T,
    retry: RetryPolicy,
}

impl PhotoAppClient<CurlTransport> {
    /// Build a curl-backed client from a validated configuration.
    pub fn from_config(cfg: &ClientConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            cfg.base_url()?,
            CurlTransport::new(cfg.curl_options()?),
            cfg.retry_policy()?,
        ))
    }
}

impl<T: Transport> PhotoAppClient<T> {
    pub fn new(base: Url, transport: T, retry: RetryPolicy) -> Self {
        Self { base, transport, retry }
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for `segments` under the base URL; segments are percent-encoded.
    ///
    /// This is the exact URL the operations request, and the one their
    /// errors carry.
    pub fn endpoint(&self, segments: &[&str], query: Option<(&str, &str)>) -> Result<String, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Transport {
                url: self.base.to_string(),
                cause: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url.into())
    }

    fn attempt(&self, request: &Request) -> Result<RequestOutcome, ClientError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let outcome = self.transport.send(request).map_err(|e| {
            tracing::error!(method = %request.method, url = %request.url, "request could not be issued: {}", e);
            e
        })?;
        match &outcome {
            RequestOutcome::TransportFailed(cause) => {
                tracing::warn!(method = %request.method, url = %request.url, "attempt failed: {}", cause);
            }
            RequestOutcome::Responded { status, .. } if !is_final_status(*status) => {
                tracing::warn!(method = %request.method, url = %request.url, status = *status, "attempt got a non-final status");
            }
            RequestOutcome::Responded { .. } => {}
        }
        Ok(outcome)
    }

    /// Classify the settled outcome; a transport failure becomes an error.
    fn settle(&self, request: &Request, outcome: RequestOutcome) -> Result<ClassifiedResult, ClientError> {
        match outcome {
            RequestOutcome::Responded { status, body } => {
                tracing::debug!(method = %request.method, url = %request.url, status, "response received");
                classify(&request.url, status, &body)
            }
            RequestOutcome::TransportFailed(cause) => {
                tracing::warn!(method = %request.method, url = %request.url, "no response: {}", cause);
                Err(ClientError::Transport {
                    url: request.url.clone(),
                    cause,
                })
            }
        }
    }

    fn call_with_retry(&self, request: &Request) -> Result<ClassifiedResult, ClientError> {
        let outcome = run_with_retry(&self.retry, std::thread::sleep, || self.attempt(request))?;
        self.settle(request, outcome)
    }

    fn call_once(&self, request: &Request) -> Result<ClassifiedResult, ClientError> {
        let outcome = self.attempt(request)?;
        self.settle(request, outcome)
    }

    /// `GET /stats`
    pub fn stats(&self) -> Result<ClassifiedResult<Stats>, ClientError> {
        let url = self.endpoint(&["stats"], None)?;
        self.call_with_retry(&Request::get(url.as_str()))?
            .try_map(|body| decode_record(&url, body))
    }

    /// `GET /users`
    pub fn users(&self) -> Result<ClassifiedResult<Vec<User>>, ClientError> {
        let url = self.endpoint(&["users"], None)?;
        self.call_with_retry(&Request::get(url.as_str()))?
            .try_map(|body| decode_rows(&url, body))
    }

    /// `GET /assets`
    pub fn assets(&self) -> Result<ClassifiedResult<Vec<Asset>>, ClientError> {
        let url = self.endpoint(&["assets"], None)?;
        self.call_with_retry(&Request::get(url.as_str()))?
            .try_map(|body| decode_rows(&url, body))
    }

    /// `GET /image/{assetid}`; the image data stays base64-encoded.
    pub fn image(&self, asset_id: &str) -> Result<ClassifiedResult<ImageDownload>, ClientError> {
        let url = self.endpoint(&["image", asset_id], None)?;
        self.call_with_retry(&Request::get(url.as_str()))?
            .try_map(|body| decode_record(&url, body))
    }

    /// Download an asset and write its decoded bytes into `dir`, named after
    /// the asset.
    pub fn download_to_dir(&self, asset_id: &str, dir: &Path) -> Result<ClassifiedResult<SavedAsset>, ClientError> {
        self.image(asset_id)?.try_map(|image| {
            let bytes = codec::decode(&image.data)?;
            let path = dir.join(filename::local_name_for(&image.asset_name, asset_id));
            fs::write(&path, &bytes).map_err(|source| ClientError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::info!(asset_id, path = %path.display(), bytes = bytes.len(), "asset downloaded");
            Ok(SavedAsset {
                user_id: image.user_id,
                asset_name: image.asset_name,
                bucket_key: image.bucket_key,
                path,
                bytes: bytes.len(),
            })
        })
    }

    /// One page of `GET /bucket`; an empty cursor requests the first page.
    pub fn bucket_page(&self, cursor: &str) -> Result<ClassifiedResult<Vec<BucketItem>>, ClientError> {
        let query = (!cursor.is_empty()).then_some(("startafter", cursor));
        let url = self.endpoint(&["bucket"], query)?;
        self.call_with_retry(&Request::get(url.as_str()))?
            .try_map(|body| decode_rows(&url, body))
    }

    /// The whole bucket listing as a lazy sequence of pages.
    pub fn bucket_pages(
        &self,
    ) -> Pages<BucketItem, impl FnMut(&str) -> Result<ClassifiedResult<Vec<BucketItem>>, ClientError> + '_> {
        let label = format!("{}/bucket", self.base_url());
        Pages::new(label, move |cursor: &str| self.bucket_page(cursor))
    }

    /// `PUT /user`: insert, or update when the email already exists.
    ///
    /// Single attempt, never retried.
    pub fn upsert_user(&self, user: &NewUser) -> Result<ClassifiedResult<UpsertUserResponse>, ClientError> {
        let url = self.endpoint(&["user"], None)?;
        let request = Request::json(Method::Put, url.as_str(), user)?;
        self.call_once(&request)?.try_map(|body| decode_record(&url, body))
    }

    /// `POST /image/{userid}` with the bytes base64-encoded into the body.
    pub fn upload_image(
        &self,
        user_id: &str,
        asset_name: &str,
        bytes: &[u8],
    ) -> Result<ClassifiedResult<UploadResponse>, ClientError> {
        let url = self.endpoint(&["image", user_id], None)?;
        let body = ImageUpload {
            assetname: asset_name.to_string(),
            data: codec::encode(bytes),
        };
        let request = Request::json(Method::Post, url.as_str(), &body)?;
        let result = self.call_with_retry(&request)?.try_map(|body| decode_record::<UploadResponse>(&url, body))?;
        if let ClassifiedResult::Ok(ref uploaded) = result {
            tracing::info!(user_id, asset_name, assetid = uploaded.assetid, bytes = bytes.len(), "image uploaded");
        }
        Ok(result)
    }

    /// Read a local file and upload it; the asset name is the path as given.
    pub fn upload_file(&self, path: &Path, user_id: &str) -> Result<ClassifiedResult<UploadResponse>, ClientError> {
        let bytes = fs::read(path).map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.upload_image(user_id, &path.to_string_lossy(), &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Replays scripted outcomes and records every request.
    #[derive(Default)]
    struct Scripted {
        replies: RefCell<VecDeque<Result<RequestOutcome, ClientError>>>,
        sent: RefCell<Vec<Request>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(RequestOutcome::Responded {
                status,
                body: body.as_bytes().to_vec(),
            }));
            self
        }

        fn fail(self, cause: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(RequestOutcome::TransportFailed(cause.to_string())));
            self
        }
    }

    impl Transport for Scripted {
        fn send(&self, request: &Request) -> Result<RequestOutcome, ClientError> {
            self.sent.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(RequestOutcome::TransportFailed("script exhausted".into())))
        }
    }

    fn client(transport: Scripted) -> PhotoAppClient<Scripted> {
        let retry = RetryPolicy {
            max_attempts: 3,
            backoff_unit: Duration::ZERO,
        };
        PhotoAppClient::new(Url::parse("http://photoapp.local:8080/api").unwrap(), transport, retry)
    }

    #[derive(Clone, Default)]
    struct LogBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with warn-level logs captured as plain text.
    fn with_warn_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let buf = LogBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        (result, text)
    }

    fn sent_urls(c: &PhotoAppClient<Scripted>) -> Vec<String> {
        c.transport().sent.borrow().iter().map(|r| r.url.clone()).collect()
    }

    #[test]
    fn endpoints_are_joined_under_base_path() {
        let c = client(Scripted::default());
        assert_eq!(c.endpoint(&["stats"], None).unwrap(), "http://photoapp.local:8080/api/stats");
        assert_eq!(
            c.endpoint(&["image", "a b"], None).unwrap(),
            "http://photoapp.local:8080/api/image/a%20b"
        );
        assert_eq!(
            c.endpoint(&["bucket"], Some(("startafter", "f/x y.jpg"))).unwrap(),
            "http://photoapp.local:8080/api/bucket?startafter=f%2Fx+y.jpg"
        );
    }

    #[test]
    fn root_base_url_has_no_double_slash() {
        let c = PhotoAppClient::new(
            Url::parse("http://photoapp.local:8080").unwrap(),
            Scripted::default(),
            RetryPolicy::default(),
        );
        assert_eq!(c.endpoint(&["users"], None).unwrap(), "http://photoapp.local:8080/users");
        assert_eq!(c.base_url(), "http://photoapp.local:8080");
    }

    #[test]
    fn stats_decodes_after_retry() {
        let c = client(
            Scripted::default()
                .fail("connection reset")
                .reply(200, r#"{"message":"success","db_numUsers":4,"db_numAssets":9}"#),
        );
        let stats = c.stats().unwrap().into_result("stats").unwrap();
        assert_eq!(stats.num_users, 4);
        assert_eq!(stats.num_assets, 9);
        assert_eq!(sent_urls(&c).len(), 2);
    }

    #[test]
    fn each_retried_attempt_is_logged_with_url_and_cause() {
        let c = client(
            Scripted::default()
                .fail("connection reset by peer")
                .reply(503, "")
                .reply(200, r#"{"message":"success","data":[]}"#),
        );
        let (result, logs) = with_warn_logs(|| c.users());
        assert_eq!(result.unwrap(), ClassifiedResult::Ok(Vec::new()));

        let warnings: Vec<&str> = logs.lines().filter(|l| l.contains("WARN")).collect();
        assert_eq!(warnings.len(), 2, "{logs}");
        assert!(warnings[0].contains("http://photoapp.local:8080/api/users"), "{logs}");
        assert!(warnings[0].contains("connection reset by peer"), "{logs}");
        assert!(warnings[1].contains("http://photoapp.local:8080/api/users"), "{logs}");
        assert!(warnings[1].contains("status=503"), "{logs}");
    }

    #[test]
    fn exhausted_transport_failures_are_an_error_with_url() {
        let c = client(Scripted::default().fail("a").fail("b").fail("timed out"));
        match c.users().unwrap_err() {
            ClientError::Transport { url, cause } => {
                assert_eq!(url, "http://photoapp.local:8080/api/users");
                assert_eq!(cause, "timed out");
            }
            other => panic!("expected Transport, got {other:?}"),
        }
        assert_eq!(sent_urls(&c).len(), 3);
    }

    #[test]
    fn setup_error_abandons_without_retry() {
        let t = Scripted::default();
        t.replies.borrow_mut().push_back(Err(ClientError::Transport {
            url: "http://photoapp.local:8080/api/assets".into(),
            cause: "bad handle".into(),
        }));
        let c = client(t.reply(200, r#"{"data":[]}"#));
        assert!(matches!(c.assets(), Err(ClientError::Transport { .. })));
        assert_eq!(sent_urls(&c).len(), 1);
    }

    #[test]
    fn app_error_is_not_retried() {
        let c = client(Scripted::default().reply(400, r#"{"message":"no such asset..."}"#));
        let r = c.image("1001").unwrap();
        assert_eq!(
            r,
            ClassifiedResult::AppError {
                status: 400,
                message: "no such asset...".into()
            }
        );
        assert_eq!(sent_urls(&c), vec!["http://photoapp.local:8080/api/image/1001"]);
    }

    #[test]
    fn upsert_user_is_a_single_put_even_on_503() {
        let c = client(Scripted::default().reply(503, "").reply(200, r#"{"userid":1,"message":"inserted"}"#));
        let user = NewUser {
            email: "x@y.z".into(),
            lastname: "L".into(),
            firstname: "F".into(),
            bucketfolder: "folder".into(),
        };
        assert_eq!(c.upsert_user(&user).unwrap(), ClassifiedResult::Unexpected(503));
        let sent = c.transport().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].url, "http://photoapp.local:8080/api/user");
    }

    #[test]
    fn upload_posts_base64_body() {
        let c = client(Scripted::default().reply(200, r#"{"message":"success","assetid":1002}"#));
        let r = c.upload_image("42", "tiny.bin", &[0x00, 0xFF, 0x10]).unwrap();
        assert_eq!(r, ClassifiedResult::Ok(UploadResponse { assetid: 1002 }));

        let sent = c.transport().sent.borrow();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url, "http://photoapp.local:8080/api/image/42");
        let body: ImageUpload = serde_json::from_slice(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body.assetname, "tiny.bin");
        assert_eq!(codec::decode(&body.data).unwrap(), vec![0x00, 0xFF, 0x10]);
    }

    #[test]
    fn upload_missing_file_is_io_error_before_any_request() {
        let c = client(Scripted::default());
        let dir = tempfile::tempdir().unwrap();
        let err = c.upload_file(&dir.path().join("missing.jpg"), "42").unwrap_err();
        assert!(matches!(err, ClientError::Io { .. }));
        assert!(sent_urls(&c).is_empty());
    }

    #[test]
    fn download_writes_decoded_bytes_named_after_asset() {
        let body = serde_json::json!({
            "message": "success",
            "user_id": 80001,
            "asset_name": "degu.jpg",
            "bucket_key": "folder/uuid_degu.jpg",
            "data": codec::encode(b"\x89PNG...")
        })
        .to_string();
        let c = client(Scripted::default().reply(200, &body));
        let dir = tempfile::tempdir().unwrap();
        let saved = c.download_to_dir("1001", dir.path()).unwrap().into_result("image").unwrap();
        assert_eq!(saved.path, dir.path().join("degu.jpg"));
        assert_eq!(saved.bytes, 7);
        assert_eq!(fs::read(&saved.path).unwrap(), b"\x89PNG...");
    }

    #[test]
    fn download_with_corrupt_data_is_malformed_payload() {
        let body = r#"{"user_id":1,"asset_name":"a.jpg","bucket_key":"k","data":"!!!"}"#;
        let c = client(Scripted::default().reply(200, body));
        let dir = tempfile::tempdir().unwrap();
        let err = c.download_to_dir("7", dir.path()).unwrap_err();
        assert!(matches!(err, ClientError::MalformedPayload(_)));
        assert!(!dir.path().join("a.jpg").exists());
    }

    #[test]
    fn bucket_pages_pass_last_key_as_cursor() {
        let page = |keys: &[&str]| {
            let items: Vec<_> = keys
                .iter()
                .map(|k| {
                    serde_json::json!({"Key": k, "LastModified": "2024-01-01T00:00:00.000Z",
                        "ETag": "\"e\"", "Size": 1, "StorageClass": "STANDARD"})
                })
                .collect();
            serde_json::json!({"message": "success", "data": items}).to_string()
        };
        let first: Vec<String> = (0..12).map(|i| format!("f/{i:02}.jpg")).collect();
        let first: Vec<&str> = first.iter().map(String::as_str).collect();
        let c = client(Scripted::default().reply(200, &page(&first)).reply(200, &page(&["f/zz.jpg"])));

        let items = c.bucket_pages().collect_items().unwrap();
        assert_eq!(items.len(), 13);
        assert_eq!(
            sent_urls(&c),
            vec![
                "http://photoapp.local:8080/api/bucket".to_string(),
                "http://photoapp.local:8080/api/bucket?startafter=f%2F11.jpg".to_string(),
            ]
        );
    }
}
