//! The ingestion controller: submissions, drops and their background work.
//!
//! ## Threading
//!
//! The controller is owned by one thread (the container's event loop). Probes
//! and manifest fetches run on a private rayon pool and report back over an
//! mpsc channel; results only reach the gallery when the owner calls
//! [`poll`](IngestionController::poll) or
//! [`wait_idle`](IngestionController::wait_idle). Gallery order across
//! asynchronous inputs is therefore completion order. Dropped JSON files are
//! parsed on the owner thread and appended in call order.
//!
//! ## Generations
//!
//! Every job is stamped with the generation current at dispatch.
//! [`clear`](IngestionController::clear) bumps the generation, so work that
//! was in flight during a clear completes but is discarded instead of
//! repopulating the reset gallery.

use super::fetch::{FetchError, Fetcher, HttpFetcher};
use super::probe::{ImageProbe, RustProbe};
use super::source::{DroppedFile, FileKind, ImageSource, InputKind, classify_input};
use crate::config::{IngestConfig, effective_workers};
use crate::data_uri;
use crate::gallery::{GallerySetter, GalleryUpdate};
use crate::manifest::{Manifest, ManifestPolicy};
use crate::session::{IngestFailure, InputSession};
use crate::types::ImageRecord;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Worker pool setup failed: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("Fetcher setup failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Progress notifications for whoever is displaying ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    /// Records from `source` were appended to the gallery.
    Appended { source: String, count: usize },
    /// An input failed; the failure is also recorded in the session.
    Failed(IngestFailure),
    /// Work for `source` finished after a clear and was thrown away.
    Discarded { source: String },
}

enum Job {
    ImageUrl(String),
    Upload { name: String, data_uri: String },
    ManifestUrl(String),
}

impl Job {
    fn label(&self) -> &str {
        match self {
            Job::ImageUrl(url) | Job::ManifestUrl(url) => url,
            Job::Upload { name, .. } => name,
        }
    }
}

struct Completion {
    generation: u64,
    source: String,
    outcome: Result<Vec<ImageRecord>, IngestFailure>,
}

pub struct IngestionController {
    session: InputSession,
    generation: u64,
    in_flight: usize,
    manifest_policy: ManifestPolicy,
    probe: Arc<dyn ImageProbe>,
    fetcher: Arc<dyn Fetcher>,
    pool: rayon::ThreadPool,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    events: Option<Sender<IngestEvent>>,
}

impl IngestionController {
    /// Build a controller with explicit probe and fetcher (allows testing with mocks).
    pub fn new(
        config: &IngestConfig,
        probe: Arc<dyn ImageProbe>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, IngestError> {
        Self::with_workers(config, effective_workers(config), probe, fetcher)
    }

    /// Like [`new`](Self::new) with an exact worker count instead of the
    /// core-capped one.
    pub(crate) fn with_workers(
        config: &IngestConfig,
        workers: usize,
        probe: Arc<dyn ImageProbe>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, IngestError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("probe-{i}"))
            .build()?;
        let (tx, rx) = channel();
        Ok(Self {
            session: InputSession::new(config.error_policy),
            generation: 0,
            in_flight: 0,
            manifest_policy: config.manifest_policy,
            probe,
            fetcher,
            pool,
            tx,
            rx,
            events: None,
        })
    }

    /// Build a controller that reads over HTTP and probes with the `image` crate.
    pub fn from_config(config: &IngestConfig) -> Result<Self, IngestError> {
        let fetcher: Arc<dyn Fetcher> =
            Arc::new(HttpFetcher::new(config.timeout(), &config.user_agent)?);
        let probe = Arc::new(RustProbe::new(Arc::clone(&fetcher)));
        Self::new(config, probe, fetcher)
    }

    /// Send [`IngestEvent`]s to `tx` as work is applied.
    pub fn with_events(mut self, tx: Sender<IngestEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn session(&self) -> &InputSession {
        &self.session
    }

    pub fn input(&self) -> &str {
        self.session.value()
    }

    pub fn error_message(&self) -> &'static str {
        self.session.error_message()
    }

    pub fn placeholder_hint(&self) -> &'static str {
        self.session.placeholder_hint()
    }

    /// Number of background jobs not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.session.value = value.into();
    }

    /// Submit the current input text.
    ///
    /// Clears the error first. Empty input is otherwise a no-op. Inputs ending
    /// in `.json` are fetched as manifests; anything else is probed as an image.
    pub fn submit(&mut self) {
        self.session.errors.clear();
        if self.session.value.is_empty() {
            return;
        }
        let input = self.session.value.clone();
        match classify_input(&input) {
            InputKind::Manifest => self.dispatch(Job::ManifestUrl(input)),
            InputKind::Image => self.dispatch(Job::ImageUrl(input)),
        }
    }

    /// Set the input text and submit it.
    pub fn submit_value(&mut self, value: impl Into<String>) {
        self.set_input(value);
        self.submit();
    }

    /// Ingest dropped files. Each file is handled independently, so some may
    /// succeed while others record a failure.
    pub fn handle_drop(&mut self, files: Vec<DroppedFile>, gallery: &mut impl GallerySetter) {
        self.session.drag = false;
        self.session.errors.clear();

        for file in files {
            match file.kind() {
                FileKind::Jpeg | FileKind::Png => {
                    let data_uri = data_uri::encode(&file.mime, &file.bytes);
                    self.dispatch(Job::Upload {
                        name: file.name,
                        data_uri,
                    });
                }
                FileKind::Json => {
                    let outcome = Manifest::from_slice(&file.bytes)
                        .map(|m| self.manifest_policy.admit(m))
                        .map_err(|e| IngestFailure::ManifestFailed {
                            source: file.name.clone(),
                            reason: e.to_string(),
                        });
                    self.apply_outcome(file.name, outcome, gallery);
                }
                FileKind::Unsupported(mime) => {
                    self.fail(IngestFailure::UnsupportedFormat {
                        name: file.name,
                        mime,
                    });
                }
            }
        }
    }

    pub fn drag_enter(&mut self) {
        self.session.drag = true;
    }

    pub fn drag_over(&mut self) {
        self.session.drag = true;
    }

    pub fn drag_leave(&mut self) {
        self.session.drag = false;
    }

    /// Empty the gallery, the input text and the error log. Work still in
    /// flight is discarded when it completes.
    pub fn clear(&mut self, gallery: &mut impl GallerySetter) {
        gallery.set(GalleryUpdate::Replace(Vec::new()));
        self.session.value.clear();
        self.session.errors.clear();
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            in_flight = self.in_flight,
            "cleared"
        );
    }

    /// Apply every finished job without blocking. Returns how many were applied.
    pub fn poll(&mut self, gallery: &mut impl GallerySetter) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.complete(completion, gallery);
            applied += 1;
        }
        applied
    }

    /// Block until every dispatched job has been applied.
    pub fn wait_idle(&mut self, gallery: &mut impl GallerySetter) {
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(completion) => self.complete(completion, gallery),
                // Unreachable while self.tx is alive.
                Err(_) => break,
            }
        }
    }

    fn dispatch(&mut self, job: Job) {
        let generation = self.generation;
        let tx = self.tx.clone();
        let probe = Arc::clone(&self.probe);
        let fetcher = Arc::clone(&self.fetcher);
        let policy = self.manifest_policy;

        self.in_flight += 1;
        tracing::debug!(source = job.label(), generation, "dispatching");

        self.pool.spawn(move || {
            let source = job.label().to_string();
            let outcome = run_job(job, probe.as_ref(), fetcher.as_ref(), policy);
            // The receiver lives as long as the controller; a send error only
            // means the controller was dropped and nobody wants the result.
            let _ = tx.send(Completion {
                generation,
                source,
                outcome,
            });
        });
    }

    fn complete(&mut self, completion: Completion, gallery: &mut impl GallerySetter) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if completion.generation != self.generation {
            tracing::debug!(
                source = %completion.source,
                stale = completion.generation,
                current = self.generation,
                "discarding stale result"
            );
            self.emit(IngestEvent::Discarded {
                source: completion.source,
            });
            return;
        }
        self.apply_outcome(completion.source, completion.outcome, gallery);
    }

    fn apply_outcome(
        &mut self,
        source: String,
        outcome: Result<Vec<ImageRecord>, IngestFailure>,
        gallery: &mut impl GallerySetter,
    ) {
        match outcome {
            Ok(records) => {
                let count = records.len();
                tracing::info!(source = %source, count, "appended");
                gallery.set(GalleryUpdate::Append(records));
                self.emit(IngestEvent::Appended { source, count });
            }
            Err(failure) => self.fail(failure),
        }
    }

    fn fail(&mut self, failure: IngestFailure) {
        tracing::warn!(
            subject = failure.subject(),
            detail = %failure.detail(),
            "{}",
            failure.message()
        );
        self.emit(IngestEvent::Failed(failure.clone()));
        self.session.errors.record(failure);
    }

    fn emit(&self, event: IngestEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

fn run_job(
    job: Job,
    probe: &dyn ImageProbe,
    fetcher: &dyn Fetcher,
    policy: ManifestPolicy,
) -> Result<Vec<ImageRecord>, IngestFailure> {
    match job {
        Job::ImageUrl(url) => match probe.probe(&ImageSource::parse(&url)) {
            Ok(dims) => Ok(vec![ImageRecord::new(url, dims)]),
            Err(e) => Err(IngestFailure::InvalidUrl {
                input: url,
                reason: e.to_string(),
            }),
        },
        Job::Upload { name, data_uri } => match probe.probe(&ImageSource::Data(data_uri.clone()))
        {
            Ok(dims) => Ok(vec![ImageRecord::new(data_uri, dims)]),
            Err(e) => Err(IngestFailure::UploadFailed {
                name,
                reason: e.to_string(),
            }),
        },
        Job::ManifestUrl(url) => {
            let manifest_failed = |reason: String| IngestFailure::ManifestFailed {
                source: url.clone(),
                reason,
            };
            let bytes = ImageSource::parse(&url)
                .read(fetcher)
                .map_err(|e| manifest_failed(e.to_string()))?;
            let manifest =
                Manifest::from_slice(&bytes).map_err(|e| manifest_failed(e.to_string()))?;
            Ok(policy.admit(manifest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::Gallery;
    use crate::session::{
        ErrorPolicy, HINT_DRAG_ACTIVE, HINT_IDLE, MSG_INVALID_URL, MSG_MANIFEST_FAILED,
        MSG_UNSUPPORTED_FORMAT, MSG_UPLOAD_FAILED,
    };
    use crate::ingest::source::{MIME_JPEG, MIME_JSON, MIME_PNG};
    use crate::test_helpers::{
        GatedFetcher, MockFetcher, PerUrlGatedFetcher, jpeg_bytes, manifest_json, png_bytes,
    };
    use crate::types::Dimensions;

    const IMAGE_URL: &str = "https://example.com/photo.png";
    const MANIFEST_URL: &str = "https://example.com/gallery.json";

    fn test_config() -> IngestConfig {
        IngestConfig {
            max_workers: Some(2),
            ..Default::default()
        }
    }

    fn controller_with(config: &IngestConfig, fetcher: impl Fetcher + 'static) -> IngestionController {
        let fetcher: Arc<dyn Fetcher> = Arc::new(fetcher);
        let probe = Arc::new(RustProbe::new(Arc::clone(&fetcher)));
        IngestionController::new(config, probe, fetcher).unwrap()
    }

    fn controller(fetcher: MockFetcher) -> IngestionController {
        controller_with(&test_config(), fetcher)
    }

    fn standard_fetcher() -> MockFetcher {
        MockFetcher::new()
            .with(IMAGE_URL, png_bytes(100, 50))
            .with(
                MANIFEST_URL,
                manifest_json(&[
                    ("https://example.com/a.jpg", 640, 480),
                    ("https://example.com/b.jpg", 0, 0),
                ])
                .into_bytes(),
            )
    }

    // =========================================================================
    // submit tests
    // =========================================================================

    #[test]
    fn submit_empty_is_noop() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(standard_fetcher());

        ctl.submit_value("");
        ctl.wait_idle(&mut gallery);

        assert!(gallery.is_empty());
        assert_eq!(ctl.error_message(), "");
        assert_eq!(ctl.in_flight(), 0);
    }

    #[test]
    fn submit_image_url_appends_probed_record() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(standard_fetcher());

        ctl.submit_value(IMAGE_URL);
        ctl.wait_idle(&mut gallery);

        assert_eq!(
            gallery.records(),
            &[ImageRecord::new(IMAGE_URL, Dimensions::new(100, 50))]
        );
        assert_eq!(ctl.error_message(), "");
    }

    #[test]
    fn submit_keeps_input_text() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(standard_fetcher());

        ctl.submit_value(IMAGE_URL);
        ctl.wait_idle(&mut gallery);

        assert_eq!(ctl.input(), IMAGE_URL);
    }

    #[test]
    fn submit_undecodable_url_sets_error() {
        let mut gallery = Gallery::new();
        let fetcher = MockFetcher::new().with("https://example.com/page.html", b"<html>".to_vec());
        let mut ctl = controller(fetcher);

        ctl.submit_value("https://example.com/page.html");
        ctl.wait_idle(&mut gallery);

        assert!(gallery.is_empty());
        assert_eq!(ctl.error_message(), MSG_INVALID_URL);
    }

    #[test]
    fn submit_unreachable_url_sets_error() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());

        ctl.submit_value("https://example.com/missing.png");
        ctl.wait_idle(&mut gallery);

        assert!(gallery.is_empty());
        assert_eq!(ctl.error_message(), MSG_INVALID_URL);
    }

    #[test]
    fn submit_clears_previous_error() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(standard_fetcher());

        ctl.submit_value("https://example.com/missing.png");
        ctl.wait_idle(&mut gallery);
        assert_eq!(ctl.error_message(), MSG_INVALID_URL);

        ctl.submit_value(IMAGE_URL);
        assert_eq!(ctl.error_message(), "");
        ctl.wait_idle(&mut gallery);
        assert_eq!(ctl.error_message(), "");
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn submit_empty_clears_previous_error() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());

        ctl.submit_value("https://example.com/missing.png");
        ctl.wait_idle(&mut gallery);
        ctl.submit_value("");

        assert_eq!(ctl.error_message(), "");
    }

    #[test]
    fn submit_manifest_url_appends_entries_verbatim() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(standard_fetcher());

        ctl.submit_value(MANIFEST_URL);
        ctl.wait_idle(&mut gallery);

        assert_eq!(
            gallery.records(),
            &[
                ImageRecord::new("https://example.com/a.jpg", Dimensions::new(640, 480)),
                ImageRecord::new("https://example.com/b.jpg", Dimensions::new(0, 0)),
            ]
        );
    }

    #[test]
    fn submit_manifest_with_strict_policy_filters() {
        let mut gallery = Gallery::new();
        let config = IngestConfig {
            manifest_policy: ManifestPolicy::Strict,
            ..test_config()
        };
        let mut ctl = controller_with(&config, standard_fetcher());

        ctl.submit_value(MANIFEST_URL);
        ctl.wait_idle(&mut gallery);

        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery.records()[0].url, "https://example.com/a.jpg");
    }

    #[test]
    fn submit_unreachable_manifest_sets_manifest_error() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());

        ctl.submit_value("https://example.com/nowhere.json");
        ctl.wait_idle(&mut gallery);

        assert!(gallery.is_empty());
        assert_eq!(ctl.error_message(), MSG_MANIFEST_FAILED);
    }

    #[test]
    fn submit_malformed_manifest_sets_manifest_error() {
        let mut gallery = Gallery::new();
        let fetcher = MockFetcher::new().with(MANIFEST_URL, b"{\"galleryImages\": 5}".to_vec());
        let mut ctl = controller(fetcher);

        ctl.submit_value(MANIFEST_URL);
        ctl.wait_idle(&mut gallery);

        assert!(gallery.is_empty());
        assert_eq!(ctl.error_message(), MSG_MANIFEST_FAILED);
    }

    #[test]
    fn submit_manifest_keeps_good_entries_beside_malformed_ones() {
        let mut gallery = Gallery::new();
        let body = r#"{"galleryImages": [
            {"url": "https://example.com/a.jpg", "width": 640, "height": 480},
            {"url": "https://example.com/b.jpg", "width": 640.5},
            {"url": "https://example.com/c.jpg", "width": 10, "height": "tall"}
        ]}"#;
        let fetcher = MockFetcher::new().with(MANIFEST_URL, body.as_bytes().to_vec());
        let mut ctl = controller(fetcher);

        ctl.submit_value(MANIFEST_URL);
        ctl.wait_idle(&mut gallery);

        assert_eq!(
            gallery.records(),
            &[
                ImageRecord::new("https://example.com/a.jpg", Dimensions::new(640, 480)),
                ImageRecord::new("https://example.com/b.jpg", Dimensions::new(640, 0)),
                ImageRecord::new("https://example.com/c.jpg", Dimensions::new(10, 0)),
            ]
        );
        assert_eq!(ctl.error_message(), "");
    }

    #[test]
    fn async_results_land_in_completion_order() {
        const FIRST: &str = "https://example.com/first.png";
        const SECOND: &str = "https://example.com/second.png";
        let mut fetcher = PerUrlGatedFetcher::new(
            MockFetcher::new()
                .with(FIRST, png_bytes(10, 10))
                .with(SECOND, png_bytes(20, 20)),
        );
        let release_first = fetcher.gate(FIRST);
        let release_second = fetcher.gate(SECOND);
        let fetcher: Arc<dyn Fetcher> = Arc::new(fetcher);
        let probe = Arc::new(RustProbe::new(Arc::clone(&fetcher)));
        // Both jobs must run at once even on a single-core machine.
        let mut ctl =
            IngestionController::with_workers(&test_config(), 2, probe, fetcher).unwrap();
        let mut gallery = Gallery::new();

        ctl.submit_value(FIRST);
        ctl.submit_value(SECOND);
        assert_eq!(ctl.in_flight(), 2);

        release_second.send(()).unwrap();
        while gallery.is_empty() {
            ctl.poll(&mut gallery);
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        release_first.send(()).unwrap();
        ctl.wait_idle(&mut gallery);

        let urls: Vec<&str> = gallery.records().iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec![SECOND, FIRST]);
    }

    // =========================================================================
    // handle_drop tests
    // =========================================================================

    #[test]
    fn drop_png_and_txt_appends_one_and_reports_unsupported() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());

        ctl.handle_drop(
            vec![
                DroppedFile::new("photo.png", MIME_PNG, png_bytes(20, 10)),
                DroppedFile::new("notes.txt", "text/plain", b"hello".to_vec()),
            ],
            &mut gallery,
        );
        ctl.wait_idle(&mut gallery);

        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery.records()[0].dimensions(), Dimensions::new(20, 10));
        assert_eq!(ctl.error_message(), MSG_UNSUPPORTED_FORMAT);
    }

    #[test]
    fn dropped_image_becomes_data_uri_record() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());

        ctl.handle_drop(
            vec![DroppedFile::new("photo.jpg", MIME_JPEG, jpeg_bytes(16, 32))],
            &mut gallery,
        );
        ctl.wait_idle(&mut gallery);

        let record = &gallery.records()[0];
        assert!(record.url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(record.dimensions(), Dimensions::new(16, 32));
    }

    #[test]
    fn drop_corrupt_image_sets_upload_error() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());

        ctl.handle_drop(
            vec![DroppedFile::new("broken.png", MIME_PNG, b"not a png".to_vec())],
            &mut gallery,
        );
        ctl.wait_idle(&mut gallery);

        assert!(gallery.is_empty());
        assert_eq!(ctl.error_message(), MSG_UPLOAD_FAILED);
    }

    #[test]
    fn drop_json_appends_without_waiting() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());
        let json = manifest_json(&[("a.jpg", 3, 4), ("b.jpg", 5, 6)]);

        ctl.handle_drop(
            vec![DroppedFile::new("gallery.json", MIME_JSON, json.into_bytes())],
            &mut gallery,
        );

        assert_eq!(ctl.in_flight(), 0);
        let urls: Vec<&str> = gallery.records().iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn drop_invalid_json_sets_manifest_error() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());

        ctl.handle_drop(
            vec![DroppedFile::new("gallery.json", MIME_JSON, b"{oops".to_vec())],
            &mut gallery,
        );

        assert!(gallery.is_empty());
        assert_eq!(ctl.error_message(), MSG_MANIFEST_FAILED);
    }

    #[test]
    fn drop_counts_match_successful_files() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());

        ctl.handle_drop(
            vec![
                DroppedFile::new("a.png", MIME_PNG, png_bytes(5, 5)),
                DroppedFile::new("b.jpg", MIME_JPEG, jpeg_bytes(8, 8)),
                DroppedFile::new("bad.png", MIME_PNG, Vec::new()),
                DroppedFile::new("c.gif", "image/gif", Vec::new()),
                DroppedFile::new(
                    "m.json",
                    MIME_JSON,
                    manifest_json(&[("x.jpg", 1, 1)]).into_bytes(),
                ),
            ],
            &mut gallery,
        );
        ctl.wait_idle(&mut gallery);

        assert_eq!(gallery.len(), 3);
        assert_ne!(ctl.error_message(), "");
    }

    #[test]
    fn collect_policy_keeps_every_drop_failure() {
        let mut gallery = Gallery::new();
        let config = IngestConfig {
            error_policy: ErrorPolicy::Collect,
            ..test_config()
        };
        let mut ctl = controller_with(&config, MockFetcher::new());

        ctl.handle_drop(
            vec![
                DroppedFile::new("a.txt", "text/plain", Vec::new()),
                DroppedFile::new("b.bin", "application/octet-stream", Vec::new()),
            ],
            &mut gallery,
        );

        let subjects: Vec<&str> = ctl
            .session()
            .errors()
            .entries()
            .iter()
            .map(|f| f.subject())
            .collect();
        assert_eq!(subjects, vec!["a.txt", "b.bin"]);
    }

    #[test]
    fn drop_resets_drag_flag() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());

        ctl.drag_enter();
        ctl.handle_drop(Vec::new(), &mut gallery);

        assert!(!ctl.session().is_dragging());
    }

    // =========================================================================
    // Drag gesture tests
    // =========================================================================

    #[test]
    fn drag_gestures_switch_hint() {
        let mut ctl = controller(MockFetcher::new());
        assert_eq!(ctl.placeholder_hint(), HINT_IDLE);

        ctl.drag_over();
        assert!(ctl.session().is_dragging());
        assert_eq!(ctl.placeholder_hint(), HINT_DRAG_ACTIVE);

        ctl.drag_leave();
        assert_eq!(ctl.placeholder_hint(), HINT_IDLE);
    }

    // =========================================================================
    // clear tests
    // =========================================================================

    #[test]
    fn clear_resets_gallery_input_and_error() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(standard_fetcher());

        ctl.submit_value(IMAGE_URL);
        ctl.wait_idle(&mut gallery);
        ctl.submit_value("https://example.com/missing.png");
        ctl.wait_idle(&mut gallery);
        assert_eq!(gallery.len(), 1);

        ctl.clear(&mut gallery);

        assert!(gallery.is_empty());
        assert_eq!(ctl.input(), "");
        assert_eq!(ctl.error_message(), "");
    }

    #[test]
    fn clear_on_fresh_controller_is_harmless() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());
        ctl.clear(&mut gallery);
        assert!(gallery.is_empty());
        assert_eq!(ctl.generation(), 1);
    }

    #[test]
    fn clear_discards_in_flight_results() {
        let (release, gate) = std::sync::mpsc::channel();
        let fetcher = GatedFetcher::new(standard_fetcher(), gate);
        let (events_tx, events_rx) = std::sync::mpsc::channel();
        let mut ctl = controller_with(&test_config(), fetcher).with_events(events_tx);
        let mut gallery = Gallery::new();

        ctl.submit_value(IMAGE_URL);
        assert_eq!(ctl.in_flight(), 1);
        ctl.clear(&mut gallery);
        release.send(()).unwrap();
        ctl.wait_idle(&mut gallery);

        assert!(gallery.is_empty());
        assert_eq!(ctl.in_flight(), 0);
        let events: Vec<IngestEvent> = events_rx.try_iter().collect();
        assert_eq!(
            events,
            vec![IngestEvent::Discarded {
                source: IMAGE_URL.to_string()
            }]
        );
    }

    #[test]
    fn work_after_clear_is_applied() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(standard_fetcher());

        ctl.clear(&mut gallery);
        ctl.submit_value(IMAGE_URL);
        ctl.wait_idle(&mut gallery);

        assert_eq!(gallery.len(), 1);
    }

    // =========================================================================
    // poll and event tests
    // =========================================================================

    #[test]
    fn poll_without_work_applies_nothing() {
        let mut gallery = Gallery::new();
        let mut ctl = controller(MockFetcher::new());
        assert_eq!(ctl.poll(&mut gallery), 0);
    }

    #[test]
    fn events_report_appends_and_failures() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut ctl = controller(standard_fetcher()).with_events(tx);
        let mut gallery = Gallery::new();

        ctl.submit_value(IMAGE_URL);
        ctl.wait_idle(&mut gallery);
        ctl.handle_drop(
            vec![DroppedFile::new("x.txt", "text/plain", Vec::new())],
            &mut gallery,
        );

        let events: Vec<IngestEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            IngestEvent::Appended {
                source: IMAGE_URL.to_string(),
                count: 1
            }
        );
        assert!(matches!(
            &events[1],
            IngestEvent::Failed(IngestFailure::UnsupportedFormat { name, .. }) if name == "x.txt"
        ));
    }
}
