//! Session controller.
//!
//! Holds the state behind one search page: the classified input, the live
//! result set, the open preview with its attribution list, and the about
//! overlay. Network work goes through the injected [`ImageGenerator`] and
//! [`AttributionLookup`].

use std::sync::Arc;

use super::{
    attribution::{AttributionEntry, AttributionLookup},
    classify::{InputKind, classify},
    error::{Error, Result},
    image::{DEFAULT_IMAGE_COUNT, DEFAULT_IMAGE_SIZE, GenerationRequest, ImageData, ImageGenerator},
};

/// State of the generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    Loading,
    /// The last submit failed; holds the error message.
    Failed(String),
}

/// Visibility of an overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    Closed,
    Open,
}

/// Outcome of [`Session::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// Nothing to submit.
    Ignored,
    /// The generator returned this many images.
    Generated(usize),
    /// A direct URL became the only result.
    Direct,
}

/// One search session.
pub struct Session {
    generator: Arc<dyn ImageGenerator>,
    attribution_lookup: Arc<dyn AttributionLookup>,
    count: u32,
    size: String,

    prompt: String,
    url_override: String,
    generation: GenerationState,
    results: Vec<ImageData>,
    selected: Option<String>,
    attribution: Vec<AttributionEntry>,
    about: Overlay,
}

impl Session {
    /// Creates a session generating the default number and size of images.
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        attribution_lookup: Arc<dyn AttributionLookup>,
    ) -> Self {
        Self {
            generator,
            attribution_lookup,
            count: DEFAULT_IMAGE_COUNT,
            size: DEFAULT_IMAGE_SIZE.to_string(),
            prompt: String::new(),
            url_override: String::new(),
            generation: GenerationState::Idle,
            results: Vec::new(),
            selected: None,
            attribution: Vec::new(),
            about: Overlay::Closed,
        }
    }

    /// Overrides how many images each prompt requests.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Overrides the requested image size.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    // ==================== Input ====================

    /// Classifies `raw` and stores it as either the prompt or the URL,
    /// clearing the other.
    pub fn input_changed(&mut self, raw: &str) -> InputKind {
        let kind = classify(raw);
        match &kind {
            InputKind::Url(url) => {
                self.url_override = url.clone();
                self.prompt.clear();
            }
            InputKind::Prompt(text) => {
                self.prompt = text.clone();
                self.url_override.clear();
            }
        }
        kind
    }

    /// Submits the current input.
    ///
    /// Blank input is ignored. A prompt goes to the generator; a URL becomes
    /// the single result. On failure the state is `Failed`, the result set is
    /// empty and the error is returned. The state never stays `Loading`.
    pub async fn submit(&mut self) -> Result<Submitted> {
        if self.prompt.trim().is_empty() && self.url_override.trim().is_empty() {
            return Ok(Submitted::Ignored);
        }

        self.generation = GenerationState::Loading;
        self.results.clear();

        if !self.prompt.trim().is_empty() {
            let request = GenerationRequest {
                prompt: self.prompt.clone(),
                n: self.count,
                size: self.size.clone(),
            };
            match self.generator.generate(&request).await {
                Ok(images) => {
                    let n = images.len();
                    self.results = images;
                    self.generation = GenerationState::Idle;
                    Ok(Submitted::Generated(n))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "generation failed");
                    self.generation = GenerationState::Failed(e.to_string());
                    Err(e)
                }
            }
        } else {
            self.results = vec![ImageData::new(self.url_override.clone())];
            self.generation = GenerationState::Idle;
            Ok(Submitted::Direct)
        }
    }

    // ==================== Preview ====================

    /// Opens the preview for `url` and clears the previous attribution list.
    ///
    /// Returns the URL whose attribution should be fetched next. A blank URL
    /// closes the preview instead and returns `None`.
    pub fn select_image(&mut self, url: impl Into<String>) -> Option<String> {
        let url = url.into();
        if url.trim().is_empty() {
            self.close_preview();
            return None;
        }
        self.selected = Some(url.clone());
        self.attribution.clear();
        Some(url)
    }

    /// Stores `entries` if `url` is still the open image.
    ///
    /// Returns false when the result arrived for an image that is no longer
    /// open; such results are dropped.
    pub fn apply_attribution(&mut self, url: &str, entries: Vec<AttributionEntry>) -> bool {
        if self.selected.as_deref() != Some(url) {
            tracing::debug!(url, "dropping stale attribution result");
            return false;
        }
        self.attribution = entries;
        true
    }

    /// Opens the preview for `url` and fetches its attribution.
    pub async fn open_image(&mut self, url: impl Into<String>) -> &[AttributionEntry] {
        let Some(url) = self.select_image(url) else {
            return &self.attribution;
        };
        let entries = self.attribution_lookup.lookup(&url).await;
        self.apply_attribution(&url, entries);
        &self.attribution
    }

    /// Opens the preview for the result at `index` (zero-based).
    pub async fn open_result(&mut self, index: usize) -> Result<&[AttributionEntry]> {
        let url = self
            .results
            .get(index)
            .map(|img| img.url.clone())
            .ok_or_else(|| {
                Error::InvalidRequest(format!(
                    "no result at position {} ({} available)",
                    index + 1,
                    self.results.len()
                ))
            })?;
        Ok(self.open_image(url).await)
    }

    /// Closes the preview and clears its attribution list.
    pub fn close_preview(&mut self) {
        self.selected = None;
        self.attribution.clear();
    }

    // ==================== About ====================

    pub fn open_about(&mut self) {
        self.about = Overlay::Open;
    }

    pub fn close_about(&mut self) {
        self.about = Overlay::Closed;
    }

    // ==================== Accessors ====================

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn url_override(&self) -> &str {
        &self.url_override
    }

    pub fn generation_state(&self) -> &GenerationState {
        &self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.generation == GenerationState::Loading
    }

    pub fn results(&self) -> &[ImageData] {
        &self.results
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn preview(&self) -> Overlay {
        if self.selected.is_some() {
            Overlay::Open
        } else {
            Overlay::Closed
        }
    }

    pub fn attribution(&self) -> &[AttributionEntry] {
        &self.attribution
    }

    pub fn about(&self) -> Overlay {
        self.about
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct FakeGenerator {
        calls: Mutex<Vec<GenerationRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl ImageGenerator for FakeGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<Vec<ImageData>> {
            self.calls.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(Error::api(500, "model overloaded"));
            }
            Ok((0..request.n)
                .map(|i| ImageData::new(format!("https://img.example/{i}.png")))
                .collect())
        }
    }

    #[derive(Default)]
    struct FakeLookup {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AttributionLookup for FakeLookup {
        async fn lookup(&self, image_url: &str) -> Vec<AttributionEntry> {
            self.calls.lock().unwrap().push(image_url.to_string());
            vec![
                AttributionEntry {
                    name: format!("artist of {image_url}"),
                    percentage: 80.0,
                },
                AttributionEntry {
                    name: "runner-up".to_string(),
                    percentage: 12.5,
                },
            ]
        }
    }

    fn session() -> (Session, Arc<FakeGenerator>, Arc<FakeLookup>) {
        let generator = Arc::new(FakeGenerator::default());
        let lookup = Arc::new(FakeLookup::default());
        let session = Session::new(generator.clone(), lookup.clone());
        (session, generator, lookup)
    }

    #[test]
    fn test_input_changed_sets_exactly_one() {
        let (mut s, _, _) = session();

        s.input_changed("https://example.com/x.png");
        assert_eq!(s.url_override(), "https://example.com/x.png");
        assert_eq!(s.prompt(), "");

        s.input_changed("a cat astronaut");
        assert_eq!(s.prompt(), "a cat astronaut");
        assert_eq!(s.url_override(), "");
    }

    #[tokio::test]
    async fn test_submit_prompt_generates() {
        let (mut s, generator, _) = session();
        s.input_changed("a cat astronaut");

        assert_eq!(s.submit().await.unwrap(), Submitted::Generated(4));
        assert_eq!(
            generator.calls.lock().unwrap().as_slice(),
            &[GenerationRequest {
                prompt: "a cat astronaut".to_string(),
                n: 4,
                size: "512x512".to_string(),
            }]
        );
        assert_eq!(s.generation_state(), &GenerationState::Idle);
        let urls: Vec<_> = s.results().iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://img.example/0.png",
                "https://img.example/1.png",
                "https://img.example/2.png",
                "https://img.example/3.png",
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_url_bypasses_generation() {
        let (mut s, generator, _) = session();
        s.input_changed("https://example.com/x.png");

        assert_eq!(s.submit().await.unwrap(), Submitted::Direct);
        assert!(generator.calls.lock().unwrap().is_empty());
        assert_eq!(s.results(), &[ImageData::new("https://example.com/x.png")]);
    }

    #[tokio::test]
    async fn test_submit_blank_is_ignored() {
        let (mut s, generator, _) = session();
        assert_eq!(s.submit().await.unwrap(), Submitted::Ignored);

        s.input_changed("   ");
        assert_eq!(s.submit().await.unwrap(), Submitted::Ignored);
        assert!(generator.calls.lock().unwrap().is_empty());
        assert_eq!(s.generation_state(), &GenerationState::Idle);
    }

    #[tokio::test]
    async fn test_submit_failure_sets_failed_state() {
        let generator = Arc::new(FakeGenerator {
            fail: true,
            ..Default::default()
        });
        let mut s = Session::new(generator, Arc::new(FakeLookup::default()));

        s.input_changed("https://example.com/old.png");
        s.submit().await.unwrap();
        assert_eq!(s.results().len(), 1);

        s.input_changed("a storm at sea");
        let err = s.submit().await.unwrap_err();
        assert!(err.is_server_error());
        assert!(!s.is_loading());
        assert!(s.results().is_empty());
        match s.generation_state() {
            GenerationState::Failed(msg) => assert!(msg.contains("model overloaded")),
            other => panic!("unexpected state: {other:?}"),
        }

        // A later successful submit clears the failure.
        s.input_changed("https://example.com/new.png");
        s.submit().await.unwrap();
        assert_eq!(s.generation_state(), &GenerationState::Idle);
    }

    #[tokio::test]
    async fn test_custom_count_and_size() {
        let generator = Arc::new(FakeGenerator::default());
        let mut s = Session::new(generator.clone(), Arc::new(FakeLookup::default()))
            .with_count(2)
            .with_size("256x256");
        s.input_changed("tiny robots");

        assert_eq!(s.submit().await.unwrap(), Submitted::Generated(2));
        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls[0].n, 2);
        assert_eq!(calls[0].size, "256x256");
    }

    #[test]
    fn test_select_clears_previous_attribution() {
        let (mut s, _, _) = session();
        let url = s.select_image("https://img.example/0.png").unwrap();
        assert!(s.apply_attribution(
            &url,
            vec![AttributionEntry {
                name: "Turner".to_string(),
                percentage: 55.0,
            }]
        ));
        assert_eq!(s.attribution().len(), 1);

        s.select_image("https://img.example/1.png");
        assert_eq!(s.selected(), Some("https://img.example/1.png"));
        assert_eq!(s.preview(), Overlay::Open);
        assert!(s.attribution().is_empty());
    }

    #[test]
    fn test_stale_attribution_dropped() {
        let (mut s, _, _) = session();
        let first = s.select_image("https://img.example/0.png").unwrap();
        s.select_image("https://img.example/1.png");

        let stale = vec![AttributionEntry {
            name: "Old".to_string(),
            percentage: 99.0,
        }];
        assert!(!s.apply_attribution(&first, stale.clone()));
        assert!(s.attribution().is_empty());

        s.close_preview();
        assert!(!s.apply_attribution("https://img.example/1.png", stale));
        assert!(s.attribution().is_empty());
    }

    #[tokio::test]
    async fn test_open_result_fetches_attribution() {
        let (mut s, _, lookup) = session();
        s.input_changed("a lighthouse");
        s.submit().await.unwrap();

        let entries = s.open_result(2).await.unwrap().to_vec();
        assert_eq!(s.selected(), Some("https://img.example/2.png"));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "artist of https://img.example/2.png");
        assert_eq!(entries[1].name, "runner-up");
        assert_eq!(
            lookup.calls.lock().unwrap().as_slice(),
            &["https://img.example/2.png".to_string()]
        );
    }

    #[tokio::test]
    async fn test_open_result_out_of_range() {
        let (mut s, _, lookup) = session();
        let err = s.open_result(0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(s.selected().is_none());
        assert!(lookup.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_blank_url_closes_preview() {
        let (mut s, _, lookup) = session();
        s.open_image("https://example.com/x.png").await;
        assert_eq!(s.preview(), Overlay::Open);

        assert!(s.open_image("").await.is_empty());
        assert_eq!(s.selected(), None);
        assert_eq!(s.preview(), Overlay::Closed);
        assert!(s.attribution().is_empty());

        assert_eq!(s.select_image("  "), None);
        assert_eq!(s.preview(), Overlay::Closed);
        assert_eq!(
            lookup.calls.lock().unwrap().as_slice(),
            &["https://example.com/x.png".to_string()]
        );
    }

    #[tokio::test]
    async fn test_close_preview_is_idempotent() {
        let (mut s, _, _) = session();
        s.open_image("https://example.com/x.png").await;
        assert!(!s.attribution().is_empty());

        s.close_preview();
        assert_eq!(s.selected(), None);
        assert_eq!(s.preview(), Overlay::Closed);
        assert!(s.attribution().is_empty());

        s.close_preview();
        assert_eq!(s.selected(), None);
        assert!(s.attribution().is_empty());
    }

    #[test]
    fn test_about_overlay() {
        let (mut s, _, _) = session();
        assert_eq!(s.about(), Overlay::Closed);
        s.open_about();
        assert_eq!(s.about(), Overlay::Open);
        s.close_about();
        s.close_about();
        assert_eq!(s.about(), Overlay::Closed);
    }
}
