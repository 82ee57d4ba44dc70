//! Shared application state handed to every route.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::forum::Composer;
use crate::location::{Geocoder, HttpGeocoder, MockGeocoder};
use crate::submit::{Backend, SimulatedBackend};
use crate::uploader::{BlobPreviews, PreviewStore};
use crate::wizard::ReportWizard;
use crate::Config;

/// An open wizard session and when it was last used.
#[derive(Debug)]
pub struct Draft {
    pub wizard: ReportWizard,
    touched: Instant,
}

impl Draft {
    pub fn new(wizard: ReportWizard) -> Self {
        Self {
            wizard,
            touched: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.touched = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.touched.elapsed()
    }
}

/// Cheap to clone; every field is shared.
///
/// Wizard entries are only borrowed synchronously. Handlers copy out what
/// they need (payload, busy token) before awaiting a capability.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub drafts: Arc<DashMap<Uuid, Draft>>,
    pub topic_form: Composer,
    pub reply_forms: Arc<DashMap<u32, Composer>>,
    pub backend: Arc<dyn Backend>,
    pub geocoder: Arc<dyn Geocoder>,
    pub previews: Arc<dyn PreviewStore>,
}

impl AppState {
    /// Wire the simulated backend and the configured geocoder.
    pub fn from_config(config: Config) -> Self {
        // ---
        let backend = SimulatedBackend::new(
            config.report_submit_delay,
            config.topic_submit_delay,
            config.reply_submit_delay,
        );

        let geocoder: Arc<dyn Geocoder> = match &config.geocoder_url {
            Some(url) => {
                tracing::info!("Using HTTP geocoder at {}", url);
                Arc::new(HttpGeocoder::new(url.clone()))
            }
            None => Arc::new(MockGeocoder::new(config.geocode_delay)),
        };

        Self::new(config, Arc::new(backend), geocoder)
    }

    pub fn new(config: Config, backend: Arc<dyn Backend>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            config,
            catalog: Arc::new(Catalog::seeded()),
            drafts: Arc::new(DashMap::new()),
            topic_form: Composer::default(),
            reply_forms: Arc::new(DashMap::new()),
            backend,
            geocoder,
            previews: Arc::new(BlobPreviews::default()),
        }
    }

    pub fn new_draft(&self) -> Uuid {
        // ---
        let id = Uuid::new_v4();
        let wizard = ReportWizard::new(
            Arc::clone(&self.previews),
            self.config.max_images,
            self.config.wizard_validation,
        );
        self.drafts.insert(id, Draft::new(wizard));
        tracing::debug!("Draft {} created ({} open)", id, self.drafts.len());
        id
    }

    /// Drop drafts untouched for at least `ttl`, releasing their previews.
    /// A draft with a submission in flight is kept. Returns how many went.
    pub fn evict_idle_drafts(&self, ttl: Duration) -> usize {
        // ---
        let before = self.drafts.len();
        self.drafts
            .retain(|_, draft| draft.wizard.is_submitting() || draft.idle_for() < ttl);
        let evicted = before.saturating_sub(self.drafts.len());
        if evicted > 0 {
            tracing::info!("Evicted {} idle drafts ({} open)", evicted, self.drafts.len());
        }
        evicted
    }

    /// Sweep idle drafts on a fixed interval for as long as the runtime runs.
    pub fn spawn_draft_sweeper(&self) -> JoinHandle<()> {
        // ---
        let state = self.clone();
        let ttl = self.config.draft_ttl;
        let period = self.config.draft_sweep_interval();
        tracing::debug!("Draft sweep every {:?}, ttl {:?}", period, ttl);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                state.evict_idle_drafts(ttl);
            }
        })
    }

    /// Reply composer for a discussion, created on first use.
    pub fn reply_form(&self, discussion_id: u32) -> Composer {
        self.reply_forms.entry(discussion_id).or_default().clone()
    }
}
