//! Dashboard controller: owns the loaded records and the current view state.

use crate::config::DashboardConfig;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::filter::apply_filter;
use crate::record::DeploymentRecord;
use crate::source::{DeploymentSource, LoadTicket, LoadTracker};
use crate::state::{DashboardState, Interaction};
use crate::view::{build_view, DashboardView};
use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Search box input, debounced by the configured quiescence window.
pub struct SearchInput {
    debouncer: Debouncer<String>,
    settled: mpsc::UnboundedReceiver<String>,
}

impl SearchInput {
    /// Record the current text of the search box.
    ///
    /// Must be called from within a tokio runtime.
    pub fn keystroke(&mut self, text: impl Into<String>) {
        self.debouncer.push(text.into());
    }

    /// Wait for the next settled text. `None` once input is closed.
    pub async fn settled(&mut self) -> Option<String> {
        self.settled.recv().await
    }

    fn try_settled(&mut self) -> Option<String> {
        self.settled.try_recv().ok()
    }
}

#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    today: NaiveDate,
    records: Vec<DeploymentRecord>,
    state: DashboardState,
    tracker: LoadTracker,
}

impl Dashboard {
    /// An empty dashboard. `today` anchors the default date range.
    pub fn new(config: DashboardConfig, today: NaiveDate) -> Self {
        let state = DashboardState::for_environment(today, &config);
        Self {
            config,
            today,
            records: Vec::new(),
            state,
            tracker: LoadTracker::default(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn records(&self) -> &[DeploymentRecord] {
        &self.records
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn environment(&self) -> Option<&str> {
        self.tracker.selection()
    }

    /// Register a fetch for `environment`; earlier in-flight fetches go stale.
    pub fn begin_load(&mut self, environment: impl Into<String>) -> LoadTicket {
        self.tracker.begin(environment)
    }

    /// Install fetched records if `ticket` is still the latest load.
    ///
    /// Accepted records replace the collection and reset the view state to
    /// the environment defaults. Returns whether the records were installed.
    pub fn on_records_loaded(&mut self, ticket: &LoadTicket, records: Vec<DeploymentRecord>) -> bool {
        if !self.tracker.accept(ticket) {
            return false;
        }
        info!(
            environment = ticket.environment(),
            records = records.len(),
            "Loaded deployments"
        );
        self.records = records;
        self.state = DashboardState::for_environment(self.today, &self.config);
        true
    }

    /// Fetch `environment` from `source` and install the result.
    pub async fn load<S: DeploymentSource>(&mut self, source: &S, environment: &str) -> Result<bool> {
        let ticket = self.begin_load(environment);
        let records = source.fetch(environment).await?;
        Ok(self.on_records_loaded(&ticket, records))
    }

    pub fn interact(&mut self, interaction: Interaction) {
        let filtered_count = match interaction {
            Interaction::Navigate(_) => apply_filter(&self.records, &self.state.filter).len(),
            _ => 0,
        };
        self.state = self.state.clone().apply(interaction, filtered_count);
    }

    /// Search input whose settled values feed [`Dashboard::apply_settled_search`].
    pub fn search_input(&self) -> SearchInput {
        let (debouncer, settled) = Debouncer::new(self.config.search_debounce());
        SearchInput { debouncer, settled }
    }

    /// Apply every search text that has settled so far, without waiting.
    ///
    /// Returns how many state changes were made.
    pub fn apply_settled_search(&mut self, input: &mut SearchInput) -> usize {
        let mut applied = 0;
        while let Some(text) = input.try_settled() {
            debug!(search = %text, "Search settled");
            self.interact(Interaction::SetSearch(text));
            applied += 1;
        }
        applied
    }

    pub fn view(&self) -> DashboardView {
        build_view(&self.records, &self.state, &self.config)
    }
}
