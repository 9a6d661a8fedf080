use tracing::{instrument, warn};

use crate::api::{ApiError, DashboardApi};
use crate::filter::{project, Filter, PublishingFilters};
use crate::model::{ClientSummary, PublishingStats, PublishingTask, RecordId, Role};
use crate::mutation::Selection;
use crate::pages::Collection;

/// Publishing queue with aggregate stats, optionally scoped to one client.
#[derive(Debug, Clone)]
pub struct PublishingPage {
    role: Role,
    tasks: Collection<PublishingTask>,
    stats: PublishingStats,
    clients: Vec<ClientSummary>,
    pub filters: PublishingFilters,
    selection: Selection<PublishingTask>,
}

impl PublishingPage {
    pub fn new(role: Role, client_id: Option<RecordId>) -> Self {
        Self {
            role,
            tasks: Collection::default(),
            stats: PublishingStats::default(),
            clients: Vec::new(),
            filters: PublishingFilters {
                client_id: Filter::from(client_id),
                ..Default::default()
            },
            selection: Selection::default(),
        }
    }

    pub fn records(&self) -> &[PublishingTask] {
        self.tasks.records()
    }

    pub fn stats(&self) -> &PublishingStats {
        &self.stats
    }

    pub fn clients(&self) -> &[ClientSummary] {
        &self.clients
    }

    pub fn is_loading(&self) -> bool {
        self.tasks.is_loading()
    }

    /// Client the backend reads are scoped to.
    pub fn client_scope(&self) -> Option<RecordId> {
        match self.filters.client_id {
            Filter::Only(id) => Some(id),
            Filter::All => None,
        }
    }

    /// Fetch tasks and stats together. Stats failures keep the previous
    /// counters; the first error is returned.
    #[instrument(skip_all, fields(client_id = ?self.client_scope()))]
    pub async fn refresh(&mut self, api: &dyn DashboardApi) -> Result<(), ApiError> {
        let scope = self.client_scope();
        self.tasks.start_loading();
        let (tasks, stats) = tokio::join!(
            api.fetch_publishing_tasks(scope),
            api.fetch_publishing_stats(scope)
        );
        let tasks = self.tasks.finish("publishing tasks", tasks);
        self.selection.reconcile(self.tasks.records());
        let stats = match stats {
            Ok(stats) => {
                self.stats = stats;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load publishing stats");
                Err(err)
            }
        };
        tasks.and(stats)
    }

    /// Load the client dropdown. Only admins may list clients; other roles get
    /// an empty list without a request.
    #[instrument(skip_all)]
    pub async fn load_clients(&mut self, api: &dyn DashboardApi) -> Result<(), ApiError> {
        if self.role != Role::Admin {
            self.clients.clear();
            return Ok(());
        }
        match api.fetch_clients().await {
            Ok(clients) => {
                self.clients = clients;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load clients");
                Err(err)
            }
        }
    }

    /// Change the client scope and refetch.
    pub async fn set_client(
        &mut self,
        api: &dyn DashboardApi,
        client_id: Option<RecordId>,
    ) -> Result<(), ApiError> {
        self.filters.client_id = Filter::from(client_id);
        self.refresh(api).await
    }

    /// Clears every filter except the client scope, which changes what the
    /// backend returns and is only altered through [`Self::set_client`].
    pub fn reset_filters(&mut self) {
        self.filters = PublishingFilters {
            client_id: self.filters.client_id.clone(),
            ..Default::default()
        };
    }

    pub fn visible(&self) -> Vec<PublishingTask> {
        project(self.tasks.records(), &self.filters)
    }

    pub fn select(&mut self, id: RecordId) -> bool {
        self.selection.select(self.tasks.records(), id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> Option<&PublishingTask> {
        self.selection.get()
    }
}
