//! Application state wiring the dispatcher and lifecycle manager.
//!
//! Core services are generic over the [`DirectoryService`] port; AppState
//! pins them to the concrete Graph client. Clients and settings are
//! constructed once at startup and injected -- no ambient globals.

use std::sync::Arc;

use gridhook_core::dispatch::ChangeDispatcher;
use gridhook_core::lifecycle::SubscriptionManager;
use gridhook_infra::graph::GraphDirectoryClient;
use gridhook_types::config::AppSettings;

/// Concrete type aliases for the service generics pinned to the Graph client.
pub type ConcreteDispatcher = ChangeDispatcher<GraphDirectoryClient>;
pub type ConcreteSubscriptionManager = SubscriptionManager<GraphDirectoryClient>;

/// Shared application state for the HTTP handlers and the startup task.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ConcreteDispatcher>,
    pub lifecycle: Arc<ConcreteSubscriptionManager>,
    pub settings: Arc<AppSettings>,
}

impl AppState {
    /// Wire the directory client, lifecycle manager, and dispatcher.
    pub fn init(settings: AppSettings) -> Self {
        let settings = Arc::new(settings);
        let directory = Arc::new(GraphDirectoryClient::new(Arc::clone(&settings)));
        let lifecycle = Arc::new(SubscriptionManager::new(
            Arc::clone(&directory),
            Arc::clone(&settings),
        ));
        let dispatcher = Arc::new(ChangeDispatcher::new(directory, Arc::clone(&lifecycle)));

        Self {
            dispatcher,
            lifecycle,
            settings,
        }
    }
}
