// --- File: crates/services/wheretomeet_backend/src/app_state.rs ---
use std::sync::Arc;

use wheretomeet_common::services::ServiceFactory;
use wheretomeet_config::AppConfig;
use wheretomeet_gcal::handlers::GcalState;
use wheretomeet_meetings::{InMemoryMeetingStore, MeetingsState, SharedMeetingStore};
use wheretomeet_places::handlers::PlacesState;

use crate::service_factory::WhereToMeetServiceFactory;

/// Everything the routers are built from.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service_factory: Arc<dyn ServiceFactory>,
    pub store: SharedMeetingStore,
}

pub struct AppStateBuilder {
    config: Arc<AppConfig>,
    service_factory: Option<Arc<dyn ServiceFactory>>,
    store: Option<SharedMeetingStore>,
}

impl AppStateBuilder {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            service_factory: None,
            store: None,
        }
    }

    pub fn with_service_factory(mut self, service_factory: Arc<dyn ServiceFactory>) -> Self {
        self.service_factory = Some(service_factory);
        self
    }

    pub fn with_store(mut self, store: SharedMeetingStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Missing parts fall back to the configuration-driven defaults.
    pub fn build(self) -> AppState {
        let config = self.config;
        let service_factory = self
            .service_factory
            .unwrap_or_else(|| Arc::new(WhereToMeetServiceFactory::new(config.clone())));
        let store = self.store.unwrap_or_else(|| {
            Arc::new(InMemoryMeetingStore::new(config.store.notification_capacity))
        });
        AppState {
            config,
            service_factory,
            store,
        }
    }
}

impl AppState {
    pub fn builder(config: Arc<AppConfig>) -> AppStateBuilder {
        AppStateBuilder::new(config)
    }

    pub fn new(config: Arc<AppConfig>) -> Self {
        AppStateBuilder::new(config).build()
    }

    pub fn meetings_state(&self) -> Arc<MeetingsState> {
        Arc::new(MeetingsState::new(
            self.config.clone(),
            self.store.clone(),
            self.service_factory.places_service(),
            self.service_factory.auth_provider(),
        ))
    }

    /// `None` when no places provider is available.
    pub fn places_state(&self) -> Option<Arc<PlacesState>> {
        let places = self.service_factory.places_service()?;
        Some(Arc::new(PlacesState {
            config: self.config.clone(),
            places,
            auth: self.service_factory.auth_provider(),
        }))
    }

    pub fn gcal_state(&self) -> Arc<GcalState> {
        Arc::new(GcalState {
            config: self.config.clone(),
            calendar: self.service_factory.calendar_service(),
            store: self.store.clone(),
            auth: self.service_factory.auth_provider(),
        })
    }
}
