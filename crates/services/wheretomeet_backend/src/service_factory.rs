// --- File: crates/services/wheretomeet_backend/src/service_factory.rs ---
//! Builds the external services enabled by configuration.
//!
//! A service whose client cannot be constructed (missing key, bad URL) is
//! logged and left out; requests that need it then fail with a
//! configuration error instead of the process refusing to start.
use std::sync::Arc;

use wheretomeet_common::services::{
    ErasedErrors, ServiceFactory, SharedAuthProvider, SharedCalendarService, SharedPlacesService,
};
use wheretomeet_common::{is_gcal_enabled, is_places_enabled, is_supabase_enabled, log_result};
use wheretomeet_config::AppConfig;
use wheretomeet_gcal::GoogleCalendarService;
use wheretomeet_places::GooglePlacesClient;
use wheretomeet_supabase::SupabaseAuthProvider;

pub struct WhereToMeetServiceFactory {
    places_service: Option<SharedPlacesService>,
    calendar_service: Option<SharedCalendarService>,
    auth_provider: Option<SharedAuthProvider>,
}

impl WhereToMeetServiceFactory {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let places_service = config
            .places
            .as_ref()
            .filter(|_| is_places_enabled(&config))
            .and_then(|places| {
                log_result(
                    GooglePlacesClient::new(places),
                    "Google Places client initialised",
                    "Google Places disabled",
                )
                .ok()
            })
            .map(|client| Arc::new(ErasedErrors(client)) as SharedPlacesService);

        let calendar_service = is_gcal_enabled(&config)
            .then(|| {
                log_result(
                    GoogleCalendarService::new(),
                    "Google Calendar service initialised",
                    "Google Calendar disabled",
                )
                .ok()
            })
            .flatten()
            .map(|service| Arc::new(ErasedErrors(service)) as SharedCalendarService);

        let auth_provider = config
            .supabase
            .as_ref()
            .filter(|_| is_supabase_enabled(&config))
            .and_then(|supabase| {
                log_result(
                    SupabaseAuthProvider::new(supabase),
                    "Supabase auth initialised",
                    "Supabase auth disabled",
                )
                .ok()
            })
            .map(|provider| Arc::new(ErasedErrors(provider)) as SharedAuthProvider);

        Self {
            places_service,
            calendar_service,
            auth_provider,
        }
    }
}

impl ServiceFactory for WhereToMeetServiceFactory {
    fn places_service(&self) -> Option<SharedPlacesService> {
        self.places_service.clone()
    }

    fn calendar_service(&self) -> Option<SharedCalendarService> {
        self.calendar_service.clone()
    }

    fn auth_provider(&self) -> Option<SharedAuthProvider> {
        self.auth_provider.clone()
    }
}
