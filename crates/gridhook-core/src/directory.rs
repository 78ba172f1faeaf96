//! Directory-service port trait.
//!
//! Defines the remote operations this system consumes. The concrete
//! HTTP implementation lives in gridhook-infra; core stays free of any
//! transport concerns. Uses native async fn in traits (Rust 2024
//! edition, no async_trait macro).

use chrono::{DateTime, Utc};

use gridhook_types::error::DirectoryError;
use gridhook_types::subscription::{DirectoryUser, Subscription};

/// Remote directory-service operations consumed by the lifecycle manager
/// and dispatcher.
pub trait DirectoryService: Send + Sync {
    /// List the app's existing change subscriptions.
    fn list_subscriptions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Subscription>, DirectoryError>> + Send;

    /// Register a new change subscription. Returns the created entity with
    /// its service-assigned id.
    fn create_subscription(
        &self,
        subscription: &Subscription,
    ) -> impl std::future::Future<Output = Result<Subscription, DirectoryError>> + Send;

    /// Extend an existing subscription's expiration.
    fn renew_subscription(
        &self,
        id: &str,
        expires: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), DirectoryError>> + Send;

    /// Fetch a user by its relative resource path (e.g. `users/{id}`).
    ///
    /// Fails with [`DirectoryError::NotFound`] when the entity no longer
    /// exists.
    fn get_user_by_path(
        &self,
        relative_path: &str,
    ) -> impl std::future::Future<Output = Result<DirectoryUser, DirectoryError>> + Send;
}

/// Recording mock used by lifecycle and dispatcher tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};
    use secrecy::SecretString;

    use gridhook_types::config::AppSettings;
    use gridhook_types::error::DirectoryError;
    use gridhook_types::subscription::{DirectoryUser, Subscription};

    use super::DirectoryService;

    #[derive(Debug, Clone)]
    pub enum RecordedCall {
        ListSubscriptions,
        CreateSubscription(Subscription),
        RenewSubscription { id: String, expires: DateTime<Utc> },
        GetUser(String),
    }

    /// What a `get_user_by_path` call should return.
    #[derive(Debug, Clone)]
    pub enum UserLookup {
        Found(DirectoryUser),
        NotFound,
        Fail,
    }

    /// In-memory directory service that records every call.
    pub struct RecordingDirectory {
        subscriptions: Vec<Subscription>,
        list_fails: bool,
        renew_fails: bool,
        user_lookup: UserLookup,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl Default for RecordingDirectory {
        fn default() -> Self {
            Self {
                subscriptions: Vec::new(),
                list_fails: false,
                renew_fails: false,
                user_lookup: UserLookup::NotFound,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl RecordingDirectory {
        pub fn with_subscriptions(mut self, subscriptions: Vec<Subscription>) -> Self {
            self.subscriptions = subscriptions;
            self
        }

        pub fn with_list_failure(mut self) -> Self {
            self.list_fails = true;
            self
        }

        pub fn with_renew_failure(mut self) -> Self {
            self.renew_fails = true;
            self
        }

        pub fn with_user(mut self, user: DirectoryUser) -> Self {
            self.user_lookup = UserLookup::Found(user);
            self
        }

        pub fn with_user_failure(mut self) -> Self {
            self.user_lookup = UserLookup::Fail;
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: RecordedCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl DirectoryService for RecordingDirectory {
        async fn list_subscriptions(&self) -> Result<Vec<Subscription>, DirectoryError> {
            self.record(RecordedCall::ListSubscriptions);
            if self.list_fails {
                return Err(DirectoryError::Api {
                    status: 503,
                    message: "service unavailable".to_string(),
                });
            }
            Ok(self.subscriptions.clone())
        }

        async fn create_subscription(
            &self,
            subscription: &Subscription,
        ) -> Result<Subscription, DirectoryError> {
            self.record(RecordedCall::CreateSubscription(subscription.clone()));
            Ok(Subscription {
                id: Some("created-sub".to_string()),
                ..subscription.clone()
            })
        }

        async fn renew_subscription(
            &self,
            id: &str,
            expires: DateTime<Utc>,
        ) -> Result<(), DirectoryError> {
            self.record(RecordedCall::RenewSubscription {
                id: id.to_string(),
                expires,
            });
            if self.renew_fails {
                return Err(DirectoryError::Api {
                    status: 500,
                    message: "patch failed".to_string(),
                });
            }
            Ok(())
        }

        async fn get_user_by_path(
            &self,
            relative_path: &str,
        ) -> Result<DirectoryUser, DirectoryError> {
            self.record(RecordedCall::GetUser(relative_path.to_string()));
            match &self.user_lookup {
                UserLookup::Found(user) => Ok(user.clone()),
                UserLookup::NotFound => Err(DirectoryError::NotFound(relative_path.to_string())),
                UserLookup::Fail => Err(DirectoryError::Api {
                    status: 503,
                    message: "service unavailable".to_string(),
                }),
            }
        }
    }

    /// Settings fixture shared by lifecycle and dispatcher tests.
    pub fn test_settings() -> Arc<AppSettings> {
        Arc::new(AppSettings {
            tenant_id: "tenant-1".to_string(),
            client_id: "client-1".to_string(),
            client_secret: SecretString::from("s3cret".to_string()),
            azure_subscription_id: "azsub-1".to_string(),
            resource_group: "rg-1".to_string(),
            partner_topic: "graph-notifications".to_string(),
            location: "westus2".to_string(),
            client_state: "SomeSecretValue".to_string(),
            graph_base_url: None,
            token_url: None,
            host: "0.0.0.0".to_string(),
            port: 8080,
        })
    }
}
