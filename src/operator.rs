use crate::config::OperatorConfig;
use crate::context::Settings;
use crate::credentials::{CredentialSource, StaticCredentials};
use crate::crd::BookStack;
use crate::error::{Error, Result};
use crate::provision::{storage_from_config, StoragePolicy};
use crate::reconcilers::{
    self, AppStorageReconciler, ChildReconciler, ConfigMapReconciler, DbStorageReconciler,
    SecretReconciler, ServiceAccountReconciler, ServiceReconciler,
};
use crate::store::{Bounded, KubeStore, ObjectKey};
use futures::StreamExt;
use kube::runtime::controller::{Action, Controller, Error as ControllerError};
use kube::runtime::watcher::Config as WatcherConfig;
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Runs one controller per child reconciler against the cluster.
pub struct Operator {
    config: OperatorConfig,
    credentials: Option<Arc<dyn CredentialSource>>,
    storage: Option<Arc<dyn StoragePolicy>>,
}

impl Operator {
    pub fn new(config: OperatorConfig) -> Self {
        Self {
            config,
            credentials: None,
            storage: None,
        }
    }

    pub fn credentials(mut self, source: impl CredentialSource + 'static) -> Self {
        self.credentials = Some(Arc::new(source));
        self
    }

    pub fn storage(mut self, policy: impl StoragePolicy + 'static) -> Self {
        self.storage = Some(Arc::new(policy));
        self
    }

    fn settings(self) -> Settings {
        let credentials: Arc<dyn CredentialSource> = match self.credentials {
            Some(source) => source,
            None => Arc::new(StaticCredentials::from_config(&self.config)),
        };
        let storage: Arc<dyn StoragePolicy> = match self.storage {
            Some(policy) => policy,
            None => Arc::from(storage_from_config(&self.config)),
        };
        Settings::new(self.config, credentials, storage)
    }

    pub async fn run(self) -> Result<()> {
        let client = Client::try_default().await.map_err(Error::Kube)?;
        let settings = Arc::new(self.settings());
        let store = Bounded::new(
            KubeStore::new(client, &settings.config),
            settings.config.request_timeout,
        );

        info!(
            "Starting operator for BookStack in {}",
            settings
                .config
                .watch_namespace
                .as_deref()
                .unwrap_or("all namespaces")
        );

        futures::join!(
            run_controller(ServiceAccountReconciler, &store, &settings),
            run_controller(ServiceReconciler, &store, &settings),
            run_controller(ConfigMapReconciler, &store, &settings),
            run_controller(SecretReconciler, &store, &settings),
            run_controller(AppStorageReconciler, &store, &settings),
            run_controller(DbStorageReconciler, &store, &settings),
        );

        Ok(())
    }
}

struct ControllerContext<R> {
    reconciler: R,
    store: Bounded<KubeStore>,
    settings: Arc<Settings>,
}

async fn run_controller<R: ChildReconciler>(
    reconciler: R,
    store: &Bounded<KubeStore>,
    settings: &Arc<Settings>,
) {
    let client = store.inner().client().clone();
    let namespace = settings.config.watch_namespace.as_deref();
    let parents: Api<BookStack> = match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    };

    info!("Starting {} controller", R::NAME);

    let controller = R::watch(
        Controller::new(parents, WatcherConfig::default()),
        &client,
        namespace,
    );

    let ctx = Arc::new(ControllerContext {
        reconciler,
        store: store.clone(),
        settings: Arc::clone(settings),
    });

    controller
        .shutdown_on_signal()
        .run(reconcile_wrapper::<R>, error_policy::<R>, ctx)
        .for_each(|result| async move {
            match result {
                Ok((parent, action)) => {
                    debug!("{} reconciled {} - {:?}", R::NAME, parent.name, action);
                }
                // already reported by error_policy
                Err(ControllerError::ReconcilerFailed(e, parent)) => {
                    debug!("{} failed for {}: {}", R::NAME, parent.name, e);
                }
                Err(e) => {
                    warn!("{} controller error: {:?}", R::NAME, e);
                }
            }
        })
        .await;
}

async fn reconcile_wrapper<R: ChildReconciler>(
    parent: Arc<BookStack>,
    ctx: Arc<ControllerContext<R>>,
) -> Result<Action> {
    let key = ObjectKey::from_object(parent.as_ref())?;
    reconcilers::reconcile(&ctx.reconciler, &ctx.store, &ctx.settings, &key)
        .await
        .into_action(&ctx.settings.config)
}

fn error_policy<R: ChildReconciler>(
    parent: Arc<BookStack>,
    error: &Error,
    ctx: Arc<ControllerContext<R>>,
) -> Action {
    error!("Error reconciling {} for {}: {}", R::NAME, parent.name_any(), error);
    Action::requeue(ctx.settings.config.error_requeue)
}
