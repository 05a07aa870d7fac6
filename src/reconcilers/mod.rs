//! Per-kind reconcilers. Each owns one or two child kinds of a `BookStack`
//! and runs as its own controller; they coordinate only through the store.

mod config_map;
mod secret;
mod service;
mod service_account;
mod storage;

pub use config_map::ConfigMapReconciler;
pub use secret::SecretReconciler;
pub use service::ServiceReconciler;
pub use service_account::ServiceAccountReconciler;
pub use storage::{AppStorageReconciler, DbStorageReconciler};

use crate::context::{Context, Settings};
use crate::crd::BookStack;
use crate::signal::Signal;
use crate::store::{ObjectKey, ObjectStore, StoredObject};
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::{Api, Client};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

pub trait ChildReconciler: Send + Sync + 'static {
    /// Used in logs.
    const NAME: &'static str;

    /// The ordered steps for one parent that is known to exist.
    fn steps<S: ObjectStore>(&self, ctx: &Context<S>) -> impl Future<Output = Signal> + Send;

    /// Registers watches on the owned child kinds.
    fn watch(
        controller: Controller<BookStack>,
        client: &Client,
        namespace: Option<&str>,
    ) -> Controller<BookStack>;
}

/// Watch API for children of kind `K`, optionally limited to one namespace.
pub(crate) fn owned_api<K: StoredObject>(client: &Client, namespace: Option<&str>) -> Api<K> {
    match namespace {
        Some(ns) => K::api(client.clone(), Some(ns)),
        None => Api::all(client.clone()),
    }
}

pub(crate) fn owns<K: StoredObject>(
    controller: Controller<BookStack>,
    client: &Client,
    namespace: Option<&str>,
) -> Controller<BookStack> {
    controller.owns(owned_api::<K>(client, namespace), WatcherConfig::default())
}

/// One attempt of `reconciler` for the parent at `key`.
///
/// The parent is re-read on every attempt. A parent that no longer exists
/// yields `Stop`: its children are already being garbage collected.
pub async fn reconcile<R, S>(
    reconciler: &R,
    store: &S,
    settings: &Arc<Settings>,
    key: &ObjectKey,
) -> Signal
where
    R: ChildReconciler,
    S: ObjectStore,
{
    info!("{} reconciliation initiated for {}", R::NAME, key);
    let ctx = match Context::load(store.clone(), Arc::clone(settings), key).await {
        Ok(Some(ctx)) => ctx,
        Ok(None) => {
            info!("BookStack {} not found, nothing to reconcile", key);
            return Signal::Stop;
        }
        Err(err) => {
            warn!("failed to fetch BookStack {}: {}", key, err);
            return Signal::RequeueWithError(err);
        }
    };

    let signal = reconciler.steps(&ctx).await.finish();
    info!("{} reconciliation complete for {}: {:?}", R::NAME, key, signal);
    signal
}
