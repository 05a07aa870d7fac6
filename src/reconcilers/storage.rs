use super::{owns, ChildReconciler};
use crate::context::Context;
use crate::crd::BookStack;
use crate::provision::Volume;
use crate::signal::Signal;
use crate::store::ObjectStore;
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use kube::runtime::Controller;
use kube::Client;

/// Volume first, then the claim that binds to it. A policy without volumes
/// only produces the claim.
async fn ensure_volume<S: ObjectStore>(ctx: &Context<S>, volume: Volume) -> Signal {
    let storage = &ctx.settings().storage;
    if let Some(pv) = storage.volume(ctx.resource(), volume) {
        crate::proceed!(ctx.ensure(pv).await);
    }
    crate::proceed!(ctx.ensure(storage.claim(ctx.resource(), volume)).await);
    Signal::Stop
}

// PersistentVolumes are cluster-scoped, so their owner references cannot be
// mapped back to a namespaced parent; only the claims are watched.
fn watch_claims(
    controller: Controller<BookStack>,
    client: &Client,
    namespace: Option<&str>,
) -> Controller<BookStack> {
    owns::<PersistentVolumeClaim>(controller, client, namespace)
}

/// Keeps `<parent>-pv` and `<parent>-pvc` in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppStorageReconciler;

impl ChildReconciler for AppStorageReconciler {
    const NAME: &'static str = "app storage";

    async fn steps<S: ObjectStore>(&self, ctx: &Context<S>) -> Signal {
        ensure_volume(ctx, Volume::App).await
    }

    fn watch(
        controller: Controller<BookStack>,
        client: &Client,
        namespace: Option<&str>,
    ) -> Controller<BookStack> {
        watch_claims(controller, client, namespace)
    }
}

/// Keeps `<parent>-db-pv` and `<parent>-db-pvc` in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct DbStorageReconciler;

impl ChildReconciler for DbStorageReconciler {
    const NAME: &'static str = "db storage";

    async fn steps<S: ObjectStore>(&self, ctx: &Context<S>) -> Signal {
        ensure_volume(ctx, Volume::Db).await
    }

    fn watch(
        controller: Controller<BookStack>,
        client: &Client,
        namespace: Option<&str>,
    ) -> Controller<BookStack> {
        watch_claims(controller, client, namespace)
    }
}
