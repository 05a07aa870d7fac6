use super::{owns, ChildReconciler};
use crate::context::Context;
use crate::crd::BookStack;
use crate::desired;
use crate::signal::Signal;
use crate::store::ObjectStore;
use k8s_openapi::api::core::v1::Secret;
use kube::runtime::Controller;
use kube::Client;

/// Keeps `<parent>-secret` and `<parent>-db-secret` in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecretReconciler;

impl ChildReconciler for SecretReconciler {
    const NAME: &'static str = "secret";

    async fn steps<S: ObjectStore>(&self, ctx: &Context<S>) -> Signal {
        let parent = ctx.resource();
        let credentials = ctx.settings().credentials.database(parent);
        crate::proceed!(ctx.ensure(desired::app_secret(parent, &credentials)).await);
        crate::proceed!(ctx.ensure(desired::db_secret(parent, &credentials)).await);
        Signal::Stop
    }

    fn watch(
        controller: Controller<BookStack>,
        client: &Client,
        namespace: Option<&str>,
    ) -> Controller<BookStack> {
        owns::<Secret>(controller, client, namespace)
    }
}
