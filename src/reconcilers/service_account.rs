use super::{owns, ChildReconciler};
use crate::context::Context;
use crate::crd::BookStack;
use crate::desired;
use crate::signal::Signal;
use crate::store::ObjectStore;
use k8s_openapi::api::core::v1::ServiceAccount;
use kube::runtime::Controller;
use kube::Client;

/// Keeps `<parent>-sa` in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServiceAccountReconciler;

impl ChildReconciler for ServiceAccountReconciler {
    const NAME: &'static str = "service account";

    async fn steps<S: ObjectStore>(&self, ctx: &Context<S>) -> Signal {
        crate::proceed!(ctx.ensure(desired::service_account(ctx.resource())).await);
        Signal::Stop
    }

    fn watch(
        controller: Controller<BookStack>,
        client: &Client,
        namespace: Option<&str>,
    ) -> Controller<BookStack> {
        owns::<ServiceAccount>(controller, client, namespace)
    }
}
