use super::{owns, ChildReconciler};
use crate::context::Context;
use crate::crd::BookStack;
use crate::desired;
use crate::signal::Signal;
use crate::store::ObjectStore;
use k8s_openapi::api::core::v1::Service;
use kube::runtime::Controller;
use kube::Client;

/// Keeps the `NodePort` Service `<parent>-svc` in place. The port the
/// platform assigns is what the ConfigMap reconciler waits for.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServiceReconciler;

impl ChildReconciler for ServiceReconciler {
    const NAME: &'static str = "service";

    async fn steps<S: ObjectStore>(&self, ctx: &Context<S>) -> Signal {
        crate::proceed!(ctx.ensure(desired::service(ctx.resource())).await);
        Signal::Stop
    }

    fn watch(
        controller: Controller<BookStack>,
        client: &Client,
        namespace: Option<&str>,
    ) -> Controller<BookStack> {
        owns::<Service>(controller, client, namespace)
    }
}
