use super::{owns, ChildReconciler};
use crate::context::Context;
use crate::crd::{BookStack, Child};
use crate::desired;
use crate::signal::Signal;
use crate::store::ObjectStore;
use k8s_openapi::api::core::v1::{ConfigMap, Service};
use kube::runtime::Controller;
use kube::Client;
use tracing::warn;

/// Keeps `<parent>-cm` and `<parent>-db-cm` in place.
///
/// The app ConfigMap embeds the Service's node port, so nothing is written
/// until the Service reconciler has created `<parent>-svc`; until then the
/// attempt is requeued without an error.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigMapReconciler;

impl ChildReconciler for ConfigMapReconciler {
    const NAME: &'static str = "configmap";

    async fn steps<S: ObjectStore>(&self, ctx: &Context<S>) -> Signal {
        let service_key = ctx.child_key(Child::Service);
        let service = match ctx.get::<Service>(&service_key).await {
            Ok(Some(service)) => service,
            Ok(None) => {
                warn!("service {} not created yet, requeueing", service_key);
                return Signal::Requeue;
            }
            Err(err) => return Signal::RequeueWithError(err),
        };
        let node_port = match desired::node_port(&service) {
            Ok(port) => port,
            Err(err) => return Signal::RequeueWithError(err),
        };

        let parent = ctx.resource();
        let app_host = &ctx.settings().config.app_host;
        crate::proceed!(ctx.ensure(desired::app_config_map(parent, app_host, node_port)).await);
        crate::proceed!(ctx.ensure(desired::db_config_map(parent)).await);
        Signal::Stop
    }

    fn watch(
        controller: Controller<BookStack>,
        client: &Client,
        namespace: Option<&str>,
    ) -> Controller<BookStack> {
        // a Service change can move the node port baked into APP_URL
        let controller = owns::<ConfigMap>(controller, client, namespace);
        owns::<Service>(controller, client, namespace)
    }
}
