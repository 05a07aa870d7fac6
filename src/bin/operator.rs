//! BookStack operator binary.

use bookstack_operator::{BookStack, Operator, OperatorConfig};
use kube::CustomResourceExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bookstack_operator=info".parse()?)
                .add_directive("kube=info".parse()?),
        )
        .init();

    if std::env::args().any(|arg| arg == "--generate-crds") {
        print!("{}", serde_yaml::to_string(&BookStack::crd())?);
        return Ok(());
    }

    let config = OperatorConfig::from_env()?;
    Operator::new(config).run().await?;
    Ok(())
}
