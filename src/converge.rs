//! Create-or-patch for a single child object.

use crate::error::Result;
use crate::merge;
use crate::owner;
use crate::store::{ObjectKey, ObjectStore, StoredObject};
use kube::{Resource, ResourceExt};
use tracing::{debug, info};

/// What converging one object did to the store.
#[derive(Clone, Debug)]
pub enum Convergence<K> {
    Created(K),
    Patched(K),
    Unchanged(K),
}

impl<K> Convergence<K> {
    pub fn wrote(&self) -> bool {
        !matches!(self, Convergence::Unchanged(_))
    }
}

/// Drives the live copy of `desired` toward it.
///
/// A missing object is created as-is. An existing one gets every non-empty
/// desired field laid over it, and only the resulting difference is sent as
/// a merge patch pinned to the observed resourceVersion. Fields the platform
/// set after creation are left alone.
pub async fn converge<S, K, P>(store: &S, owner: &P, mut desired: K) -> Result<Convergence<K>>
where
    S: ObjectStore,
    K: StoredObject,
    P: Resource<DynamicType = ()>,
{
    owner::bind(&mut desired, owner)?;
    let key = ObjectKey::from_object(&desired)?;
    let kind = K::kind(&());

    let Some(existing) = store.get::<K>(&key).await? else {
        info!("creating resource {} {}", kind, key);
        let created = store.create(&desired).await?;
        return Ok(Convergence::Created(created));
    };

    owner::adopt(&mut desired, &existing, owner)?;
    let before = serde_json::to_value(&existing)?;
    let merged = merge::overlay(&before, &serde_json::to_value(&desired)?);

    match merge::diff(&before, &merged) {
        None => {
            debug!("{} {} already up to date", kind, key);
            Ok(Convergence::Unchanged(existing))
        }
        Some(mut patch) => {
            merge::pin_resource_version(&mut patch, existing.resource_version());
            info!("updating resource {} {}", kind, key);
            let patched = store.patch::<K>(&key, &patch).await?;
            Ok(Convergence::Patched(patched))
        }
    }
}
