//! Controller owner references from the parent to its children.

use crate::error::{Error, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{Resource, ResourceExt};

/// Controller reference pointing at `owner`. Fails when the owner has not
/// been persisted yet (no uid) or has no name.
pub fn owner_reference<P>(owner: &P) -> Result<OwnerReference>
where
    P: Resource<DynamicType = ()>,
{
    owner.controller_owner_ref(&()).ok_or_else(|| {
        Error::Ownership(format!(
            "{} {} has no name or uid",
            P::kind(&()),
            owner.name_any()
        ))
    })
}

/// Inserts `reference` into `references`, replacing an entry with the same
/// uid. A different controller already present is an error.
fn upsert(references: &mut Vec<OwnerReference>, reference: OwnerReference) -> Result<()> {
    if let Some(other) = references
        .iter()
        .find(|r| r.uid != reference.uid && r.controller == Some(true))
    {
        return Err(Error::Ownership(format!(
            "already controlled by {} {}",
            other.kind, other.name
        )));
    }

    match references.iter_mut().find(|r| r.uid == reference.uid) {
        Some(current) => *current = reference,
        None => references.push(reference),
    }
    Ok(())
}

/// Makes `owner` the controller of `child`. Binding twice leaves a single
/// reference.
pub fn bind<K, P>(child: &mut K, owner: &P) -> Result<()>
where
    K: Resource,
    P: Resource<DynamicType = ()>,
{
    let reference = owner_reference(owner)?;
    let references = child.meta_mut().owner_references.get_or_insert_with(Vec::new);
    upsert(references, reference)
}

/// Rebuilds the owner list of `desired` from the live object's list with the
/// owner upserted, so references added by others survive the merge.
pub fn adopt<K, P>(desired: &mut K, existing: &K, owner: &P) -> Result<()>
where
    K: Resource,
    P: Resource<DynamicType = ()>,
{
    let mut references = existing.owner_references().to_vec();
    upsert(&mut references, owner_reference(owner)?)?;
    desired.meta_mut().owner_references = Some(references);
    Ok(())
}

/// True when `child` carries a controller reference to `owner`.
pub fn is_controlled_by<K, P>(child: &K, owner: &P) -> bool
where
    K: Resource,
    P: Resource,
{
    let Some(uid) = owner.meta().uid.as_deref() else {
        return false;
    };
    child
        .owner_references()
        .iter()
        .any(|r| r.uid == uid && r.controller == Some(true))
}
