use crate::types::{Labels, Selector};

pub const APP_LABEL: &str = "app";
pub const APP_NAME: &str = "bookstack";
pub const INSTANCE_LABEL: &str = "bookstack-instance";

/// Labels stamped on every child of the named parent. Also the Service
/// selector, see [`selector_for`].
pub fn labels_for(parent: &str) -> Labels {
    Labels::new()
        .insert(APP_LABEL, APP_NAME)
        .insert(INSTANCE_LABEL, parent)
}

pub fn selector_for(parent: &str) -> Selector {
    labels_for(parent).into()
}
