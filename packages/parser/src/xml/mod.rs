//! XML utilities: tree navigation and namespace handling.

pub mod namespace;
mod utils;

pub use namespace::{
    declared_namespaces, split_tag, strip_default_namespace, NamespaceMap,
};
pub use utils::{
    element_children, find_child, find_children, get_attribute, get_tag_name, get_text,
    inner_markup,
};
