//! Space groups: classification, descriptors, operator expansion and caching.

pub mod cache;
pub mod descriptor;
pub mod expansion;
pub mod group_classes;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_groups;
