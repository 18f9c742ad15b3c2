/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Repeating groups.
//!
//! A repeating group is a NumInGroup count field followed by that many
//! entries. Every entry starts with the template's delimiter tag and holds
//! only the template's member tags.

use crate::fieldmap::FieldMap;
use std::ops::{Deref, DerefMut};

/// Ordered member tags of a repeating group. The first tag is the delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTemplate {
    tags: Vec<u32>,
}

impl GroupTemplate {
    /// Creates a template from member tags in wire order.
    #[must_use]
    pub fn new(tags: impl Into<Vec<u32>>) -> Self {
        Self { tags: tags.into() }
    }

    /// Returns the delimiter tag, if the template is not empty.
    #[must_use]
    pub fn delimiter(&self) -> Option<u32> {
        self.tags.first().copied()
    }

    /// Returns true if `tag` is a member of this template.
    #[must_use]
    pub fn contains(&self, tag: u32) -> bool {
        self.tags.contains(&tag)
    }

    /// Returns the member tags in wire order.
    #[must_use]
    pub fn tags(&self) -> &[u32] {
        &self.tags
    }
}

/// One entry of a repeating group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    fields: FieldMap,
}

impl Group {
    /// Creates an empty group entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_fields(fields: FieldMap) -> Self {
        Self { fields }
    }
}

impl Deref for Group {
    type Target = FieldMap;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl DerefMut for Group {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.fields
    }
}

/// A NumInGroup field together with its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatingGroup {
    count_tag: u32,
    template: GroupTemplate,
    groups: Vec<Group>,
}

impl RepeatingGroup {
    /// Creates an empty repeating group.
    #[must_use]
    pub fn new(count_tag: u32, template: GroupTemplate) -> Self {
        Self {
            count_tag,
            template,
            groups: Vec::new(),
        }
    }

    /// Returns the NumInGroup tag.
    #[must_use]
    pub const fn count_tag(&self) -> u32 {
        self.count_tag
    }

    /// Returns the entry template.
    #[must_use]
    pub const fn template(&self) -> &GroupTemplate {
        &self.template
    }

    /// Appends a new empty entry and returns it.
    pub fn add(&mut self) -> &mut Group {
        self.groups.push(Group::new());
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    /// Returns entry `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&Group> {
        self.groups.get(i)
    }

    /// Returns entry `i` mutably.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut Group> {
        self.groups.get_mut(i)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the group has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.groups.clear();
    }

    pub(crate) fn push(&mut self, group: Group) {
        self.groups.push(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template() {
        let template = GroupTemplate::new([55, 44, 38]);
        assert_eq!(template.delimiter(), Some(55));
        assert!(template.contains(44));
        assert!(!template.contains(131));
        assert_eq!(GroupTemplate::new(Vec::new()).delimiter(), None);
    }

    #[test]
    fn test_add_and_get() {
        let mut group = RepeatingGroup::new(146, GroupTemplate::new([55, 44, 38]));
        assert!(group.is_empty());

        group.add().set_raw(55, "EUR/USD");
        group.add().set_raw(55, "GBP/USD");

        assert_eq!(group.len(), 2);
        assert_eq!(group.get(1).and_then(|g| g.get_str(55)), Some("GBP/USD"));
        assert!(group.get(2).is_none());
    }
}
