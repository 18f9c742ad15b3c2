/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Ordered field storage.
//!
//! A [`FieldMap`] keeps tag=value pairs in wire order. It backs the header,
//! body and trailer of a [`crate::Message`] and every repeating group entry.

use crate::group::{Group, RepeatingGroup};
use bytes::Bytes;
use rfqfix_core::error::MessageRejectError;
use rfqfix_core::field::FixField;

/// A single tag=value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    /// Field tag.
    pub tag: u32,
    /// Raw value bytes, without delimiters.
    pub value: Bytes,
}

/// Ordered collection of tag=value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<TagValue>,
}

impl FieldMap {
    /// Creates an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored pairs, group members included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the stored pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &TagValue> {
        self.fields.iter()
    }

    /// Removes every field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Appends a pair without looking for an existing occurrence.
    pub fn push_raw(&mut self, tag: u32, value: impl Into<Bytes>) {
        self.fields.push(TagValue {
            tag,
            value: value.into(),
        });
    }

    /// Sets a raw value, replacing the first occurrence of `tag` or appending.
    pub fn set_raw(&mut self, tag: u32, value: impl Into<Bytes>) {
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.tag == tag) {
            Some(field) => field.value = value,
            None => self.fields.push(TagValue { tag, value }),
        }
    }

    /// Sets a string value.
    pub fn set_str(&mut self, tag: u32, value: &str) {
        self.set_raw(tag, Bytes::copy_from_slice(value.as_bytes()));
    }

    /// Sets a typed field.
    pub fn set<F: FixField>(&mut self, value: &F::Value) {
        let mut buf = Vec::new();
        F::encode(value, &mut buf);
        self.set_raw(F::TAG, buf);
    }

    /// Returns the raw bytes of the first occurrence of `tag`.
    #[must_use]
    pub fn get_raw(&self, tag: u32) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|f| f.tag == tag)
            .map(|f| f.value.as_ref())
    }

    /// Returns the first occurrence of `tag` as text.
    #[must_use]
    pub fn get_str(&self, tag: u32) -> Option<&str> {
        self.get_raw(tag).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Reads a typed field.
    ///
    /// # Errors
    /// `ConditionallyRequiredFieldMissing` if the field is absent,
    /// `IncorrectDataFormat` if its value does not decode.
    pub fn get<F: FixField>(&self) -> Result<F::Value, MessageRejectError> {
        let raw = self
            .get_raw(F::TAG)
            .ok_or_else(|| MessageRejectError::conditionally_required_field_missing(F::TAG))?;
        F::decode(raw).map_err(|_| MessageRejectError::incorrect_data_format(F::TAG))
    }

    /// Returns true if `tag` is present.
    #[must_use]
    pub fn has(&self, tag: u32) -> bool {
        self.fields.iter().any(|f| f.tag == tag)
    }

    /// Removes every occurrence of `tag`.
    pub fn remove(&mut self, tag: u32) {
        self.fields.retain(|f| f.tag != tag);
    }

    /// Writes a repeating group.
    ///
    /// Any previous instance of the group is replaced in place; otherwise
    /// the group is appended. Entry fields are written in template order.
    /// An empty group removes the count field.
    pub fn set_group(&mut self, group: &RepeatingGroup) {
        let mut flat = Vec::with_capacity(1 + group.len() * group.template().tags().len());
        if !group.is_empty() {
            let mut count = itoa::Buffer::new();
            flat.push(TagValue {
                tag: group.count_tag(),
                value: Bytes::copy_from_slice(count.format(group.len()).as_bytes()),
            });
            for entry in group.iter() {
                for &tag in group.template().tags() {
                    if let Some(field) = entry.iter().find(|f| f.tag == tag) {
                        flat.push(field.clone());
                    }
                }
            }
        }

        match self.group_span(group) {
            Some((start, end)) => {
                self.fields.splice(start..end, flat);
            }
            None => self.fields.extend(flat),
        }
    }

    /// Reads a repeating group into `group`, replacing its entries.
    ///
    /// # Errors
    /// `ConditionallyRequiredFieldMissing` if the count field is absent,
    /// `IncorrectDataFormat` if it is not a number and
    /// `IncorrectNumInGroupCount` if it disagrees with the entries found.
    pub fn get_group(&self, group: &mut RepeatingGroup) -> Result<(), MessageRejectError> {
        let count_tag = group.count_tag();
        let start = self
            .fields
            .iter()
            .position(|f| f.tag == count_tag)
            .ok_or_else(|| MessageRejectError::conditionally_required_field_missing(count_tag))?;
        let expected: usize = std::str::from_utf8(&self.fields[start].value)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| MessageRejectError::incorrect_data_format(count_tag))?;

        let delimiter = group.template().delimiter();
        let mut entries: Vec<FieldMap> = Vec::new();
        for field in &self.fields[start + 1..] {
            if !group.template().contains(field.tag) {
                break;
            }
            if Some(field.tag) == delimiter {
                entries.push(FieldMap {
                    fields: vec![field.clone()],
                });
                continue;
            }
            match entries.last_mut() {
                Some(entry) if !entry.has(field.tag) => entry.fields.push(field.clone()),
                _ => return Err(MessageRejectError::incorrect_num_in_group_count(count_tag)),
            }
        }

        if entries.len() != expected {
            return Err(MessageRejectError::incorrect_num_in_group_count(count_tag));
        }

        group.clear();
        for entry in entries {
            group.push(Group::from_fields(entry));
        }
        Ok(())
    }

    /// Index range covering the count field and entries of `group`.
    fn group_span(&self, group: &RepeatingGroup) -> Option<(usize, usize)> {
        let start = self
            .fields
            .iter()
            .position(|f| f.tag == group.count_tag())?;
        let members = self.fields[start + 1..]
            .iter()
            .take_while(|f| group.template().contains(f.tag))
            .count();
        Some((start, start + 1 + members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupTemplate;
    use rfqfix_core::RejectReason;
    use rfqfix_core::error::DecodeError;

    struct Symbol;

    impl FixField for Symbol {
        const TAG: u32 = 55;
        type Value = String;

        fn decode(bytes: &[u8]) -> Result<String, DecodeError> {
            Ok(std::str::from_utf8(bytes)?.to_string())
        }

        fn encode(value: &String, buf: &mut Vec<u8>) {
            buf.extend_from_slice(value.as_bytes());
        }
    }

    struct OrderQty;

    impl FixField for OrderQty {
        const TAG: u32 = 38;
        type Value = u64;

        fn decode(bytes: &[u8]) -> Result<u64, DecodeError> {
            std::str::from_utf8(bytes)?
                .parse()
                .map_err(|_| DecodeError::InvalidFieldValue {
                    tag: 38,
                    reason: "not a number".to_string(),
                })
        }

        fn encode(value: &u64, buf: &mut Vec<u8>) {
            buf.extend_from_slice(value.to_string().as_bytes());
        }
    }

    fn related_sym() -> RepeatingGroup {
        RepeatingGroup::new(146, GroupTemplate::new([55, 44, 38]))
    }

    #[test]
    fn test_set_get_has_remove() {
        let mut map = FieldMap::new();
        assert!(!map.has(55));

        map.set::<Symbol>(&"EUR/USD".to_string());
        assert!(map.has(55));
        assert_eq!(map.get::<Symbol>().unwrap(), "EUR/USD");

        map.set::<Symbol>(&"GBP/USD".to_string());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_str(55), Some("GBP/USD"));

        map.remove(55);
        assert!(map.is_empty());
    }

    #[test]
    fn test_get_errors() {
        let mut map = FieldMap::new();
        let err = map.get::<OrderQty>().unwrap_err();
        assert_eq!(err.reason(), RejectReason::ConditionallyRequiredFieldMissing);
        assert_eq!(err.ref_tag(), Some(38));

        map.set_raw(38, "ten");
        let err = map.get::<OrderQty>().unwrap_err();
        assert_eq!(err.reason(), RejectReason::IncorrectDataFormat);
    }

    #[test]
    fn test_group_flattening_and_reading() {
        let mut group = related_sym();
        let entry = group.add();
        entry.set_raw(38, "100");
        entry.set_raw(55, "EUR/USD");
        group.add().set_raw(55, "GBP/USD");

        let mut map = FieldMap::new();
        map.set_raw(131, "REQ-1");
        map.set_group(&group);
        map.set_raw(658, "1");

        let tags: Vec<u32> = map.iter().map(|f| f.tag).collect();
        assert_eq!(tags, vec![131, 146, 55, 38, 55, 658]);
        assert_eq!(map.get_str(146), Some("2"));

        let mut read = related_sym();
        map.get_group(&mut read).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read.get(0).and_then(|g| g.get_str(38)), Some("100"));
        assert_eq!(read.get(1).and_then(|g| g.get_str(55)), Some("GBP/USD"));
    }

    #[test]
    fn test_set_group_replaces_in_place() {
        let mut group = related_sym();
        group.add().set_raw(55, "A");
        group.add().set_raw(55, "B");

        let mut map = FieldMap::new();
        map.set_group(&group);
        map.set_raw(658, "1");

        let mut smaller = related_sym();
        smaller.add().set_raw(55, "C");
        map.set_group(&smaller);

        let tags: Vec<u32> = map.iter().map(|f| f.tag).collect();
        assert_eq!(tags, vec![146, 55, 658]);
        assert_eq!(map.get_str(55), Some("C"));
    }

    #[test]
    fn test_group_count_mismatch() {
        let mut map = FieldMap::new();
        map.push_raw(146, "3");
        map.push_raw(55, "A");
        map.push_raw(55, "B");

        let err = map.get_group(&mut related_sym()).unwrap_err();
        assert_eq!(err.reason(), RejectReason::IncorrectNumInGroupCount);
        assert_eq!(err.ref_tag(), Some(146));
    }

    #[test]
    fn test_group_entry_must_start_with_delimiter() {
        let mut map = FieldMap::new();
        map.push_raw(146, "1");
        map.push_raw(44, "1.5");
        map.push_raw(55, "A");

        let err = map.get_group(&mut related_sym()).unwrap_err();
        assert_eq!(err.reason(), RejectReason::IncorrectNumInGroupCount);
    }

    #[test]
    fn test_missing_group() {
        let map = FieldMap::new();
        let err = map.get_group(&mut related_sym()).unwrap_err();
        assert_eq!(err.reason(), RejectReason::ConditionallyRequiredFieldMissing);
    }
}
