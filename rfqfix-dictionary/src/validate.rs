/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message validation against a [`Dictionary`].

use crate::schema::{Dictionary, FieldRef, GroupDef, MessageDef};
use rfqfix_core::error::{MessageRejectError, RejectReason};
use rfqfix_tagvalue::{FieldMap, Message};
use std::collections::HashSet;

/// Framing tags computed by the encoder; never required of a message.
const FRAMING_TAGS: [u32; 2] = [9, 10];

impl Dictionary {
    /// Validates a message against this dictionary.
    ///
    /// Checks, in order: BeginString, MsgType, header and trailer fields,
    /// body field definitions and formats, repeating groups, then required
    /// body fields. The first problem found is returned.
    ///
    /// # Errors
    /// Returns the `MessageRejectError` a counterparty should receive.
    pub fn validate(&self, message: &Message) -> Result<(), MessageRejectError> {
        if message.begin_string() != Some(self.version.begin_string()) {
            return Err(MessageRejectError::new(
                RejectReason::ValueIsIncorrect,
                "Incorrect BeginString",
                Some(8),
            ));
        }

        let msg_type = message.msg_type()?;
        let def = self
            .get_message(msg_type.as_str())
            .ok_or_else(MessageRejectError::invalid_msg_type)?;

        self.validate_section(&message.header, &self.header)?;
        self.validate_section(&message.trailer, &self.trailer)?;
        self.validate_body(&message.body, def)
    }

    fn validate_section(
        &self,
        fields: &FieldMap,
        defs: &[FieldRef],
    ) -> Result<(), MessageRejectError> {
        let mut seen = HashSet::new();
        for field in fields.iter() {
            if !defs.iter().any(|d| d.tag == field.tag) {
                return Err(MessageRejectError::tag_not_defined_for_message_type(
                    field.tag,
                ));
            }
            if !seen.insert(field.tag) {
                return Err(MessageRejectError::tag_appears_more_than_once(field.tag));
            }
            self.validate_value(field.tag, &field.value)?;
        }
        require(fields, defs)
    }

    fn validate_body(&self, body: &FieldMap, def: &MessageDef) -> Result<(), MessageRejectError> {
        let group_members: HashSet<u32> = def
            .groups
            .iter()
            .flat_map(|g| g.fields.iter().map(|f| f.tag))
            .collect();

        let mut seen = HashSet::new();
        for field in body.iter() {
            if !def.defines(field.tag) {
                return Err(if self.get_field(field.tag).is_some() {
                    MessageRejectError::tag_not_defined_for_message_type(field.tag)
                } else {
                    MessageRejectError::undefined_tag(field.tag)
                });
            }
            if !group_members.contains(&field.tag) && !seen.insert(field.tag) {
                return Err(MessageRejectError::tag_appears_more_than_once(field.tag));
            }
            self.validate_value(field.tag, &field.value)?;
        }

        for group in &def.groups {
            self.validate_group(body, group)?;
        }
        require(body, &def.fields)
    }

    fn validate_group(&self, body: &FieldMap, def: &GroupDef) -> Result<(), MessageRejectError> {
        if !body.has(def.count_tag) {
            return if def.required {
                Err(MessageRejectError::required_tag_missing(def.count_tag))
            } else {
                Ok(())
            };
        }

        let mut group = def.repeating_group();
        body.get_group(&mut group)?;
        for entry in group.iter() {
            require(entry, &def.fields)?;
        }
        Ok(())
    }

    fn validate_value(&self, tag: u32, value: &[u8]) -> Result<(), MessageRejectError> {
        if value.is_empty() {
            return Err(MessageRejectError::tag_specified_without_a_value(tag));
        }
        let Some(field) = self.get_field(tag) else {
            return Ok(());
        };
        field
            .field_type
            .parse_value(tag, value)
            .map_err(|_| MessageRejectError::incorrect_data_format(tag))?;

        let text = std::str::from_utf8(value)
            .map_err(|_| MessageRejectError::incorrect_data_format(tag))?;
        if field.allows(text) {
            Ok(())
        } else {
            Err(MessageRejectError::value_is_incorrect(tag))
        }
    }
}

fn require(fields: &FieldMap, defs: &[FieldRef]) -> Result<(), MessageRejectError> {
    match defs
        .iter()
        .find(|d| d.required && !FRAMING_TAGS.contains(&d.tag) && !fields.has(d.tag))
    {
        Some(missing) => Err(MessageRejectError::required_tag_missing(missing.tag)),
        None => Ok(()),
    }
}
