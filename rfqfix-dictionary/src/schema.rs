/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema definitions for FIX dictionaries.
//!
//! This module defines the structures that represent a FIX specification:
//! - [`FieldDef`]: Field definitions with tag, name, type and enumerated values
//! - [`MessageDef`]: Message definitions with required/optional fields
//! - [`GroupDef`]: Repeating group definitions
//! - [`Dictionary`]: Complete FIX version dictionary

use bytes::Bytes;
use rfqfix_core::error::DecodeError;
use rfqfix_core::field::{FieldCodec, FieldValue};
use rfqfix_core::types::Timestamp;
use rfqfix_tagvalue::{GroupTemplate, RepeatingGroup};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// FIX protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// FIX 4.0
    Fix40,
    /// FIX 4.1
    Fix41,
    /// FIX 4.2
    Fix42,
    /// FIX 4.3
    Fix43,
    /// FIX 4.4
    Fix44,
}

impl Version {
    /// Returns the BeginString value for this version.
    #[must_use]
    pub const fn begin_string(&self) -> &'static str {
        match self {
            Self::Fix40 => "FIX.4.0",
            Self::Fix41 => "FIX.4.1",
            Self::Fix42 => "FIX.4.2",
            Self::Fix43 => "FIX.4.3",
            Self::Fix44 => "FIX.4.4",
        }
    }

    /// Looks up a version by BeginString.
    #[must_use]
    pub fn from_begin_string(s: &str) -> Option<Self> {
        [Self::Fix40, Self::Fix41, Self::Fix42, Self::Fix43, Self::Fix44]
            .into_iter()
            .find(|v| v.begin_string() == s)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.begin_string())
    }
}

/// FIX 4.2 field data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Integer value.
    Int,
    /// Length field (for data fields).
    Length,
    /// Sequence number.
    SeqNum,
    /// Number of entries in a repeating group.
    NumInGroup,
    /// Day of month (1-31).
    DayOfMonth,
    /// Floating point number.
    Float,
    /// Quantity.
    Qty,
    /// Price.
    Price,
    /// Price offset.
    PriceOffset,
    /// Amount (price * quantity).
    Amt,
    /// Single character.
    Char,
    /// Boolean (Y/N).
    Boolean,
    /// String.
    String,
    /// Space-separated multiple character values.
    MultipleValueString,
    /// Currency code (ISO 4217).
    Currency,
    /// Exchange code.
    Exchange,
    /// Month-year (YYYYMM or YYYYMMDD).
    MonthYear,
    /// UTC timestamp.
    UtcTimestamp,
    /// UTC time only.
    UtcTimeOnly,
    /// UTC date.
    UtcDate,
    /// Local market date.
    LocalMktDate,
    /// Raw data (binary).
    Data,
}

impl FieldType {
    /// Returns true if this type represents a numeric value.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Length
                | Self::SeqNum
                | Self::NumInGroup
                | Self::DayOfMonth
                | Self::Float
                | Self::Qty
                | Self::Price
                | Self::PriceOffset
                | Self::Amt
        )
    }

    /// Parses a raw value according to this type.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is malformed.
    pub fn parse_value(&self, tag: u32, raw: &[u8]) -> Result<FieldValue, DecodeError> {
        let invalid = |reason: &str| DecodeError::InvalidFieldValue {
            tag,
            reason: reason.to_string(),
        };
        let digits = |len: &[usize]| {
            len.contains(&raw.len()) && raw.iter().all(u8::is_ascii_digit)
        };

        Ok(match self {
            Self::Int => FieldValue::Int(i64::decode_value(tag, raw)?),
            Self::Length | Self::SeqNum | Self::NumInGroup => {
                FieldValue::UInt(u64::decode_value(tag, raw)?)
            }
            Self::DayOfMonth => match u64::decode_value(tag, raw)? {
                day @ 1..=31 => FieldValue::UInt(day),
                _ => return Err(invalid("day of month out of range")),
            },
            Self::Float | Self::Qty | Self::Price | Self::PriceOffset | Self::Amt => {
                FieldValue::Decimal(Decimal::decode_value(tag, raw)?)
            }
            Self::Char => FieldValue::Char(char::decode_value(tag, raw)?),
            Self::Boolean => FieldValue::Bool(bool::decode_value(tag, raw)?),
            Self::UtcTimestamp => FieldValue::Timestamp(Timestamp::decode_value(tag, raw)?),
            Self::UtcDate | Self::LocalMktDate if !digits(&[8]) => {
                return Err(invalid("expected YYYYMMDD"));
            }
            Self::MonthYear if !digits(&[6, 8]) => {
                return Err(invalid("expected YYYYMM or YYYYMMDD"));
            }
            Self::Data => FieldValue::Data(Bytes::copy_from_slice(raw)),
            _ => FieldValue::String(String::decode_value(tag, raw)?),
        })
    }
}

impl std::str::FromStr for FieldType {
    type Err = std::convert::Infallible;

    /// Creates a FieldType from a dictionary type name. Unknown names map
    /// to `String`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "INT" => Self::Int,
            "LENGTH" => Self::Length,
            "SEQNUM" => Self::SeqNum,
            "NUMINGROUP" => Self::NumInGroup,
            "DAYOFMONTH" => Self::DayOfMonth,
            "FLOAT" => Self::Float,
            "QTY" | "QUANTITY" => Self::Qty,
            "PRICE" => Self::Price,
            "PRICEOFFSET" => Self::PriceOffset,
            "AMT" | "AMOUNT" => Self::Amt,
            "CHAR" => Self::Char,
            "BOOLEAN" => Self::Boolean,
            "MULTIPLEVALUESTRING" => Self::MultipleValueString,
            "CURRENCY" => Self::Currency,
            "EXCHANGE" => Self::Exchange,
            "MONTHYEAR" => Self::MonthYear,
            "UTCTIMESTAMP" => Self::UtcTimestamp,
            "UTCTIMEONLY" => Self::UtcTimeOnly,
            "UTCDATE" => Self::UtcDate,
            "LOCALMKTDATE" => Self::LocalMktDate,
            "DATA" => Self::Data,
            _ => Self::String,
        })
    }
}

/// Definition of a FIX field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field tag number.
    pub tag: u32,
    /// Field name.
    pub name: String,
    /// Field data type.
    pub field_type: FieldType,
    /// Valid values for enumerated fields, value to description.
    pub values: Option<BTreeMap<String, String>>,
}

impl FieldDef {
    /// Creates a new field definition.
    #[must_use]
    pub fn new(tag: u32, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            tag,
            name: name.into(),
            field_type,
            values: None,
        }
    }

    /// Adds valid values for an enumerated field.
    #[must_use]
    pub fn with_values<I, V, D>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (V, D)>,
        V: Into<String>,
        D: Into<String>,
    {
        self.values = Some(
            values
                .into_iter()
                .map(|(v, d)| (v.into(), d.into()))
                .collect(),
        );
        self
    }

    /// Returns true if `value` is allowed for this field.
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        match &self.values {
            None => true,
            Some(values) if self.field_type == FieldType::MultipleValueString => {
                value.split(' ').all(|v| values.contains_key(v))
            }
            Some(values) => values.contains_key(value),
        }
    }
}

/// Reference to a field within a message or group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRef {
    /// Field tag number.
    pub tag: u32,
    /// Field name.
    pub name: String,
    /// Whether the field is required.
    pub required: bool,
}

impl FieldRef {
    /// Creates a field reference.
    #[must_use]
    pub fn new(tag: u32, name: impl Into<String>, required: bool) -> Self {
        Self {
            tag,
            name: name.into(),
            required,
        }
    }
}

/// Definition of a repeating group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDef {
    /// Tag of the count field (NumInGroup).
    pub count_tag: u32,
    /// Name of the group.
    pub name: String,
    /// Fields within each entry; the first is the delimiter.
    pub fields: Vec<FieldRef>,
    /// Whether the group is required.
    pub required: bool,
}

impl GroupDef {
    /// Creates a group definition with no member fields.
    #[must_use]
    pub fn new(count_tag: u32, name: impl Into<String>, required: bool) -> Self {
        Self {
            count_tag,
            name: name.into(),
            fields: Vec::new(),
            required,
        }
    }

    /// Adds a member field.
    #[must_use]
    pub fn with_field(mut self, tag: u32, name: impl Into<String>, required: bool) -> Self {
        self.fields.push(FieldRef::new(tag, name, required));
        self
    }

    /// Returns the delimiter tag.
    #[must_use]
    pub fn delimiter_tag(&self) -> Option<u32> {
        self.fields.first().map(|f| f.tag)
    }

    /// Builds the entry template for this group.
    #[must_use]
    pub fn template(&self) -> GroupTemplate {
        GroupTemplate::new(self.fields.iter().map(|f| f.tag).collect::<Vec<_>>())
    }

    /// Creates an empty repeating group matching this definition.
    #[must_use]
    pub fn repeating_group(&self) -> RepeatingGroup {
        RepeatingGroup::new(self.count_tag, self.template())
    }
}

/// Message category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageCategory {
    /// Administrative message (session level).
    Admin,
    /// Application message.
    App,
}

/// Definition of a FIX message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDef {
    /// Message type value (tag 35).
    pub msg_type: String,
    /// Message name.
    pub name: String,
    /// Message category (admin or app).
    pub category: MessageCategory,
    /// Body fields of this message.
    pub fields: Vec<FieldRef>,
    /// Repeating groups of this message.
    pub groups: Vec<GroupDef>,
}

impl MessageDef {
    /// Creates a message definition with an empty body.
    #[must_use]
    pub fn new(
        msg_type: impl Into<String>,
        name: impl Into<String>,
        category: MessageCategory,
    ) -> Self {
        Self {
            msg_type: msg_type.into(),
            name: name.into(),
            category,
            fields: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Adds a body field.
    #[must_use]
    pub fn with_field(mut self, tag: u32, name: impl Into<String>, required: bool) -> Self {
        self.fields.push(FieldRef::new(tag, name, required));
        self
    }

    /// Adds a repeating group.
    #[must_use]
    pub fn with_group(mut self, group: GroupDef) -> Self {
        self.groups.push(group);
        self
    }

    /// Returns true if `tag` may appear in the body, group members included.
    #[must_use]
    pub fn defines(&self, tag: u32) -> bool {
        self.fields.iter().any(|f| f.tag == tag)
            || self
                .groups
                .iter()
                .any(|g| g.count_tag == tag || g.fields.iter().any(|f| f.tag == tag))
    }
}

/// Complete FIX dictionary for a specific version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictionary {
    /// FIX version.
    pub version: Version,
    /// Field definitions indexed by tag.
    pub fields: HashMap<u32, FieldDef>,
    /// Field definitions indexed by name.
    pub fields_by_name: HashMap<String, u32>,
    /// Message definitions indexed by msg_type.
    pub messages: HashMap<String, MessageDef>,
    /// Header fields.
    pub header: Vec<FieldRef>,
    /// Trailer fields.
    pub trailer: Vec<FieldRef>,
}

impl Dictionary {
    /// Creates a new empty dictionary for the specified version.
    #[must_use]
    pub fn new(version: Version) -> Self {
        Self {
            version,
            fields: HashMap::new(),
            fields_by_name: HashMap::new(),
            messages: HashMap::new(),
            header: Vec::new(),
            trailer: Vec::new(),
        }
    }

    /// Adds a field definition.
    pub fn add_field(&mut self, field: FieldDef) {
        self.fields_by_name.insert(field.name.clone(), field.tag);
        self.fields.insert(field.tag, field);
    }

    /// Adds a message definition.
    pub fn add_message(&mut self, message: MessageDef) {
        self.messages.insert(message.msg_type.clone(), message);
    }

    /// Adds a header field reference.
    pub fn add_header_field(&mut self, tag: u32, required: bool) {
        let name = self.field_name(tag);
        self.header.push(FieldRef::new(tag, name, required));
    }

    /// Adds a trailer field reference.
    pub fn add_trailer_field(&mut self, tag: u32, required: bool) {
        let name = self.field_name(tag);
        self.trailer.push(FieldRef::new(tag, name, required));
    }

    fn field_name(&self, tag: u32) -> String {
        self.fields
            .get(&tag)
            .map_or_else(|| tag.to_string(), |f| f.name.clone())
    }

    /// Gets a field definition by tag.
    #[must_use]
    pub fn get_field(&self, tag: u32) -> Option<&FieldDef> {
        self.fields.get(&tag)
    }

    /// Gets a field definition by name.
    #[must_use]
    pub fn get_field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.fields_by_name
            .get(name)
            .and_then(|tag| self.fields.get(tag))
    }

    /// Gets a message definition by type.
    #[must_use]
    pub fn get_message(&self, msg_type: &str) -> Option<&MessageDef> {
        self.messages.get(msg_type)
    }

    /// Returns an iterator over all field definitions.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    /// Returns an iterator over all message definitions.
    pub fn messages(&self) -> impl Iterator<Item = &MessageDef> {
        self.messages.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_begin_string() {
        assert_eq!(Version::Fix42.begin_string(), "FIX.4.2");
        assert_eq!(Version::from_begin_string("FIX.4.2"), Some(Version::Fix42));
        assert_eq!(Version::from_begin_string("FIXT.1.1"), None);
    }

    #[test]
    fn test_field_type_from_str() {
        assert_eq!("INT".parse::<FieldType>().unwrap(), FieldType::Int);
        assert_eq!("price".parse::<FieldType>().unwrap(), FieldType::Price);
        assert_eq!(
            "UTCTIMESTAMP".parse::<FieldType>().unwrap(),
            FieldType::UtcTimestamp
        );
        assert_eq!("unknown".parse::<FieldType>().unwrap(), FieldType::String);
    }

    #[test]
    fn test_field_type_parse_value() {
        assert_eq!(
            FieldType::Qty.parse_value(38, b"100.50").unwrap(),
            FieldValue::Decimal(Decimal::new(10050, 2))
        );
        assert_eq!(
            FieldType::Boolean.parse_value(43, b"Y").unwrap(),
            FieldValue::Bool(true)
        );
        assert!(FieldType::Price.parse_value(44, b"1.2.3").is_err());
        assert!(FieldType::Int.parse_value(297, b"x").is_err());
        assert!(FieldType::DayOfMonth.parse_value(205, b"32").is_err());
        assert!(FieldType::UtcTimestamp.parse_value(52, b"20260127").is_err());
        assert!(FieldType::LocalMktDate.parse_value(75, b"20260127").is_ok());
        assert!(FieldType::MonthYear.parse_value(200, b"2026-01").is_err());
    }

    #[test]
    fn test_field_def_allows() {
        let field = FieldDef::new(694, "QuoteRespType", FieldType::Int)
            .with_values([("1", "HIT_LIFT"), ("2", "COUNTER")]);
        assert!(field.allows("1"));
        assert!(!field.allows("9"));
        assert!(FieldDef::new(55, "Symbol", FieldType::String).allows("anything"));
    }

    #[test]
    fn test_group_def_template() {
        let group = GroupDef::new(146, "NoRelatedSym", false)
            .with_field(55, "Symbol", true)
            .with_field(44, "Price", false);
        assert_eq!(group.delimiter_tag(), Some(55));
        assert_eq!(group.template().tags(), &[55, 44]);
        assert_eq!(group.repeating_group().count_tag(), 146);
    }

    #[test]
    fn test_message_def_defines() {
        let message = MessageDef::new("AG", "QuoteRequestReject", MessageCategory::App)
            .with_field(131, "QuoteReqID", true)
            .with_group(GroupDef::new(146, "NoRelatedSym", false).with_field(55, "Symbol", true));
        assert!(message.defines(131));
        assert!(message.defines(146));
        assert!(message.defines(55));
        assert!(!message.defines(644));
    }

    #[test]
    fn test_dictionary_field_operations() {
        let mut dict = Dictionary::new(Version::Fix42);
        dict.add_field(FieldDef::new(35, "MsgType", FieldType::String));
        dict.add_header_field(35, true);

        assert!(dict.get_field(35).is_some());
        assert!(dict.get_field_by_name("MsgType").is_some());
        assert_eq!(dict.header[0].name, "MsgType");
        assert!(dict.get_field(999).is_none());
    }
}
