//! Schema input types and the message registry
//!
//! The registry is built once from already-parsed definition sets and is
//! read-only afterwards. It can be shared between any number of parsers
//! and codecs behind an [`Arc`](std::sync::Arc).

use std::collections::HashMap;

use tracing::debug;

use super::checksum;
use super::layout::{self, FieldDescriptor};
use super::{Error, Result};

/// A field as declared in the schema source
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawField {
    /// Field name
    pub name: String,
    /// Type token, e.g. `uint16_t` or `char[16]`
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_token: String,
}

impl RawField {
    /// Create a raw field
    pub fn new(name: impl Into<String>, type_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_token: type_token.into(),
        }
    }
}

/// A message as declared in the schema source
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMessage {
    /// Numeric message id
    pub id: u8,
    /// Message name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<RawField>,
}

impl RawMessage {
    /// Create a raw message
    pub fn new(id: u8, name: impl Into<String>, fields: Vec<RawField>) -> Self {
        Self {
            id,
            name: name.into(),
            fields,
        }
    }
}

/// One named value of an enum
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumEntry {
    /// Entry name
    pub name: String,
    /// Entry value
    pub value: i64,
}

/// An enum as declared in the schema source
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDefinition {
    /// Enum name
    pub name: String,
    /// Entries
    pub entries: Vec<EnumEntry>,
}

impl EnumDefinition {
    /// Look up an entry value by name
    #[must_use]
    pub fn value_of(&self, entry: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.name == entry)
            .map(|e| e.value)
    }
}

/// Contents of one definition file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaDefinition {
    /// Enums
    #[cfg_attr(feature = "serde", serde(default))]
    pub enums: Vec<EnumDefinition>,
    /// Messages
    #[cfg_attr(feature = "serde", serde(default))]
    pub messages: Vec<RawMessage>,
}

/// A message ready for encode and decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinition {
    id: u8,
    name: String,
    fields: Vec<FieldDescriptor>,
    payload_len: usize,
    derived_seed: u8,
    seed: u8,
}

impl MessageDefinition {
    /// Lay out a raw message and compute its checksum seed
    pub fn from_raw(raw: &RawMessage) -> Result<Self> {
        let layout = layout::layout(&raw.name, &raw.fields)?;
        let derived_seed = checksum::derive_seed(&raw.name, &layout.fields);
        Ok(Self {
            id: raw.id,
            name: raw.name.clone(),
            fields: layout.fields,
            payload_len: layout.payload_len,
            derived_seed,
            seed: checksum::resolve_seed(raw.id, derived_seed),
        })
    }

    /// Message id
    #[must_use]
    pub const fn id(&self) -> u8 {
        self.id
    }

    /// Message name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in transmission order
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Payload length in bytes
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Seed derived from the message shape
    #[must_use]
    pub const fn derived_seed(&self) -> u8 {
        self.derived_seed
    }

    /// Seed used on the wire (table entry when present, else derived)
    #[must_use]
    pub const fn seed(&self) -> u8 {
        self.seed
    }
}

/// Catalog of message and enum definitions
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    by_id: Vec<Option<MessageDefinition>>,
    by_name: HashMap<String, u8>,
    enums: Vec<EnumDefinition>,
    enum_index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Build a registry from one or more definition sets.
    ///
    /// Enums with the same name in several sets are merged; messages must
    /// have unique ids and names across all sets.
    pub fn load<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = SchemaDefinition>,
    {
        let mut registry = Self::empty();
        let mut sets = 0usize;
        for definition in definitions {
            registry.add(definition)?;
            sets += 1;
        }
        debug!(
            sets,
            messages = registry.by_name.len(),
            enums = registry.enums.len(),
            "schema loaded"
        );
        Ok(registry)
    }

    fn empty() -> Self {
        Self {
            by_id: vec![None; 256],
            by_name: HashMap::new(),
            enums: Vec::new(),
            enum_index: HashMap::new(),
        }
    }

    fn add(&mut self, definition: SchemaDefinition) -> Result<()> {
        for en in definition.enums {
            match self.enum_index.get(&en.name) {
                Some(&index) => self.enums[index].entries.extend(en.entries),
                None => {
                    self.enum_index.insert(en.name.clone(), self.enums.len());
                    self.enums.push(en);
                }
            }
        }

        for raw in &definition.messages {
            let slot = usize::from(raw.id);
            if self.by_id[slot].is_some() || self.by_name.contains_key(&raw.name) {
                return Err(Error::DuplicateMessage {
                    id: raw.id,
                    name: raw.name.clone(),
                });
            }
            let message = MessageDefinition::from_raw(raw)?;
            if message.seed != message.derived_seed {
                debug!(
                    id = raw.id,
                    name = %raw.name,
                    derived = message.derived_seed,
                    table = message.seed,
                    "seed table overrides derived seed"
                );
            }
            self.by_name.insert(raw.name.clone(), raw.id);
            self.by_id[slot] = Some(message);
        }
        Ok(())
    }

    /// Look up a message by id
    #[must_use]
    pub fn message(&self, id: u8) -> Option<&MessageDefinition> {
        self.by_id[usize::from(id)].as_ref()
    }

    /// Look up a message by name
    #[must_use]
    pub fn message_by_name(&self, name: &str) -> Option<&MessageDefinition> {
        self.by_name.get(name).and_then(|&id| self.message(id))
    }

    /// Message id for a name
    #[must_use]
    pub fn message_id(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).copied()
    }

    /// Message name for an id
    #[must_use]
    pub fn message_name(&self, id: u8) -> Option<&str> {
        self.message(id).map(MessageDefinition::name)
    }

    /// Resolve a message id or name to its definition
    pub fn resolve(&self, message: &MessageRef<'_>) -> Result<&MessageDefinition> {
        match *message {
            MessageRef::Id(id) => self.message(id).ok_or(Error::UnknownMessage { id }),
            MessageRef::Name(name) => {
                self.message_by_name(name)
                    .ok_or_else(|| Error::UnknownMessageName {
                        name: name.to_owned(),
                    })
            }
        }
    }

    /// Iterate over all messages in id order
    pub fn messages(&self) -> impl Iterator<Item = &MessageDefinition> {
        self.by_id.iter().flatten()
    }

    /// Number of loaded messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Check whether no messages are loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Look up an enum by name
    #[must_use]
    pub fn enum_definition(&self, name: &str) -> Option<&EnumDefinition> {
        self.enum_index.get(name).map(|&index| &self.enums[index])
    }

    /// Look up the value of an enum entry
    #[must_use]
    pub fn enum_value(&self, enum_name: &str, entry: &str) -> Option<i64> {
        self.enum_definition(enum_name)
            .and_then(|en| en.value_of(entry))
    }

    /// All loaded enums
    #[must_use]
    pub fn enums(&self) -> &[EnumDefinition] {
        &self.enums
    }
}

/// A message identified either by numeric id or by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRef<'a> {
    /// Numeric id
    Id(u8),
    /// Message name
    Name(&'a str),
}

impl From<u8> for MessageRef<'_> {
    fn from(id: u8) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a str> for MessageRef<'a> {
    /// Names that parse as a number are treated as ids.
    fn from(name: &'a str) -> Self {
        name.parse::<u8>().map_or(Self::Name(name), Self::Id)
    }
}
