//! Field layout: widths, transmission order and offsets
//!
//! Fields travel on the wire sorted by descending element width, so that
//! every multi-byte value sits at its native alignment. Fields of equal
//! element width keep their declaration order. Raw schema fields are never
//! mutated; [`layout`] builds a separate, owned list of descriptors.

use std::cmp::Reverse;
use std::collections::HashSet;

use super::{Error, FieldType, MAX_PAYLOAD_SIZE, RawField, Result};

/// A field after layout: kind, arity and position in the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldType,
    array_len: Option<usize>,
    declaration_index: usize,
    offset: usize,
}

impl FieldDescriptor {
    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element kind
    #[must_use]
    pub const fn kind(&self) -> FieldType {
        self.kind
    }

    /// Declared array length, `None` for scalars
    #[must_use]
    pub const fn array_len(&self) -> Option<usize> {
        self.array_len
    }

    /// Number of elements (1 for scalars)
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self.array_len {
            Some(len) => len,
            None => 1,
        }
    }

    /// Check if the field was declared with a bracketed length
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.array_len.is_some()
    }

    /// Position of the field in the schema source
    #[must_use]
    pub const fn declaration_index(&self) -> usize {
        self.declaration_index
    }

    /// Total width in bytes (element width times arity)
    #[must_use]
    pub const fn width(&self) -> usize {
        self.kind.width() * self.arity()
    }

    /// Byte offset of the field within the payload
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

/// Output of the layout pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Fields in transmission order with offsets assigned
    pub fields: Vec<FieldDescriptor>,
    /// Sum of all field widths
    pub payload_len: usize,
}

/// Split a type token such as `uint8_t[5]` into kind and array length.
pub fn parse_type_token(token: &str) -> Result<(FieldType, Option<usize>)> {
    let token = token.trim();
    let (base, array_len) = match token.split_once('[') {
        Some((base, rest)) => {
            let len = rest
                .strip_suffix(']')
                .and_then(|digits| digits.trim().parse::<usize>().ok())
                .filter(|len| *len > 0)
                .ok_or_else(|| Error::InvalidArrayLength {
                    token: token.to_owned(),
                })?;
            (base.trim(), Some(len))
        }
        None => (token, None),
    };

    let kind = FieldType::from_base_name(base).ok_or_else(|| Error::InvalidFieldType {
        token: token.to_owned(),
    })?;
    Ok((kind, array_len))
}

/// Compute the transmission layout of a message's fields.
///
/// # Errors
///
/// Fails on an unparseable type token, a repeated field name, or a payload
/// longer than [`MAX_PAYLOAD_SIZE`].
pub fn layout(message_name: &str, raw: &[RawField]) -> Result<Layout> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut fields = Vec::with_capacity(raw.len());

    for (declaration_index, field) in raw.iter().enumerate() {
        if !seen.insert(field.name.as_str()) {
            return Err(Error::DuplicateField {
                message: message_name.to_owned(),
                field: field.name.clone(),
            });
        }
        let (kind, array_len) = parse_type_token(&field.type_token)?;
        fields.push(FieldDescriptor {
            name: field.name.clone(),
            kind,
            array_len,
            declaration_index,
            offset: 0,
        });
    }

    // Keyed on element width, not total field width.
    fields.sort_by_key(|f| (Reverse(f.kind.width()), f.declaration_index));

    let mut offset = 0;
    for field in &mut fields {
        field.offset = offset;
        offset += field.width();
    }

    if offset > MAX_PAYLOAD_SIZE {
        return Err(Error::PayloadTooLarge {
            size: offset,
            max: MAX_PAYLOAD_SIZE,
        });
    }

    Ok(Layout {
        fields,
        payload_len: offset,
    })
}
