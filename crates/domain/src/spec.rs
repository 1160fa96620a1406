//! Spec — the schema of one event type within a domain.
//!
//! A [`Spec`] maps top-level field names to [`Field`]s. Fields are recursive:
//! arrays describe their (homogeneous) element type, objects describe every
//! key of the nested document.
//!
//! On the wire a field is `{ "Type": ..., "Fields": [...] }`. Members of an
//! object carry an additional `"Name"`; an array only considers the first
//! entry of `"Fields"`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fields of a spec, keyed by field name.
pub type Spec = BTreeMap<String, Field>;

/// Scalar field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Null,
}

/// Every type tag accepted in the `"Type"` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Array => "Array",
            Self::Object => "Object",
            Self::Null => "Null",
        };
        f.write_str(label)
    }
}

impl From<Primitive> for FieldType {
    fn from(value: Primitive) -> Self {
        match value {
            Primitive::String => Self::String,
            Primitive::Number => Self::Number,
            Primitive::Boolean => Self::Boolean,
            Primitive::Null => Self::Null,
        }
    }
}

/// One typed node of a [`Spec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawField", into = "RawField")]
pub enum Field {
    /// A scalar value.
    Leaf(Primitive),
    /// A list whose elements all have the given shape.
    ArrayOf(Box<Field>),
    /// A nested document with exactly these keys.
    ObjectOf(BTreeMap<String, Field>),
}

impl Field {
    /// Shorthand for [`Field::Leaf`].
    #[must_use]
    pub fn leaf(primitive: Primitive) -> Self {
        Self::Leaf(primitive)
    }

    /// Shorthand for [`Field::ArrayOf`].
    #[must_use]
    pub fn array_of(element: Field) -> Self {
        Self::ArrayOf(Box::new(element))
    }

    /// Build an [`Field::ObjectOf`] from `(name, field)` pairs.
    #[must_use]
    pub fn object_of<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        Self::ObjectOf(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The `"Type"` tag this field serialises with.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Leaf(primitive) => (*primitive).into(),
            Self::ArrayOf(_) => FieldType::Array,
            Self::ObjectOf(_) => FieldType::Object,
        }
    }
}

/// Reasons a `{Type, Fields}` document cannot be read as a [`Field`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{0} field cannot declare nested fields")]
    UnexpectedFields(FieldType),

    #[error("array field must declare its element type")]
    MissingElementType,

    #[error("object member is missing its name")]
    UnnamedMember,

    #[error("object member {0:?} is declared twice")]
    DuplicateMember(String),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "Type")]
    kind: FieldType,
    #[serde(default)]
    fields: Vec<RawField>,
}

impl RawField {
    fn named(name: String, field: Field) -> Self {
        Self {
            name: Some(name),
            ..Self::from(field)
        }
    }
}

fn leaf(raw: &RawField, primitive: Primitive) -> Result<Field, SchemaError> {
    if raw.fields.is_empty() {
        Ok(Field::Leaf(primitive))
    } else {
        Err(SchemaError::UnexpectedFields(raw.kind))
    }
}

impl TryFrom<RawField> for Field {
    type Error = SchemaError;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        match raw.kind {
            FieldType::String => leaf(&raw, Primitive::String),
            FieldType::Number => leaf(&raw, Primitive::Number),
            FieldType::Boolean => leaf(&raw, Primitive::Boolean),
            FieldType::Null => leaf(&raw, Primitive::Null),
            FieldType::Array => {
                let element = raw
                    .fields
                    .into_iter()
                    .next()
                    .ok_or(SchemaError::MissingElementType)?;
                Ok(Self::array_of(Self::try_from(element)?))
            }
            FieldType::Object => {
                let mut members = BTreeMap::new();
                for mut member in raw.fields {
                    let name = member.name.take().ok_or(SchemaError::UnnamedMember)?;
                    if members.contains_key(&name) {
                        return Err(SchemaError::DuplicateMember(name));
                    }
                    members.insert(name, Self::try_from(member)?);
                }
                Ok(Self::ObjectOf(members))
            }
        }
    }
}

impl From<Field> for RawField {
    fn from(field: Field) -> Self {
        let kind = field.field_type();
        let fields = match field {
            Field::Leaf(_) => Vec::new(),
            Field::ArrayOf(element) => vec![Self::from(*element)],
            Field::ObjectOf(members) => members
                .into_iter()
                .map(|(name, member)| Self::named(name, member))
                .collect(),
        };
        Self {
            name: None,
            kind,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn purchase() -> Spec {
        Spec::from([
            ("item".to_string(), Field::leaf(Primitive::String)),
            ("qty".to_string(), Field::leaf(Primitive::Number)),
        ])
    }

    #[test]
    fn should_serialize_leaf_with_empty_fields() {
        let value = serde_json::to_value(Field::leaf(Primitive::Boolean)).unwrap();
        assert_eq!(value, json!({"Type": "Boolean", "Fields": []}));
    }

    #[test]
    fn should_serialize_object_members_with_names() {
        let field = Field::object_of([("city", Field::leaf(Primitive::String))]);
        let value = serde_json::to_value(field).unwrap();
        assert_eq!(
            value,
            json!({
                "Type": "Object",
                "Fields": [{"Name": "city", "Type": "String", "Fields": []}]
            })
        );
    }

    #[test]
    fn should_read_spec_document() {
        let spec: Spec = serde_json::from_value(json!({
            "item": {"Type": "String", "Fields": []},
            "qty": {"Type": "Number"}
        }))
        .unwrap();
        assert_eq!(spec, purchase());
    }

    #[test]
    fn should_only_consider_first_array_element_field() {
        let field: Field = serde_json::from_value(json!({
            "Type": "Array",
            "Fields": [{"Type": "Number"}, {"Type": "String"}]
        }))
        .unwrap();
        assert_eq!(field, Field::array_of(Field::leaf(Primitive::Number)));
    }

    #[test]
    fn should_read_nested_arrays_of_objects() {
        let field: Field = serde_json::from_value(json!({
            "Type": "Array",
            "Fields": [{
                "Type": "Object",
                "Fields": [
                    {"Name": "sku", "Type": "String"},
                    {"Name": "tags", "Type": "Array", "Fields": [{"Type": "String"}]}
                ]
            }]
        }))
        .unwrap();
        let expected = Field::array_of(Field::object_of([
            ("sku", Field::leaf(Primitive::String)),
            ("tags", Field::array_of(Field::leaf(Primitive::String))),
        ]));
        assert_eq!(field, expected);
    }

    #[test]
    fn should_reject_array_without_element_type() {
        let result: Result<Field, _> = serde_json::from_value(json!({"Type": "Array"}));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("element type"), "{err}");
    }

    #[test]
    fn should_reject_unnamed_object_member() {
        let result: Result<Field, _> = serde_json::from_value(json!({
            "Type": "Object",
            "Fields": [{"Type": "String"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_duplicate_object_member() {
        let result: Result<Field, _> = serde_json::from_value(json!({
            "Type": "Object",
            "Fields": [{"Name": "a", "Type": "String"}, {"Name": "a", "Type": "Number"}]
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("declared twice"), "{err}");
    }

    #[test]
    fn should_reject_nested_fields_on_primitive() {
        let result: Result<Field, _> = serde_json::from_value(json!({
            "Type": "String",
            "Fields": [{"Type": "Number"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_unknown_type_tag() {
        let result: Result<Field, _> = serde_json::from_value(json!({"Type": "Date"}));
        assert!(result.is_err());
    }

    #[test]
    fn should_report_field_type() {
        assert_eq!(Field::leaf(Primitive::Null).field_type(), FieldType::Null);
        assert_eq!(
            Field::array_of(Field::leaf(Primitive::Null)).field_type(),
            FieldType::Array
        );
        assert_eq!(
            Field::ObjectOf(BTreeMap::new()).field_type(),
            FieldType::Object
        );
    }
}
