//! # Typed wire values
//!
//! The node has no implicit typing: every argument value travels with an
//! explicit type descriptor, and list values declare their element type once
//! at the list level. `CLValue` is the tagged union for those values and
//! `IntoCLValue` converts native Rust values into it.
use std::fmt;

use crate::bytesrepr::{self, ToBytes};
use crate::error::CasperHelperError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

const CL_TYPE_TAG_U8: u8 = 3;
const CL_TYPE_TAG_STRING: u8 = 10;
const CL_TYPE_TAG_LIST: u8 = 14;

/// Type descriptor attached to every `CLValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CLType {
    #[serde(rename = "u8")]
    U8,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "list_of")]
    List(Box<CLType>),
}

impl CLType {
    /// Builds the descriptor for a list whose elements are of type `inner`.
    pub fn list_of(inner: CLType) -> Self {
        Self::List(Box::new(inner))
    }

    fn tag(&self) -> u8 {
        match self {
            Self::U8 => CL_TYPE_TAG_U8,
            Self::String => CL_TYPE_TAG_STRING,
            Self::List(_) => CL_TYPE_TAG_LIST,
        }
    }
}

impl fmt::Display for CLType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => write!(f, "u8"),
            Self::String => write!(f, "string"),
            Self::List(inner) => write!(f, "list_of({})", inner),
        }
    }
}

impl ToBytes for CLType {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        self.tag().write_bytes(writer)?;
        if let Self::List(inner) = self {
            inner.write_bytes(writer)?;
        }
        Ok(())
    }
}

/// A homogeneous list of values.
///
/// The fields are private so that a list can only be obtained through
/// [`CLList::new`], which checks every element against the declared inner type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CLList {
    inner: CLType,
    values: Vec<CLValue>,
}

impl CLList {
    /// Creates a list, failing with `EncodingFailed` if any element's type
    /// differs from `inner`.
    pub fn new(inner: CLType, values: Vec<CLValue>) -> Result<Self, CasperHelperError> {
        if let Some((index, value)) = values
            .iter()
            .enumerate()
            .find(|(_, value)| value.cl_type() != inner)
        {
            return Err(CasperHelperError::EncodingFailed(format!(
                "List element {} has type {}, expected {}",
                index,
                value.cl_type(),
                inner
            )));
        }

        Ok(Self { inner, values })
    }

    /// Creates an empty list of the given element type.
    pub fn empty(inner: CLType) -> Self {
        Self {
            inner,
            values: Vec::new(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            inner: CLType::U8,
            values: bytes.iter().copied().map(CLValue::U8).collect(),
        }
    }

    pub fn inner_type(&self) -> &CLType {
        &self.inner
    }

    pub fn values(&self) -> &[CLValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A value paired with its type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CLValue {
    U8(u8),
    String(String),
    List(CLList),
}

impl CLValue {
    /// Returns the type descriptor of this value.
    pub fn cl_type(&self) -> CLType {
        match self {
            Self::U8(_) => CLType::U8,
            Self::String(_) => CLType::String,
            Self::List(list) => CLType::list_of(list.inner.clone()),
        }
    }

    /// Wraps every byte as a `u8` scalar inside a `list_of(u8)` value,
    /// preserving order and length.
    pub fn byte_list(bytes: &[u8]) -> Self {
        Self::List(CLList::from_bytes(bytes))
    }

    /// Like [`CLValue::byte_list`] but for wider integer inputs.
    ///
    /// Fails with `EncodingFailed` on the first element outside `[0, 255]`;
    /// nothing is returned for the elements converted before it.
    pub fn try_byte_list<I, T>(values: I) -> Result<Self, CasperHelperError>
    where
        I: IntoIterator<Item = T>,
        T: TryInto<u8> + Copy + fmt::Display,
    {
        let bytes = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                value.try_into().map_err(|_| {
                    CasperHelperError::EncodingFailed(format!(
                        "Value {} at index {} is outside the byte range [0, 255]",
                        value, index
                    ))
                })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Ok(Self::byte_list(&bytes))
    }

    /// Recovers the raw bytes of a `list_of(u8)` value.
    pub fn as_byte_list(&self) -> Option<Vec<u8>> {
        match self {
            Self::List(list) if list.inner == CLType::U8 => list
                .values
                .iter()
                .map(|value| match value {
                    Self::U8(byte) => Some(*byte),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    fn write_payload(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        match self {
            Self::U8(byte) => byte.write_bytes(writer),
            Self::String(value) => value.write_bytes(writer),
            Self::List(list) => {
                bytesrepr::write_len(writer, list.values.len())?;
                for value in &list.values {
                    value.write_payload(writer)?;
                }
                Ok(())
            }
        }
    }
}

impl ToBytes for CLValue {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        let mut payload = Vec::new();
        self.write_payload(&mut payload)?;
        bytesrepr::write_byte_vec(writer, &payload)?;
        self.cl_type().write_bytes(writer)
    }
}

#[derive(Serialize)]
struct ListPayload<'a> {
    list: &'a [CLValue],
}

impl Serialize for CLValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CLValue", 2)?;
        state.serialize_field("type", &self.cl_type())?;
        match self {
            Self::U8(byte) => state.serialize_field("value", byte)?,
            Self::String(value) => state.serialize_field("value", value)?,
            Self::List(list) => state.serialize_field(
                "value",
                &ListPayload {
                    list: &list.values,
                },
            )?,
        }
        state.end()
    }
}

/// A trait for converting native rust values into a `CLValue`.
pub trait IntoCLValue {
    fn try_into_val(&self) -> Result<CLValue, CasperHelperError>;
    fn into_val(self) -> CLValue;
}

impl IntoCLValue for u8 {
    fn try_into_val(&self) -> Result<CLValue, CasperHelperError> {
        Ok(CLValue::U8(*self))
    }

    fn into_val(self) -> CLValue {
        CLValue::U8(self)
    }
}

impl IntoCLValue for String {
    fn try_into_val(&self) -> Result<CLValue, CasperHelperError> {
        Ok(CLValue::String(self.clone()))
    }

    fn into_val(self) -> CLValue {
        CLValue::String(self)
    }
}

impl IntoCLValue for &str {
    fn try_into_val(&self) -> Result<CLValue, CasperHelperError> {
        Ok(CLValue::String(self.to_string()))
    }

    fn into_val(self) -> CLValue {
        CLValue::String(self.to_string())
    }
}

impl IntoCLValue for Vec<u8> {
    fn try_into_val(&self) -> Result<CLValue, CasperHelperError> {
        Ok(CLValue::byte_list(self))
    }

    fn into_val(self) -> CLValue {
        CLValue::byte_list(&self)
    }
}

impl IntoCLValue for &[u8] {
    fn try_into_val(&self) -> Result<CLValue, CasperHelperError> {
        Ok(CLValue::byte_list(self))
    }

    fn into_val(self) -> CLValue {
        CLValue::byte_list(self)
    }
}
