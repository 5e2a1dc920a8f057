//! Named, ordered deploy arguments.
//!
//! The receiving entry point reads its arguments in the order they were
//! supplied, so `RuntimeArgs` keeps insertion order and never sorts.
use std::fmt;

use crate::bytesrepr::{self, ToBytes};
use crate::clvalue::{CLValue, IntoCLValue};
use crate::error::CasperHelperError;
use serde::Serialize;

/// A single argument: a name paired with a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedArg {
    name: String,
    value: CLValue,
}

impl NamedArg {
    pub fn new(name: impl Into<String>, value: CLValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &CLValue {
        &self.value
    }
}

impl ToBytes for NamedArg {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        self.name.write_bytes(writer)?;
        self.value.write_bytes(writer)
    }
}

/// Encodes a plain text argument as a `string` scalar, verbatim.
pub fn encode_string(name: impl Into<String>, value: impl Into<String>) -> NamedArg {
    NamedArg::new(name, CLValue::String(value.into()))
}

/// Encodes raw bytes as a `list_of(u8)` argument.
pub fn encode_byte_list(name: impl Into<String>, bytes: &[u8]) -> NamedArg {
    NamedArg::new(name, CLValue::byte_list(bytes))
}

/// Encodes integer values as a `list_of(u8)` argument, rejecting any value
/// outside `[0, 255]`.
pub fn try_encode_byte_list<I, T>(
    name: impl Into<String>,
    values: I,
) -> Result<NamedArg, CasperHelperError>
where
    I: IntoIterator<Item = T>,
    T: TryInto<u8> + Copy + fmt::Display,
{
    Ok(NamedArg::new(name, CLValue::try_byte_list(values)?))
}

/// Ordered list of named arguments passed to a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuntimeArgs(Vec<NamedArg>);

impl RuntimeArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an argument, converting the value with [`IntoCLValue`].
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl IntoCLValue,
    ) -> Result<(), CasperHelperError> {
        let value = value.try_into_val()?;
        self.0.push(NamedArg::new(name, value));
        Ok(())
    }

    pub fn push(&mut self, arg: NamedArg) {
        self.0.push(arg);
    }

    /// Returns the first argument with the given name.
    pub fn get(&self, name: &str) -> Option<&CLValue> {
        self.0
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedArg> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<NamedArg>> for RuntimeArgs {
    fn from(args: Vec<NamedArg>) -> Self {
        Self(args)
    }
}

impl FromIterator<NamedArg> for RuntimeArgs {
    fn from_iter<I: IntoIterator<Item = NamedArg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuntimeArgs {
    type Item = &'a NamedArg;
    type IntoIter = std::slice::Iter<'a, NamedArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl ToBytes for RuntimeArgs {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        bytesrepr::write_len(writer, self.0.len())?;
        for arg in &self.0 {
            arg.write_bytes(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_string() {
        for value in ["", "relay_and_verify"] {
            let arg = encode_string("method", value);
            assert_eq!(arg.name(), "method");
            assert_eq!(arg.value(), &CLValue::String(value.to_string()));
        }

        let json = serde_json::to_value(encode_string("method", "relay_and_verify")).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "method",
                "value": { "type": "string", "value": "relay_and_verify" }
            })
        );
    }

    #[test]
    fn test_encode_byte_list_end_to_end() {
        let arg = encode_byte_list("bytes", &[0x00, 0x01, 0xff]);
        assert_eq!(arg.name(), "bytes");

        let json = serde_json::to_value(&arg).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "bytes",
                "value": {
                    "type": { "list_of": "u8" },
                    "value": { "list": [
                        { "type": "u8", "value": 0 },
                        { "type": "u8", "value": 1 },
                        { "type": "u8", "value": 255 }
                    ] }
                }
            })
        );
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let first = encode_byte_list("bytes", &[9, 8, 7]);
        let second = encode_byte_list("bytes", &[9, 8, 7]);
        assert_eq!(first, second);

        assert_eq!(encode_string("a", "b"), encode_string("a", "b"));
    }

    #[test]
    fn test_try_encode_byte_list() {
        let arg = try_encode_byte_list("bytes", vec![1u32, 2, 3]).unwrap();
        assert_eq!(arg, encode_byte_list("bytes", &[1, 2, 3]));

        let err = try_encode_byte_list("bytes", vec![1u32, 300]).unwrap_err();
        assert!(matches!(err, CasperHelperError::EncodingFailed(_)));
    }

    #[test]
    fn test_failed_encoding_aborts_argument_list() {
        let args: Result<RuntimeArgs, CasperHelperError> = vec![
            Ok(encode_string("method", "relay_and_verify")),
            try_encode_byte_list("bytes", [0i64, 1000]),
        ]
        .into_iter()
        .collect();

        assert!(matches!(args, Err(CasperHelperError::EncodingFailed(_))));
    }

    #[test]
    fn test_runtime_args_preserve_order() {
        let mut args = RuntimeArgs::new();
        args.insert("z", "last-name-first").unwrap();
        args.push(encode_byte_list("a", &[1]));
        args.insert("m", 3u8).unwrap();

        let names: Vec<&str> = args.iter().map(NamedArg::name).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(args.len(), 3);
        assert_eq!(args.get("m"), Some(&CLValue::U8(3)));
        assert_eq!(args.get("missing"), None);

        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 3);
        assert_eq!(json[0]["name"], "z");
    }

    #[test]
    fn test_runtime_args_bytes() {
        let args = RuntimeArgs::from(vec![NamedArg::new("a", CLValue::U8(1))]);
        assert_eq!(
            args.to_bytes().unwrap(),
            vec![1, 0, 0, 0, 1, 0, 0, 0, b'a', 1, 0, 0, 0, 1, 3]
        );

        assert_eq!(RuntimeArgs::new().to_bytes().unwrap(), vec![0, 0, 0, 0]);
    }
}
