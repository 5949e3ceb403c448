use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Field-keyed validation messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Unwrap a collected field value, recording `message` under `field` when
    /// the value is an error.
    pub fn take<T>(&mut self, field: &str, value: Result<T, String>) -> Option<T> {
        self.take_all(field, value.map_err(|message| vec![message]))
    }

    /// Like [`FieldErrors::take`] for fields that can fail several checks at once.
    pub fn take_all<T>(&mut self, field: &str, value: Result<T, Vec<String>>) -> Option<T> {
        match value {
            Ok(value) => Some(value),
            Err(messages) => {
                for message in messages {
                    self.add(field, message);
                }
                None
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_field_map() {
        let mut errors = FieldErrors::new();
        errors.add("phone", "bad phone");
        errors.add("email", "bad email");
        errors.add("email", "taken");

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"email": ["bad email", "taken"], "phone": ["bad phone"]})
        );
        assert_eq!(errors.to_string(), "email: bad email; email: taken; phone: bad phone");
    }

    #[test]
    fn test_take_records_failures() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.take("name", Ok::<_, String>("Jane")), Some("Jane"));
        assert_eq!(errors.take::<i64>("PatientId", Err("nope".into())), None);
        assert_eq!(errors.get("PatientId"), Some(&["nope".to_string()][..]));
        assert!(!errors.contains("name"));

        assert_eq!(errors.take_all::<String>("phone", Err(vec!["a".into(), "b".into()])), None);
        assert_eq!(errors.get("phone"), Some(&["a".to_string(), "b".to_string()][..]));
    }
}
