//! JSON and opaque conversions.
//!
//! In JSON form attributes and children share one map: JSON objects are
//! children, everything else is an attribute. The opaque form stores each
//! reference value as its JSON encoding.

use crate::error::{ObjectError, ObjectResult};
use crate::object::Object;
use crate::value::Value;
use serde_json::{Map, Number};

impl Value {
    /// JSON rendering
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Float(x) => Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::from(items.clone()),
            Self::Obj(o) => o.to_json(),
        }
    }

    /// Parse a JSON value; arrays must hold only strings
    ///
    /// # Errors
    ///
    /// Returns `Decode` for arrays with non-string items
    pub fn from_json(name: &str, json: &serde_json::Value) -> ObjectResult<Self> {
        Ok(match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Self::Str(s.clone()),
            serde_json::Value::Array(items) => Self::List(
                items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| ObjectError::Decode {
                            name: name.to_string(),
                            reason: "list items must be strings".to_string(),
                        })
                    })
                    .collect::<ObjectResult<_>>()?,
            ),
            serde_json::Value::Object(_) => Self::Obj(Object::from_json(json)?),
        })
    }
}

impl Object<Value> {
    /// JSON rendering of the subtree
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = Map::new();
        for (name, value) in self.attribute_map() {
            map.insert(name, value.to_json());
        }
        for name in self.children() {
            if let Some(child) = self.child_object(&name) {
                map.insert(name, child.to_json());
            }
        }
        serde_json::Value::Object(map)
    }

    /// Build a tree from JSON
    ///
    /// # Errors
    ///
    /// Returns `Decode` if `json` is not an object or holds bad lists
    pub fn from_json(json: &serde_json::Value) -> ObjectResult<Self> {
        let map = json.as_object().ok_or_else(|| ObjectError::Decode {
            name: String::new(),
            reason: "expected a JSON object".to_string(),
        })?;
        let object = Object::new();
        for (name, item) in map {
            if item.is_object() {
                object.insert_child(name.clone(), Object::from_json(item)?);
            } else {
                object.set(name.clone(), Value::from_json(name, item)?);
            }
        }
        Ok(object)
    }

    /// Opaque copy: every attribute encoded as JSON bytes
    #[must_use]
    pub fn to_opaque(&self) -> Object<Vec<u8>> {
        let opaque = Object::new();
        for (name, value) in self.attribute_map() {
            opaque.set(name, value.to_json().to_string().into_bytes());
        }
        for name in self.children() {
            if let Some(child) = self.child_object(&name) {
                opaque.insert_child(name, child.to_opaque());
            }
        }
        opaque
    }
}

impl Object<Vec<u8>> {
    /// Decode an opaque tree back into reference values
    ///
    /// # Errors
    ///
    /// Returns `Decode` if a blob is not a JSON encoding of a value
    pub fn to_reference(&self) -> ObjectResult<Object<Value>> {
        let reference = Object::new();
        for (name, bytes) in self.attribute_map() {
            let json: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(|e| ObjectError::Decode {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let value = Value::from_json(&name, &json)?;
            reference.set(name, value);
        }
        for name in self.children() {
            if let Some(child) = self.child_object(&name) {
                reference.insert_child(name, child.to_reference()?);
            }
        }
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Object<Value> {
        let root = Object::new();
        root.set("id", "QmProj1");
        let f = root.create_path(&["functions", "QmFn1"]);
        f.set("name", "hello");
        f.set("secure", false);
        f.set("timeout", 5_000_000_000i64);
        f.set("domains", vec!["QmD1".to_string()]);
        root.create_path(&["indexes"]).set("http/com/example/links", Value::Null);
        root
    }

    #[test]
    fn test_to_json_shape() {
        assert_eq!(
            sample().to_json(),
            json!({
                "id": "QmProj1",
                "functions": {
                    "QmFn1": {
                        "name": "hello",
                        "secure": false,
                        "timeout": 5_000_000_000i64,
                        "domains": ["QmD1"]
                    }
                },
                "indexes": { "http/com/example/links": null }
            })
        );
    }

    #[test]
    fn test_json_import() {
        let tree = sample();
        let back = Object::from_json(&tree.to_json()).unwrap();
        assert!(tree.deep_eq(&back));
    }

    #[test]
    fn test_json_rejects_mixed_lists() {
        let err = Object::from_json(&json!({"paths": ["/a", 1]})).unwrap_err();
        assert!(matches!(err, ObjectError::Decode { .. }));
    }

    #[test]
    fn test_opaque_blobs() {
        let opaque = sample().to_opaque();
        let f = opaque.fetch(&["functions", "QmFn1"]).unwrap();
        assert_eq!(f.get("name").unwrap(), b"\"hello\"".to_vec());
        assert!(sample().deep_eq(&opaque.to_reference().unwrap()));
    }

    #[test]
    fn test_opaque_bad_blob() {
        let opaque: Object<Vec<u8>> = Object::new();
        opaque.set("x", b"{not json".to_vec());
        assert!(opaque.to_reference().is_err());
    }
}
