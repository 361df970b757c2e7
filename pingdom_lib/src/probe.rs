//! Probe server records from `GET /probes`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One Pingdom probe server.
///
/// Holds every attribute the service returned, unchanged. The typed
/// accessors only read well-known keys and return `None` when a key is
/// absent or has another JSON type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbeServer {
    attributes: Map<String, Value>,
}

impl ProbeServer {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    pub fn id(&self) -> Option<u64> {
        self.get("id").and_then(Value::as_u64)
    }

    pub fn name(&self) -> Option<&str> {
        self.str_attr("name")
    }

    pub fn country(&self) -> Option<&str> {
        self.str_attr("country")
    }

    pub fn city(&self) -> Option<&str> {
        self.str_attr("city")
    }

    pub fn active(&self) -> Option<bool> {
        self.get("active").and_then(Value::as_bool)
    }

    fn str_attr(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for ProbeServer {
    fn from(attributes: Map<String, Value>) -> Self {
        Self::new(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn probe(v: Value) -> ProbeServer {
        match v {
            Value::Object(m) => ProbeServer::from(m),
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn accessors_read_known_keys() {
        let p = probe(json!({
            "id": 33,
            "country": "Sweden",
            "city": "Stockholm",
            "name": "Stockholm 2, Sweden",
            "active": true,
            "hostname": "s429.pingdom.com"
        }));
        assert_eq!(p.id(), Some(33));
        assert_eq!(p.name(), Some("Stockholm 2, Sweden"));
        assert_eq!(p.country(), Some("Sweden"));
        assert_eq!(p.city(), Some("Stockholm"));
        assert_eq!(p.active(), Some(true));
        assert_eq!(p.get("hostname"), Some(&json!("s429.pingdom.com")));
    }

    #[test]
    fn wrong_types_read_as_none() {
        let p = probe(json!({"id": "33", "active": "yes"}));
        assert_eq!(p.id(), None);
        assert_eq!(p.active(), None);
        assert_eq!(p.get("id"), Some(&json!("33")));
    }

    #[test]
    fn serializes_as_the_original_object() {
        let original = json!({"id": 7, "name": "p1"});
        let p = probe(original.clone());
        assert_eq!(serde_json::to_value(&p).unwrap(), original);
    }
}
