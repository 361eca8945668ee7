// The Catalog Store is loose about scalar types: ids come back as numbers or strings and
// counts or conditionRating may be numeric strings.

pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub mod id {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde::de::Error;
    use serde_json::Value;

    pub fn serialize<S: Serializer>(id: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => match id.parse::<i64>() {
                Ok(n) => serializer.serialize_i64(n),
                Err(_) => serializer.serialize_str(id.as_str()),
            },
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw: Option<Value> = Deserialize::deserialize(deserializer)?;
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(other) => Err(D::Error::custom(format!("unexpected id {}", other))),
        }
    }
}

pub mod number {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde::de::Error;
    use serde_json::Value;

    pub fn serialize<S: Serializer>(rating: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match rating {
            Some(r) => serializer.serialize_i64(*r),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let raw: Option<Value> = Deserialize::deserialize(deserializer)?;
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64))
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unexpected number {}", n))),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s.trim().parse::<i64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("unexpected number {}", s))),
            Some(other) => Err(D::Error::custom(format!("unexpected number {}", other))),
        }
    }
}
