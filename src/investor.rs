use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

static NULL: Value = Value::Null;

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Investor {
    pub id: Option<i64>,

    pub user_id: i64,

    pub name: String,

    pub phone: String,

    /// ISO 8601 text as sent by the API, `None` when it is not a valid date
    pub born_date: Option<String>,

    /// Identity card (BI) number
    pub identity_card: String,

    /// Tax identification number
    pub nuit: String,

    pub created_at: Option<String>,

    pub updated_at: Option<String>,
}

impl Investor {
    /// Maps an API object into an `Investor`. The API is loose about types
    /// (ids as strings, numbers where text is expected), so every field is
    /// coerced and missing values fall back to their defaults.
    pub fn from_api(value: &Value) -> Investor {
        let field = |name: &str| value.get(name).unwrap_or(&NULL);

        Investor {
            id: match field("id") {
                Value::Null => None,
                v => Some(to_int(v)),
            },
            user_id: to_int(field("user_id")),
            name: to_str(field("name")),
            phone: to_str(field("phone")),
            born_date: to_date(field("born_date")),
            identity_card: to_str(field("identity_card")),
            nuit: to_str(field("nuit")),
            created_at: to_date(field("created_at")),
            updated_at: to_date(field("updated_at")),
        }
    }

    pub fn to_api(&self) -> Value {
        let mut object = Map::new();

        if let Some(id) = self.id {
            object.insert("id".to_owned(), json!(id));
        }
        object.insert("user_id".to_owned(), json!(self.user_id));
        object.insert("name".to_owned(), json!(self.name));
        object.insert("phone".to_owned(), json!(self.phone));
        object.insert("born_date".to_owned(), json!(self.born_date));
        object.insert("identity_card".to_owned(), json!(self.identity_card));
        object.insert("nuit".to_owned(), json!(self.nuit));

        Value::Object(object)
    }
}

fn to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or_default(),
        Value::String(s) => leading_int(s).unwrap_or_default(),
        _ => 0,
    }
}

// "42abc" -> 42, like a lenient integer parse would do
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn to_str(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.to_owned(),
        other => other.to_string(),
    }
}

// Keeps the API text, but only when it is a date that exists.
fn to_date(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();

    let is_valid = DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok();

    is_valid.then(|| text.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_a_complete_api_object() {
        let value = json!({
            "id": 7,
            "user_id": 3,
            "name": "Ana Machava",
            "phone": "+258840000000",
            "born_date": "1990-04-12T00:00:00.000Z",
            "identity_card": "110100000000A",
            "nuit": "400000000",
            "created_at": "2024-01-02T10:00:00Z",
            "updated_at": null
        });

        let investor = Investor::from_api(&value);

        assert_eq!(investor.id, Some(7));
        assert_eq!(investor.user_id, 3);
        assert_eq!(investor.name, "Ana Machava");
        assert_eq!(
            investor.born_date.as_deref(),
            Some("1990-04-12T00:00:00.000Z")
        );
        assert_eq!(investor.created_at.as_deref(), Some("2024-01-02T10:00:00Z"));
        assert_eq!(investor.updated_at, None);
    }

    #[test]
    fn it_coerces_loosely_typed_fields() {
        let value = json!({
            "id": "12",
            "user_id": 4.9,
            "phone": 840000000,
            "nuit": "abc",
            "born_date": "not a date"
        });

        let investor = Investor::from_api(&value);

        assert_eq!(investor.id, Some(12));
        assert_eq!(investor.user_id, 4);
        assert_eq!(investor.phone, "840000000");
        assert_eq!(investor.nuit, "abc");
        assert_eq!(investor.name, "");
        assert_eq!(investor.born_date, None);
    }

    #[test]
    fn it_drops_dates_that_do_not_exist() {
        let value = json!({
            "born_date": "2024-13-45",
            "created_at": "0000-99-99garbage",
            "updated_at": "2023-02-29T10:00:00Z"
        });

        let investor = Investor::from_api(&value);

        assert_eq!(investor.born_date, None);
        assert_eq!(investor.created_at, None);
        assert_eq!(investor.updated_at, None);
    }

    #[test]
    fn it_accepts_plain_and_local_dates() {
        let value = json!({
            "born_date": "1990-04-12",
            "created_at": "2024-02-29T08:30:00.123"
        });

        let investor = Investor::from_api(&value);

        assert_eq!(investor.born_date.as_deref(), Some("1990-04-12"));
        assert_eq!(investor.created_at.as_deref(), Some("2024-02-29T08:30:00.123"));
    }

    #[test]
    fn it_keeps_missing_id_empty() {
        let investor = Investor::from_api(&json!({ "user_id": "9x" }));

        assert_eq!(investor.id, None);
        assert_eq!(investor.user_id, 9);
    }

    #[test]
    fn it_tolerates_non_object_values() {
        assert_eq!(Investor::from_api(&json!("nope")), Investor::default());
    }

    #[test]
    fn it_omits_missing_id_in_api_shape() {
        let investor = Investor {
            user_id: 1,
            name: "Rui".to_owned(),
            ..Default::default()
        };

        let api = investor.to_api();

        assert!(api.get("id").is_none());
        assert_eq!(api["user_id"], json!(1));
        assert_eq!(api["name"], json!("Rui"));
        assert_eq!(api["born_date"], Value::Null);
    }
}
