//! Submission → Wizzio payload mapping.
//!
//! A [`FieldMap`] is a table of [`FieldSpec`] entries, each naming the form
//! key(s) it reads, the Wizzio key it writes and how the value is coerced.
//! The table is chosen once at startup (see [`FieldSchema`]) and drives both
//! validation and mapping.

use serde_json::{Map, Number, Value};
use std::str::FromStr;

use crate::errors::ForwardError;
use crate::models::{LeadSubmission, MappedLead};

/// How a submission value is coerced into the Wizzio payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed string, `""` when absent.
    Text,
    /// Digits only, `""` when absent.
    Phone,
    /// Number, `0` when absent or unparseable.
    Number,
    /// Number, `null` when absent or unparseable.
    NullableNumber,
    /// Trimmed string, `null` when absent or blank. Used for dates and times.
    NullableText,
}

/// One row of the mapping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub source: String,
    pub aliases: Vec<String>,
    pub target: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    /// A field read from and written to the same key.
    pub fn new(key: &str, kind: FieldKind) -> Self {
        Self {
            source: key.to_string(),
            aliases: Vec::new(),
            target: key.to_string(),
            kind,
            required: false,
        }
    }

    pub fn text(key: &str) -> Self {
        Self::new(key, FieldKind::Text)
    }

    pub fn phone(key: &str) -> Self {
        Self::new(key, FieldKind::Phone)
    }

    pub fn number(key: &str) -> Self {
        Self::new(key, FieldKind::Number)
    }

    pub fn nullable_number(key: &str) -> Self {
        Self::new(key, FieldKind::NullableNumber)
    }

    pub fn nullable_text(key: &str) -> Self {
        Self::new(key, FieldKind::NullableText)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Also accept `key` in the submission. The first present key wins.
    pub fn alias(mut self, key: &str) -> Self {
        self.aliases.push(key.to_string());
        self
    }

    /// Write the value under a different Wizzio key.
    pub fn target(mut self, key: &str) -> Self {
        self.target = key.to_string();
        self
    }

    fn lookup<'a>(&self, fields: &'a Map<String, Value>) -> Option<&'a Value> {
        std::iter::once(&self.source)
            .chain(self.aliases.iter())
            .filter_map(|key| fields.get(key))
            .find(|value| !value.is_null())
    }

    fn is_blank(&self, value: Option<&Value>) -> bool {
        match (self.kind, value) {
            (_, None) => true,
            (FieldKind::Phone, Some(v)) => {
                text_value(v).map_or(true, |s| normalize_phone(&s).is_empty())
            }
            (_, Some(v)) => text_value(v).map_or(true, |s| s.is_empty()),
        }
    }

    fn coerce(&self, value: Option<&Value>) -> Value {
        match self.kind {
            FieldKind::Text => Value::String(value.and_then(text_value).unwrap_or_default()),
            FieldKind::Phone => Value::String(
                value
                    .and_then(text_value)
                    .map(|s| normalize_phone(&s))
                    .unwrap_or_default(),
            ),
            FieldKind::Number => {
                Value::Number(value.and_then(coerce_number).unwrap_or_else(|| 0.into()))
            }
            FieldKind::NullableNumber => value
                .and_then(coerce_number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldKind::NullableText => value
                .and_then(text_value)
                .filter(|s| !s.is_empty())
                .map(Value::String)
                .unwrap_or(Value::Null),
        }
    }
}

/// Built-in Wizzio payload shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldSchema {
    /// Full qualification form (25 fields).
    #[default]
    Full,
    /// Contact form (7 fields).
    Minimal,
}

impl FromStr for FieldSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(FieldSchema::Full),
            "minimal" => Ok(FieldSchema::Minimal),
            other => Err(format!("unknown field schema '{}', expected full or minimal", other)),
        }
    }
}

/// Ordered mapping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<FieldSpec>,
}

impl FieldMap {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn for_schema(schema: FieldSchema) -> Self {
        match schema {
            FieldSchema::Full => Self::full(),
            FieldSchema::Minimal => Self::minimal(),
        }
    }

    /// Full qualification form.
    pub fn full() -> Self {
        Self::new(vec![
            FieldSpec::text("civilite"),
            FieldSpec::text("nom").required(),
            FieldSpec::text("prenom"),
            FieldSpec::text("email").required(),
            FieldSpec::phone("telephone1").required(),
            FieldSpec::phone("telephone2"),
            FieldSpec::text("adresse"),
            FieldSpec::text("codePostal"),
            FieldSpec::text("ville"),
            FieldSpec::nullable_text("dateNaissance"),
            FieldSpec::text("situationFamiliale"),
            FieldSpec::number("nombreEnfants"),
            FieldSpec::text("profession"),
            FieldSpec::number("revenus"),
            FieldSpec::number("revenusConjoint"),
            FieldSpec::nullable_number("patrimoine"),
            FieldSpec::number("impots"),
            FieldSpec::text("statutLogement"),
            FieldSpec::text("projet"),
            FieldSpec::number("budget"),
            FieldSpec::text("origine"),
            FieldSpec::text("campagne"),
            FieldSpec::nullable_text("dateRappel"),
            FieldSpec::nullable_text("heureRappel"),
            FieldSpec::text("complementsInfo")
                .alias("complementsInfos")
                .alias("message"),
        ])
    }

    /// Short contact form.
    pub fn minimal() -> Self {
        Self::new(vec![
            FieldSpec::text("nom").required(),
            FieldSpec::text("prenom"),
            FieldSpec::text("email").required(),
            FieldSpec::phone("telephone1").required(),
            FieldSpec::text("codePostal"),
            FieldSpec::number("revenus"),
            FieldSpec::text("complementsInfo")
                .alias("complementsInfos")
                .alias("message"),
        ])
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Source keys of mandatory fields that are absent or blank, in table order.
    pub fn missing_fields(&self, submission: &LeadSubmission) -> Vec<String> {
        let empty = Map::new();
        let fields = submission.as_object().unwrap_or(&empty);

        self.fields
            .iter()
            .filter(|spec| spec.required && spec.is_blank(spec.lookup(fields)))
            .map(|spec| spec.source.clone())
            .collect()
    }

    pub fn validate(&self, submission: &LeadSubmission) -> Result<(), ForwardError> {
        let missing = self.missing_fields(submission);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ForwardError::Validation { missing })
        }
    }

    /// Builds the Wizzio payload. Every target key is present; unknown
    /// submission keys are dropped.
    pub fn map(&self, submission: &LeadSubmission) -> MappedLead {
        let empty = Map::new();
        let fields = submission.as_object().unwrap_or(&empty);

        self.fields
            .iter()
            .map(|spec| (spec.target.clone(), spec.coerce(spec.lookup(fields))))
            .collect()
    }
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::full()
    }
}

/// Keeps ASCII digits only: `"06 12-34.56.78"` → `"0612345678"`.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parses a form value as a number.
///
/// Accepts JSON numbers and numeric strings with spaces as thousand
/// separators and `,` as decimal separator. Integral values stay integers.
pub fn coerce_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(integral(n.clone())),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            if let Ok(i) = cleaned.parse::<i64>() {
                return Some(i.into());
            }
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(Number::from_f64)
                .map(integral)
        }
        _ => None,
    }
}

/// Turns whole floats (`1200.0`) into integers; other numbers are unchanged.
fn integral(n: Number) -> Number {
    match n.as_f64() {
        Some(f)
            if n.is_f64() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            (f as i64).into()
        }
        _ => n,
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(integral(n.clone()).to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
