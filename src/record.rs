use csv_async::StringRecord;
use std::sync::Arc;

pub const NAME: &str = "Name";
pub const EMAIL: &str = "Email";
pub const PHONE: &str = "Phone Number";

/// Ordered column names taken from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<String>,
}

impl FieldSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Case-sensitive lookup of a column position.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// The distinguished columns this schema does not carry.
    pub fn missing_lead_fields(&self) -> Vec<&'static str> {
        [NAME, EMAIL, PHONE]
            .into_iter()
            .filter(|f| self.index_of(f).is_none())
            .collect()
    }
}

/// One row of an export. Values always line up with the shared schema; the
/// pipeline decides inclusion and never edits a value.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<FieldSchema>,
    values: StringRecord,
}

impl Record {
    /// `values` must already be exactly as wide as `schema`.
    pub(crate) fn new(schema: Arc<FieldSchema>, values: StringRecord) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    /// Build a record from string values, padding or truncating to the
    /// schema width. Mostly useful for callers assembling rows by hand.
    pub fn from_values<I, S>(schema: Arc<FieldSchema>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut record = StringRecord::new();
        for value in values.into_iter().take(schema.len()) {
            record.push_field(value.as_ref());
        }
        while record.len() < schema.len() {
            record.push_field("");
        }
        Self::new(schema, record)
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.schema
            .index_of(field)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value of `field`, or `""` when the schema has no such column.
    pub fn get_or_default(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.get_or_default(NAME)
    }

    pub fn email(&self) -> &str {
        self.get_or_default(EMAIL)
    }

    pub fn phone(&self) -> &str {
        self.get_or_default(PHONE)
    }

    /// Values in schema order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.values.iter().eq(other.values.iter())
    }
}

impl Eq for Record {}
