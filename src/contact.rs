use std::fmt;

use uuid::Uuid;

/// Stable identity for a contact, independent of its position in the list.
///
/// Display order is re-derived by name on every read, so positional indexes
/// drift; everything that targets a contact (edit, delete, expand) keys on
/// this id instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactId(Uuid);

impl ContactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The seven attributes of a contact record, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Address,
    City,
    State,
    Zipcode,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Address,
        Field::City,
        Field::State,
        Field::Zipcode,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Phone => "Phone Number",
            Field::Address => "Address",
            Field::City => "City",
            Field::State => "State",
            Field::Zipcode => "Zip Code",
        }
    }

    /// Required fields block submission when empty; the rest are free-form.
    pub fn required(self) -> bool {
        matches!(self, Field::Name | Field::City | Field::State)
    }

    pub fn index(self) -> usize {
        match self {
            Field::Name => 0,
            Field::Email => 1,
            Field::Phone => 2,
            Field::Address => 3,
            Field::City => 4,
            Field::State => 5,
            Field::Zipcode => 6,
        }
    }

    pub fn next(self) -> Field {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Field {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One contact's attributes. Phone holds the formatted `(DDD) DDD-DDDD`
/// text; all other fields are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

impl ContactRecord {
    /// The fixed template the form draft resets to after every submission.
    pub fn template() -> Self {
        Self {
            name: "John Doe".into(),
            email: "john@doe.com".into(),
            phone: "(555) 555-5555".into(),
            address: "123 Wallaby Way".into(),
            city: "Atlanta".into(),
            state: "GA".into(),
            zipcode: "30326".into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::State => &self.state,
            Field::Zipcode => &self.zipcode,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
            Field::City => &mut self.city,
            Field::State => &mut self.state,
            Field::Zipcode => &mut self.zipcode,
        };
        *slot = value.into();
    }

    /// First required field that is empty (after trimming), if any.
    pub fn missing_required(&self) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.required() && self.get(*f).trim().is_empty())
    }

    /// "City, ST" summary line shown under the name in the list.
    pub fn locality(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

/// A record plus its stable identity, as stored in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub record: ContactRecord,
}

impl Contact {
    pub fn new(record: ContactRecord) -> Self {
        Self {
            id: ContactId::new(),
            record,
        }
    }
}
