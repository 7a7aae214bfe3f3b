use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::contact::{ContactRecord, Field};
use crate::phone;

/// Masked phone input.
///
/// Holds the raw digit buffer; the rendered value is always the buffer
/// pushed through the `(DDD) DDD-DDDD` mask. Only digits the mask accepts
/// change the buffer, everything else is swallowed.
#[derive(Debug, Clone, Default)]
pub struct PhoneInput {
    digits: String,
}

impl PhoneInput {
    pub fn from_text(text: &str) -> Self {
        Self {
            digits: phone::digits_of(text),
        }
    }

    pub fn set_from_text(&mut self, text: &str) {
        self.digits = phone::digits_of(text);
    }

    pub fn display(&self) -> String {
        phone::format(&self.digits)
    }

    pub fn visual_cursor(&self) -> usize {
        self.display().chars().count()
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => phone::push_digit(&mut self.digits, c),
            KeyCode::Backspace | KeyCode::Delete => phone::pop_digit(&mut self.digits),
            _ => false,
        }
    }
}

/// One input widget per form field: free-text fields are `tui_input`
/// editors, phone goes through [`PhoneInput`].
#[derive(Debug, Default)]
pub struct FormInputs {
    name: Input,
    email: Input,
    phone: PhoneInput,
    address: Input,
    city: Input,
    state: Input,
    zipcode: Input,
}

impl FormInputs {
    pub fn from_record(record: &ContactRecord) -> Self {
        let mut inputs = Self::default();
        inputs.load(record);
        inputs
    }

    /// Replace every widget's content with `record`'s fields.
    pub fn load(&mut self, record: &ContactRecord) {
        self.name = Input::new(record.name.clone());
        self.email = Input::new(record.email.clone());
        self.phone = PhoneInput::from_text(&record.phone);
        self.address = Input::new(record.address.clone());
        self.city = Input::new(record.city.clone());
        self.state = Input::new(record.state.clone());
        self.zipcode = Input::new(record.zipcode.clone());
    }

    /// Snapshot the widgets back into a record (phone already formatted).
    pub fn record(&self) -> ContactRecord {
        ContactRecord {
            name: self.name.value().to_string(),
            email: self.email.value().to_string(),
            phone: self.phone.display(),
            address: self.address.value().to_string(),
            city: self.city.value().to_string(),
            state: self.state.value().to_string(),
            zipcode: self.zipcode.value().to_string(),
        }
    }

    pub fn value(&self, field: Field) -> String {
        match field {
            Field::Name => self.name.value().to_string(),
            Field::Email => self.email.value().to_string(),
            Field::Phone => self.phone.display(),
            Field::Address => self.address.value().to_string(),
            Field::City => self.city.value().to_string(),
            Field::State => self.state.value().to_string(),
            Field::Zipcode => self.zipcode.value().to_string(),
        }
    }

    pub fn visual_cursor(&self, field: Field) -> usize {
        match field {
            Field::Name => self.name.visual_cursor(),
            Field::Email => self.email.visual_cursor(),
            Field::Phone => self.phone.visual_cursor(),
            Field::Address => self.address.visual_cursor(),
            Field::City => self.city.visual_cursor(),
            Field::State => self.state.visual_cursor(),
            Field::Zipcode => self.zipcode.visual_cursor(),
        }
    }

    /// Route a key to the widget behind `field`. Returns true when the
    /// widget consumed it.
    pub fn handle_key_event(&mut self, field: Field, key: KeyEvent) -> bool {
        let input = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => return self.phone.handle_key_event(key),
            Field::Address => &mut self.address,
            Field::City => &mut self.city,
            Field::State => &mut self.state,
            Field::Zipcode => &mut self.zipcode,
        };
        input.handle_event(&Event::Key(key)).is_some()
    }
}
