use crate::contact::{Contact, ContactId, ContactRecord};

/// Owns the ordered contact collection.
///
/// Records keep insertion order internally; display order is derived by
/// [`ContactStore::iter_sorted_by_name`] on every read and never written
/// back. All state is in-memory and lost when the process exits.
#[derive(Debug, Default)]
pub struct ContactStore {
    contacts: Vec<Contact>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Append a new record and return its assigned id. Always succeeds;
    /// the form session has already enforced whatever it enforces.
    pub fn create(&mut self, record: ContactRecord) -> ContactId {
        let contact = Contact::new(record);
        let id = contact.id;
        self.contacts.push(contact);
        id
    }

    /// Replace the identified record wholesale. An unknown id is a caller
    /// bug, not a runtime condition: asserted in debug, no-op in release.
    pub fn update(&mut self, id: ContactId, record: ContactRecord) -> bool {
        match self.contacts.iter_mut().find(|c| c.id == id) {
            Some(contact) => {
                contact.record = record;
                true
            }
            None => {
                debug_assert!(false, "update of unknown contact id {id}");
                false
            }
        }
    }

    /// Remove the identified record; later records shift down one position.
    /// Same unknown-id policy as [`ContactStore::update`].
    pub fn delete(&mut self, id: ContactId) -> bool {
        match self.contacts.iter().position(|c| c.id == id) {
            Some(pos) => {
                self.contacts.remove(pos);
                true
            }
            None => {
                debug_assert!(false, "delete of unknown contact id {id}");
                false
            }
        }
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Stored (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    /// Display order: ascending case-sensitive name, ties kept in stored
    /// order (stable sort over a working copy; stored order is untouched).
    pub fn iter_sorted_by_name(&self) -> impl Iterator<Item = &Contact> {
        let mut sorted: Vec<&Contact> = self.contacts.iter().collect();
        sorted.sort_by(|a, b| a.record.name.cmp(&b.record.name));
        sorted.into_iter()
    }
}
