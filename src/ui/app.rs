use std::collections::HashSet;
use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tui_widgets::popup::PopupState;

use crate::config::{Config, UiColors};
use crate::contact::{Contact, ContactId, Field};
use crate::form::{FormError, FormSession, Mode, SubmitOutcome};
use crate::store::ContactStore;

use super::draw;
use super::inputs::FormInputs;

/// Which half of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneFocus {
    Form,
    List,
}

/// Delete confirmation modal.
#[derive(Debug, Clone)]
pub struct ConfirmModal {
    pub title: String,
    pub message: String,
    pub target: ContactId,
}

pub struct App<'a> {
    config: &'a Config,
    pub store: ContactStore,
    pub session: FormSession,
    pub inputs: FormInputs,
    pub focused_field: Field,
    pub focus: PaneFocus,
    /// Selection index into the sorted view, not the stored order.
    pub selected: usize,
    /// Records whose "See More" detail block is open.
    expanded: HashSet<ContactId>,
    pub confirm_modal: Option<ConfirmModal>,
    pub modal_popup: PopupState,
    pub status: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config) -> Self {
        let session = FormSession::with_template(config.template.clone());
        let inputs = FormInputs::from_record(session.draft());
        Self {
            config,
            store: ContactStore::new(),
            session,
            inputs,
            focused_field: Field::Name,
            focus: PaneFocus::Form,
            selected: 0,
            expanded: HashSet::new(),
            confirm_modal: None,
            modal_popup: PopupState::default(),
            status: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B: ratatui::backend::Backend,
    {
        loop {
            draw::render(terminal, self)?;

            if event::poll(Duration::from_millis(250))? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key)? {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Ctrl+C always quits (hardcoded for safety)
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Ok(true);
        }

        self.status = None;

        if self.confirm_modal.is_some() {
            self.handle_confirm_modal_key(key);
            return Ok(false);
        }

        match self.focus {
            PaneFocus::Form => self.handle_form_key(key),
            PaneFocus::List => self.handle_list_key(key),
        }
    }

    // =========================================================================
    // Form pane
    // =========================================================================

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Enter => {
                self.submit();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focused_field = self.focused_field.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused_field = self.focused_field.prev();
            }
            KeyCode::Esc => {
                if self.session.is_editing() {
                    self.cancel_edit();
                } else {
                    self.focus = PaneFocus::List;
                }
            }
            _ => {
                self.inputs.handle_key_event(self.focused_field, key);
            }
        }
        Ok(false)
    }

    fn submit(&mut self) {
        self.session.set_draft(self.inputs.record());
        match self.session.submit(&mut self.store) {
            Ok(SubmitOutcome::Created(id)) => {
                let name = self.contact_name(id);
                self.set_status(format!("Added {}", name));
                self.select_contact(id);
            }
            Ok(SubmitOutcome::Updated(id)) => {
                let name = self.contact_name(id);
                self.set_status(format!("Updated {}", name));
                self.select_contact(id);
            }
            Err(FormError::MissingRequired(field)) => {
                self.focused_field = field;
                self.set_status(format!("{} is required", field.label()));
                return;
            }
        }
        self.inputs.load(self.session.draft());
        self.focused_field = Field::Name;
    }

    fn cancel_edit(&mut self) {
        self.session.cancel_edit();
        self.inputs.load(self.session.draft());
        self.focused_field = Field::Name;
        self.set_status("Edit cancelled");
    }

    // =========================================================================
    // List pane
    // =========================================================================

    fn handle_list_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.store.len().saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('e') => self.edit_selected(),
            KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => {
                self.request_delete_selected();
            }
            KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Tab => {
                self.focus = PaneFocus::Form;
            }
            _ => {}
        }
        Ok(false)
    }

    fn select_next(&mut self) {
        if !self.store.is_empty() {
            self.selected = (self.selected + 1).min(self.store.len() - 1);
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The contacts as displayed: always re-sorted by name on read.
    pub fn visible_contacts(&self) -> Vec<&Contact> {
        self.store.iter_sorted_by_name().collect()
    }

    pub fn selected_contact_id(&self) -> Option<ContactId> {
        self.visible_contacts().get(self.selected).map(|c| c.id)
    }

    /// Move the selection to `id`'s position in the sorted view.
    fn select_contact(&mut self, id: ContactId) {
        let pos = self.visible_contacts().iter().position(|c| c.id == id);
        if let Some(pos) = pos {
            self.selected = pos;
        }
    }

    pub fn is_expanded(&self, id: ContactId) -> bool {
        self.expanded.contains(&id)
    }

    /// Flip a record's "See More" detail visibility.
    pub fn toggle_expanded(&mut self, id: ContactId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_contact_id() {
            self.toggle_expanded(id);
        }
    }

    pub fn edit_selected(&mut self) {
        let Some(id) = self.selected_contact_id() else {
            return;
        };
        // A pending edit commits with whatever the inputs currently hold
        self.session.set_draft(self.inputs.record());
        if self.session.begin_edit(&mut self.store, id) {
            self.inputs.load(self.session.draft());
            self.focused_field = Field::Name;
            self.focus = PaneFocus::Form;
            let name = self.contact_name(id);
            self.set_status(format!("Editing {}", name));
        }
    }

    fn request_delete_selected(&mut self) {
        let Some(id) = self.selected_contact_id() else {
            return;
        };
        if !self.config.confirm_delete {
            self.delete_contact(id);
            return;
        }
        let name = self.contact_name(id);
        self.confirm_modal = Some(ConfirmModal {
            title: "DELETE CONTACT".to_string(),
            message: format!("Delete {}?", name),
            target: id,
        });
    }

    pub fn delete_contact(&mut self, id: ContactId) {
        let name = self.contact_name(id);
        // Deleting the record being edited abandons that edit
        if self.session.mode() == Mode::Edit(id) {
            self.session.cancel_edit();
            self.inputs.load(self.session.draft());
        }
        if self.store.delete(id) {
            self.expanded.remove(&id);
            self.selected = self.selected.min(self.store.len().saturating_sub(1));
            self.set_status(format!("Deleted {}", name));
        }
    }

    fn handle_confirm_modal_key(&mut self, key: KeyEvent) {
        let Some(modal) = self.confirm_modal.take() else {
            return;
        };

        match key.code {
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'y') => {
                self.delete_contact(modal.target);
            }
            KeyCode::Enter => {
                self.delete_contact(modal.target);
            }
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'n') => {}
            KeyCode::Esc => {}
            // Put the modal back if the key wasn't handled
            _ => self.confirm_modal = Some(modal),
        }
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    fn contact_name(&self, id: ContactId) -> String {
        self.store
            .get(id)
            .map(|c| c.record.name.clone())
            .unwrap_or_else(|| self.session.draft().name.clone())
    }

    fn set_status<S: Into<String>>(&mut self, message: S) {
        self.status = Some(message.into());
    }

    pub fn ui_colors(&self) -> &UiColors {
        &self.config.ui.colors
    }

    /// Label of the submit action, mirroring the session mode.
    pub fn submit_label(&self) -> &'static str {
        if self.session.is_editing() {
            "Update"
        } else {
            "Add"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactRecord;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn type_text(app: &mut App<'_>, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn clear_field(app: &mut App<'_>) {
        for _ in 0..40 {
            app.handle_key(key(KeyCode::Backspace)).unwrap();
        }
    }

    fn submit_named(app: &mut App<'_>, name: &str) -> ContactId {
        app.focus = PaneFocus::Form;
        app.focused_field = Field::Name;
        clear_field(app);
        type_text(app, name);
        app.handle_key(key(KeyCode::Enter)).unwrap();
        app.store
            .iter()
            .find(|c| c.record.name == name)
            .expect("submitted contact present")
            .id
    }

    #[test]
    fn test_submit_via_keys_appends_and_resets_form() {
        let config = Config::default();
        let mut app = App::new(&config);

        let id = submit_named(&mut app, "Alice");
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.get(id).unwrap().record.city, "Atlanta");
        // Draft and inputs are back to the template
        assert_eq!(app.inputs.record(), ContactRecord::template());
        assert_eq!(app.submit_label(), "Add");
    }

    #[test]
    fn test_selection_follows_sorted_order() {
        let config = Config::default();
        let mut app = App::new(&config);
        let bob = submit_named(&mut app, "Bob");
        let alice = submit_named(&mut app, "Alice");

        let visible: Vec<_> = app.visible_contacts().iter().map(|c| c.id).collect();
        assert_eq!(visible, [alice, bob]);

        app.focus = PaneFocus::List;
        app.selected = 0;
        assert_eq!(app.selected_contact_id(), Some(alice));
        app.handle_key(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(app.selected_contact_id(), Some(bob));
    }

    #[test]
    fn test_toggle_expanded_twice_restores_state() {
        let config = Config::default();
        let mut app = App::new(&config);
        let id = submit_named(&mut app, "Alice");

        assert!(!app.is_expanded(id));
        app.toggle_expanded(id);
        assert!(app.is_expanded(id));
        app.toggle_expanded(id);
        assert!(!app.is_expanded(id));
    }

    #[test]
    fn test_expansion_survives_resort() {
        let config = Config::default();
        let mut app = App::new(&config);
        let bob = submit_named(&mut app, "Bob");
        app.toggle_expanded(bob);

        // A new contact sorting ahead of Bob shifts his position, not his state
        submit_named(&mut app, "Alice");
        assert!(app.is_expanded(bob));
    }

    #[test]
    fn test_edit_flow_updates_in_place() {
        let config = Config::default();
        let mut app = App::new(&config);
        let alice = submit_named(&mut app, "Alice");
        submit_named(&mut app, "Bob");

        app.focus = PaneFocus::List;
        app.selected = 0; // Alice sorts first
        app.handle_key(key(KeyCode::Char('e'))).unwrap();
        assert_eq!(app.focus, PaneFocus::Form);
        assert_eq!(app.submit_label(), "Update");
        assert_eq!(app.inputs.record().name, "Alice");

        clear_field(&mut app);
        type_text(&mut app, "Alicia");
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.get(alice).unwrap().record.name, "Alicia");
        assert_eq!(app.submit_label(), "Add");
    }

    #[test]
    fn test_delete_goes_through_confirm_modal() {
        let config = Config::default();
        let mut app = App::new(&config);
        let alice = submit_named(&mut app, "Alice");

        app.focus = PaneFocus::List;
        app.selected = 0;
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert!(app.confirm_modal.is_some());
        assert_eq!(app.store.len(), 1);

        // 'n' cancels
        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        assert!(app.confirm_modal.is_none());
        assert_eq!(app.store.len(), 1);

        // 'y' confirms
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.store.len(), 0);
        assert!(app.store.get(alice).is_none());
    }

    #[test]
    fn test_delete_without_confirmation_when_configured_off() {
        let config = Config {
            confirm_delete: false,
            ..Config::default()
        };
        let mut app = App::new(&config);
        submit_named(&mut app, "Alice");

        app.focus = PaneFocus::List;
        app.selected = 0;
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert!(app.confirm_modal.is_none());
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_missing_required_field_blocks_submit() {
        let config = Config::default();
        let mut app = App::new(&config);

        app.focused_field = Field::City;
        clear_field(&mut app);
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert!(app.store.is_empty());
        assert_eq!(app.status.as_deref(), Some("City is required"));
        assert_eq!(app.focused_field, Field::City);
        // The half-filled draft is preserved for fixing up
        assert_eq!(app.inputs.value(Field::Name), "John Doe");
    }

    #[test]
    fn test_esc_cancels_edit_then_leaves_form() {
        let config = Config::default();
        let mut app = App::new(&config);
        let alice = submit_named(&mut app, "Alice");

        app.focus = PaneFocus::List;
        app.selected = 0;
        app.handle_key(key(KeyCode::Char('e'))).unwrap();
        type_text(&mut app, "garbage");
        app.handle_key(key(KeyCode::Esc)).unwrap();

        assert_eq!(app.submit_label(), "Add");
        assert_eq!(app.store.get(alice).unwrap().record.name, "Alice");
        assert_eq!(app.focus, PaneFocus::Form);

        // Second Esc moves focus to the list
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.focus, PaneFocus::List);
    }

    #[test]
    fn test_deleting_edit_target_abandons_edit() {
        let config = Config {
            confirm_delete: false,
            ..Config::default()
        };
        let mut app = App::new(&config);
        submit_named(&mut app, "Alice");

        app.focus = PaneFocus::List;
        app.selected = 0;
        app.handle_key(key(KeyCode::Char('e'))).unwrap();
        assert!(app.session.is_editing());

        app.focus = PaneFocus::List;
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert!(app.store.is_empty());
        assert!(!app.session.is_editing());
        assert_eq!(app.inputs.record(), ContactRecord::template());
    }
}
