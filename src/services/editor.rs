//! Record Editor Service
//!
//! Draft-based editors for the profile, preferred hospitals and medications:
//! - An editor owns a private draft copy of its initial value
//! - add / update-field / remove mutate only the draft
//! - submit validates required fields, then hands the draft to `on_save`
//! - cancel discards the draft and calls `on_cancel`
//!
//! Once submitted or cancelled an editor is closed and rejects further edits.

use std::fmt;

use crate::error::{AppError, Result};
use crate::models::{
    ContactField, EmergencyContact, Hospital, Medication, ProfileField, Record, UserProfile,
};

/// Save callback receiving the finished value
pub type SaveCallback<V> = Box<dyn FnMut(V) + Send>;

/// Cancel callback
pub type CancelCallback = Box<dyn FnMut() + Send>;

/// Common submit/cancel surface shared by every editor
pub trait Editor {
    /// Validate and hand the draft to the save callback
    fn submit(&mut self) -> Result<()>;

    /// Discard the draft and notify the cancel callback
    fn cancel(&mut self) -> Result<()>;

    /// Whether submit or cancel already happened
    fn is_closed(&self) -> bool;
}

/// Ordered list of records being edited
#[derive(Debug, Clone, PartialEq)]
pub struct ListDraft<T: Record> {
    items: Vec<T>,
}

impl<T: Record> ListDraft<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a blank record with a fresh id
    pub fn add(&mut self) -> &T {
        self.items.push(T::blank());
        let index = self.items.len() - 1;
        &self.items[index]
    }

    /// Replace one field of one record
    pub fn update(&mut self, index: usize, field: T::Field, value: impl Into<String>) -> Result<()> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))?;
        item.set_field(field, value.into());
        Ok(())
    }

    /// Remove a record, shifting later records down
    pub fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(out_of_range(index, self.items.len()));
        }
        Ok(self.items.remove(index))
    }

    /// Validate every record, reporting the first invalid field
    pub fn validate(&self, prefix: &str) -> Result<()> {
        for (index, item) in self.items.iter().enumerate() {
            item.validate(&format!("{}[{}]", prefix, index))?;
        }
        Ok(())
    }
}

fn out_of_range(index: usize, len: usize) -> AppError {
    AppError::NotFound(format!("Item {} out of range (draft has {} items)", index, len))
}

/// Callback pair plus the open/closed flag
struct Handoff<V> {
    on_save: SaveCallback<V>,
    on_cancel: CancelCallback,
    closed: bool,
}

impl<V> Handoff<V> {
    fn new(on_save: SaveCallback<V>, on_cancel: CancelCallback) -> Self {
        Self {
            on_save,
            on_cancel,
            closed: false,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(AppError::EditorClosed);
        }
        Ok(())
    }

    fn save(&mut self, value: V) {
        self.closed = true;
        (self.on_save)(value);
    }

    fn cancel(&mut self) {
        self.closed = true;
        (self.on_cancel)();
    }
}

/// Editor over a list of records (hospitals, medications)
pub struct ListEditor<T: Record> {
    label: &'static str,
    draft: ListDraft<T>,
    handoff: Handoff<Vec<T>>,
}

/// Preferred hospitals editor
pub type HospitalsEditor = ListEditor<Hospital>;

/// Medications editor
pub type MedicationsEditor = ListEditor<Medication>;

impl<T: Record> ListEditor<T> {
    /// Create an editor over a copy of `initial`
    ///
    /// `label` names the list in validation errors, e.g. `hospitals[1].name`.
    pub fn new(
        label: &'static str,
        initial: Vec<T>,
        on_save: SaveCallback<Vec<T>>,
        on_cancel: CancelCallback,
    ) -> Self {
        Self {
            label,
            draft: ListDraft::new(initial),
            handoff: Handoff::new(on_save, on_cancel),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn items(&self) -> &[T] {
        self.draft.items()
    }

    pub fn add_item(&mut self) -> Result<String> {
        self.handoff.ensure_open()?;
        let id = self.draft.add().id().to_string();
        tracing::debug!("{}: added item {}", self.label, id);
        Ok(id)
    }

    pub fn update_field(&mut self, index: usize, field: T::Field, value: impl Into<String>) -> Result<()> {
        self.handoff.ensure_open()?;
        self.draft.update(index, field, value)?;
        tracing::debug!("{}: updated {}[{}].{}", self.label, self.label, index, field);
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Result<T> {
        self.handoff.ensure_open()?;
        let removed = self.draft.remove(index)?;
        tracing::debug!("{}: removed item {}", self.label, removed.id());
        Ok(removed)
    }
}

impl<T: Record> Editor for ListEditor<T> {
    fn submit(&mut self) -> Result<()> {
        self.handoff.ensure_open()?;
        self.draft.validate(self.label)?;

        let items = self.draft.items().to_vec();
        tracing::info!("{}: saving {} items", self.label, items.len());
        self.handoff.save(items);
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        self.handoff.ensure_open()?;
        tracing::info!("{}: edit cancelled", self.label);
        self.handoff.cancel();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.handoff.closed
    }
}

impl<T: Record> fmt::Debug for ListEditor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListEditor")
            .field("label", &self.label)
            .field("draft", &self.draft)
            .field("closed", &self.handoff.closed)
            .finish()
    }
}

/// Profile editor: scalar fields plus the emergency contact list
pub struct ProfileEditor {
    /// Scalar fields; the contacts live in `contacts`
    profile: UserProfile,
    contacts: ListDraft<EmergencyContact>,
    handoff: Handoff<UserProfile>,
}

impl ProfileEditor {
    pub fn new(mut initial: UserProfile, on_save: SaveCallback<UserProfile>, on_cancel: CancelCallback) -> Self {
        let contacts = ListDraft::new(std::mem::take(&mut initial.emergency_contacts));
        Self {
            profile: initial,
            contacts,
            handoff: Handoff::new(on_save, on_cancel),
        }
    }

    /// Current draft as a profile value
    pub fn draft(&self) -> UserProfile {
        UserProfile {
            emergency_contacts: self.contacts.items().to_vec(),
            ..self.profile.clone()
        }
    }

    pub fn contacts(&self) -> &[EmergencyContact] {
        self.contacts.items()
    }

    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) -> Result<()> {
        self.handoff.ensure_open()?;
        self.profile.set_field(field, value.into());
        tracing::debug!("profile: updated {}", field);
        Ok(())
    }

    pub fn add_contact(&mut self) -> Result<String> {
        self.handoff.ensure_open()?;
        let id = self.contacts.add().id.clone();
        tracing::debug!("profile: added contact {}", id);
        Ok(id)
    }

    pub fn update_contact(&mut self, index: usize, field: ContactField, value: impl Into<String>) -> Result<()> {
        self.handoff.ensure_open()?;
        self.contacts.update(index, field, value)?;
        tracing::debug!("profile: updated emergencyContacts[{}].{}", index, field);
        Ok(())
    }

    pub fn remove_contact(&mut self, index: usize) -> Result<EmergencyContact> {
        self.handoff.ensure_open()?;
        let removed = self.contacts.remove(index)?;
        tracing::debug!("profile: removed contact {}", removed.id);
        Ok(removed)
    }
}

impl Editor for ProfileEditor {
    fn submit(&mut self) -> Result<()> {
        self.handoff.ensure_open()?;
        let profile = self.draft();
        profile.validate()?;

        tracing::info!(
            "profile: saving with {} emergency contacts",
            profile.emergency_contacts.len()
        );
        self.handoff.save(profile);
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        self.handoff.ensure_open()?;
        tracing::info!("profile: edit cancelled");
        self.handoff.cancel();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.handoff.closed
    }
}

impl fmt::Debug for ProfileEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileEditor")
            .field("draft", &self.draft())
            .field("closed", &self.handoff.closed)
            .finish()
    }
}
