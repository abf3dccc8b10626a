//! Event records and their write-time normalization.
//!
//! An [`EventDraft`] is what an organizer submits. [`EventDraft::into_event`]
//! runs the full insert pipeline (presence validation, then slug, date and
//! time normalization) and yields the [`Event`] to persist. Updates go
//! through [`Event::patched`], which re-normalizes only the fields that
//! actually changed.

use chrono::{DateTime, Utc};

use super::RecordId;
use super::schedule::{normalize_date, normalize_time};
use super::slug::generate_slug;
use crate::error::{AppError, FieldError};

/// Candidate event as submitted, before validation and normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    /// Display title; the slug is derived from it.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Longer overview text.
    pub overview: String,
    /// Image URL or asset path.
    pub image: String,
    /// Venue name.
    pub venue: String,
    /// City / address line.
    pub location: String,
    /// Date in any accepted shape.
    pub date: String,
    /// Time in 24h or 12h form.
    pub time: String,
    /// Attendance mode (`online`, `offline`, `hybrid`, ...).
    pub mode: String,
    /// Intended audience.
    pub audience: String,
    /// Ordered agenda items.
    pub agenda: Vec<String>,
    /// Organizer name.
    pub organizer: String,
    /// Ordered tags.
    pub tags: Vec<String>,
}

impl EventDraft {
    fn text_fields(&self) -> [(&'static str, &str); 11] {
        [
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("overview", self.overview.as_str()),
            ("image", self.image.as_str()),
            ("venue", self.venue.as_str()),
            ("location", self.location.as_str()),
            ("date", self.date.as_str()),
            ("time", self.time.as_str()),
            ("mode", self.mode.as_str()),
            ("audience", self.audience.as_str()),
            ("organizer", self.organizer.as_str()),
        ]
    }

    /// Checks field presence and returns every violation found.
    ///
    /// Text fields must be non-empty after trimming; `agenda` and `tags`
    /// must be non-empty lists of non-empty trimmed strings. A title with
    /// no letter or digit is rejected because its slug would be empty.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors: Vec<FieldError> = self
            .text_fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| FieldError::empty(field))
            .collect();

        if !self.title.trim().is_empty() && generate_slug(&self.title).is_empty() {
            errors.push(FieldError::new(
                "title",
                "title must contain at least one letter or digit",
            ));
        }
        if let Some(err) = validate_list("agenda", &self.agenda) {
            errors.push(err);
        }
        if let Some(err) = validate_list("tags", &self.tags) {
            errors.push(err);
        }
        errors
    }

    /// Runs the insert pipeline: validate, normalize, stamp.
    ///
    /// Every field counts as newly set, so slug, date and time are all
    /// derived here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with all presence failures, or the
    /// first date/time normalization error.
    pub fn into_event(self, now: DateTime<Utc>) -> Result<Event, AppError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let title = self.title.trim().to_string();
        let slug = generate_slug(&title);
        let date = normalize_date(&self.date)?;
        let time = normalize_time(&self.time)?;
        tracing::debug!(%slug, %date, %time, "event normalized");

        Ok(Event {
            id: RecordId::new(),
            title,
            slug,
            description: self.description.trim().to_string(),
            overview: self.overview.trim().to_string(),
            image: self.image.trim().to_string(),
            venue: self.venue.trim().to_string(),
            location: self.location.trim().to_string(),
            date,
            time,
            mode: self.mode.trim().to_string(),
            audience: self.audience.trim().to_string(),
            agenda: trim_all(self.agenda),
            organizer: self.organizer.trim().to_string(),
            tags: trim_all(self.tags),
            created_at: now,
            updated_at: now,
        })
    }
}

fn validate_list(field: &str, items: &[String]) -> Option<FieldError> {
    if items.is_empty() || items.iter().any(|item| item.trim().is_empty()) {
        Some(FieldError::new(
            field,
            format!("{field} must not be empty and every entry must be non-empty"),
        ))
    } else {
        None
    }
}

fn trim_all(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|item| item.trim().to_string()).collect()
}

/// A stored event.
///
/// Invariants: `slug` is `generate_slug(title)`; `date` is `YYYY-MM-DD`;
/// `time` is 24h `HH:MM`; `agenda` and `tags` are non-empty with no blank
/// entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Record identifier.
    pub id: RecordId,
    /// Trimmed title.
    pub title: String,
    /// Unique slug derived from `title`.
    pub slug: String,
    /// Short description.
    pub description: String,
    /// Longer overview text.
    pub overview: String,
    /// Image URL or asset path.
    pub image: String,
    /// Venue name.
    pub venue: String,
    /// City / address line.
    pub location: String,
    /// ISO calendar date.
    pub date: String,
    /// 24-hour `HH:MM`.
    pub time: String,
    /// Attendance mode.
    pub mode: String,
    /// Intended audience.
    pub audience: String,
    /// Ordered agenda items.
    pub agenda: Vec<String>,
    /// Organizer name.
    pub organizer: String,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Insert time.
    pub created_at: DateTime<Utc>,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

/// Partial update of an [`Event`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl EventPatch {
    /// Returns `true` if the patch sets no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Event {
    fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            overview: self.overview.clone(),
            image: self.image.clone(),
            venue: self.venue.clone(),
            location: self.location.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            mode: self.mode.clone(),
            audience: self.audience.clone(),
            agenda: self.agenda.clone(),
            organizer: self.organizer.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Applies `patch` and returns the updated record, leaving `self`
    /// untouched.
    ///
    /// The slug is re-derived only if the title changed, and date/time are
    /// re-normalized only if their submitted value differs from the stored
    /// one. The merged record is validated as a whole before anything is
    /// normalized.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the merged record breaks a
    /// presence rule, or a date/time normalization error.
    pub fn patched(&self, patch: EventPatch, now: DateTime<Utc>) -> Result<Self, AppError> {
        let mut draft = self.to_draft();
        let title_changed = set_if_changed(&mut draft.title, patch.title);
        let date_changed = set_if_changed(&mut draft.date, patch.date);
        let time_changed = set_if_changed(&mut draft.time, patch.time);
        set_if_changed(&mut draft.description, patch.description);
        set_if_changed(&mut draft.overview, patch.overview);
        set_if_changed(&mut draft.image, patch.image);
        set_if_changed(&mut draft.venue, patch.venue);
        set_if_changed(&mut draft.location, patch.location);
        set_if_changed(&mut draft.mode, patch.mode);
        set_if_changed(&mut draft.audience, patch.audience);
        set_if_changed(&mut draft.organizer, patch.organizer);
        if let Some(agenda) = patch.agenda {
            draft.agenda = agenda;
        }
        if let Some(tags) = patch.tags {
            draft.tags = tags;
        }

        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let slug = if title_changed {
            generate_slug(&draft.title)
        } else {
            self.slug.clone()
        };
        let date = if date_changed {
            normalize_date(&draft.date)?
        } else {
            draft.date
        };
        let time = if time_changed {
            normalize_time(&draft.time)?
        } else {
            draft.time
        };

        Ok(Self {
            id: self.id,
            title: draft.title,
            slug,
            description: draft.description,
            overview: draft.overview,
            image: draft.image,
            venue: draft.venue,
            location: draft.location,
            date,
            time,
            mode: draft.mode,
            audience: draft.audience,
            agenda: trim_all(draft.agenda),
            organizer: draft.organizer,
            tags: trim_all(draft.tags),
            created_at: self.created_at,
            updated_at: now,
        })
    }
}

/// Stores the trimmed `value` into `slot` and reports whether it differs.
fn set_if_changed(slot: &mut String, value: Option<String>) -> bool {
    match value {
        Some(value) if value.trim() != slot.as_str() => {
            *slot = value.trim().to_string();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_draft() -> EventDraft {
        EventDraft {
            title: "  Rust Nation 2026  ".to_string(),
            description: "A conference about Rust".to_string(),
            overview: "Two days of talks and workshops".to_string(),
            image: "/images/rust-nation.png".to_string(),
            venue: "The Brewery".to_string(),
            location: "London, UK".to_string(),
            date: "2026-02-14T10:00:00Z".to_string(),
            time: "9:30 am".to_string(),
            mode: "offline".to_string(),
            audience: "Developers".to_string(),
            agenda: vec!["Intro talk".to_string()],
            organizer: "Rust Nation Ltd".to_string(),
            tags: vec!["rust".to_string(), " systems ".to_string()],
        }
    }

    fn make_event() -> Event {
        let Ok(event) = sample_draft().into_event(Utc::now()) else {
            panic!("sample draft should be valid");
        };
        event
    }

    #[test]
    fn insert_pipeline_normalizes_everything() {
        let event = make_event();
        assert_eq!(event.title, "Rust Nation 2026");
        assert_eq!(event.slug, "rust-nation-2026");
        assert_eq!(event.date, "2026-02-14");
        assert_eq!(event.time, "09:30");
        assert_eq!(event.tags, vec!["rust".to_string(), "systems".to_string()]);
        assert_eq!(event.created_at, event.updated_at);
    }

    #[test]
    fn empty_agenda_is_rejected() {
        let draft = EventDraft {
            agenda: Vec::new(),
            ..sample_draft()
        };
        let Err(AppError::Validation(errors)) = draft.into_event(Utc::now()) else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().map(|e| e.field.as_str()), Some("agenda"));
    }

    #[test]
    fn blank_tag_entry_is_rejected() {
        let draft = EventDraft {
            tags: vec!["rust".to_string(), "   ".to_string()],
            ..sample_draft()
        };
        let errors = draft.validate();
        assert_eq!(errors, vec![FieldError::new(
            "tags",
            "tags must not be empty and every entry must be non-empty"
        )]);
    }

    #[test]
    fn every_blank_text_field_is_reported() {
        let errors = EventDraft::default().validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "title",
                "description",
                "overview",
                "image",
                "venue",
                "location",
                "date",
                "time",
                "mode",
                "audience",
                "organizer",
                "agenda",
                "tags",
            ]
        );
        assert_eq!(
            errors.first().map(|e| e.message.as_str()),
            Some("title must not be empty")
        );
    }

    #[test]
    fn punctuation_only_title_is_rejected() {
        let draft = EventDraft {
            title: "???".to_string(),
            ..sample_draft()
        };
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().map(|e| e.field.as_str()), Some("title"));
    }

    #[test]
    fn bad_time_aborts_insert() {
        let draft = EventDraft {
            time: "25:00".to_string(),
            ..sample_draft()
        };
        assert!(matches!(
            draft.into_event(Utc::now()),
            Err(AppError::InvalidTime(_))
        ));
    }

    #[test]
    fn bad_date_aborts_insert() {
        let draft = EventDraft {
            date: "not-a-date".to_string(),
            ..sample_draft()
        };
        assert!(matches!(
            draft.into_event(Utc::now()),
            Err(AppError::InvalidDate(_))
        ));
    }

    #[test]
    fn patch_without_title_keeps_slug() {
        let event = make_event();
        let patch = EventPatch {
            venue: Some("Olympia".to_string()),
            ..EventPatch::default()
        };
        let Ok(updated) = event.patched(patch, Utc::now()) else {
            panic!("patch should apply");
        };
        assert_eq!(updated.slug, event.slug);
        assert_eq!(updated.venue, "Olympia");
        assert_eq!(updated.id, event.id);
        assert_eq!(updated.created_at, event.created_at);
    }

    #[test]
    fn patch_with_new_title_rederives_slug() {
        let event = make_event();
        let patch = EventPatch {
            title: Some("Rust Nation: Spring Edition".to_string()),
            ..EventPatch::default()
        };
        let Ok(updated) = event.patched(patch, Utc::now()) else {
            panic!("patch should apply");
        };
        assert_eq!(updated.slug, "rust-nation-spring-edition");
    }

    #[test]
    fn patch_with_same_title_is_not_a_change() {
        let mut event = make_event();
        // A slug that no longer matches proves the title was not re-slugged.
        event.slug = "legacy-slug".to_string();
        let patch = EventPatch {
            title: Some(" Rust Nation 2026 ".to_string()),
            ..EventPatch::default()
        };
        let Ok(updated) = event.patched(patch, Utc::now()) else {
            panic!("patch should apply");
        };
        assert_eq!(updated.slug, "legacy-slug");
    }

    #[test]
    fn patch_renormalizes_changed_time_and_date() {
        let event = make_event();
        let patch = EventPatch {
            date: Some("March 3, 2026".to_string()),
            time: Some("7:15 pm".to_string()),
            ..EventPatch::default()
        };
        let Ok(updated) = event.patched(patch, Utc::now()) else {
            panic!("patch should apply");
        };
        assert_eq!(updated.date, "2026-03-03");
        assert_eq!(updated.time, "19:15");
    }

    #[test]
    fn failing_patch_leaves_record_untouched() {
        let event = make_event();
        let before = event.clone();
        let patch = EventPatch {
            title: Some("Renamed".to_string()),
            time: Some("noon".to_string()),
            ..EventPatch::default()
        };
        assert!(event.patched(patch, Utc::now()).is_err());
        assert_eq!(event, before);
    }

    #[test]
    fn patch_emptying_a_list_is_rejected() {
        let event = make_event();
        let patch = EventPatch {
            tags: Some(Vec::new()),
            ..EventPatch::default()
        };
        assert!(matches!(
            event.patched(patch, Utc::now()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn empty_patch_detection() {
        assert!(EventPatch::default().is_empty());
        let patch = EventPatch {
            mode: Some("online".to_string()),
            ..EventPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
