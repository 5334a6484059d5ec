//! Create/edit form state for every resource.
//!
//! Field rules are declarative and checked before any request goes out;
//! submission branches on the presence of an id (update vs create), the
//! same create-or-update shape for all five resources.

use crate::api::types::{
    CategoryDetail, CategoryPayload, MediaDetail, MediaPayload, PlaylistDetail, PlaylistPayload,
    Teacher, TeacherDetail, TeacherPayload, User, UserPayload,
};
use crate::validate::{self, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Teachers,
    Media,
    Playlists,
    Categories,
}

impl Resource {
    pub fn title(&self) -> &'static str {
        match self {
            Resource::Users => "Users",
            Resource::Teachers => "Teachers",
            Resource::Media => "Media",
            Resource::Playlists => "Playlists",
            Resource::Categories => "Categories",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Users => "user",
            Resource::Teachers => "teacher",
            Resource::Media => "media",
            Resource::Playlists => "playlist",
            Resource::Categories => "category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Toggle,
    TeacherSelect,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
    pub value: String,
    pub error: Option<String>,
}

impl Field {
    fn text(name: &'static str, label: &'static str, rules: Vec<Rule>) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            rules,
            value: String::new(),
            error: None,
        }
    }

    fn text_area(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::TextArea,
            ..Self::text(name, label, Vec::new())
        }
    }

    fn toggle(name: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            kind: FieldKind::Toggle,
            value: default.to_string(),
            ..Self::text(name, label, Vec::new())
        }
    }

    fn teacher_select(name: &'static str, label: &'static str, rules: Vec<Rule>) -> Self {
        Self {
            kind: FieldKind::TeacherSelect,
            ..Self::text(name, label, rules)
        }
    }

    pub fn is_on(&self) -> bool {
        self.value == "true"
    }
}

/// Full edit-shape record fetched to pre-populate a form.
#[derive(Debug, Clone)]
pub enum EditRecord {
    User(User),
    Teacher(TeacherDetail),
    Media(MediaDetail),
    Playlist(PlaylistDetail),
    Category(CategoryDetail),
}

/// Typed body for the create/update call, one variant per resource.
#[derive(Debug, Clone)]
pub enum FormPayload {
    User(UserPayload),
    Teacher(TeacherPayload),
    Media(MediaPayload),
    Playlist(PlaylistPayload),
    Category(CategoryPayload),
}

fn name_en_rules() -> Vec<Rule> {
    vec![Rule::MinLen(2), Rule::MaxLen(50)]
}

fn name_ml_rules() -> Vec<Rule> {
    vec![Rule::MaxLen(50)]
}

#[derive(Debug, Clone)]
pub struct EntityForm {
    pub resource: Resource,
    /// Present when editing; submission branches on this.
    pub id: Option<String>,
    pub fields: Vec<Field>,
    pub focused: usize,
    pub submitting: bool,
}

impl EntityForm {
    pub fn new(resource: Resource, id: Option<String>) -> Self {
        let fields = match resource {
            Resource::Users => vec![
                Field::text("name", "Name", vec![Rule::Required]),
                Field::text_area("bio", "Bio"),
            ],
            Resource::Teachers => vec![
                Field::text("name_en", "Name (EN)", name_en_rules()),
                Field::text("name_ml", "Name (ML)", name_ml_rules()),
                Field::text_area("bio_en", "Bio (EN)"),
                Field::text_area("bio_ml", "Bio (ML)"),
            ],
            Resource::Media => vec![
                Field::text("name_en", "Name (EN)", name_en_rules()),
                Field::text("name_ml", "Name (ML)", name_ml_rules()),
                Field::text_area("description_en", "Description (EN)"),
                Field::text_area("description_ml", "Description (ML)"),
                Field::text("fileUrl", "File URL", vec![Rule::Required]),
                Field::text("duration", "Duration", Vec::new()),
                Field::teacher_select("teacherId", "Teacher", vec![Rule::Uuid]),
                Field::toggle("isActive", "Active", true),
            ],
            Resource::Playlists => vec![
                Field::text("name_en", "Name (EN)", name_en_rules()),
                Field::text("name_ml", "Name (ML)", name_ml_rules()),
                Field::text_area("description_en", "Description (EN)"),
                Field::text_area("description_ml", "Description (ML)"),
                Field::text("totalDuration", "Total Duration", Vec::new()),
                Field::teacher_select("teacherId", "Teacher", Vec::new()),
                Field::text("thumbnail", "Thumbnail URL", Vec::new()),
                Field::toggle("isActive", "Active", true),
            ],
            Resource::Categories => vec![
                Field::text("name_en", "Name (EN)", name_en_rules()),
                Field::text("name_ml", "Name (ML)", name_ml_rules()),
                Field::text("thumbnail", "Thumbnail URL", Vec::new()),
            ],
        };
        Self {
            resource,
            id,
            fields,
            focused: 0,
            submitting: false,
        }
    }

    pub fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.name == name) {
            field.value = value.into();
        }
    }

    /// Populate every field from the fetched edit-shape record.
    pub fn populate(&mut self, record: &EditRecord) {
        match record {
            EditRecord::User(user) => {
                self.set("name", user.name.clone());
                self.set("bio", user.bio.clone());
            }
            EditRecord::Teacher(teacher) => {
                self.set("name_en", teacher.name_en.clone());
                self.set("name_ml", teacher.name_ml.clone());
                self.set("bio_en", teacher.bio_en.clone());
                self.set("bio_ml", teacher.bio_ml.clone());
            }
            EditRecord::Media(media) => {
                self.set("name_en", media.name_en.clone());
                self.set("name_ml", media.name_ml.clone());
                self.set("description_en", media.description_en.clone());
                self.set("description_ml", media.description_ml.clone());
                self.set("fileUrl", media.file_url.clone());
                self.set("duration", media.duration.clone());
                self.set("teacherId", media.teacher_id.clone());
                self.set("isActive", media.is_active.to_string());
            }
            EditRecord::Playlist(playlist) => {
                self.set("name_en", playlist.name_en.clone());
                self.set("name_ml", playlist.name_ml.clone());
                self.set("description_en", playlist.description_en.clone());
                self.set("description_ml", playlist.description_ml.clone());
                self.set("totalDuration", playlist.total_duration.clone());
                self.set("teacherId", playlist.teacher_id.clone().unwrap_or_default());
                self.set("thumbnail", playlist.thumbnail.clone());
                self.set("isActive", playlist.is_active.to_string());
            }
            EditRecord::Category(category) => {
                self.set("name_en", category.name_en.clone());
                self.set("name_ml", category.name_ml.clone());
                self.set("thumbnail", category.thumbnail.clone());
            }
        }
    }

    /// Check every field, annotating failures. Returns true when clean.
    pub fn validate(&mut self) -> bool {
        let mut clean = true;
        for field in &mut self.fields {
            field.error = validate::check(&field.value, &field.rules);
            clean &= field.error.is_none();
        }
        clean
    }

    pub fn payload(&self) -> FormPayload {
        match self.resource {
            Resource::Users => FormPayload::User(UserPayload {
                name: self.value("name").to_string(),
                bio: self.value("bio").to_string(),
            }),
            Resource::Teachers => FormPayload::Teacher(TeacherPayload {
                name_en: self.value("name_en").to_string(),
                name_ml: self.value("name_ml").to_string(),
                bio_en: self.value("bio_en").to_string(),
                bio_ml: self.value("bio_ml").to_string(),
            }),
            Resource::Media => FormPayload::Media(MediaPayload {
                name_en: self.value("name_en").to_string(),
                name_ml: self.value("name_ml").to_string(),
                description_en: self.value("description_en").to_string(),
                description_ml: self.value("description_ml").to_string(),
                file_url: self.value("fileUrl").to_string(),
                duration: self.value("duration").to_string(),
                teacher_id: self.value("teacherId").to_string(),
                is_active: self.value("isActive") == "true",
            }),
            Resource::Playlists => FormPayload::Playlist(PlaylistPayload {
                name_en: self.value("name_en").to_string(),
                name_ml: self.value("name_ml").to_string(),
                description_en: self.value("description_en").to_string(),
                description_ml: self.value("description_ml").to_string(),
                total_duration: self.value("totalDuration").to_string(),
                teacher_id: Some(self.value("teacherId"))
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
                thumbnail: self.value("thumbnail").to_string(),
                is_active: self.value("isActive") == "true",
            }),
            Resource::Categories => FormPayload::Category(CategoryPayload {
                name_en: self.value("name_en").to_string(),
                name_ml: self.value("name_ml").to_string(),
                thumbnail: self.value("thumbnail").to_string(),
            }),
        }
    }

    pub fn focused_field(&self) -> &Field {
        &self.fields[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.focused];
        if matches!(field.kind, FieldKind::Text | FieldKind::TextArea) {
            field.value.push(c);
            field.error = None;
        }
    }

    pub fn backspace(&mut self) {
        let field = &mut self.fields[self.focused];
        if matches!(field.kind, FieldKind::Text | FieldKind::TextArea) {
            field.value.pop();
            field.error = None;
        }
    }

    pub fn toggle_focused(&mut self) {
        let field = &mut self.fields[self.focused];
        if field.kind == FieldKind::Toggle {
            field.value = (!field.is_on()).to_string();
        }
    }

    /// Step the focused teacher select through the loaded options; an extra
    /// virtual step clears the selection.
    pub fn cycle_teacher(&mut self, teachers: &[Teacher], forward: bool) {
        let field = &mut self.fields[self.focused];
        if field.kind != FieldKind::TeacherSelect || teachers.is_empty() {
            return;
        }
        let current = teachers.iter().position(|teacher| teacher.id == field.value);
        // options are [none, t0, t1, ...] flattened to an index
        let slots = teachers.len() + 1;
        let index = current.map(|i| i + 1).unwrap_or(0);
        let next = if forward {
            (index + 1) % slots
        } else {
            (index + slots - 1) % slots
        };
        field.value = if next == 0 {
            String::new()
        } else {
            teachers[next - 1].id.clone()
        };
        field.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_are_empty_and_active() {
        let form = EntityForm::new(Resource::Media, None);
        assert_eq!(form.value("name_en"), "");
        assert_eq!(form.value("isActive"), "true");
        assert!(form.id.is_none());
    }

    #[test]
    fn short_name_blocks_submission_and_annotates_the_field() {
        let mut form = EntityForm::new(Resource::Categories, None);
        form.set("name_en", "a");
        assert!(!form.validate());
        let field = form.fields.iter().find(|f| f.name == "name_en").unwrap();
        assert!(field.error.as_deref().unwrap().contains("at least 2 characters"));

        form.set("name_en", "ab");
        assert!(form.validate());
    }

    #[test]
    fn media_requires_teacher_and_file_url() {
        let mut form = EntityForm::new(Resource::Media, None);
        form.set("name_en", "Piano Intro");
        assert!(!form.validate());

        form.set("fileUrl", "https://cdn.example.com/audio/m7.mp3");
        form.set("teacherId", "8f14e45f-ceea-467f-a0f9-b1a163c9a2d1");
        assert!(form.validate());
    }

    #[test]
    fn populate_fills_every_playlist_field() {
        let detail: PlaylistDetail = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name_en": "Morning Ragas",
            "name_ml": "\u{0d30}\u{0d3e}\u{0d17}\u{0d02}",
            "description_en": "Start the day",
            "totalDuration": "42:00",
            "teacherId": "8f14e45f-ceea-467f-a0f9-b1a163c9a2d1",
            "thumbnail": "https://cdn.example.com/p1.jpg",
            "isActive": true,
        }))
        .unwrap();

        let mut form = EntityForm::new(Resource::Playlists, Some("p1".into()));
        form.populate(&EditRecord::Playlist(detail));
        assert_eq!(form.value("name_en"), "Morning Ragas");
        assert_eq!(form.value("totalDuration"), "42:00");
        assert_eq!(form.value("teacherId"), "8f14e45f-ceea-467f-a0f9-b1a163c9a2d1");
    }

    #[test]
    fn playlist_payload_drops_empty_teacher_selection() {
        let mut form = EntityForm::new(Resource::Playlists, None);
        form.set("name_en", "Morning Ragas");
        let FormPayload::Playlist(payload) = form.payload() else {
            panic!("expected playlist payload");
        };
        assert!(payload.teacher_id.is_none());
        assert!(payload.is_active);
    }

    #[test]
    fn teacher_select_cycles_through_options_and_back_to_none() {
        let teachers: Vec<Teacher> = serde_json::from_value(serde_json::json!([
            {"id": "t1", "name": "Anita"},
            {"id": "t2", "name": "Ravi"},
        ]))
        .unwrap();
        let mut form = EntityForm::new(Resource::Playlists, None);
        form.focused = form
            .fields
            .iter()
            .position(|f| f.kind == FieldKind::TeacherSelect)
            .unwrap();

        form.cycle_teacher(&teachers, true);
        assert_eq!(form.value("teacherId"), "t1");
        form.cycle_teacher(&teachers, true);
        assert_eq!(form.value("teacherId"), "t2");
        form.cycle_teacher(&teachers, true);
        assert_eq!(form.value("teacherId"), "");
        form.cycle_teacher(&teachers, false);
        assert_eq!(form.value("teacherId"), "t2");
    }

    #[test]
    fn toggle_flips_only_toggle_fields() {
        let mut form = EntityForm::new(Resource::Media, None);
        form.focused = form
            .fields
            .iter()
            .position(|f| f.kind == FieldKind::Toggle)
            .unwrap();
        form.toggle_focused();
        assert_eq!(form.value("isActive"), "false");

        form.focused = 0;
        form.toggle_focused();
        assert_eq!(form.value("isActive"), "false");
    }
}
