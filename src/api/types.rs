//! Wire types for the backend REST API.
//!
//! List and edit shapes differ on the backend (merged display fields vs.
//! bilingual field pairs), so both are modeled instead of overloading one
//! struct per resource. Some fields are carried for wire fidelity even
//! though no screen reads them yet.
#![allow(dead_code)]

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct AdminProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    pub name: String,
    pub bio: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Teacher {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

/// Edit shape with the bilingual field pairs split out.
#[derive(Debug, Clone, Deserialize)]
pub struct TeacherDetail {
    pub id: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_ml: String,
    #[serde(default)]
    pub bio_en: String,
    #[serde(default)]
    pub bio_ml: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherPayload {
    pub name_en: String,
    pub name_ml: String,
    pub bio_en: String,
    pub bio_ml: String,
}

/// List shape; `duration` is seconds here but a display string on the edit
/// shape, matching the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "nameML", default)]
    pub name_ml: Option<String>,
    #[serde(rename = "fileUrl", default)]
    pub file_url: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(rename = "teacherId", default)]
    pub teacher_id: String,
    #[serde(default)]
    pub teacher: Option<Teacher>,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaTeacherName {
    #[serde(default)]
    pub name_en: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaDetail {
    pub id: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_ml: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ml: String,
    #[serde(rename = "fileUrl", default)]
    pub file_url: String,
    #[serde(default)]
    pub duration: String,
    #[serde(rename = "teacherId", default)]
    pub teacher_id: String,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(default)]
    pub teachers: Option<MediaTeacherName>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaPayload {
    pub name_en: String,
    pub name_ml: String,
    pub description_en: String,
    pub description_ml: String,
    #[serde(rename = "fileUrl")]
    pub file_url: String,
    pub duration: String,
    #[serde(rename = "teacherId")]
    pub teacher_id: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

/// One record per association edge on Playlist/Category detail responses;
/// the backend nests the full media edit shape under a `mediaId` key.
#[derive(Debug, Clone, Deserialize)]
pub struct AssociationRecord {
    #[serde(rename = "mediaId")]
    pub media: MediaDetail,
}

/// The one record every pane that lists associated media displays.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociatedMediaSummary {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<&AssociationRecord> for AssociatedMediaSummary {
    fn from(record: &AssociationRecord) -> Self {
        Self {
            id: record.media.id.clone(),
            name: record.media.name_en.clone(),
            duration: record.media.duration.clone(),
            is_active: record.media.is_active,
            created_at: record.media.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "mediaIds", default, deserialize_with = "de_media_count")]
    pub media_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistDetail {
    pub id: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_ml: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ml: String,
    #[serde(rename = "totalDuration", default)]
    pub total_duration: String,
    #[serde(rename = "teacherId", default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "mediaToPlaylist", default)]
    pub media_to_playlist: Vec<AssociationRecord>,
}

impl PlaylistDetail {
    pub fn associated_media(&self) -> Vec<AssociatedMediaSummary> {
        self.media_to_playlist.iter().map(Into::into).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistPayload {
    pub name_en: String,
    pub name_ml: String,
    pub description_en: String,
    pub description_ml: String,
    #[serde(rename = "totalDuration")]
    pub total_duration: String,
    /// Empty selection is omitted from the body rather than sent as "".
    #[serde(rename = "teacherId", skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    pub thumbnail: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "mediaIds", default, deserialize_with = "de_media_count")]
    pub media_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDetail {
    pub id: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_ml: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "mediaToCategory", default)]
    pub media_to_category: Vec<AssociationRecord>,
}

impl CategoryDetail {
    pub fn associated_media(&self) -> Vec<AssociatedMediaSummary> {
        self.media_to_category.iter().map(Into::into).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    pub name_en: String,
    pub name_ml: String,
    pub thumbnail: String,
}

#[derive(Debug, Serialize)]
pub struct AttachMediaRequest {
    #[serde(rename = "mediaId")]
    pub media_id: String,
}

fn default_true() -> bool {
    true
}

/// The backend overloads `mediaIds` across endpoints: a bare count, a
/// numeric string, or the full association array. Normalize all of them to
/// a count at the boundary.
fn de_media_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(media_count_from_value(&value))
}

fn media_count_from_value(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0) as usize,
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        serde_json::Value::Array(items) => items.len(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_count_accepts_every_observed_shape() {
        let number: PlaylistSummary =
            serde_json::from_value(serde_json::json!({"id": "p1", "mediaIds": 3})).unwrap();
        assert_eq!(number.media_count, 3);

        let string: PlaylistSummary =
            serde_json::from_value(serde_json::json!({"id": "p1", "mediaIds": "7"})).unwrap();
        assert_eq!(string.media_count, 7);

        let array: PlaylistSummary =
            serde_json::from_value(serde_json::json!({"id": "p1", "mediaIds": ["m1", "m2"]}))
                .unwrap();
        assert_eq!(array.media_count, 2);

        let missing: PlaylistSummary =
            serde_json::from_value(serde_json::json!({"id": "p1"})).unwrap();
        assert_eq!(missing.media_count, 0);
    }

    #[test]
    fn playlist_detail_maps_association_records() {
        let detail: PlaylistDetail = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name_en": "Morning Ragas",
            "mediaToPlaylist": [
                {
                    "mediaId": {
                        "id": "m7",
                        "name_en": "Piano Intro",
                        "duration": "3:05",
                        "isActive": true,
                        "createdAt": "2024-01-05T10:00:00Z"
                    }
                }
            ]
        }))
        .unwrap();

        let summaries = detail.associated_media();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "m7");
        assert_eq!(summaries[0].name, "Piano Intro");
        assert_eq!(summaries[0].duration, "3:05");
        assert!(summaries[0].is_active);
    }

    #[test]
    fn playlist_payload_omits_empty_teacher() {
        let payload = PlaylistPayload {
            name_en: "Morning Ragas".into(),
            name_ml: String::new(),
            description_en: String::new(),
            description_ml: String::new(),
            total_duration: String::new(),
            teacher_id: None,
            thumbnail: String::new(),
            is_active: true,
        };
        let body = serde_json::to_value(&payload).unwrap();
        assert!(body.get("teacherId").is_none());
        assert_eq!(body["isActive"], serde_json::json!(true));
    }

    #[test]
    fn media_list_and_detail_duration_types_differ() {
        let list: Media = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "name": "Intro",
            "duration": 185,
            "isActive": false
        }))
        .unwrap();
        assert_eq!(list.duration, 185);
        assert!(!list.is_active);

        let detail: MediaDetail = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "name_en": "Intro",
            "duration": "3:05"
        }))
        .unwrap();
        assert_eq!(detail.duration, "3:05");
        // edit shape defaults to active when the backend omits the flag
        assert!(detail.is_active);
    }

    #[test]
    fn bilingual_round_trip_keeps_both_sides() {
        let created: MediaDetail = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "name_en": "Intro",
            "name_ml": ""
        }))
        .unwrap();
        assert_eq!(created.name_en, "Intro");
        assert_eq!(created.name_ml, "");
    }
}
