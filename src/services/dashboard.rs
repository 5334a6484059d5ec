use crate::api::types::Media;
use crate::ports::AdminApi;

const RECENT_LIMIT: usize = 5;
const MEDIA_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub users: usize,
    pub teachers: usize,
    pub media: usize,
    pub playlists: usize,
    pub categories: usize,
    /// Newest uploads first.
    pub recent_media: Vec<Media>,
}

/// Gather the landing-screen counts. Every fetch degrades to an empty
/// collection on failure so the dashboard always renders.
pub async fn load(api: &dyn AdminApi) -> DashboardStats {
    let (users, teachers, media, playlists, categories) = futures::join!(
        api.users(),
        api.teachers(),
        api.media(1, MEDIA_PAGE_LIMIT, None),
        api.playlists(),
        api.categories(),
    );

    let users = users.unwrap_or_else(|error| {
        log::error!("Failed to fetch users for dashboard: {}", error);
        Vec::new()
    });
    let teachers = teachers.unwrap_or_else(|error| {
        log::error!("Failed to fetch teachers for dashboard: {}", error);
        Vec::new()
    });
    let media = media.unwrap_or_else(|error| {
        log::error!("Failed to fetch media for dashboard: {}", error);
        Vec::new()
    });
    let playlists = playlists.unwrap_or_else(|error| {
        log::error!("Failed to fetch playlists for dashboard: {}", error);
        Vec::new()
    });
    let categories = categories.unwrap_or_else(|error| {
        log::error!("Failed to fetch categories for dashboard: {}", error);
        Vec::new()
    });

    let mut recent_media = media.clone();
    recent_media.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_media.truncate(RECENT_LIMIT);

    DashboardStats {
        users: users.len(),
        teachers: teachers.len(),
        media: media.len(),
        playlists: playlists.len(),
        categories: categories.len(),
        recent_media,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::ports::MockAdminApi;

    fn media(id: &str, created_at: &str) -> Media {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": id,
            "duration": 60,
            "isActive": true,
            "createdAt": created_at,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn failed_fetches_degrade_to_zero_counts() {
        let mut api = MockAdminApi::new();
        api.expect_users().returning(|| {
            Err(ApiError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                message: "Failed to fetch users".to_string(),
            })
        });
        api.expect_teachers().returning(|| Ok(Vec::new()));
        api.expect_media().returning(|_, _, _| {
            Ok(vec![media("m1", "2024-01-01T00:00:00Z")])
        });
        api.expect_playlists().returning(|| Ok(Vec::new()));
        api.expect_categories().returning(|| Ok(Vec::new()));

        let stats = load(&api).await;
        assert_eq!(stats.users, 0);
        assert_eq!(stats.media, 1);
    }

    #[tokio::test]
    async fn recent_media_is_newest_first_and_capped() {
        let mut api = MockAdminApi::new();
        api.expect_users().returning(|| Ok(Vec::new()));
        api.expect_teachers().returning(|| Ok(Vec::new()));
        api.expect_media().returning(|_, _, _| {
            Ok((1..=7)
                .map(|i| media(&format!("m{}", i), &format!("2024-01-0{}T00:00:00Z", i)))
                .collect())
        });
        api.expect_playlists().returning(|| Ok(Vec::new()));
        api.expect_categories().returning(|| Ok(Vec::new()));

        let stats = load(&api).await;
        assert_eq!(stats.recent_media.len(), 5);
        assert_eq!(stats.recent_media[0].id, "m7");
        assert_eq!(stats.recent_media[4].id, "m3");
    }
}
