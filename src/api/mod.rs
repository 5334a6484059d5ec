pub mod error;
pub mod types;

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::error::ApiError;
use crate::api::types::{
    AdminProfile, AttachMediaRequest, CategoryDetail, CategoryPayload, CategorySummary,
    LoginRequest, LoginResponse, Media, MediaDetail, MediaPayload, PlaylistDetail,
    PlaylistPayload, PlaylistSummary, Teacher, TeacherDetail, TeacherPayload, User, UserPayload,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Backend API client.
///
/// The bearer token is attached to every request once set; the backend
/// ignores it on routes that don't check it.
pub struct AdminClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl AdminClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn with_token(base_url: Url, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: Some(token),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.timeout(REQUEST_TIMEOUT);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn expect_success(response: Response, failure: &str) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(ApiError::Status {
            status,
            message: failure.to_string(),
        })
    }

    /// Like [`Self::expect_success`] but surfaces the server-provided
    /// `message` field when the body has one. Only login gets this
    /// treatment; everything else reports a fixed description.
    async fn expect_success_with_message(
        response: Response,
        fallback: &str,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Err(ApiError::Status { status, message })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        failure: &str,
    ) -> Result<T, ApiError> {
        let response = self.apply(self.client.get(self.endpoint(path)?)).send().await?;
        let response = Self::expect_success(response, failure).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        failure: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .apply(self.client.post(self.endpoint(path)?))
            .json(body)
            .send()
            .await?;
        let response = Self::expect_success(response, failure).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    async fn put_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        failure: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .apply(self.client.put(self.endpoint(path)?))
            .json(body)
            .send()
            .await?;
        let response = Self::expect_success(response, failure).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    async fn delete(&self, path: &str, failure: &str) -> Result<(), ApiError> {
        let response = self
            .apply(self.client.delete(self.endpoint(path)?))
            .send()
            .await?;
        Self::expect_success(response, failure).await?;
        Ok(())
    }

    // admins

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.endpoint("admins/login")?)
            .timeout(REQUEST_TIMEOUT)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let response = Self::expect_success_with_message(response, "Login failed").await?;
        response.json().await.map_err(ApiError::Decode)
    }

    pub async fn profile(&self) -> Result<AdminProfile, ApiError> {
        self.get_json("admins/profile", "Failed to fetch profile").await
    }

    // users

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("users", "Failed to fetch users").await
    }

    pub async fn create_user(&self, payload: UserPayload) -> Result<User, ApiError> {
        self.post_json("users", &payload, "Failed to create user").await
    }

    pub async fn update_user(&self, id: &str, payload: UserPayload) -> Result<User, ApiError> {
        self.put_json(&format!("users/{}", id), &payload, "Failed to update user")
            .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("users/{}", id), "Failed to delete user").await
    }

    // teachers

    pub async fn teachers(&self) -> Result<Vec<Teacher>, ApiError> {
        self.get_json("teachers", "Failed to fetch teachers").await
    }

    pub async fn teacher(&self, id: &str) -> Result<TeacherDetail, ApiError> {
        self.get_json(&format!("teachers/{}", id), "Failed to fetch teacher")
            .await
    }

    pub async fn create_teacher(&self, payload: TeacherPayload) -> Result<TeacherDetail, ApiError> {
        self.post_json("teachers", &payload, "Failed to create teacher").await
    }

    pub async fn update_teacher(
        &self,
        id: &str,
        payload: TeacherPayload,
    ) -> Result<TeacherDetail, ApiError> {
        self.put_json(&format!("teachers/{}", id), &payload, "Failed to update teacher")
            .await
    }

    pub async fn delete_teacher(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("teachers/{}", id), "Failed to delete teacher")
            .await
    }

    // media

    pub async fn media(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<Vec<Media>, ApiError> {
        let mut path = format!("media?page={}&limit={}", page, limit);
        if let Some(term) = search.filter(|term| !term.is_empty()) {
            path.push_str(&format!("&search={}", urlencoding::encode(term)));
        }
        self.get_json(&path, "Failed to fetch media").await
    }

    pub async fn media_by_id(&self, id: &str) -> Result<MediaDetail, ApiError> {
        self.get_json(&format!("media/{}", id), "Failed to fetch media").await
    }

    pub async fn create_media(&self, payload: MediaPayload) -> Result<MediaDetail, ApiError> {
        self.post_json("media", &payload, "Failed to create media").await
    }

    pub async fn update_media(
        &self,
        id: &str,
        payload: MediaPayload,
    ) -> Result<MediaDetail, ApiError> {
        self.put_json(&format!("media/{}", id), &payload, "Failed to update media")
            .await
    }

    pub async fn delete_media(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("media/{}", id), "Failed to delete media").await
    }

    // playlists

    pub async fn playlists(&self) -> Result<Vec<PlaylistSummary>, ApiError> {
        self.get_json("playlists", "Failed to fetch playlists").await
    }

    pub async fn playlist(&self, id: &str) -> Result<PlaylistDetail, ApiError> {
        self.get_json(&format!("playlists/{}", id), "Failed to fetch playlist")
            .await
    }

    pub async fn create_playlist(
        &self,
        payload: PlaylistPayload,
    ) -> Result<PlaylistSummary, ApiError> {
        self.post_json("playlists", &payload, "Failed to create playlist").await
    }

    pub async fn update_playlist(
        &self,
        id: &str,
        payload: PlaylistPayload,
    ) -> Result<PlaylistSummary, ApiError> {
        self.put_json(&format!("playlists/{}", id), &payload, "Failed to update playlist")
            .await
    }

    pub async fn delete_playlist(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("playlists/{}", id), "Failed to delete playlist")
            .await
    }

    pub async fn add_media_to_playlist(
        &self,
        playlist_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError> {
        let body = AttachMediaRequest {
            media_id: media_id.to_string(),
        };
        let response = self
            .apply(
                self.client
                    .post(self.endpoint(&format!("playlists/{}/media", playlist_id))?),
            )
            .json(&body)
            .send()
            .await?;
        Self::expect_success(response, "Failed to add media to playlist").await?;
        Ok(())
    }

    pub async fn remove_media_from_playlist(
        &self,
        playlist_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError> {
        self.delete(
            &format!("playlists/{}/media/{}", playlist_id, media_id),
            "Failed to remove media from playlist",
        )
        .await
    }

    // categories

    pub async fn categories(&self) -> Result<Vec<CategorySummary>, ApiError> {
        self.get_json("categories", "Failed to fetch categories").await
    }

    pub async fn category(&self, id: &str) -> Result<CategoryDetail, ApiError> {
        self.get_json(&format!("categories/{}", id), "Failed to fetch category")
            .await
    }

    pub async fn create_category(
        &self,
        payload: CategoryPayload,
    ) -> Result<CategorySummary, ApiError> {
        self.post_json("categories", &payload, "Failed to create category").await
    }

    pub async fn update_category(
        &self,
        id: &str,
        payload: CategoryPayload,
    ) -> Result<CategorySummary, ApiError> {
        self.put_json(&format!("categories/{}", id), &payload, "Failed to update category")
            .await
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("categories/{}", id), "Failed to delete category")
            .await
    }

    pub async fn add_media_to_category(
        &self,
        category_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError> {
        let body = AttachMediaRequest {
            media_id: media_id.to_string(),
        };
        let response = self
            .apply(
                self.client
                    .post(self.endpoint(&format!("categories/{}/media", category_id))?),
            )
            .json(&body)
            .send()
            .await?;
        Self::expect_success(response, "Failed to add media to category").await?;
        Ok(())
    }

    pub async fn remove_media_from_category(
        &self,
        category_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError> {
        self.delete(
            &format!("categories/{}/media/{}", category_id, media_id),
            "Failed to remove media from category",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AdminClient {
        AdminClient::new(Url::parse("http://localhost:4000/api/backend/").unwrap())
    }

    #[test]
    fn endpoint_joins_under_base_path() {
        let url = client().endpoint("playlists/p1/media").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/backend/playlists/p1/media");
    }

    #[test]
    fn media_search_term_is_percent_encoded() {
        let term = "piano & flute";
        let path = format!("media?page=1&limit=30&search={}", urlencoding::encode(term));
        let url = client().endpoint(&path).unwrap();
        assert_eq!(
            url.query().unwrap(),
            "page=1&limit=30&search=piano%20%26%20flute"
        );
    }
}
