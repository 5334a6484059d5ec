use crate::api::AdminClient;
use crate::api::error::ApiError;
use crate::api::types::{
    AdminProfile, CategoryDetail, CategoryPayload, CategorySummary, LoginResponse, Media,
    MediaDetail, MediaPayload, PlaylistDetail, PlaylistPayload, PlaylistSummary, Teacher,
    TeacherDetail, TeacherPayload, User, UserPayload,
};

/// Port trait wrapping the backend API capabilities used by the console.
///
/// The production implementation is [`AdminClient`]; tests use the
/// generated mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AdminApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    async fn profile(&self) -> Result<AdminProfile, ApiError>;

    async fn users(&self) -> Result<Vec<User>, ApiError>;

    async fn create_user(&self, payload: UserPayload) -> Result<User, ApiError>;

    async fn update_user(&self, id: &str, payload: UserPayload) -> Result<User, ApiError>;

    async fn delete_user(&self, id: &str) -> Result<(), ApiError>;

    async fn teachers(&self) -> Result<Vec<Teacher>, ApiError>;

    async fn teacher(&self, id: &str) -> Result<TeacherDetail, ApiError>;

    async fn create_teacher(&self, payload: TeacherPayload) -> Result<TeacherDetail, ApiError>;

    async fn update_teacher(
        &self,
        id: &str,
        payload: TeacherPayload,
    ) -> Result<TeacherDetail, ApiError>;

    async fn delete_teacher(&self, id: &str) -> Result<(), ApiError>;

    async fn media<'a>(
        &self,
        page: u32,
        limit: u32,
        search: Option<&'a str>,
    ) -> Result<Vec<Media>, ApiError>;

    async fn media_by_id(&self, id: &str) -> Result<MediaDetail, ApiError>;

    async fn create_media(&self, payload: MediaPayload) -> Result<MediaDetail, ApiError>;

    async fn update_media(&self, id: &str, payload: MediaPayload) -> Result<MediaDetail, ApiError>;

    async fn delete_media(&self, id: &str) -> Result<(), ApiError>;

    async fn playlists(&self) -> Result<Vec<PlaylistSummary>, ApiError>;

    async fn playlist(&self, id: &str) -> Result<PlaylistDetail, ApiError>;

    async fn create_playlist(&self, payload: PlaylistPayload)
    -> Result<PlaylistSummary, ApiError>;

    async fn update_playlist(
        &self,
        id: &str,
        payload: PlaylistPayload,
    ) -> Result<PlaylistSummary, ApiError>;

    async fn delete_playlist(&self, id: &str) -> Result<(), ApiError>;

    async fn add_media_to_playlist(
        &self,
        playlist_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError>;

    async fn remove_media_from_playlist(
        &self,
        playlist_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError>;

    async fn categories(&self) -> Result<Vec<CategorySummary>, ApiError>;

    async fn category(&self, id: &str) -> Result<CategoryDetail, ApiError>;

    async fn create_category(&self, payload: CategoryPayload)
    -> Result<CategorySummary, ApiError>;

    async fn update_category(
        &self,
        id: &str,
        payload: CategoryPayload,
    ) -> Result<CategorySummary, ApiError>;

    async fn delete_category(&self, id: &str) -> Result<(), ApiError>;

    async fn add_media_to_category(
        &self,
        category_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError>;

    async fn remove_media_from_category(
        &self,
        category_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
impl AdminApi for AdminClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        AdminClient::login(self, email, password).await
    }

    async fn profile(&self) -> Result<AdminProfile, ApiError> {
        AdminClient::profile(self).await
    }

    async fn users(&self) -> Result<Vec<User>, ApiError> {
        AdminClient::users(self).await
    }

    async fn create_user(&self, payload: UserPayload) -> Result<User, ApiError> {
        AdminClient::create_user(self, payload).await
    }

    async fn update_user(&self, id: &str, payload: UserPayload) -> Result<User, ApiError> {
        AdminClient::update_user(self, id, payload).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        AdminClient::delete_user(self, id).await
    }

    async fn teachers(&self) -> Result<Vec<Teacher>, ApiError> {
        AdminClient::teachers(self).await
    }

    async fn teacher(&self, id: &str) -> Result<TeacherDetail, ApiError> {
        AdminClient::teacher(self, id).await
    }

    async fn create_teacher(&self, payload: TeacherPayload) -> Result<TeacherDetail, ApiError> {
        AdminClient::create_teacher(self, payload).await
    }

    async fn update_teacher(
        &self,
        id: &str,
        payload: TeacherPayload,
    ) -> Result<TeacherDetail, ApiError> {
        AdminClient::update_teacher(self, id, payload).await
    }

    async fn delete_teacher(&self, id: &str) -> Result<(), ApiError> {
        AdminClient::delete_teacher(self, id).await
    }

    async fn media<'a>(
        &self,
        page: u32,
        limit: u32,
        search: Option<&'a str>,
    ) -> Result<Vec<Media>, ApiError> {
        AdminClient::media(self, page, limit, search).await
    }

    async fn media_by_id(&self, id: &str) -> Result<MediaDetail, ApiError> {
        AdminClient::media_by_id(self, id).await
    }

    async fn create_media(&self, payload: MediaPayload) -> Result<MediaDetail, ApiError> {
        AdminClient::create_media(self, payload).await
    }

    async fn update_media(&self, id: &str, payload: MediaPayload) -> Result<MediaDetail, ApiError> {
        AdminClient::update_media(self, id, payload).await
    }

    async fn delete_media(&self, id: &str) -> Result<(), ApiError> {
        AdminClient::delete_media(self, id).await
    }

    async fn playlists(&self) -> Result<Vec<PlaylistSummary>, ApiError> {
        AdminClient::playlists(self).await
    }

    async fn playlist(&self, id: &str) -> Result<PlaylistDetail, ApiError> {
        AdminClient::playlist(self, id).await
    }

    async fn create_playlist(
        &self,
        payload: PlaylistPayload,
    ) -> Result<PlaylistSummary, ApiError> {
        AdminClient::create_playlist(self, payload).await
    }

    async fn update_playlist(
        &self,
        id: &str,
        payload: PlaylistPayload,
    ) -> Result<PlaylistSummary, ApiError> {
        AdminClient::update_playlist(self, id, payload).await
    }

    async fn delete_playlist(&self, id: &str) -> Result<(), ApiError> {
        AdminClient::delete_playlist(self, id).await
    }

    async fn add_media_to_playlist(
        &self,
        playlist_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError> {
        AdminClient::add_media_to_playlist(self, playlist_id, media_id).await
    }

    async fn remove_media_from_playlist(
        &self,
        playlist_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError> {
        AdminClient::remove_media_from_playlist(self, playlist_id, media_id).await
    }

    async fn categories(&self) -> Result<Vec<CategorySummary>, ApiError> {
        AdminClient::categories(self).await
    }

    async fn category(&self, id: &str) -> Result<CategoryDetail, ApiError> {
        AdminClient::category(self, id).await
    }

    async fn create_category(
        &self,
        payload: CategoryPayload,
    ) -> Result<CategorySummary, ApiError> {
        AdminClient::create_category(self, payload).await
    }

    async fn update_category(
        &self,
        id: &str,
        payload: CategoryPayload,
    ) -> Result<CategorySummary, ApiError> {
        AdminClient::update_category(self, id, payload).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        AdminClient::delete_category(self, id).await
    }

    async fn add_media_to_category(
        &self,
        category_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError> {
        AdminClient::add_media_to_category(self, category_id, media_id).await
    }

    async fn remove_media_from_category(
        &self,
        category_id: &str,
        media_id: &str,
    ) -> Result<(), ApiError> {
        AdminClient::remove_media_from_category(self, category_id, media_id).await
    }
}
