//! Domain methods for the JobLink API client.
//!
//! Thin wrappers over the generic pipeline verbs. Response types come
//! from `joblink_core::models`.

use joblink_core::models::{
    Attachment, AuthTokens, BatchUploadRequest, BatchUploadResponse, Bid, BidDraft, Booking,
    BookingDraft, CatalogSnapshot, LoginRequest, LoginResponse, Message, MessageDraft,
    ProfileUpdate, ServiceFilters, ServiceListing, UserProfile,
};
use uuid::Uuid;

use crate::error::ClientError;
use crate::pipeline::ApiClient;
use crate::response::ResponseEnvelope;
use crate::transport::{FilePart, MultipartPayload};

const AUTH_LOGIN_PATH: &str = "/api/auth/login/";
const PROFILE_PATH: &str = "/api/profile/";
const SERVICES_PATH: &str = "/api/services/";
const BIDS_PATH: &str = "/api/bids/";
const BOOKINGS_PATH: &str = "/api/bookings/";
const MESSAGES_PATH: &str = "/api/messages/";
const ATTACHMENTS_PATH: &str = "/api/attachments/";
const SYNC_UPLOAD_PATH: &str = "/api/sync/upload/";

impl ApiClient {
    /// Exchange credentials for a token pair. The pair is persisted on
    /// success, so subsequent authenticated calls pick it up.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ResponseEnvelope<LoginResponse>, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let envelope: ResponseEnvelope<LoginResponse> =
            self.post_json_public(AUTH_LOGIN_PATH, &request).await?;

        if envelope.success {
            if let Some(login) = envelope.data.value() {
                self.session()
                    .store_tokens(&AuthTokens {
                        access: login.access.clone(),
                        refresh: login.refresh.clone(),
                    })
                    .await?;
                tracing::info!("logged in");
            }
        }
        Ok(envelope)
    }

    /// Drop all local authentication state.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.session().clear().await
    }

    pub async fn fetch_profile(&self) -> Result<ResponseEnvelope<UserProfile>, ClientError> {
        self.get(PROFILE_PATH, &[]).await
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<ResponseEnvelope<UserProfile>, ClientError> {
        self.patch_json(PROFILE_PATH, update).await
    }

    /// Catalog page with freshness metadata.
    pub async fn list_services(
        &self,
        filters: &ServiceFilters,
    ) -> Result<ResponseEnvelope<CatalogSnapshot>, ClientError> {
        let query = filters.to_query();
        self.get(SERVICES_PATH, &query).await
    }

    pub async fn get_service(
        &self,
        service_id: Uuid,
    ) -> Result<ResponseEnvelope<ServiceListing>, ClientError> {
        self.get(&format!("{}{}/", SERVICES_PATH, service_id), &[])
            .await
    }

    pub async fn place_bid(&self, draft: &BidDraft) -> Result<ResponseEnvelope<Bid>, ClientError> {
        self.post_json(BIDS_PATH, draft).await
    }

    pub async fn create_booking(
        &self,
        draft: &BookingDraft,
    ) -> Result<ResponseEnvelope<Booking>, ClientError> {
        self.post_json(BOOKINGS_PATH, draft).await
    }

    pub async fn send_message(
        &self,
        draft: &MessageDraft,
    ) -> Result<ResponseEnvelope<Message>, ClientError> {
        self.post_json(MESSAGES_PATH, draft).await
    }

    /// Upload a file plus form fields as multipart form data.
    pub async fn upload_attachment(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
        fields: Vec<(String, String)>,
    ) -> Result<ResponseEnvelope<Attachment>, ClientError> {
        let payload = MultipartPayload {
            fields,
            file: Some(FilePart {
                field_name: "file".to_string(),
                filename: filename.to_string(),
                content_type: content_type.to_string(),
                bytes,
            }),
        };
        self.post_multipart(ATTACHMENTS_PATH, payload).await
    }

    /// Upload all pending offline mutations in one batch.
    pub async fn upload_batch(
        &self,
        request: &BatchUploadRequest,
    ) -> Result<ResponseEnvelope<BatchUploadResponse>, ClientError> {
        self.post_json(SYNC_UPLOAD_PATH, request).await
    }
}
