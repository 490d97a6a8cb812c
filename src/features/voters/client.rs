//! Voter listing, upload-status polling and file uploads. Listing calls go
//! through the shared `ResourceClient`; uploads are multipart and therefore use
//! the browser transport directly with the same bearer header.

use crate::{
    app_lib::{AppConfig, AppError, Endpoints, HttpTransport, ResourceClient},
    features::voters::types::{UploadTask, Voter, sort_uploads},
};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct VoterClient<T> {
    api: ResourceClient<T>,
    endpoints: Endpoints,
}

impl<T: HttpTransport> VoterClient<T> {
    pub fn new(api: ResourceClient<T>, config: &AppConfig) -> Self {
        Self {
            api,
            endpoints: config.endpoints(),
        }
    }

    /// Every voter the signed-in admin has added.
    ///
    /// # Errors
    /// Returns `AppError::Http` with status 401 when the session is no longer
    /// accepted, and the usual transport and envelope errors.
    pub async fn list_voters(&self) -> Result<Vec<Voter>, AppError> {
        let voters: Vec<Voter> = self.api.get_data(&self.endpoints.voters).await?;
        debug!(count = voters.len(), "voters loaded");
        Ok(voters)
    }

    /// Upload tasks, oldest first.
    ///
    /// # Errors
    /// Same as `list_voters`.
    pub async fn upload_statuses(&self) -> Result<Vec<UploadTask>, AppError> {
        let mut tasks: Vec<UploadTask> = self.api.get_data(&self.endpoints.upload_status).await?;
        sort_uploads(&mut tasks);
        debug!(count = tasks.len(), "upload statuses loaded");
        Ok(tasks)
    }

    /// Sends one file as multipart field `file`.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the form cannot be built, transport
    /// errors, and `AppError::Http` for non-2xx statuses.
    #[cfg(target_arch = "wasm32")]
    pub async fn upload_file(&self, file: &web_sys::File) -> Result<(), AppError> {
        use crate::app_lib::{Envelope, transport::post_form};
        use tracing::info;
        use web_sys::FormData;

        let form = FormData::new()
            .map_err(|_| AppError::Config("Failed to prepare the upload form.".to_string()))?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(|_| AppError::Config("Failed to attach the file.".to_string()))?;

        let response = post_form(&self.endpoints.uploads, &self.api.auth_headers(), form)
            .await?
            .error_for_status()?;
        if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(&response.body) {
            envelope.into_result()?;
        }
        info!("voter file uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::VoterClient;
    use crate::app_lib::{
        AppConfig, ResourceClient, Session, SessionStore, api::testing::ScriptedTransport,
    };

    fn client(transport: &ScriptedTransport) -> VoterClient<ScriptedTransport> {
        let store = SessionStore::in_memory();
        store.save(&Session::new("A", "B")).unwrap();
        let api = ResourceClient::new(transport.clone(), store);
        VoterClient::new(api, &AppConfig::with_api_base("https://api.example.edu/api/"))
    }

    #[tokio::test]
    async fn lists_voters_with_the_bearer_token() {
        let transport = ScriptedTransport::default();
        transport.reply(
            200,
            r#"{"success":true,"data":[{
                "id":"voter_1","email":"ada@uni.edu","gender":"F","full_name":"Ada Lovelace",
                "department":"Computer Science","created_at":"2024-05-01T10:00:00Z",
                "matriculation_number":"CSC/001"
            }]}"#,
        );

        let voters = client(&transport).list_voters().await.unwrap();

        assert_eq!(voters.len(), 1);
        assert_eq!(voters[0].full_name, "Ada Lovelace");
        let sent = transport.sent();
        assert_eq!(sent[0].url, "https://api.example.edu/api/voters");
        assert_eq!(sent[0].header("Authorization"), Some("Bearer A"));
    }

    #[tokio::test]
    async fn unauthorized_listing_is_reported() {
        let transport = ScriptedTransport::default();
        transport.reply(
            401,
            r#"{"detail":"Given token not valid for any token type"}"#,
        );

        let err = client(&transport).list_voters().await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn upload_statuses_come_back_oldest_first() {
        let transport = ScriptedTransport::default();
        transport.reply(
            200,
            r#"{"success":true,"data":[
                {"id":"upload_b","file":"b.csv","status":"processing","processed_records":5,
                 "total_records":10,"created_at":"2024-05-02T08:00:00Z",
                 "updated_at":"2024-05-02T08:01:00Z","reason":""},
                {"id":"upload_a","file":"a.csv","status":"failed","processed_records":0,
                 "total_records":null,"created_at":"2024-05-01T08:00:00Z",
                 "updated_at":"2024-05-01T08:01:00Z","reason":"Missing column: email"}
            ]}"#,
        );

        let tasks = client(&transport).upload_statuses().await.unwrap();

        assert_eq!(tasks[0].id, "upload_a");
        assert_eq!(tasks[0].failure_reason(), Some("Missing column: email"));
        assert_eq!(tasks[1].progress_percent(), 50);
        assert_eq!(
            transport.sent()[0].url,
            "https://api.example.edu/api/voters/uploads/status"
        );
    }
}
