//! Doctor administration endpoints

use super::client::{decode, ApiClient};
use crate::config::SecretString;
use crate::domain::{Doctor, DoctorId, DoctorList, IntakeError, Result};
use reqwest::{Method, Url};
use serde::Serialize;

/// Default page size for doctor searches
pub const DEFAULT_SEARCH_LIMIT: u32 = 25;

/// Account details for a new doctor
#[derive(Debug, Clone, Serialize)]
pub struct NewDoctor {
    pub email: String,
    pub password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Search parameters for `GET /doctors`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorQuery {
    pub q: String,
    pub limit: u32,
}

impl Default for DoctorQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl ApiClient {
    /// Creates a doctor account
    pub async fn create_doctor(&self, doctor: &NewDoctor) -> Result<Doctor> {
        let request = self.request(Method::POST, "/doctors").json(doctor);
        let response = self.send(request).await?;
        let created: Doctor = decode(response).await?;

        tracing::info!(doctor_id = %created.id, "Doctor created");
        Ok(created)
    }

    /// Searches doctors by free text
    ///
    /// The backend answers either a bare array or `{items: [...]}`; both
    /// come back as a [`DoctorList`].
    pub async fn search_doctors(&self, query: &DoctorQuery) -> Result<DoctorList> {
        let limit = query.limit.to_string();
        let request = self
            .request(Method::GET, "/doctors")
            .query(&[("q", query.q.as_str()), ("limit", limit.as_str())]);
        let response = self.send(request).await?;
        let list: DoctorList = decode(response).await?;

        tracing::debug!(results = list.items.len(), "Doctor search completed");
        Ok(list)
    }

    /// Deletes a doctor account
    pub async fn delete_doctor(&self, id: &DoctorId) -> Result<()> {
        let url = self.doctor_url(id)?;
        let request = self.request_url(Method::DELETE, url);
        self.send(request).await?;

        tracing::info!(doctor_id = %id, "Doctor deleted");
        Ok(())
    }

    /// `/doctors/{id}` with the id percent-encoded as one path segment
    fn doctor_url(&self, id: &DoctorId) -> Result<Url> {
        let mut url = Url::parse(&self.url("/doctors")).map_err(|e| {
            IntakeError::Configuration(format!("Invalid API base URL '{}': {e}", self.base_url()))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                IntakeError::Configuration(format!(
                    "API base URL '{}' cannot carry a path",
                    self.base_url()
                ))
            })?
            .push(id.as_str());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, ApiConfig};
    use crate::core::session::SessionContext;
    use mockito::Matcher;
    use serde_json::json;

    fn client(base_url: String) -> ApiClient {
        let config = ApiConfig {
            base_url,
            ..Default::default()
        };
        ApiClient::new(&config, SessionContext::anonymous()).unwrap()
    }

    #[test]
    fn test_doctor_url_encodes_id() {
        let client = client("https://hospital.example.com/api".to_string());
        let id = DoctorId::new("a/b c").unwrap();
        assert_eq!(
            client.doctor_url(&id).unwrap().as_str(),
            "https://hospital.example.com/api/doctors/a%2Fb%20c"
        );
    }

    #[tokio::test]
    async fn test_search_sends_query_and_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/doctors")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "card".into()),
                Matcher::UrlEncoded("limit".into(), "25".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"_id":"d1","name":"Dr. Heart"}]"#)
            .create_async()
            .await;

        let query = DoctorQuery {
            q: "card".to_string(),
            ..Default::default()
        };
        let list = client(format!("{}/api", server.url()))
            .search_doctors(&query)
            .await
            .unwrap();

        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name.as_deref(), Some("Dr. Heart"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_doctor_posts_account() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/doctors")
            .match_body(Matcher::Json(json!({
                "email": "new@example.com",
                "password": "initial-pass",
                "name": "Dr. New"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"d9","email":"new@example.com","name":"Dr. New"}"#)
            .create_async()
            .await;

        let doctor = NewDoctor {
            email: "new@example.com".to_string(),
            password: secret_string("initial-pass".to_string()),
            name: Some("Dr. New".to_string()),
        };
        let created = client(format!("{}/api", server.url()))
            .create_doctor(&doctor)
            .await
            .unwrap();

        assert_eq!(created.id.as_str(), "d9");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_doctor() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/doctors/d1")
            .with_status(204)
            .create_async()
            .await;

        client(format!("{}/api", server.url()))
            .delete_doctor(&DoctorId::new("d1").unwrap())
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
