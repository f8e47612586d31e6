// Auth domain model - OAuth implicit-flow settings
use serde::{Deserialize, Serialize};

pub const DEFAULT_RESPONSE_TYPE: &str = "token";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    pub auth_url: String,
    pub client_id: String,
    pub response_type: String,
    pub scope: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            auth_url: "https://example.com/oauth2/authorize".to_string(),
            client_id: "your-client-id".to_string(),
            response_type: DEFAULT_RESPONSE_TYPE.to_string(),
            scope: "read write".to_string(),
        }
    }
}

/// Partial auth settings; absent fields leave the current value untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl AuthSettings {
    pub fn merge(&self, patch: &AuthSettingsPatch) -> Self {
        Self {
            auth_url: patch.auth_url.clone().unwrap_or_else(|| self.auth_url.clone()),
            client_id: patch.client_id.clone().unwrap_or_else(|| self.client_id.clone()),
            response_type: patch
                .response_type
                .clone()
                .unwrap_or_else(|| self.response_type.clone()),
            scope: patch.scope.clone().unwrap_or_else(|| self.scope.clone()),
        }
    }

    /// Build the authorize URL the browser is sent to. The flow parameters
    /// replace any of the same name already present in `auth_url`.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        let response_type = if self.response_type.is_empty() {
            DEFAULT_RESPONSE_TYPE
        } else {
            self.response_type.as_str()
        };
        let params = [
            ("response_type", response_type),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("scope", self.scope.as_str()),
        ];

        let mut url = match reqwest::Url::parse(&self.auth_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Auth URL {} is not absolute ({}), appending parameters as-is", self.auth_url, e);
                let separator = if self.auth_url.contains('?') { '&' } else { '?' };
                let query: Vec<String> = params
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
                    .collect();
                return format!("{}{}{}", self.auth_url, separator, query.join("&"));
            }
        };

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(name, _)| !params.iter().any(|(param, _)| *name == *param))
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut().clear().extend_pairs(&kept).extend_pairs(params);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_absent_fields() {
        let settings = AuthSettings::default();
        let patch = AuthSettingsPatch {
            client_id: Some("X".to_string()),
            ..Default::default()
        };

        let merged = settings.merge(&patch);
        assert_eq!(merged.client_id, "X");
        assert_eq!(merged.auth_url, settings.auth_url);
        assert_eq!(merged.response_type, settings.response_type);
        assert_eq!(merged.scope, settings.scope);
    }

    #[test]
    fn test_authorize_url() {
        let settings = AuthSettings {
            auth_url: "https://id.example.com/connect/authorize".to_string(),
            client_id: "AC-Frontend".to_string(),
            response_type: String::new(),
            scope: "read write".to_string(),
        };

        let url = settings.authorize_url("http://localhost:3000/login");
        assert_eq!(
            url,
            "https://id.example.com/connect/authorize?response_type=token&client_id=AC-Frontend\
             &redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Flogin&scope=read+write"
        );
    }

    #[test]
    fn test_authorize_url_with_existing_query() {
        let settings = AuthSettings {
            auth_url: "https://id.example.com/authorize?tenant=a".to_string(),
            ..Default::default()
        };

        let url = settings.authorize_url("http://localhost:3000/login");
        assert!(url.starts_with("https://id.example.com/authorize?tenant=a&response_type=token"));
    }

    #[test]
    fn test_authorize_url_replaces_existing_flow_params() {
        let settings = AuthSettings {
            auth_url: "https://id.example.com/authorize?client_id=stale&tenant=a&scope=old".to_string(),
            client_id: "fresh".to_string(),
            ..Default::default()
        };

        let url = settings.authorize_url("http://localhost:3000/login");
        assert_eq!(url.matches("client_id=").count(), 1);
        assert_eq!(url.matches("scope=").count(), 1);
        assert!(url.contains("client_id=fresh"));
        assert!(!url.contains("stale"));
        assert!(url.contains("tenant=a"));
        assert!(url.contains("scope=read+write"));
    }

    #[test]
    fn test_authorize_url_relative_falls_back_to_appending() {
        let settings = AuthSettings {
            auth_url: "/authorize".to_string(),
            ..Default::default()
        };

        let url = settings.authorize_url("http://localhost:3000/login");
        assert!(url.starts_with("/authorize?response_type=token&client_id=your-client-id"));
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: AuthSettingsPatch = serde_json::from_str(r#"{"scope":"API"}"#).unwrap();
        assert_eq!(patch.scope.as_deref(), Some("API"));
        assert!(patch.client_id.is_none());
    }
}
