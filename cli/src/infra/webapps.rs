//! Infrastructure implementation of the `WebappApi` port over [`ApiClient`].

use anyhow::Result;
use serde_json::json;

use crate::application::ports::{ApiResponse, WebappApi};
use crate::infra::api::{ApiClient, Method, Payload};

impl WebappApi for ApiClient {
    fn get_webapp(&self, domain: &str) -> Result<ApiResponse> {
        Ok(self.call(&self.webapp_url(domain), Method::Get, None)?)
    }

    fn delete_webapp(&self, domain: &str) -> Result<ApiResponse> {
        Ok(self.call(&self.webapp_url(domain), Method::Delete, None)?)
    }

    fn create_webapp(&self, domain: &str, python_version: &str) -> Result<ApiResponse> {
        let fields = [("domain_name", domain), ("python_version", python_version)];
        Ok(self.call(
            &self.collection_url("webapps"),
            Method::Post,
            Some(Payload::Form(&fields)),
        )?)
    }

    fn patch_webapp(&self, domain: &str, fields: &[(&str, &str)]) -> Result<ApiResponse> {
        Ok(self.call(
            &self.webapp_url(domain),
            Method::Patch,
            Some(Payload::Form(fields)),
        )?)
    }

    fn add_static_file(&self, domain: &str, url: &str, path: &str) -> Result<ApiResponse> {
        let mappings_url = format!("{}static_files/", self.webapp_url(domain));
        Ok(self.call(
            &mappings_url,
            Method::Post,
            Some(Payload::Json(json!({ "url": url, "path": path }))),
        )?)
    }

    fn reload_webapp(&self, domain: &str) -> Result<ApiResponse> {
        let reload_url = format!("{}reload/", self.webapp_url(domain));
        Ok(self.call(&reload_url, Method::Post, None)?)
    }
}
