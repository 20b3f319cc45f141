use crate::framework::{FormData, IntoRequestBody, RequestBody, Resource, ResourceKind, TransportError, Upload};
use serde::{Deserialize, Serialize};

resource_id!(CategoryId);

/// A tire brand/category with its logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default, alias = "logo", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Category {
    const KIND: ResourceKind = ResourceKind::Category;

    type Id = CategoryId;
    type Create = CategoryCreate;
    type Update = CategoryUpdate;

    fn id(&self) -> &CategoryId {
        &self.id
    }
}

/// Multipart payload for `POST /categories`. The logo goes in the `logo` file part.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<Upload>,
}

impl CategoryCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            logo: None,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn logo(mut self, upload: Upload) -> Self {
        self.logo = Some(upload);
        self
    }
}

impl IntoRequestBody for CategoryCreate {
    fn into_body(self) -> Result<RequestBody, TransportError> {
        Ok(RequestBody::Multipart(
            FormData::new()
                .text("name", self.name)
                .text_opt("description", self.description)
                .file_opt("logo", self.logo),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<Upload>,
}

impl IntoRequestBody for CategoryUpdate {
    fn into_body(self) -> Result<RequestBody, TransportError> {
        Ok(RequestBody::Multipart(
            FormData::new()
                .text_opt("name", self.name)
                .text_opt("description", self.description)
                .file_opt("logo", self.logo),
        ))
    }
}
