use crate::framework::{FormData, IntoRequestBody, RequestBody, Resource, ResourceKind, TransportError, Upload};
use crate::model::category::CategoryId;
use crate::model::tyre_size::TyreSizeId;
use serde::{Deserialize, Serialize};

resource_id!(
    /// Backend identifier of a tire listing.
    TireId
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tire {
    #[serde(alias = "_id")]
    pub id: TireId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default, alias = "category", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, alias = "tyreSize", skip_serializing_if = "Option::is_none")]
    pub size_id: Option<TyreSizeId>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Tire {
    const KIND: ResourceKind = ResourceKind::Tire;

    type Id = TireId;
    type Create = TireCreate;
    type Update = TireUpdate;

    fn id(&self) -> &TireId {
        &self.id
    }
}

/// Multipart payload for `POST /tires`. The picture goes in the `image` file part.
#[derive(Debug, Clone, PartialEq)]
pub struct TireCreate {
    pub name: String,
    pub brand: String,
    pub category_id: Option<CategoryId>,
    pub size_id: Option<TyreSizeId>,
    pub price: f64,
    pub stock: u32,
    pub description: Option<String>,
    pub image: Option<Upload>,
}

impl TireCreate {
    pub fn new(name: impl Into<String>, brand: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            category_id: None,
            size_id: None,
            price,
            stock,
            description: None,
            image: None,
        }
    }

    pub fn category(mut self, id: CategoryId) -> Self {
        self.category_id = Some(id);
        self
    }

    pub fn size(mut self, id: TyreSizeId) -> Self {
        self.size_id = Some(id);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn image(mut self, upload: Upload) -> Self {
        self.image = Some(upload);
        self
    }
}

impl IntoRequestBody for TireCreate {
    fn into_body(self) -> Result<RequestBody, TransportError> {
        let form = FormData::new()
            .text("name", self.name)
            .text("brand", self.brand)
            .text_opt("categoryId", self.category_id)
            .text_opt("sizeId", self.size_id)
            .text("price", self.price)
            .text("stock", self.stock)
            .text_opt("description", self.description)
            .file_opt("image", self.image);
        Ok(RequestBody::Multipart(form))
    }
}

/// Multipart payload for `PATCH /tires/{id}`; only the set fields are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TireUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category_id: Option<CategoryId>,
    pub size_id: Option<TyreSizeId>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    pub image: Option<Upload>,
}

impl IntoRequestBody for TireUpdate {
    fn into_body(self) -> Result<RequestBody, TransportError> {
        let form = FormData::new()
            .text_opt("name", self.name)
            .text_opt("brand", self.brand)
            .text_opt("categoryId", self.category_id)
            .text_opt("sizeId", self.size_id)
            .text_opt("price", self.price)
            .text_opt("stock", self.stock)
            .text_opt("description", self.description)
            .file_opt("image", self.image);
        Ok(RequestBody::Multipart(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tire_create_form() {
        let body = TireCreate::new("Pilot Sport 4", "Michelin", 129.5, 12)
            .category("c_1".into())
            .image(Upload::new("ps4.jpg", "image/jpeg", vec![0xff, 0xd8]))
            .into_body()
            .unwrap();

        let form = body.as_form().expect("tires are sent as multipart");
        assert_eq!(form.field("name"), Some("Pilot Sport 4"));
        assert_eq!(form.field("categoryId"), Some("c_1"));
        assert_eq!(form.field("price"), Some("129.5"));
        assert_eq!(form.field("sizeId"), None);
        assert_eq!(form.upload("image").map(|u| u.file_name.as_str()), Some("ps4.jpg"));
    }

    #[test]
    fn test_tire_update_sends_only_set_fields() {
        let update = TireUpdate {
            stock: Some(3),
            ..Default::default()
        };
        let body = update.into_body().unwrap();
        let form = body.as_form().unwrap();
        assert_eq!(form.field("stock"), Some("3"));
        assert_eq!(form.field("name"), None);
        assert!(form.upload("image").is_none());
    }

    #[test]
    fn test_tire_decodes_image_alias() {
        let tire: Tire = serde_json::from_value(json!({
            "_id": "t_1",
            "name": "Blizzak",
            "price": 88.0,
            "image": "https://cdn.example.com/t_1.png"
        }))
        .unwrap();
        assert_eq!(tire.image_url.as_deref(), Some("https://cdn.example.com/t_1.png"));
        assert_eq!(tire.stock, 0);
    }
}
