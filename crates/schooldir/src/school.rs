//! School domain types shared by the server, the client and the directory view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::entities::school;

/// A persisted school as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<school::Model> for SchoolRecord {
    fn from(model: school::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            city: model.city,
            state: model.state,
            pincode: model.pincode,
            image_path: model.image_path,
            created_at: model.created_at,
        }
    }
}

/// The seven text fields of the intake form, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl SchoolForm {
    /// Multipart part names, in form order.
    pub const FIELDS: [&'static str; 7] =
        ["name", "email", "phone", "address", "city", "state", "pincode"];

    /// Sets a field by its multipart part name. Returns `false` for unknown names.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "pincode" => &mut self.pincode,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Returns `(part name, value)` pairs in form order.
    pub fn parts(&self) -> [(&'static str, &str); 7] {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("pincode", self.pincode.as_str()),
        ]
    }
}
