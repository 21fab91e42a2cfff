//! School repository: insert and list operations for the `schools` table.

use sea_orm::{ActiveValue::Set, ConnectionTrait, EntityTrait, QueryOrder};

use super::entities::{school, School};
use super::DatabaseError;
use crate::school::{SchoolForm, SchoolRecord};

pub const TABLE: &str = "schools";

/// Inserts a new school and returns its store-assigned id.
///
/// `created_at` is left to the column default so the store assigns it.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    form: &SchoolForm,
    image_path: Option<String>,
) -> Result<i32, DatabaseError> {
    let model = school::ActiveModel {
        name: Set(form.name.clone()),
        email: Set(form.email.clone()),
        phone: Set(form.phone.clone()),
        address: Set(form.address.clone()),
        city: Set(form.city.clone()),
        state: Set(form.state.clone()),
        pincode: Set(form.pincode.clone()),
        image_path: Set(image_path),
        ..Default::default()
    };

    let result = School::insert(model)
        .exec(db)
        .await
        .map_err(|e| DatabaseError::classify(e, TABLE))?;

    Ok(result.last_insert_id)
}

/// Returns every school, newest first. Ties on `created_at` are broken by id.
pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<SchoolRecord>, DatabaseError> {
    let rows = School::find()
        .order_by_desc(school::Column::CreatedAt)
        .order_by_desc(school::Column::Id)
        .all(db)
        .await
        .map_err(|e| DatabaseError::classify(e, TABLE))?;

    Ok(rows.into_iter().map(SchoolRecord::from).collect())
}
