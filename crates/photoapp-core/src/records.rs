//! Typed records exchanged with the service.
//!
//! Each response record is decoded explicitly from the classified JSON body;
//! a missing or mistyped field is a `MalformedResponse`, never a default.

use crate::error::ClientError;
use crate::paginate::PageItem;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /stats`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Stats {
    /// Bucket status reported by the service.
    pub message: String,
    #[serde(rename = "db_numUsers")]
    pub num_users: i64,
    #[serde(rename = "db_numAssets")]
    pub num_assets: i64,
}

/// One row of `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub userid: i64,
    pub email: String,
    pub lastname: String,
    pub firstname: String,
    pub bucketfolder: String,
}

/// One row of `GET /assets`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub assetid: i64,
    pub userid: i64,
    pub assetname: String,
    pub bucketkey: String,
}

/// One object of `GET /bucket`, as listed by the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BucketItem {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "LastModified")]
    pub last_modified: String,
    #[serde(rename = "ETag")]
    pub etag: String,
    #[serde(rename = "Size")]
    pub size: u64,
    #[serde(rename = "StorageClass")]
    pub storage_class: String,
}

impl PageItem for BucketItem {
    fn cursor_key(&self) -> &str {
        &self.key
    }
}

/// `GET /image/{assetid}`; `data` is still base64 here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageDownload {
    pub user_id: i64,
    pub asset_name: String,
    pub bucket_key: String,
    pub data: String,
}

/// Body of `PUT /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub lastname: String,
    pub firstname: String,
    pub bucketfolder: String,
}

/// Success body of `PUT /user`; `message` is "inserted" or "updated".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpsertUserResponse {
    pub userid: i64,
    pub message: String,
}

/// Body of `POST /image/{userid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub assetname: String,
    /// Base64 of the file content.
    pub data: String,
}

/// Success body of `POST /image/{userid}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub assetid: i64,
}

#[derive(Deserialize)]
struct Rows<T> {
    data: Vec<T>,
}

/// Decode a single record from a 200 body received from `url`.
pub fn decode_record<T: DeserializeOwned>(url: &str, body: Value) -> Result<T, ClientError> {
    serde_json::from_value(body).map_err(|e| ClientError::malformed(url, e.to_string()))
}

/// Decode the `data` array of a listing body.
pub fn decode_rows<T: DeserializeOwned>(url: &str, body: Value) -> Result<Vec<T>, ClientError> {
    decode_record::<Rows<T>>(url, body).map(|rows| rows.data)
}
