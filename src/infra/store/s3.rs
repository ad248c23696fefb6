use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use super::SnapshotStore;
use crate::error::{CgpaError, Result};

/// Stores each key as the object `<prefix><key>.json` in an S3 bucket.
///
/// Credentials and region come from the ambient AWS configuration loaded by
/// `aws_config::load_from_env`.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3Store {
    pub fn new(config: &aws_config::SdkConfig, bucket: &str, prefix: &str) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
            bucket: bucket.to_string(),
            prefix: normalize_prefix(prefix),
        }
    }

    fn object_key(&self, key: &str) -> String {
        format!("{}{}.json", self.prefix, key)
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

#[async_trait::async_trait]
impl SnapshotStore for S3Store {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let object_key = self.object_key(key);
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_key())
                {
                    return Ok(None);
                }
                return Err(CgpaError::Persistence(format!(
                    "S3 GetObject failed for '{object_key}': {err}"
                )));
            }
        };

        let bytes = resp
            .body
            .collect()
            .await
            .map_err(|e| CgpaError::Persistence(format!("S3 body read failed: {e}")))?
            .into_bytes();

        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|e| CgpaError::Persistence(format!("S3 object is not UTF-8: {e}")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let object_key = self.object_key(key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(value.as_bytes().to_vec()))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| {
                CgpaError::Persistence(format!("S3 PutObject failed for '{object_key}': {e}"))
            })?;

        debug!(bucket = %self.bucket, key = %object_key, "Stored value in S3");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("cgpa"), "cgpa/");
        assert_eq!(normalize_prefix("/users/me/"), "users/me/");
    }
}
