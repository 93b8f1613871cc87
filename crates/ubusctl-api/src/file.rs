// `file` object

use serde_json::json;
use tracing::debug;

use crate::client::UbusClient;
use crate::error::Error;
use crate::models::FileContent;

impl UbusClient {
    /// Read a text file through rpcd's file plugin.
    ///
    /// `file/read` with `{"path": ...}`. The ACL of the login user must
    /// grant read access to `path`.
    pub async fn file_read(&self, path: &str) -> Result<FileContent, Error> {
        debug!(path, "reading remote file");
        self.call("file", "read", json!({ "path": path })).await
    }
}
