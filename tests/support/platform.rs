// ABOUTME: In-memory control plane and uploader for driving the pipeline in tests.
// ABOUTME: Responses are scripted per (method, path) and every call is recorded.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use v3push::api::{ApiRequest, ArtifactUploader, ControlPlane, Method, TransportError, UploadError};
use v3push::archive::Archive;
use v3push::types::PackageId;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Unauthorized,
}

/// A control plane that answers from a script.
///
/// Each `(method, path)` has a queue of replies. Replies are consumed in
/// order, and the last one repeats forever, so a single `READY` answers
/// every subsequent poll.
#[derive(Default)]
pub struct FakePlatform {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body for `method path`.
    pub fn respond(&self, method: Method, path: &str, body: Value) -> &Self {
        self.push(method, path, Reply::Body(body.to_string()))
    }

    /// Queue a raw body (empty acknowledgements, garbage).
    pub fn respond_raw(&self, method: Method, path: &str, body: &str) -> &Self {
        self.push(method, path, Reply::Body(body.to_string()))
    }

    /// Queue a transport failure.
    pub fn fail(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Reply::Unauthorized)
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    pub fn requested(&self, method: Method, path: &str) -> bool {
        self.count(method, path) > 0
    }

    /// Body of the first call to `method path`.
    pub fn body_of(&self, method: Method, path: &str) -> Option<Value> {
        self.calls
            .lock()
            .iter()
            .find(|c| c.method == method && c.path == path)
            .and_then(|c| c.body.clone())
    }

    /// Script every platform call of a successful push of `app`.
    ///
    /// The bits package becomes READY on its second poll and the build
    /// STAGED on its third.
    pub fn script_push(&self, app: &str) -> &Self {
        self.respond(Method::Post, "/v3/apps", json!({"guid": "app-1", "name": app}))
            .respond(
                Method::Post,
                "/v3/packages",
                json!({"guid": "pkg-1", "type": "bits", "state": "AWAITING_UPLOAD"}),
            )
            .respond(
                Method::Get,
                "/v3/packages/pkg-1",
                json!({"guid": "pkg-1", "state": "PROCESSING_UPLOAD"}),
            )
            .respond(
                Method::Get,
                "/v3/packages/pkg-1",
                json!({"guid": "pkg-1", "state": "READY"}),
            )
            .respond(
                Method::Post,
                "/v3/builds",
                json!({"guid": "build-1", "state": "STAGING"}),
            )
            .respond(
                Method::Get,
                "/v3/builds/build-1",
                json!({"guid": "build-1", "state": "STAGING", "droplet": null}),
            )
            .respond(
                Method::Get,
                "/v3/builds/build-1",
                json!({"guid": "build-1", "state": "STAGING", "droplet": null}),
            )
            .respond(
                Method::Get,
                "/v3/builds/build-1",
                json!({"guid": "build-1", "state": "STAGED", "droplet": {"guid": "droplet-1"}}),
            )
            .respond(
                Method::Patch,
                "/v3/apps/app-1/relationships/current_droplet",
                json!({"data": {"guid": "droplet-1"}}),
            )
            .respond(
                Method::Get,
                "/v2/shared_domains",
                json!({
                    "total_results": 1,
                    "next_url": null,
                    "resources": [shared_domain("domain-1", "apps.example.com")],
                }),
            )
            .respond(Method::Post, "/v2/routes", route("route-1", app, "domain-1"))
            .respond_raw(Method::Post, "/v3/route_mappings", "")
            .respond(
                Method::Put,
                "/v3/apps/app-1/start",
                json!({"guid": "app-1", "state": "STARTED"}),
            )
    }
}

#[async_trait]
impl ControlPlane for FakePlatform {
    async fn request(&self, request: &ApiRequest) -> Result<String, TransportError> {
        self.calls.lock().push(request.clone());

        let reply = {
            let mut replies = self.replies.lock();
            match replies.get_mut(&(request.method, request.path.clone())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Unauthorized) => Err(TransportError::Unauthorized {
                request: request.to_string(),
            }),
            None => Ok(json!({
                "errors": [{
                    "code": 10000,
                    "title": "CF-NotFound",
                    "detail": format!("no scripted response for {request}"),
                }]
            })
            .to_string()),
        }
    }
}

/// What the fake uploader saw.
#[derive(Debug, Clone)]
pub struct Upload {
    pub package: PackageId,
    pub path: PathBuf,
    pub generated: bool,
    pub entries: Vec<String>,
}

/// Records uploads; can be told to reject them.
#[derive(Default)]
pub struct FakeUploader {
    uploads: Mutex<Vec<Upload>>,
    reject: bool,
}

impl FakeUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            uploads: Mutex::default(),
            reject: true,
        }
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl ArtifactUploader for FakeUploader {
    async fn upload(&self, package: &PackageId, archive: &Archive) -> Result<(), UploadError> {
        if self.reject {
            return Err(UploadError::Rejected {
                status: 413,
                body: "payload too large".to_string(),
            });
        }

        let file = std::fs::File::open(archive.path()).map_err(|source| {
            UploadError::ReadArchive {
                path: archive.path().to_path_buf(),
                source,
            }
        })?;
        let mut entries: Vec<String> = zip::ZipArchive::new(file)
            .map(|zip| zip.file_names().map(str::to_string).collect())
            .unwrap_or_default();
        entries.sort();

        self.uploads.lock().push(Upload {
            package: package.clone(),
            path: archive.path().to_path_buf(),
            generated: archive.is_generated(),
            entries,
        });
        Ok(())
    }
}

pub fn shared_domain(guid: &str, name: &str) -> Value {
    json!({
        "metadata": {"guid": guid, "url": format!("/v2/shared_domains/{guid}")},
        "entity": {"name": name, "router_group_guid": null},
    })
}

pub fn route(guid: &str, host: &str, domain: &str) -> Value {
    json!({
        "metadata": {"guid": guid, "url": format!("/v2/routes/{guid}")},
        "entity": {"host": host, "domain_guid": domain, "path": ""},
    })
}

pub fn host_taken(host: &str) -> Value {
    json!({
        "code": 210003,
        "description": format!("The host is taken: {host}"),
        "error_code": "CF-RouteHostTaken",
    })
}
