use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use log::info;
use serde::Serialize;

use crate::files::{DirectoryEntry, listing};
use crate::server::ServerConfig;
use crate::web::ApiError;

#[derive(Debug, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
}

/// JSON body of a listing response. Paths are client-relative; the
/// absolute location on the host never leaves the server.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub path: String,
    pub parent: Option<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub entries: Vec<DirectoryEntry>,
}

pub async fn list(
    Extension(config): Extension<Arc<ServerConfig>>,
    path: Option<Path<String>>,
) -> Result<Json<ListingResponse>, ApiError> {
    let relative = path.map(|Path(p)| p).unwrap_or_default();
    info!("list: /{}", relative);

    let resolved = config.resolver.resolve(&relative).await?;
    let entries = listing::list(&resolved).await?;

    let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    let parent = segments
        .split_last()
        .map(|(_, init)| format!("/{}", init.join("/")));

    let mut breadcrumbs = vec![Breadcrumb {
        name: "Root".to_string(),
        path: "/".to_string(),
    }];
    let mut current = String::new();
    for segment in &segments {
        current.push('/');
        current.push_str(segment);
        breadcrumbs.push(Breadcrumb {
            name: (*segment).to_string(),
            path: current.clone(),
        });
    }

    Ok(Json(ListingResponse {
        path: format!("/{}", segments.join("/")),
        parent,
        breadcrumbs,
        entries,
    }))
}
