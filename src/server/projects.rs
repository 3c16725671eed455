//! `/api/projects` handlers.
//!
//! GET on `/api/projects/:key` looks the key up as a slug; PATCH and DELETE
//! on the same path treat it as a numeric id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::error::ApiError;
use super::extract::ApiJson;
use super::model::{NewProject, Project, ProjectPatch, ProjectSummary};
use super::ServerState;

fn parse_id(key: &str) -> Result<i64, ApiError> {
    key.parse()
        .map_err(|_| ApiError::Validation(format!("`{key}` is not a project id")))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let projects = state.store.list().await?;
    Ok(Json(projects.into_iter().map(ProjectSummary::from).collect()))
}

pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.store.by_slug(&slug).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    ApiJson(body): ApiJson<NewProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    body.validate().map_err(ApiError::Validation)?;
    let project = state.store.insert(body).await?;
    tracing::info!(id = project.id, slug = %project.slug, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    ApiJson(patch): ApiJson<ProjectPatch>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&key)?;
    let project = state.store.update(id, patch).await?;
    tracing::info!(id, "project updated");
    Ok(Json(project))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&key)?;
    state.store.delete(id).await?;
    tracing::info!(id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::ProjectLink;

    fn body(slug: &str) -> NewProject {
        NewProject {
            slug: slug.into(),
            title: "Portfolio".into(),
            summary: "This site".into(),
            content: "Details".into(),
            cover_image: Some("/covers/site.webp".into()),
            featured: false,
            tags: vec!["web".into()],
            technologies: vec!["rust".into()],
            links: vec![ProjectLink {
                label: "Live".into(),
                url: "https://example.com".into(),
            }],
        }
    }

    #[tokio::test]
    async fn crud_round() {
        let state = ServerState::for_tests();

        let (status, Json(created)) = create(State(state.clone()), ApiJson(body("site"))).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(listed) = list(State(state.clone())).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].slug, "site");

        let Json(fetched) = get_by_slug(State(state.clone()), Path("site".into())).await.unwrap();
        assert_eq!(fetched.content, "Details");

        let patch = ProjectPatch {
            featured: Some(true),
            ..ProjectPatch::default()
        };
        let Json(updated) = update(State(state.clone()), Path(created.id.to_string()), ApiJson(patch))
            .await
            .unwrap();
        assert!(updated.featured);

        let status = delete(State(state.clone()), Path(created.id.to_string())).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        let err = get_by_slug(State(state), Path("site".into())).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_body_is_rejected() {
        let state = ServerState::for_tests();
        let mut b = body("site");
        b.title = String::new();
        let err = create(State(state), ApiJson(b)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_slug_conflicts() {
        let state = ServerState::for_tests();
        let (status, _) = create(State(state.clone()), ApiJson(body("site"))).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let err = create(State(state), ApiJson(body("site"))).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn patch_validates_merged_record() {
        let state = ServerState::for_tests();
        let (_, Json(created)) = create(State(state.clone()), ApiJson(body("site"))).await.unwrap();
        let patch = ProjectPatch {
            slug: Some("Not A Slug".into()),
            ..ProjectPatch::default()
        };
        let err = update(State(state.clone()), Path(created.id.to_string()), ApiJson(patch))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let Json(still) = get_by_slug(State(state), Path("site".into())).await.unwrap();
        assert_eq!(still.slug, "site");
    }

    #[tokio::test]
    async fn unknown_or_malformed_ids() {
        let state = ServerState::for_tests();
        let err = delete(State(state.clone()), Path("42".into())).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = delete(State(state.clone()), Path("abc".into())).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = update(State(state), Path("99".into()), ApiJson(ProjectPatch::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
