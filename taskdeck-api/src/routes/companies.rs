/// Company endpoints
///
/// # Endpoints
///
/// - `POST /companies` - Create a company (admin only)
/// - `GET /companies` - List companies (admin only)
/// - `GET /companies/:id` - Get a company (admin or member); embeds the
///   member users
/// - `PUT /companies/:id` - Update a company (admin only)
/// - `DELETE /companies/:id` - Delete a company (admin only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::users::UserResponse,
    routes::{non_empty, validate_dto, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{
        authorization::{require_admin, require_company_access},
        principal::Principal,
    },
    models::{
        company::{Company, CompanyMode, CreateCompany, UpdateCompany},
        user::User,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create company request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    /// Company name (unique)
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Business mode (defaults to outsource)
    #[serde(default = "default_mode")]
    pub mode: CompanyMode,

    /// Rating, 0 to 5
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
}

fn default_mode() -> CompanyMode {
    CompanyMode::Outsource
}

/// Update company request
///
/// Both fields are required by the update contract; a value that is
/// present but empty counts as missing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    /// New description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// New business mode
    pub mode: Option<CompanyMode>,
}

/// Outward representation of a company
#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyResponse {
    /// Company ID
    pub id: Uuid,

    /// Company name
    pub name: String,

    /// Description
    pub description: Option<String>,

    /// Business mode
    pub mode: CompanyMode,

    /// Rating, 0 to 5
    pub rating: Option<f64>,

    /// Member users (populated on the detail endpoint only)
    #[serde(default)]
    pub employees: Vec<UserResponse>,

    /// Created at
    pub created_at: DateTime<Utc>,

    /// Updated at
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            description: company.description,
            mode: company.mode,
            rating: company.rating,
            employees: Vec::new(),
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

impl CompanyResponse {
    /// Builds the detail representation with member users embedded
    pub fn with_employees(company: Company, employees: Vec<User>) -> Self {
        let mut response = Self::from(company);
        response.employees = employees.into_iter().map(UserResponse::from).collect();
        response
    }
}

/// Delete company response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCompanyResponse {
    /// Whether the company was deleted
    pub deleted: bool,
}

/// Create company (admin only)
///
/// # Errors
///
/// - `400 Bad Request`: Missing or invalid fields
/// - `403 Forbidden`: Caller is not an admin
/// - `409 Conflict`: Company name already exists
pub async fn create_company(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<CompanyResponse>)> {
    require_admin(&principal)?;
    validate_dto(&req)?;

    if req.name.is_empty() {
        return Err(ApiError::MissingFields(vec!["name".to_string()]));
    }

    // Check-then-act; the unique constraint is the secondary guarantee
    if Company::find_by_name(&state.db, &req.name).await?.is_some() {
        return Err(ApiError::AlreadyExists(
            "Company already exists".to_string(),
        ));
    }

    let company = Company::create(
        &state.db,
        CreateCompany {
            name: req.name,
            description: req.description,
            mode: req.mode,
            rating: req.rating,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(company.into())))
}

/// List companies (admin only)
pub async fn list_companies(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<CompanyResponse>>> {
    require_admin(&principal)?;

    let companies = Company::list(&state.db, pagination.limit(), pagination.offset()).await?;

    Ok(Json(
        companies.into_iter().map(CompanyResponse::from).collect(),
    ))
}

/// Get company by ID (admin or member)
///
/// Embeds the member users in the response.
///
/// # Errors
///
/// - `404 Not Found`: Company doesn't exist
/// - `403 Forbidden`: Caller is neither an admin nor a member
pub async fn get_company(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<CompanyResponse>> {
    let company = Company::find_by_id(&state.db, company_id).await?;
    let employees = User::list_by_company(&state.db, company_id).await?;
    let member_ids: Vec<Uuid> = employees.iter().map(|u| u.id).collect();

    require_company_access(&principal, company.as_ref(), &member_ids)?;

    // The predicate guarantees the company is present here
    let company =
        company.ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    Ok(Json(CompanyResponse::with_employees(company, employees)))
}

/// Update company (admin only)
///
/// Description and mode are both required by the update contract.
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Company doesn't exist
pub async fn update_company(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(company_id): Path<Uuid>,
    Json(req): Json<UpdateCompanyRequest>,
) -> ApiResult<Json<CompanyResponse>> {
    require_admin(&principal)?;
    validate_dto(&req)?;

    let description = non_empty(req.description);

    let mut missing = Vec::new();
    if description.is_none() {
        missing.push("description".to_string());
    }
    if req.mode.is_none() {
        missing.push("mode".to_string());
    }
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    let company = Company::update(
        &state.db,
        company_id,
        UpdateCompany {
            description,
            mode: req.mode,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    Ok(Json(company.into()))
}

/// Delete company (admin only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Company doesn't exist
pub async fn delete_company(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<DeleteCompanyResponse>> {
    require_admin(&principal)?;

    let deleted = Company::delete(&state.db, company_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    Ok(Json(DeleteCompanyResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_company_request_defaults_mode() {
        let req: CreateCompanyRequest = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert_eq!(req.mode, CompanyMode::Outsource);
    }

    #[test]
    fn test_company_response_from_model() {
        let company = Company {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            description: Some("desc".to_string()),
            mode: CompanyMode::Product,
            rating: Some(4.5),
            created_at: Utc::now(),
            updated_at: None,
        };

        let response = CompanyResponse::from(company);
        assert_eq!(response.name, "Acme");
        assert!(response.employees.is_empty());
    }
}
