use crate::{
    dtos::{
        admin_dto::{
            AdminUserResponse, CreateProductDto, CreateProjectDto, DashboardStatsResponse, ProductResponse,
            ProjectResponse, UpdateKycStatusDto,
        },
        parse_object_id, CreatedResponse, MessageResponse,
    },
    extractors::{auth_extractor::AdminUser, validation_extractor::ValidationExtractor},
    services::Services,
};
use axum::{
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use tracing::info;
use utils::AppResult;

/// 管理后台统计
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    tag = "admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "统计数据", body = DashboardStatsResponse),
        (status = 403, description = "非管理员")
    )
)]
pub async fn dashboard(
    Extension(services): Extension<Services>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<DashboardStatsResponse>> {
    Ok(Json(services.admin.dashboard().await?))
}

/// 用户列表(含投资总额与直推数量)
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "用户列表，最新注册的在前", body = Vec<AdminUserResponse>),
        (status = 403, description = "非管理员")
    )
)]
pub async fn list_users(
    Extension(services): Extension<Services>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<AdminUserResponse>>> {
    Ok(Json(services.admin.list_users().await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/kyc",
    tag = "admin",
    security(("bearer" = [])),
    request_body = UpdateKycStatusDto,
    responses(
        (status = 200, description = "KYC 状态已更新", body = MessageResponse),
        (status = 400, description = "状态只能是 approved / rejected"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn update_kyc_status(
    Extension(services): Extension<Services>,
    AdminUser(admin): AdminUser,
    ValidationExtractor(req): ValidationExtractor<UpdateKycStatusDto>,
) -> AppResult<Json<MessageResponse>> {
    let user_id = parse_object_id(&req.user_id, "user_id")?;
    services.admin.update_kyc_status(&user_id, req.status).await?;
    info!("🪪 管理员 {} 更新了用户 {} 的 KYC 状态", admin.phone, user_id);

    Ok(Json(MessageResponse::new("KYC status updated successfully")))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/products",
    tag = "admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "商品列表，按类型、名称排序", body = Vec<ProductResponse>)
    )
)]
pub async fn list_products(
    Extension(services): Extension<Services>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<ProductResponse>>> {
    Ok(Json(services.admin.list_products().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/products",
    tag = "admin",
    security(("bearer" = [])),
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "商品创建成功", body = CreatedResponse)
    )
)]
pub async fn create_product(
    Extension(services): Extension<Services>,
    AdminUser(_admin): AdminUser,
    ValidationExtractor(req): ValidationExtractor<CreateProductDto>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = services.admin.create_product(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(&id, "Product created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/projects",
    tag = "admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "项目列表，最新的在前", body = Vec<ProjectResponse>)
    )
)]
pub async fn list_projects(
    Extension(services): Extension<Services>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    Ok(Json(services.admin.list_projects().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/projects",
    tag = "admin",
    security(("bearer" = [])),
    request_body = CreateProjectDto,
    responses(
        (status = 201, description = "项目创建成功", body = CreatedResponse)
    )
)]
pub async fn create_project(
    Extension(services): Extension<Services>,
    AdminUser(_admin): AdminUser,
    ValidationExtractor(req): ValidationExtractor<CreateProjectDto>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = services.admin.create_project(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(&id, "Project created successfully")),
    ))
}

pub struct AdminController;
impl AdminController {
    pub fn app() -> Router {
        Router::new()
            .route("/dashboard", get(dashboard))
            .route("/users", get(list_users))
            .route("/kyc", put(update_kyc_status))
            .route("/products", get(list_products).post(create_product))
            .route("/projects", get(list_projects).post(create_project))
    }
}
