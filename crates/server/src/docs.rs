use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::dtos::{
    admin_dto::{
        AdminUserResponse, CreateProductDto, CreateProjectDto, DashboardStatsResponse, ProductResponse,
        ProjectResponse, UpdateKycStatusDto,
    },
    investment_dto::{CreateInvestmentDto, InvestmentResponse},
    kyc_dto::{KycDocumentResponse, UploadKycDocumentDto},
    referral_dto::{CreateReferralDto, ReferralNodeResponse, ReferralTreeResponse},
    transaction_dto::{CreateTransactionDto, TransactionResponse},
    user_dto::{RegisterUserDto, RegisterUserResponse, UserProfileResponse},
    CreatedResponse, MessageResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MilkPro MLM Backend API",
        description = "基于 Rust 和 Axum 的乳业投资与三级推荐系统 API 文档",
        version = "1.0.0"
    ),
    paths(
        // System health check
        crate::api::health,
        // User endpoints
        crate::api::user_controller::register,
        crate::api::user_controller::profile,
        // KYC endpoints
        crate::api::kyc_controller::upload_document,
        crate::api::kyc_controller::list_documents,
        // Investment endpoints
        crate::api::investment_controller::create_investment,
        crate::api::investment_controller::list_investments,
        // Transaction endpoints
        crate::api::transaction_controller::create_transaction,
        crate::api::transaction_controller::list_transactions,
        // Referral endpoints
        crate::api::referral_controller::create_referral,
        crate::api::referral_controller::list_referrals,
        // Admin endpoints
        crate::api::admin_controller::dashboard,
        crate::api::admin_controller::list_users,
        crate::api::admin_controller::update_kyc_status,
        crate::api::admin_controller::list_products,
        crate::api::admin_controller::create_product,
        crate::api::admin_controller::list_projects,
        crate::api::admin_controller::create_project,
    ),
    components(
        schemas(
            MessageResponse,
            CreatedResponse,
            RegisterUserDto,
            RegisterUserResponse,
            UserProfileResponse,
            UploadKycDocumentDto,
            KycDocumentResponse,
            CreateInvestmentDto,
            InvestmentResponse,
            CreateTransactionDto,
            TransactionResponse,
            CreateReferralDto,
            ReferralNodeResponse,
            ReferralTreeResponse,
            DashboardStatsResponse,
            AdminUserResponse,
            UpdateKycStatusDto,
            CreateProductDto,
            ProductResponse,
            CreateProjectDto,
            ProjectResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "系统状态", description = "健康检查"),
        (name = "users", description = "用户注册与资料"),
        (name = "kyc", description = "KYC 文档"),
        (name = "investments", description = "项目投资"),
        (name = "transactions", description = "商品买卖"),
        (name = "referrals", description = "三级推荐关系与佣金"),
        (name = "admin", description = "管理后台")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
