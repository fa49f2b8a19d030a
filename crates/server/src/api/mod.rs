pub mod admin_controller;
pub mod investment_controller;
pub mod kyc_controller;
pub mod referral_controller;
pub mod transaction_controller;
pub mod user_controller;


use axum::routing::{get, Router};

/// 系统健康检查
///
/// 返回服务器运行状态
#[utoipa::path(
    get,
    path = "/api/v1/",
    responses(
        (status = 200, description = "服务器运行正常", body = String)
    ),
    tag = "系统状态"
)]
pub async fn health() -> &'static str {
    "Server is running! 🚀"
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(health))
        .nest("/users", user_controller::UserController::app())
        .nest("/kyc", kyc_controller::KycController::app())
        .nest("/investments", investment_controller::InvestmentController::app())
        .nest("/transactions", transaction_controller::TransactionController::app())
        .nest("/referrals", referral_controller::ReferralController::app())
        .nest("/admin", admin_controller::AdminController::app())
}
