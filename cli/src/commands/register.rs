//! Register command - run one registration through the user service.
//!
//! Users live in an in-process store, so this is mostly useful to preview
//! the verification email end to end.

use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{CreateUser, RegisterUser, UserResponse};
use notifier::{transport, Notifier};
use user_service_lib::{InMemoryUserStore, UserManager, UserService, UserServiceConfig};

use crate::args::RegisterArgs;

/// Execute the register command
pub async fn execute(args: RegisterArgs) -> AppResult<()> {
    let notifier = Notifier::new(transport::from_env())?;
    let service = UserManager::new(
        Arc::new(InMemoryUserStore::new()),
        notifier,
        UserServiceConfig::from_env(),
    );

    let input = RegisterUser {
        user: CreateUser {
            email: args.email,
            nickname: args.nickname,
            first_name: args.first_name,
            ..Default::default()
        },
        password: args.password,
    };

    let user = service.register(input).await?;
    let response = UserResponse::from(user);
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| AppError::internal(format!("Failed to encode user: {}", e)))?;
    println!("{}", json);
    Ok(())
}
