use postboard::{
    repositories::user_repository::SqliteUserRepository,
    services::user_service::{
        CreateUserRequest, UpdatePasswordRequest, UserService, UserServiceError,
    },
    services::password,
    test_utils::test_helpers,
};
use std::sync::Arc;

fn create_request(email: &str, password: &str) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_create_user_success() {
    // Create isolated test database
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    let service = UserService::new(repository);

    let user = service
        .create_user(create_request("test@example.com", "password123"))
        .await
        .unwrap();

    assert_eq!(user.email, "test@example.com");
    assert_ne!(user.password_hash, "password123");
    assert!(password::verify_password("password123", &user.password_hash));
}

#[tokio::test]
async fn test_short_passwords_are_accepted() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    let result = service
        .create_user(create_request("short@example.com", "test123"))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    service
        .create_user(create_request("duplicate@example.com", "password123"))
        .await
        .unwrap();

    let result = service
        .create_user(create_request("duplicate@example.com", "password456"))
        .await;
    assert!(matches!(result, Err(UserServiceError::EmailTaken)));
}

#[tokio::test]
async fn test_create_user_rejects_bad_input() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    let result = service
        .create_user(create_request("not-an-email", "password123"))
        .await;
    assert!(matches!(result, Err(UserServiceError::InvalidEmail)));

    let result = service
        .create_user(create_request("valid@example.com", ""))
        .await;
    assert!(matches!(result, Err(UserServiceError::EmptyPassword)));
}

#[tokio::test]
async fn test_get_user_not_found() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    let result = service.get_user(9999).await;
    assert!(matches!(result, Err(UserServiceError::UserNotFound)));
}

#[tokio::test]
async fn test_update_password() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    let user = service
        .create_user(create_request("reset@example.com", "oldpassword"))
        .await
        .unwrap();

    service
        .update_password(UpdatePasswordRequest {
            user_id: user.id,
            new_password: "newpassword".to_string(),
        })
        .await
        .unwrap();

    let reloaded = service.get_user(user.id).await.unwrap();
    assert!(password::verify_password("newpassword", &reloaded.password_hash));
    assert!(!password::verify_password("oldpassword", &reloaded.password_hash));
}

#[tokio::test]
async fn test_list_users_paginates() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    for i in 0..3 {
        service
            .create_user(create_request(&format!("user{i}@example.com"), "password"))
            .await
            .unwrap();
    }

    let first_page = service.list_users(Some(2), Some(0)).await.unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].email, "user0@example.com");

    let second_page = service.list_users(Some(2), Some(2)).await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].email, "user2@example.com");
}
