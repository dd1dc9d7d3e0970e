use crate::helpers::{admin_user, no_cb, spawn_app};
use emuy_shared::{
    admin::UserStats,
    uac::{Permissions, RoleDraft, RoleId, UserId},
};

#[tokio::test]
async fn ban_and_unban_user() {
    // Arrange
    let app = spawn_app().await;
    *app.stub.users.lock().unwrap() = vec![admin_user("1", "alice"), admin_user("2", "bob")];
    let bob = UserId::from("2");

    // Act - Ban
    app.client.ban_user(&bob, no_cb).await.unwrap().unwrap();

    // Assert
    let users = app.client.list_users(no_cb).await.unwrap().unwrap();
    assert_eq!(
        UserStats::from_users(&users),
        UserStats {
            total: 2,
            banned: 1,
            with_roles: 0
        }
    );
    assert!(users.iter().find(|u| u.id == bob).unwrap().banned);

    // Act - Unban
    app.client.unban_user(&bob, no_cb).await.unwrap().unwrap();

    // Assert
    let users = app.client.list_users(no_cb).await.unwrap().unwrap();
    assert!(users.iter().all(|u| !u.banned));
}

#[tokio::test]
async fn banning_unknown_user_fails() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let actual = app
        .client
        .ban_user(&UserId::from("missing"), no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(actual.unwrap_err().status_code(), Some(404));
}

#[tokio::test]
async fn assign_and_remove_role() {
    // Arrange
    let app = spawn_app().await;
    *app.stub.users.lock().unwrap() = vec![admin_user("1", "alice")];
    let alice = UserId::from("1");
    let member = RoleId::from("r1");

    // Act - Assign
    app.client
        .assign_role(&alice, &member, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let users = app.client.list_users(no_cb).await.unwrap().unwrap();
    assert_eq!(users[0].roles.len(), 1);
    assert_eq!(users[0].roles[0].id, member);

    // Act - Remove
    app.client
        .remove_role(&alice, &member, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let users = app.client.list_users(no_cb).await.unwrap().unwrap();
    assert!(users[0].roles.is_empty());
}

#[tokio::test]
async fn create_role_then_list() {
    // Arrange
    let app = spawn_app().await;
    let draft = RoleDraft {
        name: "Officer".to_string().try_into().unwrap(),
        color: Some("#e67e22".to_string()),
        priority: 5,
        permissions: Permissions::default(),
    };

    // Act
    let created = app.client.create_role(&draft, no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(created.name, draft.name);
    let roles = app.client.list_roles(no_cb).await.unwrap().unwrap();
    assert!(roles.contains(&created));
}

#[tokio::test]
async fn activity_feed_can_be_empty() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let actual = app.client.recent_activity(no_cb).await.unwrap().unwrap();

    // Assert
    assert!(actual.is_empty());
    assert_eq!(app.stub.request_count("GET /auth/admin/activity"), 1);
}

#[tokio::test]
async fn permission_catalogue_lists_page_permissions() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let actual = app.client.list_permissions(no_cb).await.unwrap().unwrap();

    // Assert
    let names: Vec<&str> = actual.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["view_admin", "view_cruddy", "view_devops"]);
}
