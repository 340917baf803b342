//! ContactRepository 統合テスト
//!
//! データベースを使用したテスト。sqlx::test マクロを使用して、
//! テストごとに独立したデータベースを作成しマイグレーションを適用する。
//!
//! 実行方法:
//! ```bash
//! DATABASE_URL=postgres://... cargo test -p contactbook-infra --test contact_repository_test
//! ```

mod common;

use common::{insert_user, payload, test_now, ymd};
use contactbook_domain::{birthday::BirthdayWindow, contact::ContactId};
use contactbook_infra::{
    db::{PgTransactionManager, TransactionManager},
    repository::{ContactRepository, PostgresContactRepository},
};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_insertした連絡先をidで取得できる(pool: PgPool) {
    let user_id = insert_user(&pool, "owner@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    let created = sut
        .insert(&mut tx, &user_id, &payload("Taro", "Yamada", "taro@example.com", ymd(1990, 5, 1)), test_now())
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let found = sut.find_by_id(&user_id, created.id()).await.unwrap().unwrap();

    assert_eq!(found, created);
    assert_eq!(found.firstname().as_str(), "Taro");
    assert_eq!(found.birthday(), ymd(1990, 5, 1));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_コミットしないinsertはロールバックされる(pool: PgPool) {
    let user_id = insert_user(&pool, "owner@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    sut.insert(&mut tx, &user_id, &payload("Taro", "Yamada", "taro@example.com", ymd(1990, 5, 1)), test_now())
        .await
        .unwrap();
    drop(tx);

    assert!(sut.find_all(&user_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_他ユーザーの連絡先は取得も更新も削除もできない(pool: PgPool) {
    let owner = insert_user(&pool, "owner@example.com").await;
    let other = insert_user(&pool, "other@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    let created = sut
        .insert(&mut tx, &owner, &payload("Taro", "Yamada", "taro@example.com", ymd(1990, 5, 1)), test_now())
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert!(sut.find_by_id(&other, created.id()).await.unwrap().is_none());
    assert!(sut.find_all(&other).await.unwrap().is_empty());

    let mut tx = tx_manager.begin().await.unwrap();
    let updated = sut
        .update(
            &mut tx,
            &other,
            created.id(),
            &payload("Hacked", "Yamada", "taro@example.com", ymd(1990, 5, 1)),
            test_now(),
        )
        .await
        .unwrap();
    let deleted = sut.delete(&mut tx, &other, created.id()).await.unwrap();
    tx.commit().await.unwrap();

    assert!(updated.is_none());
    assert!(deleted.is_none());
    assert_eq!(sut.find_all(&owner).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_名前とメールの検索は大文字小文字を無視した完全一致(pool: PgPool) {
    let user_id = insert_user(&pool, "owner@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    sut.insert(&mut tx, &user_id, &payload("John", "Smith", "John@Example.com", ymd(1990, 1, 1)), test_now())
        .await
        .unwrap();
    sut.insert(&mut tx, &user_id, &payload("Johnny", "Smithson", "johnny@example.com", ymd(1990, 1, 1)), test_now())
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let by_lastname = sut.find_by_lastname(&user_id, "SMITH").await.unwrap();
    let by_firstname = sut.find_by_firstname(&user_id, "john").await.unwrap();
    let by_email = sut.find_by_email(&user_id, "john@example.COM").await.unwrap();

    assert_eq!(by_lastname.len(), 1);
    assert_eq!(by_lastname[0].lastname().as_str(), "Smith");
    assert_eq!(by_firstname.len(), 1);
    assert_eq!(by_firstname[0].firstname().as_str(), "John");
    assert_eq!(by_email.unwrap().email().as_str(), "John@Example.com");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_誕生日ウィンドウは年を無視して月日で判定する(pool: PgPool) {
    let user_id = insert_user(&pool, "owner@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    for (name, email, birthday) in [
        ("Inside", "inside@example.com", ymd(1985, 6, 3)),
        ("Edge", "edge@example.com", ymd(2000, 6, 8)),
        ("Outside", "outside@example.com", ymd(1985, 6, 9)),
        ("Past", "past@example.com", ymd(1985, 5, 31)),
    ] {
        sut.insert(&mut tx, &user_id, &payload(name, "Tester", email, birthday), test_now())
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();

    let window = BirthdayWindow::starting(ymd(2024, 6, 1));
    let mut names: Vec<String> = sut
        .find_by_birthday_window(&user_id, &window)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.firstname().as_str().to_string())
        .collect();
    names.sort();

    assert_eq!(names, vec!["Edge".to_string(), "Inside".to_string()]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_年末をまたぐ誕生日ウィンドウは年明けの誕生日も含む(pool: PgPool) {
    let user_id = insert_user(&pool, "owner@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    for (name, email, birthday) in [
        ("December", "dec@example.com", ymd(1980, 12, 31)),
        ("January", "jan@example.com", ymd(1992, 1, 3)),
        ("Later", "later@example.com", ymd(1992, 1, 10)),
        ("Summer", "summer@example.com", ymd(1992, 7, 1)),
    ] {
        sut.insert(&mut tx, &user_id, &payload(name, "Tester", email, birthday), test_now())
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();

    let window = BirthdayWindow::starting(ymd(2024, 12, 29));
    let mut names: Vec<String> = sut
        .find_by_birthday_window(&user_id, &window)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.firstname().as_str().to_string())
        .collect();
    names.sort();

    assert_eq!(names, vec!["December".to_string(), "January".to_string()]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_updateは全項目を置き換えてupdated_atを進める(pool: PgPool) {
    let user_id = insert_user(&pool, "owner@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    let created = sut
        .insert(&mut tx, &user_id, &payload("Taro", "Yamada", "taro@example.com", ymd(1990, 5, 1)), test_now())
        .await
        .unwrap();
    let later = test_now() + chrono::Duration::hours(1);
    let updated = sut
        .update(
            &mut tx,
            &user_id,
            created.id(),
            &payload("Jiro", "Suzuki", "jiro@example.com", ymd(1991, 6, 2)),
            later,
        )
        .await
        .unwrap()
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.lastname().as_str(), "Suzuki");
    assert_eq!(updated.email().as_str(), "jiro@example.com");
    assert_eq!(updated.created_at(), created.created_at());
    assert_eq!(updated.updated_at(), later);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないidの削除はnoneを返す(pool: PgPool) {
    let user_id = insert_user(&pool, "owner@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    let deleted = sut
        .delete(&mut tx, &user_id, ContactId::new(9_999).unwrap())
        .await
        .unwrap();

    assert!(deleted.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_同一ユーザー内でも別の連絡先と同じメールに更新できる(pool: PgPool) {
    let user_id = insert_user(&pool, "owner@example.com").await;
    let other = insert_user(&pool, "other@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    let first = sut
        .insert(&mut tx, &user_id, &payload("Taro", "Yamada", "taro@example.com", ymd(1990, 5, 1)), test_now())
        .await
        .unwrap();
    let second = sut
        .insert(&mut tx, &user_id, &payload("Jiro", "Yamada", "jiro@example.com", ymd(1990, 5, 1)), test_now())
        .await
        .unwrap();
    // 別ユーザーなら同じメールでも登録できる
    sut.insert(&mut tx, &other, &payload("Taro", "Yamada", "taro@example.com", ymd(1990, 5, 1)), test_now())
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = tx_manager.begin().await.unwrap();
    let updated = sut
        .update(
            &mut tx,
            &user_id,
            second.id(),
            &payload("Jiro", "Yamada", "TARO@example.com", ymd(1990, 5, 1)),
            test_now(),
        )
        .await
        .unwrap()
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(updated.email().as_str(), "TARO@example.com");
    // 重複がある場合は ID の小さい連絡先が返る
    let found = sut
        .find_by_email(&user_id, "taro@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id(), first.id());
    assert_eq!(sut.find_all(&other).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_2月29日生まれは平年のウィンドウでも月日で判定される(pool: PgPool) {
    let user_id = insert_user(&pool, "owner@example.com").await;
    let sut = PostgresContactRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    for (name, email, birthday) in [
        ("Leap", "leap@example.com", ymd(2000, 2, 29)),
        ("Edge", "edge@example.com", ymd(1990, 3, 4)),
        ("Outside", "outside@example.com", ymd(1990, 3, 5)),
    ] {
        sut.insert(&mut tx, &user_id, &payload(name, "Tester", email, birthday), test_now())
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();

    // 2023 年は平年なので 2/25 から 7 日後は 3/4
    let window = BirthdayWindow::starting(ymd(2023, 2, 25));
    let mut names: Vec<String> = sut
        .find_by_birthday_window(&user_id, &window)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.firstname().as_str().to_string())
        .collect();
    names.sort();

    assert_eq!(names, vec!["Edge".to_string(), "Leap".to_string()]);
}
