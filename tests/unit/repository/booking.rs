use fieldmart::error::AppErrorCode;
use fieldmart::model::BookingStatus;
use fieldmart::repository::app_repo_booking;

use super::super::model::booking::ut_booking;
use super::super::ut_setup_datastore;

#[tokio::test]
async fn slot_exclusivity_on_insert() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_booking(ds).await.unwrap();
    let first = ut_booking(810, "2025-10-10", "5:00 - 6:30");
    repo.create(first).await.unwrap();
    // identical triple from another user must be refused by the key
    // constraint no matter what the caller checked before
    let mut second = ut_booking(810, "2025-10-10", "5:00 - 6:30");
    second.owner_id = 125;
    let e = repo.create(second).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::DuplicateKey);
    let saved = repo.fetch_by_subfield_day(810, "2025-10-10").await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].owner_id, 124);
}

#[tokio::test]
async fn different_slots_coexist() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_booking(ds).await.unwrap();
    repo.create(ut_booking(810, "2025-10-10", "5:00 - 6:30"))
        .await
        .unwrap();
    repo.create(ut_booking(810, "2025-10-10", "6:30 - 8:00"))
        .await
        .unwrap();
    repo.create(ut_booking(810, "2025-10-11", "5:00 - 6:30"))
        .await
        .unwrap();
    repo.create(ut_booking(811, "2025-10-10", "5:00 - 6:30"))
        .await
        .unwrap();
    let day_one = repo.fetch_by_subfield_day(810, "2025-10-10").await.unwrap();
    assert_eq!(day_one.len(), 2);
    let day_two = repo.fetch_by_subfield_day(810, "2025-10-11").await.unwrap();
    assert_eq!(day_two.len(), 1);
}

#[tokio::test]
async fn fetch_by_id_and_status_update() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_booking(ds).await.unwrap();
    let b = ut_booking(810, "2025-10-10", "8:00 - 9:30");
    let bid = b.id_.clone();
    repo.create(b).await.unwrap();
    let mut readback = repo.fetch(bid.as_str()).await.unwrap();
    assert_eq!(readback.status, BookingStatus::Pending);
    readback.status = BookingStatus::Confirmed;
    repo.save(readback).await.unwrap();
    let readback = repo.fetch(bid.as_str()).await.unwrap();
    assert_eq!(readback.status, BookingStatus::Confirmed);

    let e = repo.fetch("no-such-booking").await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::BookingNotExist);
}
