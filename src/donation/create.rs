//! The donation-creation path.
//!
//! This is the one place in the application where two records must change
//! together: the donation row and the cause's raised-amount aggregate. Both
//! writes happen inside a single database transaction so that either the
//! donation exists and the aggregate reflects it, or neither happened.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{Error, cause::increase_raised_amount, database_id::DonationId};

use super::{
    core::{Donation, DonationInput, DonationStatus},
    query::get_donation,
    schema::DonationSchema,
};

/// Record a donation and add its amount to the cause's raised total.
///
/// New donations start out as [DonationStatus::Pending]; settlement is an
/// external concern and recording a donation does not imply it was paid.
///
/// On success the returned donation is enriched with the cause title and
/// organization, and with the donor's display name when the donation is
/// attributed and not anonymous.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or less,
/// - [Error::CauseNotFound] if the cause ID does not refer to an existing
///   cause,
/// - or [Error::SqlError] if there is some other SQL error.
///
/// In every error case the transaction is rolled back: no donation row is
/// left behind and the cause's raised amount is unchanged.
pub fn create_donation(
    input: DonationInput,
    schema: DonationSchema,
    connection: &mut Connection,
) -> Result<Donation, Error> {
    if input.amount <= 0.0 {
        return Err(Error::NonPositiveAmount(input.amount));
    }

    let transaction = connection.transaction()?;
    let now = OffsetDateTime::now_utc();

    let donation_id: DonationId = transaction
        .prepare(
            "INSERT INTO donation (user_id, cause_id, amount, is_anonymous, status,
                                   created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id",
        )?
        .query_one(
            (
                input.user_id,
                input.cause_id,
                input.amount,
                input.is_anonymous,
                DonationStatus::Pending.as_str(),
                now,
                now,
            ),
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::CauseNotFound(input.cause_id),
            error => error.into(),
        })?;

    increase_raised_amount(input.cause_id, input.amount, now, &transaction)?;

    let donation = get_donation(donation_id, schema, &transaction)?;

    transaction.commit()?;

    Ok(donation)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        cause::get_cause,
        db::initialize,
        donation::{DonationFilter, DonationSchema, DonationStatus, query_donations},
        test_utils::{insert_test_cause, insert_test_user},
    };

    use super::{DonationInput, create_donation};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn current_schema() -> DonationSchema {
        DonationSchema {
            has_transaction_hash: true,
        }
    }

    fn donation_input(cause_id: i64, amount: f64) -> DonationInput {
        DonationInput {
            user_id: None,
            cause_id,
            amount,
            is_anonymous: false,
        }
    }

    fn count_donations(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM donation", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn create_records_donation_and_raises_cause_total() {
        let mut conn = get_test_connection();
        let cause = insert_test_cause(&conn, "Clean Water");
        let user = insert_test_user(&conn, "Jo Average", "jo@example.com");

        let donation = create_donation(
            DonationInput {
                user_id: Some(user),
                cause_id: cause,
                amount: 100.0,
                is_anonymous: false,
            },
            current_schema(),
            &mut conn,
        )
        .unwrap();

        assert_eq!(donation.amount, 100.0);
        assert_eq!(donation.cause_id, cause);
        assert_eq!(donation.status, DonationStatus::Pending);
        assert_eq!(donation.cause_title.as_deref(), Some("Clean Water"));
        assert_eq!(donation.user_name, "Jo Average");
        assert_eq!(get_cause(cause, &conn).unwrap().raised_amount, 100.0);
    }

    #[test]
    fn raised_amount_equals_sum_of_created_donations() {
        let mut conn = get_test_connection();
        let cause = insert_test_cause(&conn, "Clean Water");
        let amounts = [10.0, 25.5, 100.0, 3.25];

        for amount in amounts {
            create_donation(donation_input(cause, amount), current_schema(), &mut conn).unwrap();
        }

        let raised = get_cause(cause, &conn).unwrap().raised_amount;
        assert_eq!(raised, amounts.iter().sum::<f64>());
    }

    #[test]
    fn anonymous_create_returns_redacted_name() {
        let mut conn = get_test_connection();
        let cause = insert_test_cause(&conn, "Clean Water");
        let user = insert_test_user(&conn, "Jo Average", "jo@example.com");

        let donation = create_donation(
            DonationInput {
                user_id: Some(user),
                cause_id: cause,
                amount: 50.0,
                is_anonymous: true,
            },
            current_schema(),
            &mut conn,
        )
        .unwrap();

        assert_eq!(donation.user_name, "Anonymous");
        assert_eq!(donation.user_id, Some(user));
    }

    #[test]
    fn create_rejects_non_positive_amount_without_side_effects() {
        let mut conn = get_test_connection();
        let cause = insert_test_cause(&conn, "Clean Water");

        for amount in [0.0, -10.0] {
            let result =
                create_donation(donation_input(cause, amount), current_schema(), &mut conn);

            assert_eq!(result, Err(Error::NonPositiveAmount(amount)));
        }

        assert_eq!(count_donations(&conn), 0);
        assert_eq!(get_cause(cause, &conn).unwrap().raised_amount, 0.0);
    }

    #[test]
    fn create_rejects_missing_cause_without_side_effects() {
        let mut conn = get_test_connection();

        let result = create_donation(donation_input(999, 10.0), current_schema(), &mut conn);

        assert_eq!(result, Err(Error::CauseNotFound(999)));
        assert_eq!(count_donations(&conn), 0);
    }

    #[test]
    fn failed_aggregate_update_rolls_back_the_donation() {
        let mut conn = get_test_connection();
        let cause = insert_test_cause(&conn, "Clean Water");

        // Make the aggregate update fail after the donation insert succeeds.
        conn.execute_batch(
            "CREATE TRIGGER inject_aggregate_failure
             BEFORE UPDATE OF raised_amount ON cause
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
        )
        .unwrap();

        let result = create_donation(donation_input(cause, 10.0), current_schema(), &mut conn);

        assert!(matches!(result, Err(Error::SqlError(_))));
        assert_eq!(count_donations(&conn), 0, "donation row escaped the rollback");
        assert_eq!(get_cause(cause, &conn).unwrap().raised_amount, 0.0);
    }

    #[test]
    fn takes_user_id_as_is_without_existence_check() {
        let mut conn = get_test_connection();
        let cause = insert_test_cause(&conn, "Clean Water");

        let donation = create_donation(
            DonationInput {
                user_id: Some(424242),
                cause_id: cause,
                amount: 10.0,
                is_anonymous: false,
            },
            current_schema(),
            &mut conn,
        )
        .unwrap();

        assert_eq!(donation.user_id, Some(424242));
        // No such account, so the display name falls back.
        assert_eq!(donation.user_name, "Anonymous");
    }

    #[test]
    fn concurrent_donations_to_same_cause_do_not_lose_updates() {
        use std::sync::{Arc, Mutex};

        let conn = get_test_connection();
        let cause = insert_test_cause(&conn, "Clean Water");
        let shared = Arc::new(Mutex::new(conn));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    let mut conn = shared.lock().unwrap();
                    create_donation(donation_input(cause, 50.0), current_schema(), &mut conn)
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let conn = shared.lock().unwrap();
        assert_eq!(get_cause(cause, &conn).unwrap().raised_amount, 100.0);
    }

    #[test]
    fn created_donations_appear_in_listings() {
        let mut conn = get_test_connection();
        let cause = insert_test_cause(&conn, "Clean Water");
        create_donation(donation_input(cause, 10.0), current_schema(), &mut conn).unwrap();
        create_donation(donation_input(cause, 20.0), current_schema(), &mut conn).unwrap();

        let donations = query_donations(DonationFilter::All, current_schema(), &conn).unwrap();

        assert_eq!(donations.len(), 2);
        assert_eq!(donations[0].amount, 20.0, "newest donation should be first");
    }
}
