use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Appointment, AppointmentStatus};

const APPOINTMENT_COLUMNS: &str = "id, reference, customer_name, customer_phone, vehicle_reg, \
     service_type, date, start_time, quoted_price, status, notes, created_at, updated_at";

// ── Appointments ──

pub fn create_appointment(conn: &Connection, appt: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO appointments ({APPOINTMENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
        ),
        params![
            appt.id,
            appt.reference,
            appt.customer_name,
            appt.customer_phone,
            appt.vehicle_reg,
            appt.service_type,
            appt.date.format("%Y-%m-%d").to_string(),
            appt.start_time.format("%H:%M").to_string(),
            appt.quoted_price,
            appt.status.as_str(),
            appt.notes,
            appt.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            appt.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

/// True when an insert failed because the slot's unique index rejected it —
/// the storage-level answer to two customers racing for the same time.
pub fn is_slot_taken_error(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

pub fn get_appointment_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let result = conn.query_row(
        &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
        params![id],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appt) => Ok(Some(appt?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_appointment_by_reference(
    conn: &Connection,
    reference: &str,
) -> anyhow::Result<Option<Appointment>> {
    let result = conn.query_row(
        &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE reference = ?1"),
        params![reference],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appt) => Ok(Some(appt?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_appointments(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Appointment>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 WHERE status = ?1 ORDER BY date DESC, start_time DESC LIMIT ?2"
            ),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 ORDER BY date DESC, start_time DESC LIMIT ?1"
            ),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

/// Start times already taken on a date. Cancelled appointments do not hold
/// their slot.
pub fn booked_times(conn: &Connection, date: NaiveDate) -> anyhow::Result<HashSet<NaiveTime>> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let mut stmt = conn.prepare(
        "SELECT start_time FROM appointments WHERE date = ?1 AND status != 'cancelled'",
    )?;

    let rows = stmt.query_map(params![date_str], |row| row.get::<_, String>(0))?;

    let mut times = HashSet::new();
    for row in rows {
        let raw = row?;
        if let Ok(t) = NaiveTime::parse_from_str(&raw, "%H:%M") {
            times.insert(t);
        }
    }
    Ok(times)
}

pub fn bookings_count_for_date(conn: &Connection, date: NaiveDate) -> anyhow::Result<usize> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE date = ?1 AND status != 'cancelled'",
        params![date_str],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

pub fn update_appointment_status(
    conn: &Connection,
    id: &str,
    status: &AppointmentStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE appointments SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn get_dashboard_stats(conn: &Connection, today: NaiveDate) -> anyhow::Result<DashboardStats> {
    let today_str = today.format("%Y-%m-%d").to_string();

    let appointments_today: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM appointments WHERE date = ?1 AND status != 'cancelled'",
            params![today_str],
            |row| row.get(0),
        )
        .unwrap_or(0);

    let upcoming_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM appointments WHERE date >= ?1 AND status = 'confirmed'",
            params![today_str],
            |row| row.get(0),
        )
        .unwrap_or(0);

    let pending_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM appointments WHERE status = 'pending'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    Ok(DashboardStats {
        appointments_today,
        upcoming_count,
        pending_count,
    })
}

pub struct DashboardStats {
    pub appointments_today: i64,
    pub upcoming_count: i64,
    pub pending_count: i64,
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let id: String = row.get(0)?;
    let reference: String = row.get(1)?;
    let customer_name: String = row.get(2)?;
    let customer_phone: Option<String> = row.get(3)?;
    let vehicle_reg: String = row.get(4)?;
    let service_type: String = row.get(5)?;
    let date_str: String = row.get(6)?;
    let start_time_str: String = row.get(7)?;
    let quoted_price: f64 = row.get(8)?;
    let status_str: String = row.get(9)?;
    let notes: Option<String> = row.get(10)?;
    let created_at_str: String = row.get(11)?;
    let updated_at_str: String = row.get(12)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| Utc::now().date_naive());
    let start_time =
        NaiveTime::parse_from_str(&start_time_str, "%H:%M").unwrap_or(NaiveTime::MIN);
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Appointment {
        id,
        reference,
        customer_name,
        customer_phone,
        vehicle_reg,
        service_type,
        date,
        start_time,
        quoted_price,
        status: AppointmentStatus::parse(&status_str),
        notes,
        created_at,
        updated_at,
    })
}

// ── Settings ──

pub struct GarageSettings {
    pub id: String,
    pub garage_name: String,
    pub business_hours: Option<String>,
    pub timezone: String,
}

pub fn get_settings(conn: &Connection, id: &str) -> anyhow::Result<Option<GarageSettings>> {
    let result = conn.query_row(
        "SELECT id, garage_name, business_hours, timezone FROM settings WHERE id = ?1",
        params![id],
        |row| {
            Ok(GarageSettings {
                id: row.get(0)?,
                garage_name: row.get(1)?,
                business_hours: row.get(2)?,
                timezone: row.get(3)?,
            })
        },
    );

    match result {
        Ok(settings) => Ok(Some(settings)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_settings(conn: &Connection, settings: &GarageSettings) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO settings (id, garage_name, business_hours, timezone)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
           garage_name = excluded.garage_name,
           business_hours = excluded.business_hours,
           timezone = excluded.timezone,
           updated_at = datetime('now')",
        params![
            settings.id,
            settings.garage_name,
            settings.business_hours,
            settings.timezone,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn make_appointment(id: &str, date: &str, time: &str) -> Appointment {
        let now = Utc::now().naive_utc();
        Appointment {
            id: id.to_string(),
            reference: format!("GB-{id}"),
            customer_name: "Alice".to_string(),
            customer_phone: Some("+447700900000".to_string()),
            vehicle_reg: "AB12CDE".to_string(),
            service_type: "interim".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            quoted_price: 85.00,
            status: AppointmentStatus::Confirmed,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_and_fetch() {
        let conn = setup_db();
        create_appointment(&conn, &make_appointment("a1", "2025-06-16", "10:00")).unwrap();

        let fetched = get_appointment_by_id(&conn, "a1").unwrap().unwrap();
        assert_eq!(fetched.reference, "GB-a1");
        assert_eq!(fetched.start_time.format("%H:%M").to_string(), "10:00");
        assert_eq!(fetched.quoted_price, 85.00);
        assert_eq!(fetched.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn test_fetch_by_reference() {
        let conn = setup_db();
        create_appointment(&conn, &make_appointment("a1", "2025-06-16", "10:00")).unwrap();
        assert!(get_appointment_by_reference(&conn, "GB-a1")
            .unwrap()
            .is_some());
        assert!(get_appointment_by_reference(&conn, "GB-zz")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_double_booking_hits_unique_index() {
        let conn = setup_db();
        create_appointment(&conn, &make_appointment("a1", "2025-06-16", "10:00")).unwrap();

        let err = create_appointment(&conn, &make_appointment("a2", "2025-06-16", "10:00"))
            .unwrap_err();
        assert!(is_slot_taken_error(&err));
    }

    #[test]
    fn test_cancelled_slot_can_be_rebooked() {
        let conn = setup_db();
        create_appointment(&conn, &make_appointment("a1", "2025-06-16", "10:00")).unwrap();
        update_appointment_status(&conn, "a1", &AppointmentStatus::Cancelled).unwrap();

        create_appointment(&conn, &make_appointment("a2", "2025-06-16", "10:00")).unwrap();
    }

    #[test]
    fn test_booked_times_excludes_cancelled() {
        let conn = setup_db();
        create_appointment(&conn, &make_appointment("a1", "2025-06-16", "10:00")).unwrap();
        create_appointment(&conn, &make_appointment("a2", "2025-06-16", "11:00")).unwrap();
        update_appointment_status(&conn, "a2", &AppointmentStatus::Cancelled).unwrap();

        let times = booked_times(
            &conn,
            NaiveDate::parse_from_str("2025-06-16", "%Y-%m-%d").unwrap(),
        )
        .unwrap();
        assert_eq!(times.len(), 1);
        assert!(times.contains(&NaiveTime::parse_from_str("10:00", "%H:%M").unwrap()));
    }

    #[test]
    fn test_status_filter_and_limit() {
        let conn = setup_db();
        create_appointment(&conn, &make_appointment("a1", "2025-06-16", "10:00")).unwrap();
        create_appointment(&conn, &make_appointment("a2", "2025-06-17", "10:00")).unwrap();
        update_appointment_status(&conn, "a2", &AppointmentStatus::Cancelled).unwrap();

        let cancelled = get_all_appointments(&conn, Some("cancelled"), 50).unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, "a2");

        let all = get_all_appointments(&conn, None, 1).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_settings_roundtrip() {
        let conn = setup_db();
        assert!(get_settings(&conn, "default").unwrap().is_none());

        save_settings(
            &conn,
            &GarageSettings {
                id: "default".to_string(),
                garage_name: "Hilltop Garage".to_string(),
                business_hours: Some(r#"{"days":[]}"#.to_string()),
                timezone: "Europe/London".to_string(),
            },
        )
        .unwrap();

        let loaded = get_settings(&conn, "default").unwrap().unwrap();
        assert_eq!(loaded.garage_name, "Hilltop Garage");
        assert_eq!(loaded.business_hours.as_deref(), Some(r#"{"days":[]}"#));
    }
}
