use std::io::Write;

use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::users::store::get_all_users;

pub const CSV_HEADER: [&str; 5] = ["id", "username", "password", "role", "department"];

/// Writes the full user list as CSV. Passwords are exported as stored.
pub fn write_users_csv<W: Write>(users: &[UserRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for user in users {
        wtr.write_record([
            user.id.to_string(),
            user.username.clone(),
            user.password.clone(),
            user.role.to_string(),
            user.department.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub async fn export_users_csv(pool: &SqlitePool) -> Result<Vec<u8>, AppError> {
    let users = get_all_users(pool).await?;
    let mut buf = Vec::new();
    write_users_csv(&users, &mut buf).map_err(|e| AppError::Internal(e.into()))?;
    Ok(buf)
}
