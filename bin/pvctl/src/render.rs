use pv_core::{Page, UserRecord, display::format_timestamp};
use tabled::{Table, Tabled};

/// User row for display.
#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Last Login")]
    last_logged_in: String,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            status: user.status().to_string(),
            created_at: format_timestamp(user.created_at.as_deref()),
            last_logged_in: format_timestamp(user.last_logged_in.as_deref()),
        }
    }
}

/// Table for one page plus a position footer.
pub fn user_table(page: &Page<UserRecord>) -> String {
    if page.items.is_empty() {
        return "No users found.".to_string();
    }

    let table = Table::new(page.items.iter().map(UserRow::from)).to_string();
    format!(
        "{table}\nPage {} of {} ({} users)",
        page.page, page.total_pages, page.total_items
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_core::{Role, UserId, table::paginate};

    fn user(id: i64, attempts: u32) -> UserRecord {
        UserRecord {
            id: UserId::Number(id),
            username: format!("user{id}"),
            email: format!("user{id}@clinic.org"),
            role: Role::Normal,
            created_at: Some("2024-01-05T15:04:00Z".to_string()),
            last_logged_in: None,
            login_attempts: attempts,
        }
    }

    #[test]
    fn test_user_table_rows() {
        let page = paginate(&[user(1, 0), user(2, 4)], 1);
        let out = user_table(&page);

        assert!(out.contains("Last Login"));
        assert!(out.contains("user2@clinic.org"));
        assert!(out.contains("blocked"));
        assert!(out.contains("Jan 5, 2024, 03:04 PM"));
        assert!(out.contains("Never"));
        assert!(out.ends_with("Page 1 of 1 (2 users)"));
    }

    #[test]
    fn test_empty_page() {
        let page = paginate::<UserRecord>(&[], 1);
        assert_eq!(user_table(&page), "No users found.");
    }
}
